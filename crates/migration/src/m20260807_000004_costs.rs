use sea_orm_migration::prelude::*;

use crate::{m20260807_000001_users::Users, m20260807_000002_projects::Projects};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Costs {
    Table,
    Id,
    ProjectId,
    PaidBy,
    AmountMinor,
    Currency,
    Category,
    Description,
    OccurredOn,
    Status,
    ReceiptUrl,
    CreatedAt,
}

#[derive(Iden)]
enum CostSplits {
    Table,
    Id,
    CostId,
    UserId,
    AmountMinor,
    Currency,
    Mode,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Costs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Costs::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Costs::ProjectId).string().not_null())
                    .col(ColumnDef::new(Costs::PaidBy).string().not_null())
                    .col(ColumnDef::new(Costs::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Costs::Currency).string().not_null())
                    .col(ColumnDef::new(Costs::Category).string().not_null())
                    .col(ColumnDef::new(Costs::Description).string().not_null())
                    .col(ColumnDef::new(Costs::OccurredOn).date().not_null())
                    .col(ColumnDef::new(Costs::Status).string().not_null())
                    .col(ColumnDef::new(Costs::ReceiptUrl).string())
                    .col(ColumnDef::new(Costs::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-project_id")
                            .from(Costs::Table, Costs::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-paid_by")
                            .from(Costs::Table, Costs::PaidBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-costs-project_id-occurred_on")
                    .table(Costs::Table)
                    .col(Costs::ProjectId)
                    .col(Costs::OccurredOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CostSplits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CostSplits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CostSplits::CostId).string().not_null())
                    .col(ColumnDef::new(CostSplits::UserId).string().not_null())
                    .col(
                        ColumnDef::new(CostSplits::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CostSplits::Currency).string().not_null())
                    .col(ColumnDef::new(CostSplits::Mode).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cost_splits-cost_id")
                            .from(CostSplits::Table, CostSplits::CostId)
                            .to(Costs::Table, Costs::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cost_splits-user_id")
                            .from(CostSplits::Table, CostSplits::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cost_splits-cost_id")
                    .table(CostSplits::Table)
                    .col(CostSplits::CostId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CostSplits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Costs::Table).to_owned())
            .await?;
        Ok(())
    }
}
