use sea_orm_migration::prelude::*;

use crate::m20260807_000002_projects::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum BudgetAllocations {
    Table,
    Id,
    ProjectId,
    Name,
    AmountMinor,
    Currency,
    TicketRef,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BudgetAllocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetAllocations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BudgetAllocations::ProjectId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BudgetAllocations::Name).string().not_null())
                    .col(
                        ColumnDef::new(BudgetAllocations::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetAllocations::Currency)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BudgetAllocations::TicketRef).string())
                    .col(
                        ColumnDef::new(BudgetAllocations::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_allocations-project_id")
                            .from(BudgetAllocations::Table, BudgetAllocations::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_allocations-project_id")
                    .table(BudgetAllocations::Table)
                    .col(BudgetAllocations::ProjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BudgetAllocations::Table).to_owned())
            .await
    }
}
