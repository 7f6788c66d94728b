//! Budget allocations: planned spending line items.
//!
//! Allocations are independent of costs and splits. They represent planned,
//! not actual, spend and only meet the ledger inside the budget variance
//! report.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::model_currency};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub id: Uuid,
    pub project_id: String,
    pub name: String,
    pub amount: Money,
    /// Optional external ticket reference; stored verbatim.
    pub ticket_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BudgetAllocation {
    pub fn new(
        project_id: String,
        name: String,
        amount: Money,
        ticket_ref: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "allocation amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            name,
            amount,
            ticket_ref,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub amount_minor: i64,
    pub currency: String,
    pub ticket_ref: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Projects,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BudgetAllocation> for ActiveModel {
    fn from(allocation: &BudgetAllocation) -> Self {
        Self {
            id: ActiveValue::Set(allocation.id.to_string()),
            project_id: ActiveValue::Set(allocation.project_id.clone()),
            name: ActiveValue::Set(allocation.name.clone()),
            amount_minor: ActiveValue::Set(allocation.amount.minor()),
            currency: ActiveValue::Set(allocation.amount.currency().code().to_string()),
            ticket_ref: ActiveValue::Set(allocation.ticket_ref.clone()),
            created_at: ActiveValue::Set(allocation.created_at),
        }
    }
}

impl TryFrom<Model> for BudgetAllocation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let currency = model_currency(&model.currency)?;
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("allocation not exists".to_string()))?,
            project_id: model.project_id,
            name: model.name,
            amount: Money::new(model.amount_minor, currency),
            ticket_ref: model.ticket_ref,
            created_at: model.created_at,
        })
    }
}
