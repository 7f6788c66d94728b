//! Cost primitives.
//!
//! A `Cost` is one expense entry in a project's ledger. It is created
//! together with its [`CostSplit`](crate::CostSplit) rows as a single atomic
//! unit, and the only state change it ever sees afterwards is the one-way
//! tentative → final transition.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::model_currency};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostStatus {
    Tentative,
    Final,
}

impl CostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tentative => "tentative",
            Self::Final => "final",
        }
    }
}

impl TryFrom<&str> for CostStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "tentative" => Ok(Self::Tentative),
            "final" => Ok(Self::Final),
            other => Err(EngineError::Validation(format!(
                "invalid cost status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub id: Uuid,
    pub project_id: String,
    /// The member who paid; always the acting user at creation time.
    pub paid_by: String,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub occurred_on: NaiveDate,
    pub status: CostStatus,
    /// Opaque reference to an uploaded receipt; stored verbatim.
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Cost {
    pub fn new(
        project_id: String,
        paid_by: String,
        amount: Money,
        category: String,
        description: String,
        occurred_on: NaiveDate,
        status: CostStatus,
        receipt_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "cost amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            paid_by,
            amount,
            category,
            description,
            occurred_on,
            status,
            receipt_url,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "costs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub paid_by: String,
    pub amount_minor: i64,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub occurred_on: Date,
    pub status: String,
    pub receipt_url: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cost_splits::Entity")]
    CostSplits,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Projects,
}

impl Related<super::cost_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CostSplits.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Cost> for ActiveModel {
    fn from(cost: &Cost) -> Self {
        Self {
            id: ActiveValue::Set(cost.id.to_string()),
            project_id: ActiveValue::Set(cost.project_id.clone()),
            paid_by: ActiveValue::Set(cost.paid_by.clone()),
            amount_minor: ActiveValue::Set(cost.amount.minor()),
            currency: ActiveValue::Set(cost.amount.currency().code().to_string()),
            category: ActiveValue::Set(cost.category.clone()),
            description: ActiveValue::Set(cost.description.clone()),
            occurred_on: ActiveValue::Set(cost.occurred_on),
            status: ActiveValue::Set(cost.status.as_str().to_string()),
            receipt_url: ActiveValue::Set(cost.receipt_url.clone()),
            created_at: ActiveValue::Set(cost.created_at),
        }
    }
}

impl TryFrom<Model> for Cost {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let currency = model_currency(&model.currency)?;
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("cost not exists".to_string()))?,
            project_id: model.project_id,
            paid_by: model.paid_by,
            amount: Money::new(model.amount_minor, currency),
            category: model.category,
            description: model.description,
            occurred_on: model.occurred_on,
            status: CostStatus::try_from(model.status.as_str())?,
            receipt_url: model.receipt_url,
            created_at: model.created_at,
        })
    }
}
