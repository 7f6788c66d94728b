//! Cost splits.
//!
//! A [`CostSplit`] is one participant's share of a [`Cost`](crate::Cost).
//! For any cost, the split amounts sum exactly to the cost amount; the
//! engine enforces this on write and never updates a split independently.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, SplitMode, util::model_currency};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostSplit {
    pub id: Uuid,
    pub cost_id: Uuid,
    /// The participant who owes this share.
    pub user_id: String,
    pub amount: Money,
    /// The split mode the cost was created with.
    pub mode: SplitMode,
}

impl CostSplit {
    pub fn new(cost_id: Uuid, user_id: String, amount: Money, mode: SplitMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            cost_id,
            user_id,
            amount,
            mode,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cost_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub cost_id: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub mode: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::costs::Entity",
        from = "Column::CostId",
        to = "super::costs::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Costs,
}

impl Related<super::costs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Costs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CostSplit> for ActiveModel {
    fn from(split: &CostSplit) -> Self {
        Self {
            id: ActiveValue::Set(split.id.to_string()),
            cost_id: ActiveValue::Set(split.cost_id.to_string()),
            user_id: ActiveValue::Set(split.user_id.clone()),
            amount_minor: ActiveValue::Set(split.amount.minor()),
            currency: ActiveValue::Set(split.amount.currency().code().to_string()),
            mode: ActiveValue::Set(split.mode.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for CostSplit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let currency = model_currency(&model.currency)?;
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid cost split id".to_string()))?,
            cost_id: Uuid::parse_str(&model.cost_id)
                .map_err(|_| EngineError::KeyNotFound("cost not exists".to_string()))?,
            user_id: model.user_id,
            amount: Money::new(model.amount_minor, currency),
            mode: SplitMode::try_from(model.mode.as_str())?,
        })
    }
}
