//! A `Project` groups members, costs and budget allocations. A user can own
//! or belong to multiple projects.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, Money, util::model_currency};

/// A project with its declared currency and optional budget cap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub currency: Currency,
    pub owner_id: String,
    /// Absent means "no cap": costs and allocations are unconstrained.
    pub budget: Option<Money>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        name: String,
        description: Option<String>,
        currency: Currency,
        owner_id: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            currency,
            owner_id: owner_id.to_string(),
            budget: None,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub owner_id: String,
    pub budget_minor: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::costs::Entity")]
    Costs,
    #[sea_orm(has_many = "super::budget_allocations::Entity")]
    BudgetAllocations,
    #[sea_orm(has_many = "super::project_members::Entity")]
    ProjectMembers,
}

impl Related<super::costs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Costs.def()
    }
}

impl Related<super::budget_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetAllocations.def()
    }
}

impl Related<super::project_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.clone()),
            name: ActiveValue::Set(project.name.clone()),
            description: ActiveValue::Set(project.description.clone()),
            currency: ActiveValue::Set(project.currency.code().to_string()),
            owner_id: ActiveValue::Set(project.owner_id.clone()),
            budget_minor: ActiveValue::Set(project.budget.map(Money::minor)),
            created_at: ActiveValue::Set(project.created_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let currency = model_currency(&model.currency)?;
        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            currency,
            owner_id: model.owner_id,
            budget: model.budget_minor.map(|minor| Money::new(minor, currency)),
            created_at: model.created_at,
        })
    }
}
