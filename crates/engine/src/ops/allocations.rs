use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    AllocationNewCmd, BudgetAllocation, Money, ResultEngine, budget_allocations,
    util::model_currency,
};

use super::{
    Engine, access::require_actor, normalize_optional_text, normalize_required_text, with_tx,
};

impl Engine {
    /// Adds a planned spending line item to the project (any member).
    ///
    /// Allocations are plan-side only: they never touch the cost ledger and
    /// only meet it inside the variance report.
    pub async fn new_allocation(&self, cmd: AllocationNewCmd) -> ResultEngine<Uuid> {
        require_actor(&cmd.user_id)?;
        let name = normalize_required_text(&cmd.name, "allocation name")?;
        let ticket_ref = normalize_optional_text(cmd.ticket_ref.as_deref());

        with_tx!(self, |db_tx| {
            let project = self
                .require_project_member(&db_tx, &cmd.project_id, &cmd.user_id)
                .await?;
            let currency = model_currency(&project.currency)?;

            let allocation = BudgetAllocation::new(
                cmd.project_id.clone(),
                name,
                Money::new(cmd.amount_minor, currency),
                ticket_ref,
                Utc::now(),
            )?;
            budget_allocations::ActiveModel::from(&allocation)
                .insert(&db_tx)
                .await?;

            Ok(allocation.id)
        })
    }

    /// Lists project allocations, newest first.
    pub async fn list_allocations(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<BudgetAllocation>> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_project_member(&db_tx, project_id, user_id)
                .await?;

            let models = budget_allocations::Entity::find()
                .filter(budget_allocations::Column::ProjectId.eq(project_id.to_string()))
                .order_by_desc(budget_allocations::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(BudgetAllocation::try_from(model)?);
            }
            Ok(out)
        })
    }
}
