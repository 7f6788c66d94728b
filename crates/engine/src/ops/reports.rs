use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    BudgetAllocation, Cost, Money, ProjectStatistics, ResultEngine, budget_allocations, costs,
    report, util::model_currency,
};

use super::{Engine, access::require_actor, with_tx};

impl Engine {
    /// Computes the full reporting snapshot for a project: totals, category
    /// breakdown, the daily series over the most recent `window` days with
    /// activity, and budget-vs-allocated variance.
    ///
    /// Costs and allocations are loaded inside one transaction so the
    /// aggregation runs over a consistent snapshot; the math itself lives in
    /// [`report`] and is pure.
    pub async fn project_statistics(
        &self,
        project_id: &str,
        user_id: &str,
        window: usize,
    ) -> ResultEngine<ProjectStatistics> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            let project = self
                .require_project_member(&db_tx, project_id, user_id)
                .await?;
            let currency = model_currency(&project.currency)?;
            let budget = project.budget_minor.map(|minor| Money::new(minor, currency));

            let cost_models = costs::Entity::find()
                .filter(costs::Column::ProjectId.eq(project_id.to_string()))
                .order_by_asc(costs::Column::OccurredOn)
                .all(&db_tx)
                .await?;
            let mut project_costs: Vec<Cost> = Vec::with_capacity(cost_models.len());
            for model in cost_models {
                project_costs.push(Cost::try_from(model)?);
            }

            let allocation_models = budget_allocations::Entity::find()
                .filter(budget_allocations::Column::ProjectId.eq(project_id.to_string()))
                .all(&db_tx)
                .await?;
            let mut allocations: Vec<BudgetAllocation> =
                Vec::with_capacity(allocation_models.len());
            for model in allocation_models {
                allocations.push(BudgetAllocation::try_from(model)?);
            }

            Ok(ProjectStatistics {
                currency,
                total_spent: report::total_spent(
                    currency,
                    &project_costs,
                    crate::CostStatus::Final,
                )?,
                tentative_total: report::total_spent(
                    currency,
                    &project_costs,
                    crate::CostStatus::Tentative,
                )?,
                categories: report::category_breakdown(currency, &project_costs)?,
                daily: report::daily_series(currency, &project_costs, window)?,
                variance: report::budget_variance(currency, budget, &allocations)?,
            })
        })
    }
}
