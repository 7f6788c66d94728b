use base64::Engine as _;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{
    Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    Cost, CostNewCmd, CostSplit, CostStatus, EngineError, Money, ResultEngine, cost_splits,
    costs, split::compute_splits, util::model_currency,
};

use super::{Engine, access::require_actor, normalize_required_text, with_tx};

/// Filters for listing costs.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both calendar
/// dates.
#[derive(Clone, Debug, Default)]
pub struct CostListFilter {
    pub status: Option<CostStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn validate_list_filter(filter: &CostListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::Validation(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CostsCursor {
    occurred_on: NaiveDate,
    cost_id: String,
}

impl CostsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid costs cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid costs cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid costs cursor".to_string()))
    }
}

impl Engine {
    /// Appends a cost and its splits to the project ledger as one atomic
    /// unit.
    ///
    /// Validation happens entirely before the first insert: actor and payer
    /// membership, participant membership, amount > 0, and the split
    /// invariant (the computed shares sum exactly to the amount; exact
    /// shares that do not sum are rejected, never corrected). A cost without
    /// its splits, or splits without their cost, is never observable.
    pub async fn new_cost(&self, cmd: CostNewCmd) -> ResultEngine<Uuid> {
        require_actor(&cmd.user_id)?;
        let category = normalize_required_text(&cmd.category, "category")?;
        let description = cmd.description.trim().to_string();

        with_tx!(self, |db_tx| {
            let project = self
                .require_project_member(&db_tx, &cmd.project_id, &cmd.user_id)
                .await?;
            let currency = model_currency(&project.currency)?;
            let amount = Money::new(cmd.amount_minor, currency);

            // Every split participant must belong to the project.
            for participant in cmd.split.participants() {
                self.require_member_exists(&db_tx, &cmd.project_id, participant)
                    .await?;
            }

            let shares = compute_splits(amount, &cmd.split)?;

            let cost = Cost::new(
                cmd.project_id.clone(),
                cmd.user_id.clone(),
                amount,
                category,
                description,
                cmd.occurred_on,
                cmd.status,
                cmd.receipt_url.clone(),
                Utc::now(),
            )?;

            costs::ActiveModel::from(&cost).insert(&db_tx).await?;
            for share in shares {
                let split = CostSplit::new(cost.id, share.user_id, share.amount, cmd.split.mode());
                cost_splits::ActiveModel::from(&split).insert(&db_tx).await?;
            }

            Ok(cost.id)
        })
    }

    /// Transitions a cost from tentative to final.
    ///
    /// The transition is a conditional update (`status = 'tentative'` in the
    /// WHERE clause), so two concurrent calls cannot both succeed; the loser
    /// sees `InvalidTransition`, exactly like a caller finalizing an
    /// already-final cost.
    pub async fn finalize_cost(
        &self,
        project_id: &str,
        cost_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_project_member(&db_tx, project_id, user_id)
                .await?;

            let result = costs::Entity::update_many()
                .col_expr(
                    costs::Column::Status,
                    Expr::value(CostStatus::Final.as_str()),
                )
                .filter(costs::Column::Id.eq(cost_id.to_string()))
                .filter(costs::Column::ProjectId.eq(project_id.to_string()))
                .filter(costs::Column::Status.eq(CostStatus::Tentative.as_str()))
                .exec(&db_tx)
                .await?;

            if result.rows_affected == 0 {
                let existing = costs::Entity::find_by_id(cost_id.to_string())
                    .filter(costs::Column::ProjectId.eq(project_id.to_string()))
                    .one(&db_tx)
                    .await?;
                return match existing {
                    None => Err(EngineError::KeyNotFound("cost not exists".to_string())),
                    Some(_) => Err(EngineError::InvalidTransition(
                        "cost is already final".to_string(),
                    )),
                };
            }

            Ok(())
        })
    }

    /// Lists project costs, newest first.
    pub async fn list_costs(
        &self,
        project_id: &str,
        user_id: &str,
        limit: u64,
        filter: &CostListFilter,
    ) -> ResultEngine<Vec<Cost>> {
        let (items, _next) = self
            .list_costs_page(project_id, user_id, limit, None, filter)
            .await?;
        Ok(items)
    }

    /// Lists project costs with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(occurred_on DESC, cost_id DESC)`.
    pub async fn list_costs_page(
        &self,
        project_id: &str,
        user_id: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &CostListFilter,
    ) -> ResultEngine<(Vec<Cost>, Option<String>)> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_project_member(&db_tx, project_id, user_id)
                .await?;
            validate_list_filter(filter)?;

            let limit_plus_one = limit.saturating_add(1);
            let mut query = costs::Entity::find()
                .filter(costs::Column::ProjectId.eq(project_id.to_string()))
                .order_by_desc(costs::Column::OccurredOn)
                .order_by_desc(costs::Column::Id)
                .limit(limit_plus_one);

            if let Some(status) = filter.status {
                query = query.filter(costs::Column::Status.eq(status.as_str()));
            }
            if let Some(from) = filter.from {
                query = query.filter(costs::Column::OccurredOn.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(costs::Column::OccurredOn.lt(to));
            }

            if let Some(cursor) = cursor {
                let cursor = CostsCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(costs::Column::OccurredOn.lt(cursor.occurred_on))
                        .add(
                            Condition::all()
                                .add(costs::Column::OccurredOn.eq(cursor.occurred_on))
                                .add(costs::Column::Id.lt(cursor.cost_id)),
                        ),
                );
            }

            let rows: Vec<costs::Model> = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let mut out: Vec<Cost> = Vec::with_capacity(rows.len().min(limit as usize));
            for model in rows.into_iter().take(limit as usize) {
                out.push(Cost::try_from(model)?);
            }

            let next_cursor = out.last().map(|cost| CostsCursor {
                occurred_on: cost.occurred_on,
                cost_id: cost.id.to_string(),
            });
            let next_cursor = if has_more {
                next_cursor.map(|c| c.encode()).transpose()?
            } else {
                None
            };

            Ok((out, next_cursor))
        })
    }

    /// Returns a cost together with its split rows.
    pub async fn cost_with_splits(
        &self,
        project_id: &str,
        cost_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(Cost, Vec<CostSplit>)> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_project_member(&db_tx, project_id, user_id)
                .await?;

            let cost_model = costs::Entity::find_by_id(cost_id.to_string())
                .filter(costs::Column::ProjectId.eq(project_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("cost not exists".to_string()))?;
            let cost = Cost::try_from(cost_model)?;

            let split_models = cost_splits::Entity::find()
                .filter(cost_splits::Column::CostId.eq(cost_id.to_string()))
                .order_by_asc(cost_splits::Column::Id)
                .all(&db_tx)
                .await?;

            let mut splits = Vec::with_capacity(split_models.len());
            for model in split_models {
                splits.push(CostSplit::try_from(model)?);
            }

            Ok((cost, splits))
        })
    }
}
