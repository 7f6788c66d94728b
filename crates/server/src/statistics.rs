//! Statistics API endpoints

use api_types::stats::{
    BudgetVarianceView, CategoryTotalView, DailySpendView, ProjectStats, StatsQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{ServerError, map_currency, server::ServerState, user};

const DEFAULT_WINDOW_DAYS: usize = 7;

/// Handle requests for project statistics: totals, category breakdown, the
/// recent daily series and budget variance.
pub async fn get_stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ProjectStats>, ServerError> {
    let window = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let stats = state
        .engine
        .project_statistics(&project_id, &user.id, window)
        .await?;

    Ok(Json(ProjectStats {
        currency: map_currency(stats.currency),
        total_spent_minor: stats.total_spent.minor(),
        tentative_minor: stats.tentative_total.minor(),
        categories: stats
            .categories
            .into_iter()
            .map(|category| CategoryTotalView {
                category: category.category,
                total_minor: category.total.minor(),
            })
            .collect(),
        daily: stats
            .daily
            .into_iter()
            .map(|d| DailySpendView {
                date: d.date,
                final_minor: d.final_total.minor(),
                tentative_minor: d.tentative_total.minor(),
            })
            .collect(),
        variance: BudgetVarianceView {
            budget_minor: stats.variance.budget.map(engine::Money::minor),
            allocated_minor: stats.variance.allocated.minor(),
            remaining_minor: stats.variance.remaining.map(engine::Money::minor),
            over_budget: stats.variance.over_budget,
        },
    }))
}
