//! Cost ledger endpoints

use api_types::cost::{
    CostCreated, CostDetailResponse, CostListQuery, CostListResponse, CostNew, CostSplitView,
    CostStatus as ApiStatus, CostView, SplitMode as ApiSplitMode, SplitNew,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, map_currency, server::ServerState, user};

fn map_status(status: engine::CostStatus) -> ApiStatus {
    match status {
        engine::CostStatus::Tentative => ApiStatus::Tentative,
        engine::CostStatus::Final => ApiStatus::Final,
    }
}

fn engine_status(status: ApiStatus) -> engine::CostStatus {
    match status {
        ApiStatus::Tentative => engine::CostStatus::Tentative,
        ApiStatus::Final => engine::CostStatus::Final,
    }
}

fn map_mode(mode: engine::SplitMode) -> ApiSplitMode {
    match mode {
        engine::SplitMode::Equal => ApiSplitMode::Equal,
        engine::SplitMode::Exact => ApiSplitMode::Exact,
        engine::SplitMode::Percentage => ApiSplitMode::Percentage,
    }
}

/// Converts the boundary split payload into the engine's typed form. Exact
/// shares pick up the project currency here; the engine re-checks it against
/// the stored one.
fn engine_split(split: SplitNew, currency: engine::Currency) -> engine::SplitSpec {
    match split {
        SplitNew::Equal { participants } => engine::SplitSpec::Equal { participants },
        SplitNew::Exact { shares } => engine::SplitSpec::Exact {
            shares: shares
                .into_iter()
                .map(|share| {
                    (
                        share.user_id,
                        engine::Money::new(share.amount_minor, currency),
                    )
                })
                .collect(),
        },
        SplitNew::Percentage { shares } => engine::SplitSpec::Percentage {
            shares: shares
                .into_iter()
                .map(|share| (share.user_id, share.percent))
                .collect(),
        },
    }
}

fn view(cost: engine::Cost) -> CostView {
    CostView {
        id: cost.id,
        paid_by: cost.paid_by,
        amount_minor: cost.amount.minor(),
        currency: map_currency(cost.amount.currency()),
        category: cost.category,
        description: cost.description,
        occurred_on: cost.occurred_on,
        status: map_status(cost.status),
        receipt_url: cost.receipt_url,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
    Json(payload): Json<CostNew>,
) -> Result<(StatusCode, Json<CostCreated>), ServerError> {
    let project = state.engine.project_snapshot(&project_id, &user.id).await?;

    let mut cmd = engine::CostNewCmd::new(
        &project_id,
        &user.id,
        payload.amount_minor,
        payload.category,
        payload.description,
        payload.occurred_on,
        engine_split(payload.split, project.currency),
    );
    if let Some(status) = payload.status {
        cmd = cmd.status(engine_status(status));
    }
    if let Some(receipt_url) = payload.receipt_url {
        cmd = cmd.receipt_url(receipt_url);
    }

    let id = state.engine.new_cost(cmd).await?;
    Ok((StatusCode::CREATED, Json(CostCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
    Query(query): Query<CostListQuery>,
) -> Result<Json<CostListResponse>, ServerError> {
    let filter = engine::CostListFilter {
        status: query.status.map(engine_status),
        from: query.from,
        to: query.to,
    };
    let limit = query.limit.unwrap_or(50);

    let (costs, next_cursor) = state
        .engine
        .list_costs_page(&project_id, &user.id, limit, query.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(CostListResponse {
        costs: costs.into_iter().map(view).collect(),
        next_cursor,
    }))
}

pub async fn get_detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((project_id, cost_id)): Path<(String, Uuid)>,
) -> Result<Json<CostDetailResponse>, ServerError> {
    let (cost, splits) = state
        .engine
        .cost_with_splits(&project_id, cost_id, &user.id)
        .await?;

    let splits = splits
        .into_iter()
        .map(|split| CostSplitView {
            user_id: split.user_id,
            amount_minor: split.amount.minor(),
            mode: map_mode(split.mode),
        })
        .collect();

    Ok(Json(CostDetailResponse {
        cost: view(cost),
        splits,
    }))
}

pub async fn finalize(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((project_id, cost_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .finalize_cost(&project_id, cost_id, &user.id)
        .await?;
    Ok(StatusCode::OK)
}
