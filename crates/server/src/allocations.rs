//! Budget allocation endpoints

use api_types::allocation::{AllocationCreated, AllocationNew, AllocationView, AllocationsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
    Json(payload): Json<AllocationNew>,
) -> Result<(StatusCode, Json<AllocationCreated>), ServerError> {
    let mut cmd = engine::AllocationNewCmd::new(
        &project_id,
        &user.id,
        payload.name,
        payload.amount_minor,
    );
    if let Some(ticket_ref) = payload.ticket_ref {
        cmd = cmd.ticket_ref(ticket_ref);
    }

    let id = state.engine.new_allocation(cmd).await?;
    Ok((StatusCode::CREATED, Json(AllocationCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
) -> Result<Json<AllocationsResponse>, ServerError> {
    let allocations = state
        .engine
        .list_allocations(&project_id, &user.id)
        .await?
        .into_iter()
        .map(|allocation| AllocationView {
            id: allocation.id,
            name: allocation.name,
            amount_minor: allocation.amount.minor(),
            ticket_ref: allocation.ticket_ref,
        })
        .collect();

    Ok(Json(AllocationsResponse { allocations }))
}
