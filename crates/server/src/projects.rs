//! Project API endpoints

use api_types::project::{BudgetUpdate, ProjectNew, ProjectView, ProjectsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, engine_currency, map_currency, server::ServerState, user};

fn view(project: engine::Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        currency: map_currency(project.currency),
        owner_id: project.owner_id,
        budget_minor: project.budget.map(engine::Money::minor),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<(StatusCode, Json<ProjectView>), ServerError> {
    let project_id = state
        .engine
        .new_project(
            &payload.name,
            payload.description.as_deref(),
            payload.currency.map(engine_currency),
            &user.id,
        )
        .await?;

    let project = state.engine.project_snapshot(&project_id, &user.id).await?;
    Ok((StatusCode::CREATED, Json(view(project))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ProjectsResponse>, ServerError> {
    let projects = state
        .engine
        .list_projects(&user.id)
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(ProjectsResponse { projects }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectView>, ServerError> {
    let project = state.engine.project_snapshot(&project_id, &user.id).await?;
    Ok(Json(view(project)))
}

pub async fn update_budget(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_budget(&project_id, payload.budget_minor, &user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_project(&project_id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
