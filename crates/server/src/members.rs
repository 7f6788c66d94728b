//! Membership endpoints (management is owner-only).

use api_types::member::{MemberInvite, MemberView, MembersResponse, ProjectRole};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .list_members(&project_id, &user.id)
        .await?
        .into_iter()
        .map(|member| MemberView {
            user_id: member.user_id,
            name: member.name,
            email: member.email,
            role: match member.role.as_str() {
                "owner" => ProjectRole::Owner,
                _ => ProjectRole::Member,
            },
        })
        .collect();

    Ok(Json(MembersResponse { members }))
}

pub async fn invite(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<String>,
    Json(payload): Json<MemberInvite>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .invite_member(&project_id, &payload.email, &user.id)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((project_id, member_user_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_member(&project_id, &member_user_id, &user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
