use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, project_members, users};

use super::{Engine, access::ProjectRole, access::require_actor, with_tx};

/// A project member joined with their user record, as reporting surfaces
/// display them.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberRecord {
    pub user_id: String,
    pub name: Option<String>,
    pub email: String,
    pub role: String,
}

impl Engine {
    /// Invites an existing user to a project by email (owner-only).
    ///
    /// Invitations never create accounts: an unknown email fails with
    /// `KeyNotFound` and writes nothing, and inviting a current member is a
    /// `DuplicateMember` error.
    pub async fn invite_member(
        &self,
        project_id: &str,
        email: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_project_owner(&db_tx, project_id, user_id)
                .await?;

            let invited = self
                .find_user_by_email(&db_tx, email)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let existing = project_members::Entity::find_by_id((
                project_id.to_string(),
                invited.id.clone(),
            ))
            .one(&db_tx)
            .await?;
            if existing.is_some() {
                return Err(EngineError::DuplicateMember(format!(
                    "{email} is already a member"
                )));
            }

            let membership = project_members::ActiveModel {
                project_id: ActiveValue::Set(project_id.to_string()),
                user_id: ActiveValue::Set(invited.id),
                role: ActiveValue::Set(ProjectRole::Member.as_str().to_string()),
                joined_at: ActiveValue::Set(Utc::now()),
            };
            membership.insert(&db_tx).await?;

            Ok(())
        })
    }

    /// Removes a project member (owner-only). The owner cannot be removed.
    pub async fn remove_member(
        &self,
        project_id: &str,
        member_user_id: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            let project = self
                .require_project_owner(&db_tx, project_id, user_id)
                .await?;
            if member_user_id == project.owner_id {
                return Err(EngineError::Validation(
                    "cannot remove project owner".to_string(),
                ));
            }

            project_members::Entity::delete_by_id((
                project_id.to_string(),
                member_user_id.to_string(),
            ))
            .exec(&db_tx)
            .await?;

            Ok(())
        })
    }

    /// Lists project members with their user records (any member may list).
    pub async fn list_members(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<MemberRecord>> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_project_member(&db_tx, project_id, user_id)
                .await?;

            let rows = project_members::Entity::find()
                .filter(project_members::Column::ProjectId.eq(project_id.to_string()))
                .order_by_asc(project_members::Column::JoinedAt)
                .all(&db_tx)
                .await?;

            let user_ids: Vec<String> = rows.iter().map(|m| m.user_id.clone()).collect();
            let user_models = users::Entity::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(&db_tx)
                .await?;
            let users_by_id: HashMap<String, users::Model> = user_models
                .into_iter()
                .map(|u| (u.id.clone(), u))
                .collect();

            let mut out = Vec::with_capacity(rows.len());
            for membership in rows {
                let user = users_by_id.get(&membership.user_id).ok_or_else(|| {
                    EngineError::KeyNotFound("user not exists".to_string())
                })?;
                out.push(MemberRecord {
                    user_id: membership.user_id,
                    name: user.name.clone(),
                    email: user.email.clone(),
                    role: membership.role,
                });
            }
            Ok(out)
        })
    }
}
