use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, project_members, projects, users};

use super::Engine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ProjectRole {
    Owner,
    Member,
}

impl ProjectRole {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl TryFrom<&str> for ProjectRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            other => Err(EngineError::Validation(format!(
                "invalid membership role: {other}"
            ))),
        }
    }
}

/// Every mutating operation requires an authenticated actor; a blank id
/// means the identity boundary was skipped.
pub(super) fn require_actor(user_id: &str) -> ResultEngine<()> {
    if user_id.trim().is_empty() {
        return Err(EngineError::Unauthorized(
            "missing acting user id".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    async fn find_project_by_id(
        &self,
        db: &DatabaseTransaction,
        project_id: &str,
    ) -> ResultEngine<Option<projects::Model>> {
        projects::Entity::find_by_id(project_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn membership_role(
        &self,
        db: &DatabaseTransaction,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<ProjectRole>> {
        let row =
            project_members::Entity::find_by_id((project_id.to_string(), user_id.to_string()))
                .one(db)
                .await?;
        row.as_ref()
            .map(|m| ProjectRole::try_from(m.role.as_str()))
            .transpose()
    }

    /// Resolves a project the actor can read and write (owner or member).
    ///
    /// Whether the project is missing or merely not shared with the actor,
    /// the answer is the same `KeyNotFound` so existence does not leak.
    pub(super) async fn require_project_member(
        &self,
        db: &DatabaseTransaction,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<projects::Model> {
        let model = self
            .find_project_by_id(db, project_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("project not exists".to_string()))?;
        if model.owner_id != user_id
            && self
                .membership_role(db, project_id, user_id)
                .await?
                .is_none()
        {
            return Err(EngineError::KeyNotFound("project not exists".to_string()));
        }
        Ok(model)
    }

    pub(super) async fn require_project_owner(
        &self,
        db: &DatabaseTransaction,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<projects::Model> {
        let model = self
            .find_project_by_id(db, project_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("project not exists".to_string()))?;
        if model.owner_id != user_id {
            return Err(EngineError::KeyNotFound("project not exists".to_string()));
        }
        Ok(model)
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    pub(super) async fn find_user_by_email(
        &self,
        db: &DatabaseTransaction,
        email: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_ascii_lowercase()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Ensures `user_id` holds a membership row in the project (the owner
    /// always has one, written at project creation).
    pub(super) async fn require_member_exists(
        &self,
        db: &DatabaseTransaction,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        if self
            .membership_role(db, project_id, user_id)
            .await?
            .is_none()
        {
            return Err(EngineError::KeyNotFound("member not exists".to_string()));
        }
        Ok(())
    }
}
