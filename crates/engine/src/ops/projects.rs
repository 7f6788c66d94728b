use chrono::Utc;
use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, Statement, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    Currency, EngineError, Project, ResultEngine, project_members, projects,
};

use super::{
    Engine, access::ProjectRole, access::require_actor, normalize_optional_text,
    normalize_required_text, with_tx,
};

impl Engine {
    /// Creates a project and its owner membership row in one transaction.
    ///
    /// The creator becomes the owner and is also a member with elevated
    /// role, so membership checks never need to special-case the owner.
    pub async fn new_project(
        &self,
        name: &str,
        description: Option<&str>,
        currency: Option<Currency>,
        user_id: &str,
    ) -> ResultEngine<String> {
        require_actor(user_id)?;
        let name = normalize_required_text(name, "project name")?;
        let description = normalize_optional_text(description);

        let project = Project::new(
            name.clone(),
            description,
            currency.unwrap_or_default(),
            user_id,
            Utc::now(),
        );
        let project_id = project.id.clone();
        let project_entry: projects::ActiveModel = (&project).into();

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            // Enforce unique project names per owner (case-insensitive) to
            // keep lookups unambiguous.
            let exists = projects::Entity::find()
                .filter(projects::Column::OwnerId.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            project_entry.insert(&db_tx).await?;

            let membership = project_members::ActiveModel {
                project_id: ActiveValue::Set(project_id.clone()),
                user_id: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(ProjectRole::Owner.as_str().to_string()),
                joined_at: ActiveValue::Set(Utc::now()),
            };
            membership.insert(&db_tx).await?;

            Ok(project_id)
        })
    }

    /// Returns a project the actor owns or belongs to.
    pub async fn project_snapshot(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<Project> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_project_member(&db_tx, project_id, user_id)
                .await?;
            Project::try_from(model)
        })
    }

    /// Lists every project the actor owns or belongs to, newest first.
    pub async fn list_projects(&self, user_id: &str) -> ResultEngine<Vec<Project>> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            let models: Vec<projects::Model> = projects::Entity::find()
                .join(JoinType::InnerJoin, projects::Relation::ProjectMembers.def())
                .filter(project_members::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(projects::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Project::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Sets or clears the project budget cap (owner-only).
    ///
    /// `Some(v)` requires `v >= 0`; `None` removes the cap entirely.
    pub async fn update_budget(
        &self,
        project_id: &str,
        budget_minor: Option<i64>,
        user_id: &str,
    ) -> ResultEngine<()> {
        require_actor(user_id)?;
        if let Some(minor) = budget_minor
            && minor < 0
        {
            return Err(EngineError::InvalidAmount(
                "budget must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_project_owner(&db_tx, project_id, user_id)
                .await?;

            let project = projects::ActiveModel {
                id: ActiveValue::Set(project_id.to_string()),
                budget_minor: ActiveValue::Set(budget_minor),
                ..Default::default()
            };
            project.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a project and everything inside it (owner-only).
    pub async fn delete_project(&self, project_id: &str, user_id: &str) -> ResultEngine<()> {
        require_actor(user_id)?;
        with_tx!(self, |db_tx| {
            let project_model = self
                .require_project_owner(&db_tx, project_id, user_id)
                .await?;
            let project_db_id = project_model.id;

            // Explicit cascade within one DB transaction; not all of these
            // relationships are FK-backed with ON DELETE CASCADE.
            let backend = self.database.get_database_backend();

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM cost_splits WHERE cost_id IN (SELECT id FROM costs WHERE project_id = ?);",
                    vec![project_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM costs WHERE project_id = ?;",
                    vec![project_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM budget_allocations WHERE project_id = ?;",
                    vec![project_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM project_members WHERE project_id = ?;",
                    vec![project_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM projects WHERE id = ?;",
                    vec![project_db_id.into()],
                ))
                .await?;

            Ok(())
        })
    }
}
