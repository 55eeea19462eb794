//! Repository for the `projects` table.

use async_trait::async_trait;
use lingo_core::error::RepoResult;
use lingo_core::models::group::DEFAULT_GROUP_NAME;
use lingo_core::models::project::{CreateProject, Project, UpdateProject};
use lingo_core::repository::ProjectRepository;
use lingo_core::roles::Role;
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify;
use crate::models::project::ProjectRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, color, description, created_at, updated_at";

pub struct PgProjectRepo {
    pool: PgPool,
}

impl PgProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepo {
    /// Insert the project, its default group and the owner membership in one
    /// transaction.
    async fn create_with_owner(
        &self,
        input: &CreateProject,
        owner_id: &str,
    ) -> RepoResult<Project> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let query = format!(
            "INSERT INTO projects (name, color, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify)?;

        sqlx::query("INSERT INTO groups (project_id, name, is_default) VALUES ($1, $2, TRUE)")
            .bind(project.id)
            .bind(DEFAULT_GROUP_NAME)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        sqlx::query("INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(project.id)
            .bind(owner_id)
            .bind(Role::Owner.as_str())
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        tx.commit().await.map_err(classify)?;
        Ok(project.into())
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Project>> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<Project>> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id IN (SELECT project_id FROM project_members WHERE user_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Only non-`None` fields in `input` are applied.
    async fn update(&self, id: DbId, input: &UpdateProject) -> RepoResult<Option<Project>> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                color = COALESCE($3, color),
                description = COALESCE($4, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    /// Children go with the project through `ON DELETE CASCADE`.
    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
