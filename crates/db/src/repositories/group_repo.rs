//! Repository for the `groups` table.

use async_trait::async_trait;
use lingo_core::error::RepoResult;
use lingo_core::models::group::{CreateGroup, Group, UpdateGroup};
use lingo_core::repository::GroupRepository;
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify;
use crate::models::group::GroupRow;

const COLUMNS: &str = "id, name, is_default, project_id";

pub struct PgGroupRepo {
    pool: PgPool,
}

impl PgGroupRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepo {
    async fn create(&self, project_id: DbId, input: &CreateGroup) -> RepoResult<Group> {
        let query = format!(
            "INSERT INTO groups (project_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GroupRow>(&query)
            .bind(project_id)
            .bind(&input.name)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Group>> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        let row = sqlx::query_as::<_, GroupRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    async fn find_default(&self, project_id: DbId) -> RepoResult<Option<Group>> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE project_id = $1 AND is_default");
        let row = sqlx::query_as::<_, GroupRow>(&query)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Group>> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE project_id = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, GroupRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: DbId, input: &UpdateGroup) -> RepoResult<Option<Group>> {
        let query = format!("UPDATE groups SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, GroupRow>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    /// Keys in the group, and their values, go with it.
    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
