//! Repository for the `languages` table.

use async_trait::async_trait;
use lingo_core::error::RepoResult;
use lingo_core::models::language::{CreateLanguage, Language, UpdateLanguage};
use lingo_core::repository::LanguageRepository;
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify;
use crate::models::language::LanguageRow;

const COLUMNS: &str = "id, name, project_id";

pub struct PgLanguageRepo {
    pool: PgPool,
}

impl PgLanguageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LanguageRepository for PgLanguageRepo {
    async fn create(&self, project_id: DbId, input: &CreateLanguage) -> RepoResult<Language> {
        let query = format!(
            "INSERT INTO languages (project_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, LanguageRow>(&query)
            .bind(project_id)
            .bind(&input.name)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Language>> {
        let query = format!("SELECT {COLUMNS} FROM languages WHERE id = $1");
        let row = sqlx::query_as::<_, LanguageRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Language>> {
        let query = format!("SELECT {COLUMNS} FROM languages WHERE project_id = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, LanguageRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: DbId, input: &UpdateLanguage) -> RepoResult<Option<Language>> {
        let query = format!("UPDATE languages SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, LanguageRow>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    /// The language's values go with it through `ON DELETE CASCADE`.
    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
