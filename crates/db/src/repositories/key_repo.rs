//! Repository for the `translation_keys` table, including the transactional
//! pluralization rewrite of a key's values.

use async_trait::async_trait;
use lingo_core::error::RepoResult;
use lingo_core::models::key::{KeyRevision, KeyUpdate, NewKey, TranslationKey};
use lingo_core::pluralization::{plan_transition, ValueChange};
use lingo_core::quantity::QuantityBucket;
use lingo_core::repository::KeyRepository;
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify;
use crate::models::key::KeyRow;
use crate::models::value::ValueRow;
use crate::repositories::value_repo::COLUMNS as VALUE_COLUMNS;

const COLUMNS: &str = "id, name, is_plural, project_id, group_id";

pub struct PgKeyRepo {
    pool: PgPool,
}

impl PgKeyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyRepository for PgKeyRepo {
    async fn create(&self, input: &NewKey) -> RepoResult<TranslationKey> {
        let query = format!(
            "INSERT INTO translation_keys (project_id, group_id, name, is_plural)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, KeyRow>(&query)
            .bind(input.project_id)
            .bind(input.group_id)
            .bind(&input.name)
            .bind(input.is_plural)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<TranslationKey>> {
        let query = format!("SELECT {COLUMNS} FROM translation_keys WHERE id = $1");
        let row = sqlx::query_as::<_, KeyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<TranslationKey>> {
        let query =
            format!("SELECT {COLUMNS} FROM translation_keys WHERE project_id = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, KeyRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Lock the key row, read its values under the lock, plan the
    /// transition, then apply the plan and the revision. Value inserts hold
    /// the key `FOR SHARE`, so no value can slip in between planning and
    /// applying. Any failure rolls the whole rewrite back.
    async fn update_with_transition(
        &self,
        id: DbId,
        revision: &KeyRevision,
    ) -> RepoResult<Option<KeyUpdate>> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let query = format!("SELECT {COLUMNS} FROM translation_keys WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, KeyRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(classify)?
        else {
            return Ok(None);
        };
        let current = TranslationKey::from(current);

        let query = format!(
            "SELECT {VALUE_COLUMNS} FROM translation_values WHERE key_id = $1 ORDER BY id"
        );
        let values = sqlx::query_as::<_, ValueRow>(&query)
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(classify)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<RepoResult<Vec<_>>>()?;
        let plan = plan_transition(&current, revision.is_plural, &values);

        for change in &plan.changes {
            match change {
                ValueChange::Delete { value_id } => {
                    sqlx::query("DELETE FROM translation_values WHERE id = $1 AND key_id = $2")
                        .bind(*value_id)
                        .bind(id)
                        .execute(&mut *tx)
                        .await
                        .map_err(classify)?;
                }
                ValueChange::Rebucket { value_id, quantity } => {
                    sqlx::query(
                        "UPDATE translation_values SET quantity = $3 WHERE id = $1 AND key_id = $2",
                    )
                    .bind(*value_id)
                    .bind(id)
                    .bind(quantity.map(QuantityBucket::as_str))
                    .execute(&mut *tx)
                    .await
                    .map_err(classify)?;
                }
                ValueChange::Create(new) => {
                    sqlx::query(
                        "INSERT INTO translation_values (key_id, language_id, quantity, name)
                         VALUES ($1, $2, $3, $4)",
                    )
                    .bind(new.key_id)
                    .bind(new.language_id)
                    .bind(new.quantity.map(QuantityBucket::as_str))
                    .bind(&new.name)
                    .execute(&mut *tx)
                    .await
                    .map_err(classify)?;
                }
            }
        }

        let query = format!(
            "UPDATE translation_keys SET name = $2, group_id = $3, is_plural = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, KeyRow>(&query)
            .bind(id)
            .bind(&revision.name)
            .bind(revision.group_id)
            .bind(revision.is_plural)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify)?;

        tx.commit().await.map_err(classify)?;
        Ok(Some(KeyUpdate {
            key: row.into(),
            plan,
        }))
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM translation_keys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
