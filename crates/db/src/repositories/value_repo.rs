//! Repository for the `translation_values` table.

use async_trait::async_trait;
use lingo_core::error::{RepoError, RepoResult};
use lingo_core::models::value::{NewValue, TranslationValue, KEY_FK, QUANTITY_CHECK};
use lingo_core::quantity::{is_valid_for, QuantityBucket};
use lingo_core::repository::ValueRepository;
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify;
use crate::models::value::ValueRow;

pub(crate) const COLUMNS: &str = "id, name, quantity, key_id, language_id";

pub struct PgValueRepo {
    pool: PgPool,
}

impl PgValueRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ValueRepository for PgValueRepo {
    /// Holds the key `FOR SHARE` so a concurrent plurality change waits for
    /// the insert, and re-checks the quantity against the locked key.
    async fn create(&self, input: &NewValue) -> RepoResult<TranslationValue> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let is_plural: Option<bool> =
            sqlx::query_scalar("SELECT is_plural FROM translation_keys WHERE id = $1 FOR SHARE")
                .bind(input.key_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(classify)?;
        let Some(is_plural) = is_plural else {
            return Err(RepoError::ForeignKeyViolation {
                constraint: KEY_FK.to_string(),
            });
        };
        if !is_valid_for(is_plural, input.quantity) {
            return Err(RepoError::CheckViolation {
                constraint: QUANTITY_CHECK.to_string(),
            });
        }

        let query = format!(
            "INSERT INTO translation_values (key_id, language_id, quantity, name)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ValueRow>(&query)
            .bind(input.key_id)
            .bind(input.language_id)
            .bind(input.quantity.map(QuantityBucket::as_str))
            .bind(&input.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify)?;

        tx.commit().await.map_err(classify)?;
        row.try_into()
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<TranslationValue>> {
        let query = format!("SELECT {COLUMNS} FROM translation_values WHERE id = $1");
        sqlx::query_as::<_, ValueRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn find_by_slot(
        &self,
        key_id: DbId,
        language_id: DbId,
        quantity: Option<QuantityBucket>,
    ) -> RepoResult<Option<TranslationValue>> {
        let query = format!(
            "SELECT {COLUMNS} FROM translation_values
             WHERE key_id = $1 AND language_id = $2 AND quantity IS NOT DISTINCT FROM $3"
        );
        sqlx::query_as::<_, ValueRow>(&query)
            .bind(key_id)
            .bind(language_id)
            .bind(quantity.map(QuantityBucket::as_str))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_by_key(&self, key_id: DbId) -> RepoResult<Vec<TranslationValue>> {
        let query =
            format!("SELECT {COLUMNS} FROM translation_values WHERE key_id = $1 ORDER BY id");
        sqlx::query_as::<_, ValueRow>(&query)
            .bind(key_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn update_name(&self, id: DbId, name: &str) -> RepoResult<Option<TranslationValue>> {
        let query =
            format!("UPDATE translation_values SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ValueRow>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM translation_values WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
