use lingo_core::error::RepoError;
use lingo_core::models::value::TranslationValue;
use lingo_core::quantity::QuantityBucket;
use lingo_core::types::DbId;
use sqlx::FromRow;

use crate::error::corrupt_column;

/// A row from the `translation_values` table. `quantity` is NULL for
/// singular keys.
#[derive(Debug, Clone, FromRow)]
pub struct ValueRow {
    pub id: DbId,
    pub name: String,
    pub quantity: Option<String>,
    pub key_id: DbId,
    pub language_id: DbId,
}

impl TryFrom<ValueRow> for TranslationValue {
    type Error = RepoError;

    fn try_from(row: ValueRow) -> Result<Self, Self::Error> {
        let quantity = row
            .quantity
            .as_deref()
            .map(str::parse::<QuantityBucket>)
            .transpose()
            .map_err(|e| corrupt_column("quantity", e))?;
        Ok(TranslationValue {
            id: row.id,
            name: row.name,
            quantity,
            key_id: row.key_id,
            language_id: row.language_id,
        })
    }
}
