use lingo_core::models::key::TranslationKey;
use lingo_core::types::DbId;
use sqlx::FromRow;

/// A row from the `translation_keys` table.
#[derive(Debug, Clone, FromRow)]
pub struct KeyRow {
    pub id: DbId,
    pub name: String,
    pub is_plural: bool,
    pub project_id: DbId,
    pub group_id: Option<DbId>,
}

impl From<KeyRow> for TranslationKey {
    fn from(row: KeyRow) -> Self {
        TranslationKey {
            id: row.id,
            name: row.name,
            is_plural: row.is_plural,
            project_id: row.project_id,
            group_id: row.group_id,
        }
    }
}
