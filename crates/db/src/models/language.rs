use lingo_core::models::language::Language;
use lingo_core::types::DbId;
use sqlx::FromRow;

/// A row from the `languages` table.
#[derive(Debug, Clone, FromRow)]
pub struct LanguageRow {
    pub id: DbId,
    pub name: String,
    pub project_id: DbId,
}

impl From<LanguageRow> for Language {
    fn from(row: LanguageRow) -> Self {
        Language {
            id: row.id,
            name: row.name,
            project_id: row.project_id,
        }
    }
}
