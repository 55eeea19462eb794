use lingo_core::models::group::Group;
use lingo_core::types::DbId;
use sqlx::FromRow;

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupRow {
    pub id: DbId,
    pub name: String,
    pub is_default: bool,
    pub project_id: DbId,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            is_default: row.is_default,
            project_id: row.project_id,
        }
    }
}
