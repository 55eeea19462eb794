use lingo_core::error::RepoError;
use lingo_core::models::membership::Membership;
use lingo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::error::corrupt_column;

/// A row from the `project_members` table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipRow {
    pub project_id: DbId,
    pub user_id: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = RepoError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            project_id: row.project_id,
            user_id: row.user_id,
            role: row.role.parse().map_err(|e| corrupt_column("role", e))?,
            created_at: row.created_at,
        })
    }
}
