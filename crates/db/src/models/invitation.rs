use lingo_core::error::RepoError;
use lingo_core::models::invitation::Invitation;
use lingo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::error::corrupt_column;

/// A row from the `invitations` table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationRow {
    pub id: DbId,
    pub project_id: DbId,
    pub guest_id: String,
    pub inviter_id: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = RepoError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        Ok(Invitation {
            id: row.id,
            project_id: row.project_id,
            guest_id: row.guest_id,
            inviter_id: row.inviter_id,
            role: row.role.parse().map_err(|e| corrupt_column("role", e))?,
            created_at: row.created_at,
        })
    }
}
