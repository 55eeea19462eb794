//! Project membership model and DTOs.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::{DbId, Timestamp, UserId};

/// A `(project, user)` pair carrying exactly one role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Membership {
    pub project_id: DbId,
    pub user_id: UserId,
    pub role: Role,
    pub created_at: Timestamp,
}

/// DTO for changing a member's role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRole {
    pub role: Role,
}
