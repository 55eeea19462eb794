//! Pending project invitation model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::roles::Role;
use crate::types::{DbId, Timestamp, UserId};

/// A pending invitation of `guest_id` into a project with a proposed role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invitation {
    pub id: DbId,
    pub project_id: DbId,
    pub guest_id: UserId,
    pub inviter_id: UserId,
    pub role: Role,
    pub created_at: Timestamp,
}

/// DTO for inviting a user into a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvitation {
    #[validate(length(min = 1, max = 255))]
    pub guest_id: UserId,
    pub role: Role,
}
