//! Key group entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::DbId;

/// Name of the group every project receives at creation.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// A named bucket of translation keys. Names are unique per project and
/// exactly one group per project has `is_default` set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub is_default: bool,
    pub project_id: DbId,
}

/// DTO for creating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroup {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// DTO for renaming a group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGroup {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}
