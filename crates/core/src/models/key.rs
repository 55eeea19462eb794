//! Translation key model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pluralization::PluralizationPlan;
use crate::types::DbId;

/// A translation key. Names are unique within their group, not the project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationKey {
    pub id: DbId,
    pub name: String,
    pub is_plural: bool,
    pub project_id: DbId,
    pub group_id: Option<DbId>,
}

/// DTO for creating a key. Without `group_id` the key lands in the project's
/// default group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateKey {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub is_plural: bool,
    pub group_id: Option<DbId>,
}

/// DTO for updating a key. Flipping `is_plural` migrates the key's values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateKey {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub is_plural: Option<bool>,
    pub group_id: Option<DbId>,
}

/// Insert payload for the key repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewKey {
    pub project_id: DbId,
    pub group_id: Option<DbId>,
    pub name: String,
    pub is_plural: bool,
}

/// Fully resolved next state of a key. The storage adapter plans the value
/// rewrite for it against the values it finds under the key lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRevision {
    pub name: String,
    pub group_id: Option<DbId>,
    pub is_plural: bool,
}

/// A stored key revision and the value rewrite applied with it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyUpdate {
    pub key: TranslationKey,
    pub plan: PluralizationPlan,
}
