//! Language entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::DbId;

/// A target language of a project. Names are unique per project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Language {
    pub id: DbId,
    pub name: String,
    pub project_id: DbId,
}

/// DTO for creating a language.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLanguage {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// DTO for renaming a language.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLanguage {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}
