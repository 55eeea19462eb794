//! Error taxonomy shared by every core service.
//!
//! Services return [`CoreError`]; repository ports return [`RepoError`],
//! which converts into `CoreError` via `?`.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The action exists but must be performed through a different operation
    /// (e.g. removing yourself from a project instead of leaving it).
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Well-formed input that violates a business rule such as the quantity
    /// policy of translation values.
    #[error("Unprocessable: {0}")]
    UnprocessableRule(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Failure reported by a repository port.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique constraint rejected the write. `constraint` names the
    /// violated constraint (e.g. `uq_translation_values_slot`).
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A row-level rule rejected the write, e.g. a value whose quantity does
    /// not match its key's plurality at insert time.
    #[error("Check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    /// The row the write refers to no longer exists.
    #[error("Foreign key violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("Storage error: {0}")]
    Backend(String),
}

/// Result alias for repository port methods.
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation { constraint } => {
                CoreError::Conflict(format!("Duplicate value violates {constraint}"))
            }
            RepoError::CheckViolation { constraint } => {
                CoreError::UnprocessableRule(format!("Write violates {constraint}"))
            }
            RepoError::ForeignKeyViolation { constraint } => {
                CoreError::Conflict(format!("Referenced row is gone ({constraint})"))
            }
            RepoError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err: CoreError = RepoError::UniqueViolation {
            constraint: "uq_languages_project_name".into(),
        }
        .into();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("uq_languages_project_name"));
    }

    #[test]
    fn check_violation_becomes_unprocessable() {
        let err: CoreError = RepoError::CheckViolation {
            constraint: "ck_translation_values_quantity".into(),
        }
        .into();
        assert_matches!(err, CoreError::UnprocessableRule(msg) if msg.contains("ck_translation_values_quantity"));
    }

    #[test]
    fn backend_error_becomes_internal() {
        let err: CoreError = RepoError::Backend("connection reset".into()).into();
        assert_matches!(err, CoreError::Internal(msg) if msg == "connection reset");
    }

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = CoreError::not_found("Project", 42);
        assert_eq!(err.to_string(), "Entity not found: Project with id 42");
    }
}
