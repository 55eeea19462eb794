//! Translation of `sqlx` failures into repository errors.

use lingo_core::error::RepoError;

/// PostgreSQL SQLSTATEs for integrity violations.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Classify a `sqlx` error. Integrity violations keep the constraint name so
/// services can tell which invariant was hit.
pub fn classify(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return RepoError::UniqueViolation { constraint },
            Some(FOREIGN_KEY_VIOLATION) => return RepoError::ForeignKeyViolation { constraint },
            Some(CHECK_VIOLATION) => return RepoError::CheckViolation { constraint },
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    RepoError::Backend(err.to_string())
}

/// A stored enum column held a value the domain does not know.
pub fn corrupt_column(column: &str, detail: String) -> RepoError {
    RepoError::Backend(format!("Invalid {column} column: {detail}"))
}
