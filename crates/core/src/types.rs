/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Opaque user identifier issued by the identity provider (JWT `sub`).
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
