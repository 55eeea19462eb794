//! PostgreSQL storage for Lingo.
//!
//! Pool helpers, embedded migrations and `sqlx` implementations of every
//! repository port declared in `lingo_core::repository`.

use std::sync::Arc;

use lingo_core::repository::Repositories;
use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;

use repositories::{
    PgGroupRepo, PgInvitationRepo, PgKeyRepo, PgLanguageRepo, PgMembershipRepo, PgProjectRepo,
    PgValueRepo,
};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Build the repository bundle backed by `pool`.
pub fn repositories(pool: DbPool) -> Repositories {
    Repositories {
        projects: Arc::new(PgProjectRepo::new(pool.clone())),
        memberships: Arc::new(PgMembershipRepo::new(pool.clone())),
        invitations: Arc::new(PgInvitationRepo::new(pool.clone())),
        languages: Arc::new(PgLanguageRepo::new(pool.clone())),
        groups: Arc::new(PgGroupRepo::new(pool.clone())),
        keys: Arc::new(PgKeyRepo::new(pool.clone())),
        values: Arc::new(PgValueRepo::new(pool)),
    }
}
