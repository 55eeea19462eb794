use std::sync::Arc;

use lingo_core::repository::Repositories;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Repository ports every service call receives.
    pub repos: Repositories,
    /// Database pool for health reporting. `None` when running on the
    /// in-process store.
    pub pool: Option<lingo_db::DbPool>,
    /// Server configuration (JWT secret, timeouts).
    pub config: Arc<ServerConfig>,
}
