//! Route definitions for the actor's own invitations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::invitation;
use crate::state::AppState;

/// Routes mounted at `/invitations`.
///
/// ```text
/// GET    /                -> list_mine
/// POST   /{id}/accept     -> accept
/// POST   /{id}/decline    -> decline
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invitation::list_mine))
        .route("/{id}/accept", post(invitation::accept))
        .route("/{id}/decline", post(invitation::decline))
}
