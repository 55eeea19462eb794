//! Bearer-token extractor identifying the acting user.
//!
//! Tokens are issued elsewhere; the API only checks the HS256 signature and
//! expiry and takes `sub` as the opaque user id. What that user may do in a
//! project is decided per request by the core services from the membership
//! store, never from token contents.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use lingo_core::error::CoreError;
use lingo_core::types::UserId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller of a handler.
///
/// ```ignore
/// async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Project>>> {
///     Ok(Json(project::list_mine(&state.repos, &user.user_id).await?))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity-provider user id taken from `claims.sub`.
    pub user_id: UserId,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// The token part of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        // Memberships are keyed by this id; a blank one would match nothing.
        if claims.sub.trim().is_empty() {
            return Err(unauthorized("Token does not identify a user"));
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
