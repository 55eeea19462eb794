//! Handlers for `/projects/{project_id}/members`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lingo_core::models::membership::{Membership, UpdateMemberRole};
use lingo_core::services::member;
use lingo_core::types::{DbId, UserId};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/members
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Membership>>> {
    let members = member::list(&state.repos, &user.user_id, project_id).await?;
    Ok(Json(members))
}

/// PUT /api/v1/projects/{project_id}/members/{user_id}
///
/// Setting `"owner"` transfers ownership; the acting owner becomes a manager.
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, target_id)): Path<(DbId, UserId)>,
    AppJson(input): AppJson<UpdateMemberRole>,
) -> AppResult<Json<Membership>> {
    let membership =
        member::update_role(&state.repos, &user.user_id, project_id, &target_id, &input).await?;
    Ok(Json(membership))
}

/// DELETE /api/v1/projects/{project_id}/members/{user_id}
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, target_id)): Path<(DbId, UserId)>,
) -> AppResult<StatusCode> {
    member::remove(&state.repos, &user.user_id, project_id, &target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
