//! Handlers for `/projects/{project_id}/groups`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lingo_core::models::group::{CreateGroup, Group, UpdateGroup};
use lingo_core::services::group;
use lingo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/groups
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Group>>> {
    let groups = group::list(&state.repos, &user.user_id, project_id).await?;
    Ok(Json(groups))
}

/// POST /api/v1/projects/{project_id}/groups
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateGroup>,
) -> AppResult<(StatusCode, Json<Group>)> {
    let created = group::create(&state.repos, &user.user_id, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/projects/{project_id}/groups/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateGroup>,
) -> AppResult<Json<Group>> {
    let updated = group::update(&state.repos, &user.user_id, project_id, id, &input).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/projects/{project_id}/groups/{id}
///
/// The default group cannot be deleted.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    group::delete(&state.repos, &user.user_id, project_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
