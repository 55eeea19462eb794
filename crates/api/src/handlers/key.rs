//! Handlers for `/projects/{project_id}/keys`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lingo_core::models::key::{CreateKey, TranslationKey, UpdateKey};
use lingo_core::services::key;
use lingo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/keys
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<TranslationKey>>> {
    let keys = key::list(&state.repos, &user.user_id, project_id).await?;
    Ok(Json(keys))
}

/// POST /api/v1/projects/{project_id}/keys
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateKey>,
) -> AppResult<(StatusCode, Json<TranslationKey>)> {
    let created = key::create(&state.repos, &user.user_id, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/projects/{project_id}/keys/{key_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, key_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<TranslationKey>> {
    let found = key::get(&state.repos, &user.user_id, project_id, key_id).await?;
    Ok(Json(found))
}

/// PUT /api/v1/projects/{project_id}/keys/{key_id}
///
/// Flipping `is_plural` rewrites the key's values in the same transaction.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, key_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateKey>,
) -> AppResult<Json<TranslationKey>> {
    let updated = key::update(&state.repos, &user.user_id, project_id, key_id, &input).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/projects/{project_id}/keys/{key_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, key_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    key::delete(&state.repos, &user.user_id, project_id, key_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
