//! Handlers for `/projects/{project_id}/keys/{key_id}/values`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lingo_core::models::value::{CreateValue, TranslationValue, UpdateValue};
use lingo_core::services::value;
use lingo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/keys/{key_id}/values
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, key_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<TranslationValue>>> {
    let values = value::list(&state.repos, &user.user_id, project_id, key_id).await?;
    Ok(Json(values))
}

/// POST /api/v1/projects/{project_id}/keys/{key_id}/values
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, key_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<CreateValue>,
) -> AppResult<(StatusCode, Json<TranslationValue>)> {
    let created = value::create(&state.repos, &user.user_id, project_id, key_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/projects/{project_id}/keys/{key_id}/values/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, key_id, id)): Path<(DbId, DbId, DbId)>,
    AppJson(input): AppJson<UpdateValue>,
) -> AppResult<Json<TranslationValue>> {
    let updated =
        value::update(&state.repos, &user.user_id, project_id, key_id, id, &input).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/projects/{project_id}/keys/{key_id}/values/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, key_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    value::delete(&state.repos, &user.user_id, project_id, key_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
