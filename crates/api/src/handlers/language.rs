//! Handlers for `/projects/{project_id}/languages`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lingo_core::models::language::{CreateLanguage, Language, UpdateLanguage};
use lingo_core::services::language;
use lingo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/languages
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Language>>> {
    let languages = language::list(&state.repos, &user.user_id, project_id).await?;
    Ok(Json(languages))
}

/// POST /api/v1/projects/{project_id}/languages
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateLanguage>,
) -> AppResult<(StatusCode, Json<Language>)> {
    let created = language::create(&state.repos, &user.user_id, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/projects/{project_id}/languages/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateLanguage>,
) -> AppResult<Json<Language>> {
    let updated = language::update(&state.repos, &user.user_id, project_id, id, &input).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/projects/{project_id}/languages/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    language::delete(&state.repos, &user.user_id, project_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
