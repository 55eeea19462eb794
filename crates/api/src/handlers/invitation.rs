//! Handlers for project invitations and the actor's own invitations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lingo_core::models::invitation::{CreateInvitation, Invitation};
use lingo_core::models::membership::Membership;
use lingo_core::services::invitation;
use lingo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/invitations
pub async fn list_for_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Invitation>>> {
    let invitations = invitation::list_for_project(&state.repos, &user.user_id, project_id).await?;
    Ok(Json(invitations))
}

/// POST /api/v1/projects/{project_id}/invitations
pub async fn invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateInvitation>,
) -> AppResult<(StatusCode, Json<Invitation>)> {
    let created = invitation::invite(&state.repos, &user.user_id, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/v1/projects/{project_id}/invitations/{id}
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    invitation::cancel(&state.repos, &user.user_id, project_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/invitations
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Invitation>>> {
    let invitations = invitation::list_mine(&state.repos, &user.user_id).await?;
    Ok(Json(invitations))
}

/// POST /api/v1/invitations/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Membership>> {
    let membership = invitation::accept(&state.repos, &user.user_id, id).await?;
    Ok(Json(membership))
}

/// POST /api/v1/invitations/{id}/decline
pub async fn decline(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    invitation::decline(&state.repos, &user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
