//! Project lifecycle: create, read, update, delete.

use tracing::info;
use validator::Validate;

use crate::authorization::Authorizer;
use crate::error::CoreError;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::repository::Repositories;
use crate::roles;
use crate::types::DbId;

/// Create a project owned by `actor`, together with its default group.
pub async fn create(
    repos: &Repositories,
    actor: &str,
    input: &CreateProject,
) -> Result<Project, CoreError> {
    input.validate()?;
    let project = repos.projects.create_with_owner(input, actor).await?;
    info!(project_id = project.id, owner = actor, "Project created");
    Ok(project)
}

/// Projects the actor is a member of.
pub async fn list_mine(repos: &Repositories, actor: &str) -> Result<Vec<Project>, CoreError> {
    Ok(repos.projects.list_for_user(actor).await?)
}

pub async fn get(repos: &Repositories, actor: &str, project_id: DbId) -> Result<Project, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    repos
        .projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", project_id))
}

pub async fn update(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    input: &UpdateProject,
) -> Result<Project, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::PROJECT_UPDATE)
        .await?;
    input.validate()?;
    repos
        .projects
        .update(project_id, input)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", project_id))
}

/// Delete the project and, through storage cascades, everything it owns.
pub async fn delete(repos: &Repositories, actor: &str, project_id: DbId) -> Result<(), CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::PROJECT_DELETE)
        .await?;
    if !repos.projects.delete(project_id).await? {
        return Err(CoreError::not_found("Project", project_id));
    }
    info!(project_id, actor, "Project deleted");
    Ok(())
}
