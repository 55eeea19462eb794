//! Project languages.

use validator::Validate;

use super::language_in_project;
use crate::authorization::Authorizer;
use crate::error::{CoreError, RepoError};
use crate::models::language::{CreateLanguage, Language, UpdateLanguage};
use crate::repository::Repositories;
use crate::roles;
use crate::types::DbId;

fn duplicate(err: RepoError) -> CoreError {
    match err {
        RepoError::UniqueViolation { .. } => {
            CoreError::Conflict("A language with this name already exists in the project".into())
        }
        other => other.into(),
    }
}

pub async fn list(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
) -> Result<Vec<Language>, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    Ok(repos.languages.list_by_project(project_id).await?)
}

pub async fn create(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    input: &CreateLanguage,
) -> Result<Language, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::LANGUAGE_WRITE)
        .await?;
    input.validate()?;
    repos
        .languages
        .create(project_id, input)
        .await
        .map_err(duplicate)
}

pub async fn update(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    language_id: DbId,
    input: &UpdateLanguage,
) -> Result<Language, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::LANGUAGE_WRITE)
        .await?;
    input.validate()?;
    language_in_project(repos, project_id, language_id).await?;
    repos
        .languages
        .update(language_id, input)
        .await
        .map_err(duplicate)?
        .ok_or_else(|| CoreError::not_found("Language", language_id))
}

/// Delete a language together with all values written in it.
pub async fn delete(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    language_id: DbId,
) -> Result<(), CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::LANGUAGE_WRITE)
        .await?;
    language_in_project(repos, project_id, language_id).await?;
    repos.languages.delete(language_id).await?;
    Ok(())
}
