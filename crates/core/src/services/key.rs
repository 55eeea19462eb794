//! Translation keys, including the plurality toggle.

use tracing::info;
use validator::Validate;

use super::{group_in_project, key_in_project};
use crate::authorization::Authorizer;
use crate::error::{CoreError, RepoError};
use crate::models::key::{CreateKey, KeyRevision, NewKey, TranslationKey, UpdateKey};
use crate::repository::Repositories;
use crate::roles;
use crate::types::DbId;

const KEY_NAME_UNIQUE: &str = "uq_translation_keys_group_name";

fn duplicate(err: RepoError) -> CoreError {
    match err {
        RepoError::UniqueViolation { constraint } if constraint == KEY_NAME_UNIQUE => {
            CoreError::Conflict("A key with this name already exists in the group".into())
        }
        RepoError::UniqueViolation { .. } => CoreError::Conflict(
            "Values of this key collide in the target quantity buckets".into(),
        ),
        other => other.into(),
    }
}

pub async fn list(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
) -> Result<Vec<TranslationKey>, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    Ok(repos.keys.list_by_project(project_id).await?)
}

pub async fn get(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    key_id: DbId,
) -> Result<TranslationKey, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    key_in_project(repos, project_id, key_id).await
}

/// Create a key. Plurality is fixed at creation; no values are created.
pub async fn create(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    input: &CreateKey,
) -> Result<TranslationKey, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::KEY_WRITE)
        .await?;
    input.validate()?;
    let group_id = match input.group_id {
        Some(group_id) => Some(group_in_project(repos, project_id, group_id).await?.id),
        None => repos.groups.find_default(project_id).await?.map(|g| g.id),
    };
    let new_key = NewKey {
        project_id,
        group_id,
        name: input.name.clone(),
        is_plural: input.is_plural,
    };
    repos.keys.create(&new_key).await.map_err(duplicate)
}

/// Update a key. When `is_plural` flips, the key's values are rewritten in
/// the same transaction as the key itself.
pub async fn update(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    key_id: DbId,
    input: &UpdateKey,
) -> Result<TranslationKey, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::KEY_WRITE)
        .await?;
    input.validate()?;
    let key = key_in_project(repos, project_id, key_id).await?;
    let group_id = match input.group_id {
        Some(group_id) => Some(group_in_project(repos, project_id, group_id).await?.id),
        None => key.group_id,
    };
    let revision = KeyRevision {
        name: input.name.clone().unwrap_or_else(|| key.name.clone()),
        group_id,
        is_plural: input.is_plural.unwrap_or(key.is_plural),
    };

    let update = repos
        .keys
        .update_with_transition(key_id, &revision)
        .await
        .map_err(duplicate)?
        .ok_or_else(|| CoreError::not_found("TranslationKey", key_id))?;
    if !update.plan.is_empty() || update.key.is_plural != key.is_plural {
        info!(
            key_id,
            is_plural = update.key.is_plural,
            changes = update.plan.changes.len(),
            "Key plurality changed"
        );
    }
    Ok(update.key)
}

/// Delete a key and its values.
pub async fn delete(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    key_id: DbId,
) -> Result<(), CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::KEY_WRITE)
        .await?;
    key_in_project(repos, project_id, key_id).await?;
    repos.keys.delete(key_id).await?;
    Ok(())
}
