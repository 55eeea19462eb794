//! Translation values.
//!
//! Creation enforces the quantity policy against the owning key and the
//! `(key, language, quantity)` uniqueness invariant. Updates only touch the
//! text, so neither check is re-run.

use validator::Validate;

use super::{key_in_project, language_in_project};
use crate::authorization::Authorizer;
use crate::error::{CoreError, RepoError};
use crate::models::value::{CreateValue, NewValue, TranslationValue, UpdateValue, LANGUAGE_FK};
use crate::quantity::{ensure_slot_free, validate_quantity};
use crate::repository::Repositories;
use crate::roles;
use crate::types::DbId;

async fn value_of_key(
    repos: &Repositories,
    key_id: DbId,
    value_id: DbId,
) -> Result<TranslationValue, CoreError> {
    repos
        .values
        .find_by_id(value_id)
        .await?
        .filter(|v| v.key_id == key_id)
        .ok_or_else(|| CoreError::not_found("TranslationValue", value_id))
}

pub async fn list(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    key_id: DbId,
) -> Result<Vec<TranslationValue>, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    key_in_project(repos, project_id, key_id).await?;
    Ok(repos.values.list_by_key(key_id).await?)
}

pub async fn create(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    key_id: DbId,
    input: &CreateValue,
) -> Result<TranslationValue, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::VALUE_WRITE)
        .await?;
    input.validate()?;
    let key = key_in_project(repos, project_id, key_id).await?;
    let language = language_in_project(repos, project_id, input.language_id).await?;

    validate_quantity(key.is_plural, input.quantity)?;
    ensure_slot_free(repos.values.as_ref(), key.id, language.id, input.quantity).await?;

    let new_value = NewValue {
        key_id: key.id,
        language_id: language.id,
        quantity: input.quantity,
        name: input.name.clone(),
    };
    repos.values.create(&new_value).await.map_err(|err| match err {
        RepoError::UniqueViolation { .. } => CoreError::Conflict(
            "Value already exists for this key, language and quantity".into(),
        ),
        // The key flipped plurality after the checks above.
        RepoError::CheckViolation { .. } => {
            CoreError::UnprocessableRule("Quantity string not valid for this key".into())
        }
        RepoError::ForeignKeyViolation { constraint } if constraint == LANGUAGE_FK => {
            CoreError::not_found("Language", language.id)
        }
        RepoError::ForeignKeyViolation { .. } => CoreError::not_found("TranslationKey", key.id),
        other => other.into(),
    })
}

pub async fn update(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    key_id: DbId,
    value_id: DbId,
    input: &UpdateValue,
) -> Result<TranslationValue, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::VALUE_WRITE)
        .await?;
    input.validate()?;
    key_in_project(repos, project_id, key_id).await?;
    value_of_key(repos, key_id, value_id).await?;
    repos
        .values
        .update_name(value_id, &input.name)
        .await?
        .ok_or_else(|| CoreError::not_found("TranslationValue", value_id))
}

pub async fn delete(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    key_id: DbId,
    value_id: DbId,
) -> Result<(), CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::VALUE_WRITE)
        .await?;
    key_in_project(repos, project_id, key_id).await?;
    value_of_key(repos, key_id, value_id).await?;
    repos.values.delete(value_id).await?;
    Ok(())
}
