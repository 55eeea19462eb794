//! Use-case services.
//!
//! Every function takes the acting user's id and the [`Repositories`] bundle
//! explicitly, authorizes through [`Authorizer`], and returns
//! `Result<_, CoreError>`. Scoping lookups (a key or language must belong to
//! the project in the path) report `NotFound` when the entity lives in
//! another project.
//!
//! [`Repositories`]: crate::repository::Repositories
//! [`Authorizer`]: crate::authorization::Authorizer

pub mod group;
pub mod invitation;
pub mod key;
pub mod language;
pub mod member;
pub mod project;
pub mod value;

use crate::error::CoreError;
use crate::models::group::Group;
use crate::models::key::TranslationKey;
use crate::models::language::Language;
use crate::repository::Repositories;
use crate::types::DbId;

pub(crate) async fn language_in_project(
    repos: &Repositories,
    project_id: DbId,
    language_id: DbId,
) -> Result<Language, CoreError> {
    repos
        .languages
        .find_by_id(language_id)
        .await?
        .filter(|l| l.project_id == project_id)
        .ok_or_else(|| CoreError::not_found("Language", language_id))
}

pub(crate) async fn group_in_project(
    repos: &Repositories,
    project_id: DbId,
    group_id: DbId,
) -> Result<Group, CoreError> {
    repos
        .groups
        .find_by_id(group_id)
        .await?
        .filter(|g| g.project_id == project_id)
        .ok_or_else(|| CoreError::not_found("Group", group_id))
}

pub(crate) async fn key_in_project(
    repos: &Repositories,
    project_id: DbId,
    key_id: DbId,
) -> Result<TranslationKey, CoreError> {
    repos
        .keys
        .find_by_id(key_id)
        .await?
        .filter(|k| k.project_id == project_id)
        .ok_or_else(|| CoreError::not_found("TranslationKey", key_id))
}
