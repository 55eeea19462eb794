//! Key groups. Every project keeps exactly one default group.

use validator::Validate;

use super::group_in_project;
use crate::authorization::Authorizer;
use crate::error::{CoreError, RepoError};
use crate::models::group::{CreateGroup, Group, UpdateGroup};
use crate::repository::Repositories;
use crate::roles;
use crate::types::DbId;

fn duplicate(err: RepoError) -> CoreError {
    match err {
        RepoError::UniqueViolation { .. } => {
            CoreError::Conflict("A group with this name already exists in the project".into())
        }
        other => other.into(),
    }
}

pub async fn list(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
) -> Result<Vec<Group>, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    Ok(repos.groups.list_by_project(project_id).await?)
}

pub async fn create(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    input: &CreateGroup,
) -> Result<Group, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::GROUP_WRITE)
        .await?;
    input.validate()?;
    repos.groups.create(project_id, input).await.map_err(duplicate)
}

pub async fn update(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    group_id: DbId,
    input: &UpdateGroup,
) -> Result<Group, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::GROUP_WRITE)
        .await?;
    input.validate()?;
    group_in_project(repos, project_id, group_id).await?;
    repos
        .groups
        .update(group_id, input)
        .await
        .map_err(duplicate)?
        .ok_or_else(|| CoreError::not_found("Group", group_id))
}

/// Delete a group and its keys. The default group cannot be deleted.
pub async fn delete(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    group_id: DbId,
) -> Result<(), CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::GROUP_WRITE)
        .await?;
    let group = group_in_project(repos, project_id, group_id).await?;
    if group.is_default {
        return Err(CoreError::Validation(
            "The default group cannot be deleted".into(),
        ));
    }
    repos.groups.delete(group_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::services::test_helpers::{setup, OWNER};

    #[tokio::test]
    async fn test_default_group_is_protected() {
        let (repos, project) = setup().await;
        let default = repos.groups.find_default(project.id).await.unwrap().unwrap();
        assert_matches!(
            delete(&repos, OWNER, project.id, default.id).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_create_rename_delete() {
        let (repos, project) = setup().await;
        let group = create(&repos, OWNER, project.id, &CreateGroup { name: "checkout".into() })
            .await
            .unwrap();
        assert!(!group.is_default);

        assert_matches!(
            create(&repos, OWNER, project.id, &CreateGroup { name: "checkout".into() }).await,
            Err(CoreError::Conflict(_))
        );

        let renamed = update(
            &repos,
            OWNER,
            project.id,
            group.id,
            &UpdateGroup { name: "cart".into() },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "cart");

        delete(&repos, OWNER, project.id, group.id).await.unwrap();
        assert_eq!(list(&repos, OWNER, project.id).await.unwrap().len(), 1);
    }
}
