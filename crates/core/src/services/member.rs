//! Member management: list, change role, remove, leave.

use tracing::info;

use crate::authorization::{
    decide_leave, decide_removal, decide_role_change, Authorizer, LeaveOutcome, RoleChange,
};
use crate::error::CoreError;
use crate::models::membership::{Membership, UpdateMemberRole};
use crate::repository::Repositories;
use crate::roles::{self, Role};
use crate::types::DbId;

pub async fn list(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
) -> Result<Vec<Membership>, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    Ok(repos.memberships.list_by_project(project_id).await?)
}

/// Explain why a conditional membership write matched no row: the target
/// left, or became the owner after the decision was taken.
async fn refused_target(
    repos: &Repositories,
    project_id: DbId,
    target_id: &str,
) -> Result<CoreError, CoreError> {
    let target = repos.memberships.find(project_id, target_id).await?;
    Ok(match target {
        Some(m) if m.role == Role::Owner => {
            CoreError::Unauthorized("The project owner cannot be changed or removed".into())
        }
        _ => CoreError::not_found("Member", target_id),
    })
}

/// Change `target_id`'s role. Setting the owner role transfers ownership
/// from the acting owner, who becomes a manager.
pub async fn update_role(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    target_id: &str,
    input: &UpdateMemberRole,
) -> Result<Membership, CoreError> {
    let actor_role = Authorizer::new(repos)
        .gated_membership(actor, project_id)
        .await?;
    let target = repos.memberships.find(project_id, target_id).await?;

    match decide_role_change(actor, actor_role, target_id, target.as_ref(), input.role)? {
        RoleChange::Assign(role) => {
            match repos.memberships.update_role(project_id, target_id, role).await? {
                Some(updated) => Ok(updated),
                None => Err(refused_target(repos, project_id, target_id).await?),
            }
        }
        RoleChange::TransferOwnership => {
            if !repos
                .memberships
                .transfer_ownership(project_id, actor, target_id)
                .await?
            {
                if repos.memberships.find(project_id, target_id).await?.is_none() {
                    return Err(CoreError::not_found("Member", target_id));
                }
                return Err(CoreError::Forbidden(
                    "Only the project owner can transfer ownership".into(),
                ));
            }
            info!(project_id, from = actor, to = target_id, "Ownership transferred");
            repos
                .memberships
                .find(project_id, target_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Member", target_id))
        }
    }
}

/// Remove another member from the project.
pub async fn remove(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    target_id: &str,
) -> Result<(), CoreError> {
    let actor_role = Authorizer::new(repos)
        .gated_membership(actor, project_id)
        .await?;
    let target = repos.memberships.find(project_id, target_id).await?;
    decide_removal(actor, actor_role, target_id, target.as_ref())?;

    if !repos.memberships.delete(project_id, target_id).await? {
        return Err(refused_target(repos, project_id, target_id).await?);
    }
    info!(project_id, actor, removed = target_id, "Member removed");
    Ok(())
}

/// Leave the project. When the owner leaves, the project is deleted.
pub async fn leave(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
) -> Result<LeaveOutcome, CoreError> {
    let role = Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    let outcome = decide_leave(role);
    match outcome {
        LeaveOutcome::ProjectDeleted => {
            repos.projects.delete(project_id).await?;
        }
        LeaveOutcome::MembershipRemoved => {
            if !repos.memberships.delete(project_id, actor).await? {
                return Err(CoreError::Conflict(
                    "Your membership changed while leaving; try again".into(),
                ));
            }
        }
    }
    info!(project_id, actor, ?outcome, "Member left project");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::error::{RepoError, RepoResult};
    use crate::membership::owner_of;
    use crate::repository::MembershipRepository;
    use crate::services::test_helpers::{add_member, setup, OWNER};

    fn to(role: Role) -> UpdateMemberRole {
        UpdateMemberRole { role }
    }

    async fn role_of(repos: &Repositories, project_id: DbId, user: &str) -> Option<Role> {
        repos
            .memberships
            .find(project_id, user)
            .await
            .unwrap()
            .map(|m| m.role)
    }

    async fn owner_count(repos: &Repositories, project_id: DbId) -> usize {
        repos
            .memberships
            .list_by_project(project_id)
            .await
            .unwrap()
            .iter()
            .filter(|m| m.role == Role::Owner)
            .count()
    }

    #[tokio::test]
    async fn test_manager_cannot_take_ownership_but_owner_can_hand_it_over() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "u2", Role::Manager).await;

        assert_matches!(
            update_role(&repos, "u2", project.id, OWNER, &to(Role::Owner)).await,
            Err(CoreError::Forbidden(_))
        );
        assert_eq!(role_of(&repos, project.id, OWNER).await, Some(Role::Owner));

        let promoted = update_role(&repos, OWNER, project.id, "u2", &to(Role::Owner))
            .await
            .unwrap();
        assert_eq!(promoted.role, Role::Owner);
        assert_eq!(role_of(&repos, project.id, OWNER).await, Some(Role::Manager));
        assert_eq!(role_of(&repos, project.id, "u2").await, Some(Role::Owner));
        assert_eq!(owner_count(&repos, project.id).await, 1);

        let members = repos.memberships.list_by_project(project.id).await.unwrap();
        assert_eq!(owner_of(&members).unwrap().user_id, "u2");
    }

    #[tokio::test]
    async fn test_self_role_change_is_unauthorized() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "rev", Role::Reviewer).await;

        assert_matches!(
            update_role(&repos, OWNER, project.id, OWNER, &to(Role::Manager)).await,
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            update_role(&repos, "rev", project.id, "rev", &to(Role::Manager)).await,
            Err(CoreError::Unauthorized(_))
        );
    }

    #[tokio::test]
    async fn test_non_member_role_change_is_forbidden() {
        let (repos, project) = setup().await;
        assert_matches!(
            update_role(&repos, "stranger", project.id, OWNER, &to(Role::Editor)).await,
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            update_role(&repos, "stranger", 4242, OWNER, &to(Role::Editor)).await,
            Err(CoreError::Forbidden(_))
        );
    }

    #[tokio::test]
    async fn test_manager_reassigns_editor() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "mia", Role::Manager).await;
        add_member(&repos, project.id, "ed", Role::Editor).await;

        let updated = update_role(&repos, "mia", project.id, "ed", &to(Role::Translator))
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Translator);

        assert_matches!(
            update_role(&repos, "mia", project.id, OWNER, &to(Role::Editor)).await,
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            update_role(&repos, "mia", project.id, "ghost", &to(Role::Editor)).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_remove_rules() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "mia", Role::Manager).await;
        add_member(&repos, project.id, "ed", Role::Editor).await;

        assert_matches!(
            remove(&repos, "mia", project.id, "mia").await,
            Err(CoreError::MethodNotAllowed(_))
        );
        assert_matches!(
            remove(&repos, "mia", project.id, OWNER).await,
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            remove(&repos, "ed", project.id, "mia").await,
            Err(CoreError::Forbidden(_))
        );

        remove(&repos, "mia", project.id, "ed").await.unwrap();
        assert_eq!(role_of(&repos, project.id, "ed").await, None);
    }

    #[tokio::test]
    async fn test_member_leaving_keeps_project() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "ed", Role::Editor).await;

        let outcome = leave(&repos, "ed", project.id).await.unwrap();
        assert_eq!(outcome, LeaveOutcome::MembershipRemoved);
        assert_eq!(role_of(&repos, project.id, "ed").await, None);
        assert!(repos.projects.find_by_id(project.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_owner_leaving_deletes_project() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "ed", Role::Editor).await;

        let outcome = leave(&repos, OWNER, project.id).await.unwrap();
        assert_eq!(outcome, LeaveOutcome::ProjectDeleted);
        assert!(repos.projects.find_by_id(project.id).await.unwrap().is_none());
        assert!(repos.memberships.list_by_project(project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_leave_reports_missing_project_and_non_member() {
        let (repos, project) = setup().await;
        assert_matches!(
            leave(&repos, "stranger", project.id).await,
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            leave(&repos, "stranger", 4242).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_demoted_owner_cannot_transfer_again() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "u2", Role::Manager).await;
        add_member(&repos, project.id, "u3", Role::Manager).await;

        assert!(repos
            .memberships
            .transfer_ownership(project.id, OWNER, "u2")
            .await
            .unwrap());
        // A second request from the same owner that passed its role check
        // before the first transfer landed.
        assert!(!repos
            .memberships
            .transfer_ownership(project.id, OWNER, "u3")
            .await
            .unwrap());

        assert_eq!(owner_count(&repos, project.id).await, 1);
        assert_eq!(role_of(&repos, project.id, "u2").await, Some(Role::Owner));
        assert_eq!(role_of(&repos, project.id, "u3").await, Some(Role::Manager));
    }

    #[tokio::test]
    async fn test_storage_never_rewrites_or_removes_the_owner() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "u2", Role::Manager).await;
        repos
            .memberships
            .transfer_ownership(project.id, OWNER, "u2")
            .await
            .unwrap();

        let updated = repos
            .memberships
            .update_role(project.id, "u2", Role::Editor)
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!repos.memberships.delete(project.id, "u2").await.unwrap());
        assert_matches!(
            repos.memberships.update_role(project.id, OWNER, Role::Owner).await,
            Err(RepoError::UniqueViolation { constraint }) if constraint == "uq_project_members_single_owner"
        );
        assert_eq!(owner_count(&repos, project.id).await, 1);
    }

    /// Serves one outdated read of `stale.user_id`, as if the caller looked
    /// the member up just before a concurrent write.
    struct StaleTarget {
        inner: Arc<dyn MembershipRepository>,
        stale: Membership,
        served: AtomicBool,
    }

    #[async_trait]
    impl MembershipRepository for StaleTarget {
        async fn find(&self, project_id: DbId, user_id: &str) -> RepoResult<Option<Membership>> {
            if user_id == self.stale.user_id && !self.served.swap(true, Ordering::SeqCst) {
                return Ok(Some(self.stale.clone()));
            }
            self.inner.find(project_id, user_id).await
        }

        async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Membership>> {
            self.inner.list_by_project(project_id).await
        }

        async fn update_role(
            &self,
            project_id: DbId,
            user_id: &str,
            role: Role,
        ) -> RepoResult<Option<Membership>> {
            self.inner.update_role(project_id, user_id, role).await
        }

        async fn transfer_ownership(
            &self,
            project_id: DbId,
            from_user: &str,
            to_user: &str,
        ) -> RepoResult<bool> {
            self.inner.transfer_ownership(project_id, from_user, to_user).await
        }

        async fn delete(&self, project_id: DbId, user_id: &str) -> RepoResult<bool> {
            self.inner.delete(project_id, user_id).await
        }
    }

    async fn with_stale_target(repos: &Repositories, project_id: DbId, user: &str) -> Repositories {
        let stale = repos.memberships.find(project_id, user).await.unwrap().unwrap();
        Repositories {
            memberships: Arc::new(StaleTarget {
                inner: repos.memberships.clone(),
                stale,
                served: AtomicBool::new(false),
            }),
            ..repos.clone()
        }
    }

    #[tokio::test]
    async fn test_manager_cannot_reassign_member_who_just_became_owner() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "mia", Role::Manager).await;
        add_member(&repos, project.id, "ed", Role::Editor).await;
        let racing = with_stale_target(&repos, project.id, "ed").await;

        update_role(&repos, OWNER, project.id, "ed", &to(Role::Owner))
            .await
            .unwrap();

        assert_matches!(
            update_role(&racing, "mia", project.id, "ed", &to(Role::Translator)).await,
            Err(CoreError::Unauthorized(_))
        );
        assert_eq!(role_of(&repos, project.id, "ed").await, Some(Role::Owner));
        assert_eq!(owner_count(&repos, project.id).await, 1);
    }

    #[tokio::test]
    async fn test_manager_cannot_remove_member_who_just_became_owner() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "mia", Role::Manager).await;
        add_member(&repos, project.id, "ed", Role::Editor).await;
        let racing = with_stale_target(&repos, project.id, "ed").await;

        update_role(&repos, OWNER, project.id, "ed", &to(Role::Owner))
            .await
            .unwrap();

        assert_matches!(
            remove(&racing, "mia", project.id, "ed").await,
            Err(CoreError::Unauthorized(_))
        );
        assert_eq!(role_of(&repos, project.id, "ed").await, Some(Role::Owner));
    }
}
