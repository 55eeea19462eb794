//! Invitation flow: invite, list, accept, decline, cancel.
//!
//! An invitation and a membership never exist for the same
//! `(project, user)`: inviting a member is a conflict, and acceptance swaps
//! the invitation for a membership atomically.

use tracing::info;
use validator::Validate;

use crate::authorization::Authorizer;
use crate::error::{CoreError, RepoError};
use crate::models::invitation::{CreateInvitation, Invitation};
use crate::models::membership::Membership;
use crate::repository::Repositories;
use crate::roles::{self, Role};
use crate::types::DbId;

pub async fn invite(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    input: &CreateInvitation,
) -> Result<Invitation, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::INVITATION_MANAGE)
        .await?;
    input.validate()?;
    if input.role == Role::Owner {
        return Err(CoreError::Validation(
            "Invitations cannot propose the owner role; transfer ownership instead".into(),
        ));
    }
    if repos
        .memberships
        .find(project_id, &input.guest_id)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(
            "User is already a member of this project".into(),
        ));
    }

    let invitation = repos
        .invitations
        .create(project_id, actor, input)
        .await
        .map_err(|err| match err {
            RepoError::UniqueViolation { .. } => {
                CoreError::Conflict("User already has a pending invitation".into())
            }
            other => other.into(),
        })?;
    info!(project_id, inviter = actor, guest = %input.guest_id, role = %input.role, "Invitation sent");
    Ok(invitation)
}

/// Pending invitations of a project, visible to any member.
pub async fn list_for_project(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
) -> Result<Vec<Invitation>, CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::ANY_MEMBER)
        .await?;
    Ok(repos.invitations.list_by_project(project_id).await?)
}

/// Invitations addressed to the actor.
pub async fn list_mine(repos: &Repositories, actor: &str) -> Result<Vec<Invitation>, CoreError> {
    Ok(repos.invitations.list_for_guest(actor).await?)
}

/// Fetch an invitation addressed to `actor`. Someone else's invitation is
/// reported as missing.
async fn own_invitation(
    repos: &Repositories,
    actor: &str,
    invitation_id: DbId,
) -> Result<Invitation, CoreError> {
    repos
        .invitations
        .find_by_id(invitation_id)
        .await?
        .filter(|i| i.guest_id == actor)
        .ok_or_else(|| CoreError::not_found("Invitation", invitation_id))
}

pub async fn accept(
    repos: &Repositories,
    actor: &str,
    invitation_id: DbId,
) -> Result<Membership, CoreError> {
    let invitation = own_invitation(repos, actor, invitation_id).await?;
    let membership = repos
        .invitations
        .accept(invitation.id)
        .await?
        .ok_or_else(|| CoreError::not_found("Invitation", invitation_id))?;
    info!(
        project_id = membership.project_id,
        user = actor,
        role = %membership.role,
        "Invitation accepted"
    );
    Ok(membership)
}

pub async fn decline(repos: &Repositories, actor: &str, invitation_id: DbId) -> Result<(), CoreError> {
    let invitation = own_invitation(repos, actor, invitation_id).await?;
    repos.invitations.delete(invitation.id).await?;
    info!(project_id = invitation.project_id, user = actor, "Invitation declined");
    Ok(())
}

/// Withdraw a pending invitation of `project_id`.
pub async fn cancel(
    repos: &Repositories,
    actor: &str,
    project_id: DbId,
    invitation_id: DbId,
) -> Result<(), CoreError> {
    Authorizer::new(repos)
        .authorize(actor, project_id, roles::INVITATION_MANAGE)
        .await?;
    let invitation = repos
        .invitations
        .find_by_id(invitation_id)
        .await?
        .filter(|i| i.project_id == project_id)
        .ok_or_else(|| CoreError::not_found("Invitation", invitation_id))?;
    repos.invitations.delete(invitation.id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::services::test_helpers::{add_member, setup, OWNER};

    fn invitation_for(guest: &str, role: Role) -> CreateInvitation {
        CreateInvitation {
            guest_id: guest.into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_accept_turns_invitation_into_membership() {
        let (repos, project) = setup().await;
        let invitation = invite(&repos, OWNER, project.id, &invitation_for("tina", Role::Translator))
            .await
            .unwrap();
        assert_eq!(list_mine(&repos, "tina").await.unwrap().len(), 1);

        let membership = accept(&repos, "tina", invitation.id).await.unwrap();
        assert_eq!(membership.role, Role::Translator);
        assert!(list_mine(&repos, "tina").await.unwrap().is_empty());
        assert!(repos.invitations.find_by_id(invitation.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_only_the_guest_can_accept() {
        let (repos, project) = setup().await;
        let invitation = invite(&repos, OWNER, project.id, &invitation_for("tina", Role::Editor))
            .await
            .unwrap();
        assert_matches!(
            accept(&repos, "mallory", invitation.id).await,
            Err(CoreError::NotFound { entity: "Invitation", .. })
        );
    }

    #[tokio::test]
    async fn test_decline_deletes_invitation() {
        let (repos, project) = setup().await;
        let invitation = invite(&repos, OWNER, project.id, &invitation_for("tina", Role::Editor))
            .await
            .unwrap();
        decline(&repos, "tina", invitation.id).await.unwrap();
        assert!(repos.memberships.find(project.id, "tina").await.unwrap().is_none());
        assert!(list_for_project(&repos, OWNER, project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invite_conflicts() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "ed", Role::Editor).await;

        assert_matches!(
            invite(&repos, OWNER, project.id, &invitation_for("ed", Role::Reviewer)).await,
            Err(CoreError::Conflict(_))
        );

        invite(&repos, OWNER, project.id, &invitation_for("tina", Role::Editor))
            .await
            .unwrap();
        assert_matches!(
            invite(&repos, OWNER, project.id, &invitation_for("tina", Role::Reviewer)).await,
            Err(CoreError::Conflict(msg)) if msg.contains("pending")
        );
    }

    #[tokio::test]
    async fn test_invite_cannot_propose_owner() {
        let (repos, project) = setup().await;
        assert_matches!(
            invite(&repos, OWNER, project.id, &invitation_for("tina", Role::Owner)).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_invite_and_cancel_need_manager() {
        let (repos, project) = setup().await;
        add_member(&repos, project.id, "ed", Role::Editor).await;
        assert_matches!(
            invite(&repos, "ed", project.id, &invitation_for("tina", Role::Editor)).await,
            Err(CoreError::Forbidden(_))
        );

        let invitation = invite(&repos, OWNER, project.id, &invitation_for("tina", Role::Editor))
            .await
            .unwrap();
        assert_matches!(
            cancel(&repos, "ed", project.id, invitation.id).await,
            Err(CoreError::Forbidden(_))
        );
        cancel(&repos, OWNER, project.id, invitation.id).await.unwrap();
        assert!(list_mine(&repos, "tina").await.unwrap().is_empty());
    }
}
