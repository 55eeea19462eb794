//! Authorization engine for project-scoped actions.
//!
//! Two kinds of actions exist:
//!
//! - **Ungated** (empty permitted set): any member may act. A missing project
//!   is `NotFound`, an existing project without membership is `Unauthorized`.
//! - **Role-gated**: the actor's role must be in the permitted set. Missing
//!   membership and missing project both collapse into `Forbidden` so that
//!   non-members cannot discover which project ids exist.
//!
//! User-management decisions ([`decide_role_change`], [`decide_removal`],
//! [`decide_leave`]) are pure functions over already-loaded memberships.

use tracing::debug;

use crate::error::CoreError;
use crate::membership::resolve_role;
use crate::models::membership::Membership;
use crate::repository::{MembershipRepository, ProjectRepository, Repositories};
use crate::roles::{self, Role};
use crate::types::DbId;

/// Resolves "may `actor` do this in `project_id`" against the repositories.
pub struct Authorizer<'a> {
    projects: &'a dyn ProjectRepository,
    memberships: &'a dyn MembershipRepository,
}

impl<'a> Authorizer<'a> {
    pub fn new(repos: &'a Repositories) -> Self {
        Self {
            projects: repos.projects.as_ref(),
            memberships: repos.memberships.as_ref(),
        }
    }

    /// Authorize an action gated by `permitted`, returning the actor's role.
    ///
    /// An empty set selects the ungated rules.
    pub async fn authorize(
        &self,
        actor: &str,
        project_id: DbId,
        permitted: &[Role],
    ) -> Result<Role, CoreError> {
        if permitted.is_empty() {
            self.require_member(actor, project_id).await
        } else {
            self.require_role(actor, project_id, permitted).await
        }
    }

    /// Ungated: the actor only needs to be a member.
    pub async fn require_member(&self, actor: &str, project_id: DbId) -> Result<Role, CoreError> {
        if let Some(role) = resolve_role(self.memberships, project_id, actor).await? {
            return Ok(role);
        }
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(CoreError::not_found("Project", project_id));
        }
        debug!(actor, project_id, "Denied: not a member");
        Err(CoreError::Unauthorized(
            "You are not a member of this project".into(),
        ))
    }

    /// Role-gated: the actor must be a member holding one of `permitted`.
    pub async fn require_role(
        &self,
        actor: &str,
        project_id: DbId,
        permitted: &[Role],
    ) -> Result<Role, CoreError> {
        let role = self.gated_membership(actor, project_id).await?;
        ensure_permitted(role, permitted)?;
        Ok(role)
    }

    /// The actor's role for a role-gated action whose role check happens
    /// later (user management checks self-targeting first).
    pub async fn gated_membership(&self, actor: &str, project_id: DbId) -> Result<Role, CoreError> {
        match resolve_role(self.memberships, project_id, actor).await? {
            Some(role) => Ok(role),
            None => {
                debug!(actor, project_id, "Denied: no membership on gated action");
                Err(forbidden())
            }
        }
    }
}

fn forbidden() -> CoreError {
    CoreError::Forbidden("Your role does not permit this action".into())
}

/// Deny with `Forbidden` unless `role` is in `permitted`.
pub fn ensure_permitted(role: Role, permitted: &[Role]) -> Result<(), CoreError> {
    if roles::is_permitted(role, permitted) {
        Ok(())
    } else {
        debug!(%role, "Denied: role not permitted");
        Err(forbidden())
    }
}

/// Outcome of an allowed role update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// Set the target's role.
    Assign(Role),
    /// Make the target owner and demote the acting owner to manager.
    TransferOwnership,
}

/// Decide whether `actor_id` (holding `actor_role`) may set `target_id`'s
/// role to `new_role`.
///
/// Checks run in this order: self-targeting (`Unauthorized`), role
/// sufficiency (`Forbidden`), ownership transfer by a non-owner
/// (`Forbidden`), target membership (`NotFound`), owner immutability
/// (`Unauthorized`).
pub fn decide_role_change(
    actor_id: &str,
    actor_role: Role,
    target_id: &str,
    target: Option<&Membership>,
    new_role: Role,
) -> Result<RoleChange, CoreError> {
    if actor_id == target_id {
        return Err(CoreError::Unauthorized(
            "You cannot change your own role".into(),
        ));
    }
    ensure_permitted(actor_role, roles::MEMBER_MANAGE)?;
    if new_role == Role::Owner && actor_role != Role::Owner {
        return Err(CoreError::Forbidden(
            "Only the project owner can transfer ownership".into(),
        ));
    }
    let target = target.ok_or_else(|| CoreError::not_found("Member", target_id))?;
    if target.role == Role::Owner {
        return Err(CoreError::Unauthorized(
            "The project owner's role cannot be changed".into(),
        ));
    }
    if new_role == Role::Owner {
        Ok(RoleChange::TransferOwnership)
    } else {
        Ok(RoleChange::Assign(new_role))
    }
}

/// Decide whether `actor_id` may remove `target_id` from the project.
///
/// Removing yourself is `MethodNotAllowed`: members leave instead.
pub fn decide_removal(
    actor_id: &str,
    actor_role: Role,
    target_id: &str,
    target: Option<&Membership>,
) -> Result<(), CoreError> {
    if actor_id == target_id {
        return Err(CoreError::MethodNotAllowed(
            "Use leave to remove yourself from a project".into(),
        ));
    }
    ensure_permitted(actor_role, roles::MEMBER_MANAGE)?;
    let target = target.ok_or_else(|| CoreError::not_found("Member", target_id))?;
    if target.role == Role::Owner {
        return Err(CoreError::Unauthorized(
            "The project owner cannot be removed".into(),
        ));
    }
    Ok(())
}

/// What leaving a project does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The owner left; the whole project is deleted.
    ProjectDeleted,
    /// Only the leaver's membership is removed.
    MembershipRemoved,
}

/// Decide the effect of a member with `role` leaving.
pub fn decide_leave(role: Role) -> LeaveOutcome {
    if role == Role::Owner {
        LeaveOutcome::ProjectDeleted
    } else {
        LeaveOutcome::MembershipRemoved
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::models::project::CreateProject;

    fn member(user_id: &str, role: Role) -> Membership {
        Membership {
            project_id: 1,
            user_id: user_id.into(),
            role,
            created_at: chrono::Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Role change decisions
    // -----------------------------------------------------------------------

    #[test]
    fn test_self_role_change_is_unauthorized_for_every_role() {
        for role in Role::ALL {
            let me = member("alice", role);
            for new_role in Role::ALL {
                assert_matches!(
                    decide_role_change("alice", role, "alice", Some(&me), new_role),
                    Err(CoreError::Unauthorized(_))
                );
            }
        }
    }

    #[test]
    fn test_manager_cannot_transfer_ownership() {
        let owner = member("u1", Role::Owner);
        assert_matches!(
            decide_role_change("u2", Role::Manager, "u1", Some(&owner), Role::Owner),
            Err(CoreError::Forbidden(_))
        );
        let editor = member("u3", Role::Editor);
        assert_matches!(
            decide_role_change("u2", Role::Manager, "u3", Some(&editor), Role::Owner),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_owner_transfers_ownership() {
        let manager = member("u2", Role::Manager);
        assert_eq!(
            decide_role_change("u1", Role::Owner, "u2", Some(&manager), Role::Owner).unwrap(),
            RoleChange::TransferOwnership
        );
    }

    #[test]
    fn test_owner_role_is_immutable() {
        let owner = member("u1", Role::Owner);
        assert_matches!(
            decide_role_change("u2", Role::Manager, "u1", Some(&owner), Role::Editor),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn test_insufficient_role_is_forbidden() {
        let target = member("u3", Role::Translator);
        for role in [Role::Editor, Role::Translator, Role::Reviewer] {
            assert_matches!(
                decide_role_change("u2", role, "u3", Some(&target), Role::Reviewer),
                Err(CoreError::Forbidden(_))
            );
        }
    }

    #[test]
    fn test_missing_target_is_not_found() {
        assert_matches!(
            decide_role_change("u1", Role::Owner, "ghost", None, Role::Editor),
            Err(CoreError::NotFound { entity: "Member", .. })
        );
    }

    #[test]
    fn test_manager_assigns_non_owner_roles() {
        let target = member("u3", Role::Editor);
        assert_eq!(
            decide_role_change("u2", Role::Manager, "u3", Some(&target), Role::Manager).unwrap(),
            RoleChange::Assign(Role::Manager)
        );
    }

    // -----------------------------------------------------------------------
    // Removal and leave decisions
    // -----------------------------------------------------------------------

    #[test]
    fn test_self_removal_is_method_not_allowed() {
        let me = member("u2", Role::Manager);
        assert_matches!(
            decide_removal("u2", Role::Manager, "u2", Some(&me)),
            Err(CoreError::MethodNotAllowed(_))
        );
    }

    #[test]
    fn test_owner_cannot_be_removed() {
        let owner = member("u1", Role::Owner);
        assert_matches!(
            decide_removal("u2", Role::Manager, "u1", Some(&owner)),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn test_manager_removes_editor() {
        let editor = member("u3", Role::Editor);
        assert!(decide_removal("u2", Role::Manager, "u3", Some(&editor)).is_ok());
        assert_matches!(
            decide_removal("u4", Role::Translator, "u3", Some(&editor)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_owner_leaving_deletes_project() {
        assert_eq!(decide_leave(Role::Owner), LeaveOutcome::ProjectDeleted);
        for role in [Role::Manager, Role::Editor, Role::Translator, Role::Reviewer] {
            assert_eq!(decide_leave(role), LeaveOutcome::MembershipRemoved);
        }
    }

    // -----------------------------------------------------------------------
    // Repository-backed checks
    // -----------------------------------------------------------------------

    async fn repos_with_project() -> (Repositories, DbId) {
        let repos = Repositories::in_memory();
        let project = repos
            .projects
            .create_with_owner(
                &CreateProject {
                    name: "App".into(),
                    color: None,
                    description: None,
                },
                "owner",
            )
            .await
            .unwrap();
        (repos, project.id)
    }

    #[tokio::test]
    async fn test_ungated_distinguishes_missing_project_from_non_member() {
        let (repos, project_id) = repos_with_project().await;
        let authz = Authorizer::new(&repos);

        assert_matches!(
            authz.authorize("stranger", 9999, roles::ANY_MEMBER).await,
            Err(CoreError::NotFound { entity: "Project", .. })
        );
        assert_matches!(
            authz.authorize("stranger", project_id, roles::ANY_MEMBER).await,
            Err(CoreError::Unauthorized(_))
        );
        assert_eq!(
            authz.authorize("owner", project_id, roles::ANY_MEMBER).await.unwrap(),
            Role::Owner
        );
    }

    #[tokio::test]
    async fn test_gated_collapses_missing_project_and_non_member() {
        let (repos, project_id) = repos_with_project().await;
        let authz = Authorizer::new(&repos);

        assert_matches!(
            authz.authorize("stranger", 9999, roles::PROJECT_UPDATE).await,
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            authz.authorize("stranger", project_id, roles::PROJECT_UPDATE).await,
            Err(CoreError::Forbidden(_))
        );
    }

    #[tokio::test]
    async fn test_gated_checks_role_membership() {
        let (repos, project_id) = repos_with_project().await;
        let authz = Authorizer::new(&repos);

        assert_eq!(
            authz.authorize("owner", project_id, roles::PROJECT_DELETE).await.unwrap(),
            Role::Owner
        );

        repos
            .invitations
            .create(
                project_id,
                "owner",
                &crate::models::invitation::CreateInvitation {
                    guest_id: "rita".into(),
                    role: Role::Reviewer,
                },
            )
            .await
            .unwrap();
        let invitation = repos.invitations.list_for_guest("rita").await.unwrap().remove(0);
        repos.invitations.accept(invitation.id).await.unwrap();

        assert_matches!(
            authz.authorize("rita", project_id, roles::VALUE_WRITE).await,
            Err(CoreError::Forbidden(_))
        );
        assert_eq!(
            authz.authorize("rita", project_id, roles::ANY_MEMBER).await.unwrap(),
            Role::Reviewer
        );
    }
}
