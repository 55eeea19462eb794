//! Membership resolution: which role, if any, a user holds in a project.
//!
//! Lookups always hit the repository; role changes apply to the very next
//! request.

use crate::error::CoreError;
use crate::models::membership::Membership;
use crate::repository::MembershipRepository;
use crate::roles::Role;
use crate::types::DbId;

/// Resolve `user_id`'s role in `project_id`, or `None` for no access.
pub async fn resolve_role(
    memberships: &dyn MembershipRepository,
    project_id: DbId,
    user_id: &str,
) -> Result<Option<Role>, CoreError> {
    let membership = memberships.find(project_id, user_id).await?;
    Ok(membership.map(|m| m.role))
}

/// The owner among `members`, if any.
pub fn owner_of(members: &[Membership]) -> Option<&Membership> {
    members.iter().find(|m| m.role == Role::Owner)
}
