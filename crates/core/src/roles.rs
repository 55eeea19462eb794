//! Project role catalog and the permitted-role set of every project action.
//!
//! Roles carry no ordering: an action declares the exact set of roles that
//! may perform it, and authorization is a set-membership check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A member's role within one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Manager,
    Editor,
    Translator,
    Reviewer,
}

impl Role {
    /// Every role, in catalog order.
    pub const ALL: [Role; 5] = [
        Role::Owner,
        Role::Manager,
        Role::Editor,
        Role::Translator,
        Role::Reviewer,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Editor => "editor",
            Role::Translator => "translator",
            Role::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid role '{s}'. Must be one of: {}",
                    Role::ALL.map(Role::as_str).join(", ")
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Permitted-role sets
// ---------------------------------------------------------------------------

/// Any member may act. Absence of membership is reported as Unauthorized,
/// absence of the project as NotFound.
pub const ANY_MEMBER: &[Role] = &[];

pub const PROJECT_UPDATE: &[Role] = &[Role::Owner, Role::Manager];

pub const PROJECT_DELETE: &[Role] = &[Role::Owner];

pub const LANGUAGE_WRITE: &[Role] = &[Role::Owner, Role::Manager];

pub const GROUP_WRITE: &[Role] = &[Role::Owner, Role::Manager, Role::Editor];

pub const KEY_WRITE: &[Role] = &[Role::Owner, Role::Manager, Role::Editor];

pub const VALUE_WRITE: &[Role] = &[Role::Owner, Role::Manager, Role::Editor, Role::Translator];

/// Updating another member's role or removing them.
pub const MEMBER_MANAGE: &[Role] = &[Role::Owner, Role::Manager];

/// Sending or cancelling invitations.
pub const INVITATION_MANAGE: &[Role] = &[Role::Owner, Role::Manager];

/// Returns `true` if `role` may perform an action gated by `permitted`.
///
/// An empty set means any member may act.
pub fn is_permitted(role: Role, permitted: &[Role]) -> bool {
    permitted.is_empty() || permitted.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert!(err.contains("Invalid role 'admin'"));
        assert!("Owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Translator).unwrap();
        assert_eq!(json, "\"translator\"");
        let role: Role = serde_json::from_str("\"reviewer\"").unwrap();
        assert_eq!(role, Role::Reviewer);
    }

    #[test]
    fn test_empty_set_permits_every_role() {
        for role in Role::ALL {
            assert!(is_permitted(role, ANY_MEMBER));
        }
    }

    #[test]
    fn test_reviewer_is_read_only() {
        for set in [
            PROJECT_UPDATE,
            PROJECT_DELETE,
            LANGUAGE_WRITE,
            GROUP_WRITE,
            KEY_WRITE,
            VALUE_WRITE,
            MEMBER_MANAGE,
            INVITATION_MANAGE,
        ] {
            assert!(!is_permitted(Role::Reviewer, set));
        }
    }

    #[test]
    fn test_only_owner_deletes_project() {
        assert!(is_permitted(Role::Owner, PROJECT_DELETE));
        assert!(!is_permitted(Role::Manager, PROJECT_DELETE));
    }

    #[test]
    fn test_translator_writes_values_only() {
        assert!(is_permitted(Role::Translator, VALUE_WRITE));
        assert!(!is_permitted(Role::Translator, KEY_WRITE));
        assert!(!is_permitted(Role::Translator, GROUP_WRITE));
    }
}
