//! Repository layer.
//!
//! Each repository wraps a `PgPool` and implements one port from
//! `lingo_core::repository`. Composite operations run in a single
//! transaction.

pub mod group_repo;
pub mod invitation_repo;
pub mod key_repo;
pub mod language_repo;
pub mod membership_repo;
pub mod project_repo;
pub mod value_repo;

pub use group_repo::PgGroupRepo;
pub use invitation_repo::PgInvitationRepo;
pub use key_repo::PgKeyRepo;
pub use language_repo::PgLanguageRepo;
pub use membership_repo::PgMembershipRepo;
pub use project_repo::PgProjectRepo;
pub use value_repo::PgValueRepo;
