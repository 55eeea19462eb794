//! Repository ports.
//!
//! One trait per entity. Services depend only on these traits; `lingo-db`
//! implements them over PostgreSQL and the `memory` module (behind the
//! `test-support` feature) implements them in process.
//!
//! Contract every implementation honours:
//! - unique constraint violations surface as [`RepoError::UniqueViolation`];
//! - deleting a parent removes its children (project -> languages, groups,
//!   keys, values, memberships, invitations; group -> keys; key/language ->
//!   values);
//! - composite operations documented as atomic commit all-or-nothing.
//!
//! [`RepoError::UniqueViolation`]: crate::error::RepoError::UniqueViolation

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RepoResult;
use crate::models::group::{CreateGroup, Group, UpdateGroup};
use crate::models::invitation::{CreateInvitation, Invitation};
use crate::models::key::{KeyRevision, KeyUpdate, NewKey, TranslationKey};
use crate::models::language::{CreateLanguage, Language, UpdateLanguage};
use crate::models::membership::Membership;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::value::{NewValue, TranslationValue};
use crate::quantity::QuantityBucket;
use crate::roles::Role;
use crate::types::DbId;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Atomically insert the project, its default group and an owner
    /// membership for `owner_id`.
    async fn create_with_owner(&self, input: &CreateProject, owner_id: &str)
        -> RepoResult<Project>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Project>>;

    /// Projects `user_id` is a member of, newest first.
    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<Project>>;

    /// Apply the non-`None` fields. Returns `None` if the project is absent.
    async fn update(&self, id: DbId, input: &UpdateProject) -> RepoResult<Option<Project>>;

    /// Delete the project and everything it owns. Returns `true` if a row
    /// was removed.
    async fn delete(&self, id: DbId) -> RepoResult<bool>;
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find(&self, project_id: DbId, user_id: &str) -> RepoResult<Option<Membership>>;

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Membership>>;

    /// Set a non-owner member's role. Returns `None` if the member is absent
    /// or holds the owner role at write time.
    async fn update_role(
        &self,
        project_id: DbId,
        user_id: &str,
        role: Role,
    ) -> RepoResult<Option<Membership>>;

    /// Atomically demote `from_user` to manager and promote `to_user` to
    /// owner. Returns `false`, changing nothing, unless `from_user` is the
    /// owner and `to_user` a member at write time.
    async fn transfer_ownership(
        &self,
        project_id: DbId,
        from_user: &str,
        to_user: &str,
    ) -> RepoResult<bool>;

    /// Remove a non-owner membership. Returns `false` if the member is absent
    /// or holds the owner role at write time.
    async fn delete(&self, project_id: DbId, user_id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create(
        &self,
        project_id: DbId,
        inviter_id: &str,
        input: &CreateInvitation,
    ) -> RepoResult<Invitation>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Invitation>>;

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Invitation>>;

    async fn list_for_guest(&self, guest_id: &str) -> RepoResult<Vec<Invitation>>;

    /// Atomically turn the invitation into a membership and delete it.
    /// Returns `None` if the invitation is absent.
    async fn accept(&self, id: DbId) -> RepoResult<Option<Membership>>;

    async fn delete(&self, id: DbId) -> RepoResult<bool>;
}

#[async_trait]
pub trait LanguageRepository: Send + Sync {
    async fn create(&self, project_id: DbId, input: &CreateLanguage) -> RepoResult<Language>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Language>>;

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Language>>;

    async fn update(&self, id: DbId, input: &UpdateLanguage) -> RepoResult<Option<Language>>;

    async fn delete(&self, id: DbId) -> RepoResult<bool>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, project_id: DbId, input: &CreateGroup) -> RepoResult<Group>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Group>>;

    async fn find_default(&self, project_id: DbId) -> RepoResult<Option<Group>>;

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Group>>;

    async fn update(&self, id: DbId, input: &UpdateGroup) -> RepoResult<Option<Group>>;

    async fn delete(&self, id: DbId) -> RepoResult<bool>;
}

#[async_trait]
pub trait KeyRepository: Send + Sync {
    async fn create(&self, input: &NewKey) -> RepoResult<TranslationKey>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<TranslationKey>>;

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<TranslationKey>>;

    /// Lock the key, plan its pluralization transition against the values
    /// present at that point, and write `revision` together with the plan in
    /// one transaction. Returns `None` if the key is absent.
    async fn update_with_transition(
        &self,
        id: DbId,
        revision: &KeyRevision,
    ) -> RepoResult<Option<KeyUpdate>>;

    async fn delete(&self, id: DbId) -> RepoResult<bool>;
}

#[async_trait]
pub trait ValueRepository: Send + Sync {
    /// Insert a value while holding the owning key against concurrent
    /// plurality changes. Fails with `CheckViolation` if the quantity does
    /// not match the key's plurality at insert time, `ForeignKeyViolation`
    /// if the key or language is gone, and `UniqueViolation` if the slot is
    /// taken.
    async fn create(&self, input: &NewValue) -> RepoResult<TranslationValue>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<TranslationValue>>;

    async fn find_by_slot(
        &self,
        key_id: DbId,
        language_id: DbId,
        quantity: Option<QuantityBucket>,
    ) -> RepoResult<Option<TranslationValue>>;

    async fn list_by_key(&self, key_id: DbId) -> RepoResult<Vec<TranslationValue>>;

    async fn update_name(&self, id: DbId, name: &str) -> RepoResult<Option<TranslationValue>>;

    async fn delete(&self, id: DbId) -> RepoResult<bool>;
}

/// The full set of ports a service call may need, passed explicitly.
///
/// Cheap to clone; every field is an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn ProjectRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub invitations: Arc<dyn InvitationRepository>,
    pub languages: Arc<dyn LanguageRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub keys: Arc<dyn KeyRepository>,
    pub values: Arc<dyn ValueRepository>,
}
