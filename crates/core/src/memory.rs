//! In-process implementation of every repository port.
//!
//! Enforces the same unique constraints and cascade deletes as the
//! PostgreSQL schema. Each call holds one write lock for its whole duration,
//! which makes every composite operation atomic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{RepoError, RepoResult};
use crate::models::group::{CreateGroup, Group, UpdateGroup, DEFAULT_GROUP_NAME};
use crate::models::invitation::{CreateInvitation, Invitation};
use crate::models::key::{KeyRevision, KeyUpdate, NewKey, TranslationKey};
use crate::models::language::{CreateLanguage, Language, UpdateLanguage};
use crate::models::membership::Membership;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::value::{NewValue, TranslationValue, KEY_FK, LANGUAGE_FK, QUANTITY_CHECK};
use crate::pluralization::{plan_transition, ValueChange};
use crate::quantity::{is_valid_for, QuantityBucket};
use crate::repository::{
    GroupRepository, InvitationRepository, KeyRepository, LanguageRepository,
    MembershipRepository, ProjectRepository, Repositories, ValueRepository,
};
use crate::roles::Role;
use crate::types::DbId;

fn unique(constraint: &str) -> RepoError {
    RepoError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

#[derive(Default)]
struct State {
    last_id: DbId,
    projects: Vec<Project>,
    memberships: Vec<Membership>,
    invitations: Vec<Invitation>,
    languages: Vec<Language>,
    groups: Vec<Group>,
    keys: Vec<TranslationKey>,
    values: Vec<TranslationValue>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn insert_membership(
        &mut self,
        project_id: DbId,
        user_id: &str,
        role: Role,
    ) -> RepoResult<Membership> {
        if self
            .memberships
            .iter()
            .any(|m| m.project_id == project_id && m.user_id == user_id)
        {
            return Err(unique("uq_project_members_project_user"));
        }
        if role == Role::Owner && self.owner_of(project_id).is_some() {
            return Err(unique("uq_project_members_single_owner"));
        }
        let membership = Membership {
            project_id,
            user_id: user_id.to_string(),
            role,
            created_at: Utc::now(),
        };
        self.memberships.push(membership.clone());
        Ok(membership)
    }

    fn owner_of(&self, project_id: DbId) -> Option<&Membership> {
        self.memberships
            .iter()
            .find(|m| m.project_id == project_id && m.role == Role::Owner)
    }

    fn remove_values_where(&mut self, pred: impl Fn(&TranslationValue) -> bool) {
        self.values.retain(|v| !pred(v));
    }

    fn remove_keys_where(&mut self, pred: impl Fn(&TranslationKey) -> bool) {
        let doomed: Vec<DbId> = self.keys.iter().filter(|&k| pred(k)).map(|k| k.id).collect();
        self.remove_values_where(|v| doomed.contains(&v.key_id));
        self.keys.retain(|k| !doomed.contains(&k.id));
    }

    fn key_name_taken(&self, group_id: Option<DbId>, name: &str, except: Option<DbId>) -> bool {
        self.keys
            .iter()
            .any(|k| k.group_id == group_id && k.name == name && Some(k.id) != except)
    }

    fn value_slot_taken(
        values: &[TranslationValue],
        key_id: DbId,
        language_id: DbId,
        quantity: Option<QuantityBucket>,
        except: Option<DbId>,
    ) -> bool {
        values.iter().any(|v| {
            v.key_id == key_id
                && v.language_id == language_id
                && v.quantity == quantity
                && Some(v.id) != except
        })
    }
}

/// Repository state shared by all ports of one [`Repositories`] bundle.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repositories {
    /// A bundle whose ports share one fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            projects: store.clone(),
            memberships: store.clone(),
            invitations: store.clone(),
            languages: store.clone(),
            groups: store.clone(),
            keys: store.clone(),
            values: store,
        }
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create_with_owner(
        &self,
        input: &CreateProject,
        owner_id: &str,
    ) -> RepoResult<Project> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let project = Project {
            id: state.next_id(),
            name: input.name.clone(),
            color: input.color.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        let group = Group {
            id: state.next_id(),
            name: DEFAULT_GROUP_NAME.to_string(),
            is_default: true,
            project_id: project.id,
        };
        state.projects.push(project.clone());
        state.groups.push(group);
        state.insert_membership(project.id, owner_id, Role::Owner)?;
        Ok(project)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| {
                state
                    .memberships
                    .iter()
                    .any(|m| m.project_id == p.id && m.user_id == user_id)
            })
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    async fn update(&self, id: DbId, input: &UpdateProject) -> RepoResult<Option<Project>> {
        let mut state = self.state.write().await;
        let Some(project) = state.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(color) = &input.color {
            project.color = Some(color.clone());
        }
        if let Some(description) = &input.description {
            project.description = Some(description.clone());
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        if !state.projects.iter().any(|p| p.id == id) {
            return Ok(false);
        }
        state.remove_keys_where(|k| k.project_id == id);
        let languages: Vec<DbId> = state
            .languages
            .iter()
            .filter(|l| l.project_id == id)
            .map(|l| l.id)
            .collect();
        state.remove_values_where(|v| languages.contains(&v.language_id));
        state.languages.retain(|l| l.project_id != id);
        state.groups.retain(|g| g.project_id != id);
        state.memberships.retain(|m| m.project_id != id);
        state.invitations.retain(|i| i.project_id != id);
        state.projects.retain(|p| p.id != id);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Memberships
// ---------------------------------------------------------------------------

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn find(&self, project_id: DbId, user_id: &str) -> RepoResult<Option<Membership>> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Membership>> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_role(
        &self,
        project_id: DbId,
        user_id: &str,
        role: Role,
    ) -> RepoResult<Option<Membership>> {
        let mut state = self.state.write().await;
        if role == Role::Owner && state.owner_of(project_id).is_some() {
            return Err(unique("uq_project_members_single_owner"));
        }
        let membership = state.memberships.iter_mut().find(|m| {
            m.project_id == project_id && m.user_id == user_id && m.role != Role::Owner
        });
        Ok(membership.map(|m| {
            m.role = role;
            m.clone()
        }))
    }

    async fn transfer_ownership(
        &self,
        project_id: DbId,
        from_user: &str,
        to_user: &str,
    ) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let from_is_owner = state
            .owner_of(project_id)
            .is_some_and(|m| m.user_id == from_user);
        let to_is_member = state
            .memberships
            .iter()
            .any(|m| m.project_id == project_id && m.user_id == to_user);
        if !from_is_owner || !to_is_member || from_user == to_user {
            return Ok(false);
        }
        for m in state
            .memberships
            .iter_mut()
            .filter(|m| m.project_id == project_id)
        {
            if m.user_id == from_user {
                m.role = Role::Manager;
            } else if m.user_id == to_user {
                m.role = Role::Owner;
            }
        }
        Ok(true)
    }

    async fn delete(&self, project_id: DbId, user_id: &str) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.memberships.len();
        state.memberships.retain(|m| {
            !(m.project_id == project_id && m.user_id == user_id && m.role != Role::Owner)
        });
        Ok(state.memberships.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

#[async_trait]
impl InvitationRepository for InMemoryStore {
    async fn create(
        &self,
        project_id: DbId,
        inviter_id: &str,
        input: &CreateInvitation,
    ) -> RepoResult<Invitation> {
        let mut state = self.state.write().await;
        if state
            .invitations
            .iter()
            .any(|i| i.project_id == project_id && i.guest_id == input.guest_id)
        {
            return Err(unique("uq_invitations_project_guest"));
        }
        let invitation = Invitation {
            id: state.next_id(),
            project_id,
            guest_id: input.guest_id.clone(),
            inviter_id: inviter_id.to_string(),
            role: input.role,
            created_at: Utc::now(),
        };
        state.invitations.push(invitation.clone());
        Ok(invitation)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Invitation>> {
        let state = self.state.read().await;
        Ok(state.invitations.iter().find(|i| i.id == id).cloned())
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Invitation>> {
        let state = self.state.read().await;
        Ok(state
            .invitations
            .iter()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_for_guest(&self, guest_id: &str) -> RepoResult<Vec<Invitation>> {
        let state = self.state.read().await;
        Ok(state
            .invitations
            .iter()
            .filter(|i| i.guest_id == guest_id)
            .cloned()
            .collect())
    }

    async fn accept(&self, id: DbId) -> RepoResult<Option<Membership>> {
        let mut state = self.state.write().await;
        let Some(invitation) = state.invitations.iter().find(|i| i.id == id).cloned() else {
            return Ok(None);
        };
        let membership =
            state.insert_membership(invitation.project_id, &invitation.guest_id, invitation.role)?;
        state.invitations.retain(|i| i.id != id);
        Ok(Some(membership))
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.invitations.len();
        state.invitations.retain(|i| i.id != id);
        Ok(state.invitations.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

#[async_trait]
impl LanguageRepository for InMemoryStore {
    async fn create(&self, project_id: DbId, input: &CreateLanguage) -> RepoResult<Language> {
        let mut state = self.state.write().await;
        if state
            .languages
            .iter()
            .any(|l| l.project_id == project_id && l.name == input.name)
        {
            return Err(unique("uq_languages_project_name"));
        }
        let language = Language {
            id: state.next_id(),
            name: input.name.clone(),
            project_id,
        };
        state.languages.push(language.clone());
        Ok(language)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Language>> {
        let state = self.state.read().await;
        Ok(state.languages.iter().find(|l| l.id == id).cloned())
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Language>> {
        let state = self.state.read().await;
        Ok(state
            .languages
            .iter()
            .filter(|l| l.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: DbId, input: &UpdateLanguage) -> RepoResult<Option<Language>> {
        let mut state = self.state.write().await;
        let Some(project_id) = state.languages.iter().find(|l| l.id == id).map(|l| l.project_id)
        else {
            return Ok(None);
        };
        if state
            .languages
            .iter()
            .any(|l| l.project_id == project_id && l.name == input.name && l.id != id)
        {
            return Err(unique("uq_languages_project_name"));
        }
        let language = state.languages.iter_mut().find(|l| l.id == id);
        Ok(language.map(|l| {
            l.name = input.name.clone();
            l.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.languages.len();
        state.remove_values_where(|v| v.language_id == id);
        state.languages.retain(|l| l.id != id);
        Ok(state.languages.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn create(&self, project_id: DbId, input: &CreateGroup) -> RepoResult<Group> {
        let mut state = self.state.write().await;
        if state
            .groups
            .iter()
            .any(|g| g.project_id == project_id && g.name == input.name)
        {
            return Err(unique("uq_groups_project_name"));
        }
        let group = Group {
            id: state.next_id(),
            name: input.name.clone(),
            is_default: false,
            project_id,
        };
        state.groups.push(group.clone());
        Ok(group)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Group>> {
        let state = self.state.read().await;
        Ok(state.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn find_default(&self, project_id: DbId) -> RepoResult<Option<Group>> {
        let state = self.state.read().await;
        Ok(state
            .groups
            .iter()
            .find(|g| g.project_id == project_id && g.is_default)
            .cloned())
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Group>> {
        let state = self.state.read().await;
        Ok(state
            .groups
            .iter()
            .filter(|g| g.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: DbId, input: &UpdateGroup) -> RepoResult<Option<Group>> {
        let mut state = self.state.write().await;
        let Some(project_id) = state.groups.iter().find(|g| g.id == id).map(|g| g.project_id)
        else {
            return Ok(None);
        };
        if state
            .groups
            .iter()
            .any(|g| g.project_id == project_id && g.name == input.name && g.id != id)
        {
            return Err(unique("uq_groups_project_name"));
        }
        let group = state.groups.iter_mut().find(|g| g.id == id);
        Ok(group.map(|g| {
            g.name = input.name.clone();
            g.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.groups.len();
        state.remove_keys_where(|k| k.group_id == Some(id));
        state.groups.retain(|g| g.id != id);
        Ok(state.groups.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

#[async_trait]
impl KeyRepository for InMemoryStore {
    async fn create(&self, input: &NewKey) -> RepoResult<TranslationKey> {
        let mut state = self.state.write().await;
        if state.key_name_taken(input.group_id, &input.name, None) {
            return Err(unique("uq_translation_keys_group_name"));
        }
        let key = TranslationKey {
            id: state.next_id(),
            name: input.name.clone(),
            is_plural: input.is_plural,
            project_id: input.project_id,
            group_id: input.group_id,
        };
        state.keys.push(key.clone());
        Ok(key)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<TranslationKey>> {
        let state = self.state.read().await;
        Ok(state.keys.iter().find(|k| k.id == id).cloned())
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<TranslationKey>> {
        let state = self.state.read().await;
        Ok(state
            .keys
            .iter()
            .filter(|k| k.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_with_transition(
        &self,
        id: DbId,
        revision: &KeyRevision,
    ) -> RepoResult<Option<KeyUpdate>> {
        let mut state = self.state.write().await;
        let Some(current) = state.keys.iter().find(|k| k.id == id).cloned() else {
            return Ok(None);
        };
        if state.key_name_taken(revision.group_id, &revision.name, Some(id)) {
            return Err(unique("uq_translation_keys_group_name"));
        }
        let owned: Vec<TranslationValue> =
            state.values.iter().filter(|v| v.key_id == id).cloned().collect();
        let plan = plan_transition(&current, revision.is_plural, &owned);

        // Stage on a copy so a failing step leaves the store untouched.
        let mut values = state.values.clone();
        let mut last_id = state.last_id;
        for change in &plan.changes {
            match change {
                ValueChange::Delete { value_id } => values.retain(|v| v.id != *value_id),
                ValueChange::Rebucket { value_id, quantity } => {
                    let Some(current) = values.iter().find(|v| v.id == *value_id).cloned() else {
                        continue;
                    };
                    if State::value_slot_taken(
                        &values,
                        current.key_id,
                        current.language_id,
                        *quantity,
                        Some(current.id),
                    ) {
                        return Err(unique("uq_translation_values_slot"));
                    }
                    if let Some(v) = values.iter_mut().find(|v| v.id == *value_id) {
                        v.quantity = *quantity;
                    }
                }
                ValueChange::Create(new) => {
                    if State::value_slot_taken(&values, new.key_id, new.language_id, new.quantity, None) {
                        return Err(unique("uq_translation_values_slot"));
                    }
                    last_id += 1;
                    values.push(TranslationValue {
                        id: last_id,
                        name: new.name.clone(),
                        quantity: new.quantity,
                        key_id: new.key_id,
                        language_id: new.language_id,
                    });
                }
            }
        }

        state.values = values;
        state.last_id = last_id;
        let key = state.keys.iter_mut().find(|k| k.id == id);
        Ok(key.map(|k| {
            k.name = revision.name.clone();
            k.group_id = revision.group_id;
            k.is_plural = revision.is_plural;
            KeyUpdate {
                key: k.clone(),
                plan,
            }
        }))
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.keys.len();
        state.remove_keys_where(|k| k.id == id);
        Ok(state.keys.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[async_trait]
impl ValueRepository for InMemoryStore {
    async fn create(&self, input: &NewValue) -> RepoResult<TranslationValue> {
        let mut state = self.state.write().await;
        let Some(key) = state.keys.iter().find(|k| k.id == input.key_id) else {
            return Err(RepoError::ForeignKeyViolation {
                constraint: KEY_FK.to_string(),
            });
        };
        if !is_valid_for(key.is_plural, input.quantity) {
            return Err(RepoError::CheckViolation {
                constraint: QUANTITY_CHECK.to_string(),
            });
        }
        if !state.languages.iter().any(|l| l.id == input.language_id) {
            return Err(RepoError::ForeignKeyViolation {
                constraint: LANGUAGE_FK.to_string(),
            });
        }
        if State::value_slot_taken(
            &state.values,
            input.key_id,
            input.language_id,
            input.quantity,
            None,
        ) {
            return Err(unique("uq_translation_values_slot"));
        }
        let value = TranslationValue {
            id: state.next_id(),
            name: input.name.clone(),
            quantity: input.quantity,
            key_id: input.key_id,
            language_id: input.language_id,
        };
        state.values.push(value.clone());
        Ok(value)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<TranslationValue>> {
        let state = self.state.read().await;
        Ok(state.values.iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_slot(
        &self,
        key_id: DbId,
        language_id: DbId,
        quantity: Option<QuantityBucket>,
    ) -> RepoResult<Option<TranslationValue>> {
        let state = self.state.read().await;
        Ok(state
            .values
            .iter()
            .find(|v| v.key_id == key_id && v.language_id == language_id && v.quantity == quantity)
            .cloned())
    }

    async fn list_by_key(&self, key_id: DbId) -> RepoResult<Vec<TranslationValue>> {
        let state = self.state.read().await;
        Ok(state
            .values
            .iter()
            .filter(|v| v.key_id == key_id)
            .cloned()
            .collect())
    }

    async fn update_name(&self, id: DbId, name: &str) -> RepoResult<Option<TranslationValue>> {
        let mut state = self.state.write().await;
        let value = state.values.iter_mut().find(|v| v.id == id);
        Ok(value.map(|v| {
            v.name = name.to_string();
            v.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.values.len();
        state.values.retain(|v| v.id != id);
        Ok(state.values.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::models::key::UpdateKey;
    use crate::services::key;
    use crate::services::test_helpers::OWNER;

    struct Seeded {
        store: InMemoryStore,
        project_id: DbId,
        key_id: DbId,
        en: DbId,
    }

    /// One project with a singular key and an English language, written
    /// straight into the store.
    async fn seeded() -> Seeded {
        let store = InMemoryStore::new();
        let project = store
            .create_with_owner(
                &CreateProject {
                    name: "Web".into(),
                    color: None,
                    description: None,
                },
                OWNER,
            )
            .await
            .unwrap();
        let en = LanguageRepository::create(&store, project.id, &CreateLanguage { name: "en".into() })
            .await
            .unwrap();
        let key = KeyRepository::create(
            &store,
            &NewKey {
                project_id: project.id,
                group_id: None,
                name: "greeting".into(),
                is_plural: false,
            },
        )
        .await
        .unwrap();
        Seeded {
            store,
            project_id: project.id,
            key_id: key.id,
            en: en.id,
        }
    }

    fn new_value(key_id: DbId, language_id: DbId, quantity: Option<QuantityBucket>) -> NewValue {
        NewValue {
            key_id,
            language_id,
            quantity,
            name: "Hello".into(),
        }
    }

    /// A ONE value on the singular key, which the quantity check would never
    /// admit, occupying the slot a pluralization creates.
    async fn plant_stray_one(s: &Seeded) {
        let mut state = s.store.state.write().await;
        let id = state.next_id();
        state.values.push(TranslationValue {
            id,
            name: "stray".into(),
            quantity: Some(QuantityBucket::One),
            key_id: s.key_id,
            language_id: s.en,
        });
    }

    #[tokio::test]
    async fn test_value_insert_rechecks_key_plurality() {
        let s = seeded().await;
        assert_matches!(
            ValueRepository::create(&s.store, &new_value(s.key_id, s.en, Some(QuantityBucket::Other))).await,
            Err(RepoError::CheckViolation { constraint }) if constraint == QUANTITY_CHECK
        );
        assert_matches!(
            ValueRepository::create(&s.store, &new_value(9999, s.en, None)).await,
            Err(RepoError::ForeignKeyViolation { constraint }) if constraint == KEY_FK
        );
        assert_matches!(
            ValueRepository::create(&s.store, &new_value(s.key_id, 9999, None)).await,
            Err(RepoError::ForeignKeyViolation { constraint }) if constraint == LANGUAGE_FK
        );
        assert!(ValueRepository::create(&s.store, &new_value(s.key_id, s.en, None))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_transition_plans_against_values_present_at_write_time() {
        let s = seeded().await;
        // Inserted after any caller could have read the key's values.
        ValueRepository::create(&s.store, &new_value(s.key_id, s.en, None))
            .await
            .unwrap();

        let revision = KeyRevision {
            name: "greeting".into(),
            group_id: None,
            is_plural: true,
        };
        let update = s
            .store
            .update_with_transition(s.key_id, &revision)
            .await
            .unwrap()
            .unwrap();
        assert!(update.key.is_plural);
        assert_eq!(update.plan.changes.len(), 3);

        let values = s.store.list_by_key(s.key_id).await.unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| is_valid_for(true, v.quantity)));
    }

    #[tokio::test]
    async fn test_failed_transition_leaves_key_and_values_unchanged() {
        let s = seeded().await;
        ValueRepository::create(&s.store, &new_value(s.key_id, s.en, None))
            .await
            .unwrap();
        plant_stray_one(&s).await;
        let before = s.store.list_by_key(s.key_id).await.unwrap();

        let revision = KeyRevision {
            name: "renamed".into(),
            group_id: None,
            is_plural: true,
        };
        assert_matches!(
            s.store.update_with_transition(s.key_id, &revision).await,
            Err(RepoError::UniqueViolation { constraint }) if constraint == "uq_translation_values_slot"
        );

        let key = KeyRepository::find_by_id(&s.store, s.key_id).await.unwrap().unwrap();
        assert!(!key.is_plural);
        assert_eq!(key.name, "greeting");
        assert_eq!(s.store.list_by_key(s.key_id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_slot_collision_during_transition_is_reported_as_value_conflict() {
        let s = seeded().await;
        ValueRepository::create(&s.store, &new_value(s.key_id, s.en, None))
            .await
            .unwrap();
        plant_stray_one(&s).await;
        let (project_id, key_id) = (s.project_id, s.key_id);
        let store = Arc::new(s.store);
        let repos = Repositories {
            projects: store.clone(),
            memberships: store.clone(),
            invitations: store.clone(),
            languages: store.clone(),
            groups: store.clone(),
            keys: store.clone(),
            values: store,
        };

        let result = key::update(
            &repos,
            OWNER,
            project_id,
            key_id,
            &UpdateKey {
                is_plural: Some(true),
                ..Default::default()
            },
        )
        .await;
        assert_matches!(
            result,
            Err(crate::error::CoreError::Conflict(msg)) if msg.contains("quantity buckets")
        );
    }

    #[tokio::test]
    async fn test_single_owner_constraint() {
        let s = seeded().await;
        let mut state = s.store.state.write().await;
        assert_matches!(
            state.insert_membership(s.project_id, "u2", Role::Owner),
            Err(RepoError::UniqueViolation { constraint }) if constraint == "uq_project_members_single_owner"
        );
    }
}
