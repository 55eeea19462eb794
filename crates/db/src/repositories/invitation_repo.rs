//! Repository for the `invitations` table.

use async_trait::async_trait;
use lingo_core::error::RepoResult;
use lingo_core::models::invitation::{CreateInvitation, Invitation};
use lingo_core::models::membership::Membership;
use lingo_core::repository::InvitationRepository;
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify;
use crate::models::invitation::InvitationRow;
use crate::models::membership::MembershipRow;

const COLUMNS: &str = "id, project_id, guest_id, inviter_id, role, created_at";

pub struct PgInvitationRepo {
    pool: PgPool,
}

impl PgInvitationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for PgInvitationRepo {
    async fn create(
        &self,
        project_id: DbId,
        inviter_id: &str,
        input: &CreateInvitation,
    ) -> RepoResult<Invitation> {
        let query = format!(
            "INSERT INTO invitations (project_id, guest_id, inviter_id, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InvitationRow>(&query)
            .bind(project_id)
            .bind(&input.guest_id)
            .bind(inviter_id)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?
            .try_into()
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Invitation>> {
        let query = format!("SELECT {COLUMNS} FROM invitations WHERE id = $1");
        sqlx::query_as::<_, InvitationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Invitation>> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations WHERE project_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, InvitationRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn list_for_guest(&self, guest_id: &str) -> RepoResult<Vec<Invitation>> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations WHERE guest_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, InvitationRow>(&query)
            .bind(guest_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    /// Delete the invitation and insert the membership it proposed, in one
    /// transaction.
    async fn accept(&self, id: DbId) -> RepoResult<Option<Membership>> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let query = format!("DELETE FROM invitations WHERE id = $1 RETURNING {COLUMNS}");
        let Some(invitation) = sqlx::query_as::<_, InvitationRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(classify)?
        else {
            return Ok(None);
        };

        let membership = sqlx::query_as::<_, MembershipRow>(
            "INSERT INTO project_members (project_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING project_id, user_id, role, created_at",
        )
        .bind(invitation.project_id)
        .bind(&invitation.guest_id)
        .bind(&invitation.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;

        tx.commit().await.map_err(classify)?;
        membership.try_into().map(Some)
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
