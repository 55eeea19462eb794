//! Repository for the `project_members` table.

use async_trait::async_trait;
use lingo_core::error::RepoResult;
use lingo_core::models::membership::Membership;
use lingo_core::repository::MembershipRepository;
use lingo_core::roles::Role;
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify;
use crate::models::membership::MembershipRow;

const COLUMNS: &str = "project_id, user_id, role, created_at";

pub struct PgMembershipRepo {
    pool: PgPool,
}

impl PgMembershipRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepo {
    async fn find(&self, project_id: DbId, user_id: &str) -> RepoResult<Option<Membership>> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_members WHERE project_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, MembershipRow>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_by_project(&self, project_id: DbId) -> RepoResult<Vec<Membership>> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_members WHERE project_id = $1 ORDER BY created_at, user_id"
        );
        sqlx::query_as::<_, MembershipRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn update_role(
        &self,
        project_id: DbId,
        user_id: &str,
        role: Role,
    ) -> RepoResult<Option<Membership>> {
        let query = format!(
            "UPDATE project_members SET role = $3
             WHERE project_id = $1 AND user_id = $2 AND role <> 'owner'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MembershipRow>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Demote first: the single-owner index rejects two owners even inside
    /// a transaction. Both updates are conditional, so a transfer racing
    /// another one rolls back instead of leaving zero or two owners.
    async fn transfer_ownership(
        &self,
        project_id: DbId,
        from_user: &str,
        to_user: &str,
    ) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let demoted = sqlx::query(
            "UPDATE project_members SET role = $3
             WHERE project_id = $1 AND user_id = $2 AND role = 'owner'",
        )
        .bind(project_id)
        .bind(from_user)
        .bind(Role::Manager.as_str())
        .execute(&mut *tx)
        .await
        .map_err(classify)?;
        if demoted.rows_affected() != 1 {
            return Ok(false);
        }

        let promoted = sqlx::query(
            "UPDATE project_members SET role = $3
             WHERE project_id = $1 AND user_id = $2 AND role <> 'owner'",
        )
        .bind(project_id)
        .bind(to_user)
        .bind(Role::Owner.as_str())
        .execute(&mut *tx)
        .await
        .map_err(classify)?;
        if promoted.rows_affected() != 1 {
            return Ok(false);
        }

        tx.commit().await.map_err(classify)?;
        Ok(true)
    }

    async fn delete(&self, project_id: DbId, user_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM project_members
             WHERE project_id = $1 AND user_id = $2 AND role <> 'owner'",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
