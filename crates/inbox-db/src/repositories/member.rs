//! PostgreSQL implementation of MemberRepository (read-only boundary)
//!
//! Membership and roles are owned by the tenant-management collaborator;
//! this pipeline only reads the default notification recipients.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::{MemberRepository, RepoResult, Snowflake};

use super::error::map_db_error;

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_notifiable(&self, organization_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT user_id FROM organization_members
            WHERE organization_id = $1
              AND active = TRUE
              AND role IN ('OWNER', 'ADMIN', 'AGENT')
            "#,
        )
        .bind(organization_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }
}
