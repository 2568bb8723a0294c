//! PostgreSQL implementation of TrainingDocRepository (read-only boundary)

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::{RepoResult, Snowflake, TrainingDoc, TrainingDocRepository};

use crate::models::TrainingDocModel;

use super::error::map_db_error;

/// PostgreSQL implementation of TrainingDocRepository
#[derive(Clone)]
pub struct PgTrainingDocRepository {
    pool: PgPool,
}

impl PgTrainingDocRepository {
    /// Create a new PgTrainingDocRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrainingDocRepository for PgTrainingDocRepository {
    #[instrument(skip(self))]
    async fn find_recent_active(
        &self,
        organization_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<TrainingDoc>> {
        let results = sqlx::query_as::<_, TrainingDocModel>(
            r#"
            SELECT id, organization_id, title, content, active, updated_at
            FROM training_docs
            WHERE organization_id = $1 AND active = TRUE
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(organization_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(TrainingDoc::from).collect())
    }
}
