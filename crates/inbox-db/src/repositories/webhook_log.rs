//! PostgreSQL implementation of WebhookLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::{RepoResult, WebhookLog, WebhookLogRepository};

use super::error::map_db_error;

/// PostgreSQL implementation of WebhookLogRepository (append-only)
#[derive(Clone)]
pub struct PgWebhookLogRepository {
    pool: PgPool,
}

impl PgWebhookLogRepository {
    /// Create a new PgWebhookLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebhookLogRepository for PgWebhookLogRepository {
    #[instrument(skip(self, log), fields(provider = %log.provider, status = log.status_code))]
    async fn record(&self, log: &WebhookLog) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO webhook_logs (id, provider, status_code, error, received_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(log.id.into_inner())
        .bind(log.provider.as_str())
        .bind(i32::from(log.status_code))
        .bind(&log.error)
        .bind(log.received_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
