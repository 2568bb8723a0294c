//! Transactional ingestion unit of work
//!
//! One accepted inbound message commits atomically with its conversation
//! counter bump, notification rows, and analytics event.
//! The partial unique index on `messages (channel_id, external_id)` is the
//! authoritative dedup guard; the pre-check in the service is only a fast
//! path, so a duplicate-key violation here is treated as "already
//! processed", not as an error.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use inbox_core::{
    InboundPersistCommand, IngestionRepository, PersistOutcome, RepoResult, Snowflake,
};

use super::error::{is_unique_violation, map_db_error};

/// PostgreSQL implementation of IngestionRepository
#[derive(Clone)]
pub struct PgIngestionRepository {
    pool: PgPool,
}

impl PgIngestionRepository {
    /// Create a new PgIngestionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngestionRepository for PgIngestionRepository {
    #[instrument(skip(self, cmd), fields(conversation = %cmd.conversation_id))]
    async fn persist_inbound(&self, cmd: &InboundPersistCommand) -> RepoResult<PersistOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Message row first: a concurrent duplicate fails here before any
        // counter is touched.
        let message = &cmd.message;
        let insert = sqlx::query(
            r#"
            INSERT INTO messages
                (id, conversation_id, channel_id, direction, sender, content, content_kind,
                 external_id, status, ai_generated, ai_confidence, failure_reason,
                 delivered_at, read_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.conversation_id.into_inner())
        .bind(message.channel_id.into_inner())
        .bind(message.direction.as_str())
        .bind(message.sender.as_str())
        .bind(&message.content)
        .bind(message.content_kind.as_str())
        .bind(&message.external_id)
        .bind(message.status.as_str())
        .bind(message.ai_generated)
        .bind(message.ai_confidence)
        .bind(&message.failure_reason)
        .bind(message.delivered_at)
        .bind(message.read_at)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if is_unique_violation(&e) {
                debug!(
                    external_id = message.external_id.as_deref().unwrap_or(""),
                    "duplicate message insert rejected by unique index"
                );
                tx.rollback().await.ok();
                return Ok(PersistOutcome::Duplicate);
            }
            return Err(map_db_error(e));
        }

        // Conversation counters and preview
        sqlx::query(
            r#"
            UPDATE conversations
            SET unread_count = unread_count + 1,
                last_message_at = $2,
                last_message_preview = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(cmd.conversation_id.into_inner())
        .bind(cmd.occurred_at)
        .bind(&cmd.preview)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // One notification row per recipient
        for notification in &cmd.notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications
                    (id, organization_id, user_id, conversation_id, message_id, kind, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(notification.id.into_inner())
            .bind(notification.organization_id.into_inner())
            .bind(notification.user_id.into_inner())
            .bind(notification.conversation_id.into_inner())
            .bind(notification.message_id.into_inner())
            .bind(&notification.kind)
            .bind(notification.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        // Write-only analytics event
        sqlx::query(
            r#"
            INSERT INTO analytics_events (id, organization_id, kind, conversation_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(cmd.analytics.id.into_inner())
        .bind(cmd.analytics.organization_id.into_inner())
        .bind(&cmd.analytics.kind)
        .bind(cmd.analytics.conversation_id.map(Snowflake::into_inner))
        .bind(cmd.analytics.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(PersistOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgIngestionRepository>();
    }
}
