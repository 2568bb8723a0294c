//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::{Message, MessageRepository, MessageStatus, RepoResult, Snowflake};

use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

pub(crate) const MESSAGE_COLUMNS: &str = "id, conversation_id, channel_id, direction, sender, \
     content, content_kind, external_id, status, ai_generated, ai_confidence, failure_reason, \
     delivered_at, read_at, created_at";

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_external_id(
        &self,
        channel_id: Snowflake,
        external_id: &str,
    ) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE channel_id = $1 AND external_id = $2"
        ))
        .bind(channel_id.into_inner())
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_recent(
        &self,
        conversation_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        let limit = limit.clamp(1, 100);

        // Last `limit` rows, handed back oldest-first
        let results = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT * FROM ( \
                 SELECT {MESSAGE_COLUMNS} FROM messages \
                 WHERE conversation_id = $1 \
                 ORDER BY id DESC LIMIT $2 \
             ) recent ORDER BY id ASC"
        ))
        .bind(conversation_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
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
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, failure_reason))]
    async fn update_status(
        &self,
        id: Snowflake,
        status: MessageStatus,
        external_id: Option<&str>,
        failure_reason: Option<&str>,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        // Stale failure reasons are cleared on any non-FAILED application;
        // delivered/read timestamps stick once set.
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = $2,
                external_id = COALESCE($3, external_id),
                failure_reason = CASE WHEN $2 = 'FAILED' THEN $4 ELSE NULL END,
                delivered_at = CASE WHEN $2 = 'DELIVERED' THEN $5 ELSE delivered_at END,
                read_at = CASE WHEN $2 = 'READ' THEN $5 ELSE read_at END
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .bind(external_id)
        .bind(failure_reason)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }
}
