//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::{Conversation, ConversationRepository, RepoResult, Snowflake};

use crate::models::ConversationModel;

use super::error::{conversation_not_found, map_db_error};

const CONVERSATION_COLUMNS: &str = "id, organization_id, channel_id, contact_id, \
     external_thread_id, status, priority, assignee_id, unread_count, last_message_at, \
     last_message_preview, ai_enabled, is_ai_handling, closed_at, created_at, updated_at";

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_by_external_thread(
        &self,
        channel_id: Snowflake,
        external_thread_id: &str,
    ) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE channel_id = $1 AND external_thread_id = $2"
        ))
        .bind(channel_id.into_inner())
        .bind(external_thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_latest_for_pair(
        &self,
        channel_id: Snowflake,
        contact_id: Snowflake,
    ) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE channel_id = $1 AND contact_id = $2 \
             ORDER BY updated_at DESC LIMIT 1"
        ))
        .bind(channel_id.into_inner())
        .bind(contact_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self, conversation))]
    async fn create(&self, conversation: &Conversation) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations
                (id, organization_id, channel_id, contact_id, external_thread_id, status,
                 priority, assignee_id, unread_count, last_message_at, last_message_preview,
                 ai_enabled, is_ai_handling, closed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(conversation.id.into_inner())
        .bind(conversation.organization_id.into_inner())
        .bind(conversation.channel_id.into_inner())
        .bind(conversation.contact_id.into_inner())
        .bind(&conversation.external_thread_id)
        .bind(conversation.status.as_str())
        .bind(conversation.priority.as_str())
        .bind(conversation.assignee_id.map(Snowflake::into_inner))
        .bind(conversation.unread_count)
        .bind(conversation.last_message_at)
        .bind(&conversation.last_message_preview)
        .bind(conversation.ai_enabled)
        .bind(conversation.is_ai_handling)
        .bind(conversation.closed_at)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_ai_handling(&self, id: Snowflake, handling: bool) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE conversations SET is_ai_handling = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(handling)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, preview))]
    async fn apply_outbound(
        &self,
        id: Snowflake,
        preview: &str,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversations
            SET unread_count = 0,
                is_ai_handling = FALSE,
                last_message_at = $2,
                last_message_preview = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .bind(preview)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgConversationRepository>();
    }
}
