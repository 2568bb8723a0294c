//! Conversation entity <-> model mapper

use inbox_core::{Conversation, ConversationStatus, Priority, Snowflake};

use crate::models::ConversationModel;

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: Snowflake::new(model.id),
            organization_id: Snowflake::new(model.organization_id),
            channel_id: Snowflake::new(model.channel_id),
            contact_id: Snowflake::new(model.contact_id),
            external_thread_id: model.external_thread_id,
            status: ConversationStatus::parse(&model.status),
            priority: Priority::parse(&model.priority),
            assignee_id: model.assignee_id.map(Snowflake::new),
            unread_count: model.unread_count,
            last_message_at: model.last_message_at,
            last_message_preview: model.last_message_preview,
            ai_enabled: model.ai_enabled,
            is_ai_handling: model.is_ai_handling,
            closed_at: model.closed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
