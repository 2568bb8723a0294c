//! Message entity <-> model mapper

use inbox_core::{ContentKind, Direction, Message, MessageStatus, SenderKind, Snowflake};

use crate::models::MessageModel;

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            conversation_id: Snowflake::new(model.conversation_id),
            channel_id: Snowflake::new(model.channel_id),
            direction: Direction::parse(&model.direction),
            sender: SenderKind::parse(&model.sender),
            content: model.content,
            content_kind: ContentKind::parse(&model.content_kind),
            external_id: model.external_id,
            status: MessageStatus::parse(&model.status),
            ai_generated: model.ai_generated,
            ai_confidence: model.ai_confidence,
            failure_reason: model.failure_reason,
            delivered_at: model.delivered_at,
            read_at: model.read_at,
            created_at: model.created_at,
        }
    }
}
