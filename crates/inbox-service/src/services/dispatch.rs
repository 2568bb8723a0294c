//! Outbound dispatcher, shared by human-agent and AI sends
//!
//! Persist PENDING, send through the provider abstraction outside any
//! transaction, then record the result in a follow-up write and update the
//! conversation (unread reset, preview, AI-handling cleared) whether the
//! send succeeded or failed. Provider failures become FAILED messages, never
//! raised exceptions.

use chrono::Utc;
use inbox_core::entities::conversation::preview_of;
use inbox_core::entities::message::truncate_failure_reason;
use inbox_core::events::broadcast;
use inbox_core::{BusScope, Conversation, Message, MessageStatus, SenderKind, Snowflake};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::dto::MessageResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outbound dispatcher
pub struct OutboundDispatcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OutboundDispatcher<'a> {
    /// Create a new OutboundDispatcher
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Human-agent send entry point
    #[instrument(skip(self, content))]
    pub async fn send_agent_message(
        &self,
        conversation_id: Snowflake,
        content: &str,
    ) -> ServiceResult<MessageResponse> {
        let conversation = self.require_conversation(conversation_id).await?;
        let message = self
            .dispatch(&conversation, SenderKind::Agent, content, None)
            .await?;
        Ok(MessageResponse::from(message))
    }

    /// Shared dispatch path, also entered by the AI orchestrator and the
    /// automation callback
    pub async fn dispatch(
        &self,
        conversation: &Conversation,
        sender: SenderKind,
        content: &str,
        ai_confidence: Option<f32>,
    ) -> ServiceResult<Message> {
        let channel = self
            .ctx
            .channel_repo()
            .find_by_id(conversation.channel_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Channel", conversation.channel_id))?;
        let contact = self
            .ctx
            .contact_repo()
            .find_by_id(conversation.contact_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact", conversation.contact_id))?;

        let mut message = Message::outbound(
            self.ctx.generate_id(),
            conversation.id,
            channel.id,
            sender,
            content.to_string(),
            ai_confidence,
        );
        // Persist before any external call; the send happens outside any
        // transaction and its result lands in a follow-up write
        self.ctx.message_repo().create(&message).await?;

        let provider = self.ctx.providers().get(channel.provider);
        if provider.supports_send() {
            match provider.send_message(&channel, &contact, content).await {
                Ok(outcome) => {
                    message.status = outcome.status;
                    message.external_id = outcome.external_message_id.clone();
                    message.failure_reason = None;
                    self.ctx
                        .message_repo()
                        .update_status(
                            message.id,
                            outcome.status,
                            outcome.external_message_id.as_deref(),
                            None,
                            Utc::now(),
                        )
                        .await?;
                    info!(message = %message.id, status = ?message.status, "outbound message sent");
                }
                Err(e) => {
                    let reason = truncate_failure_reason(&e.to_string());
                    message.status = MessageStatus::Failed;
                    message.failure_reason = Some(reason.clone());
                    self.ctx
                        .message_repo()
                        .update_status(
                            message.id,
                            MessageStatus::Failed,
                            None,
                            Some(&reason),
                            Utc::now(),
                        )
                        .await?;
                    warn!(message = %message.id, error = %e, "provider send failed");
                }
            }
        } else {
            // No programmatic send for this provider: mark SENT with no call
            message.status = MessageStatus::Sent;
            self.ctx
                .message_repo()
                .update_status(message.id, MessageStatus::Sent, None, None, Utc::now())
                .await?;
        }

        // Conversation state updates on success and failure alike: unread
        // reset, preview refresh, AI-handling cleared
        let preview = preview_of(content);
        let now = Utc::now();
        self.ctx
            .conversation_repo()
            .apply_outbound(conversation.id, &preview, now)
            .await?;

        self.broadcast_outbound(conversation, &message, &preview).await;

        Ok(message)
    }

    async fn require_conversation(&self, id: Snowflake) -> ServiceResult<Conversation> {
        self.ctx
            .conversation_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", id))
    }

    async fn broadcast_outbound(
        &self,
        conversation: &Conversation,
        message: &Message,
        preview: &str,
    ) {
        let org = BusScope::Organization(conversation.organization_id);

        let events = [
            (
                broadcast::NEW_MESSAGE,
                json!({
                    "conversation_id": conversation.id,
                    "message": {
                        "id": message.id,
                        "content": message.content,
                        "direction": message.direction.as_str(),
                        "sender": message.sender.as_str(),
                        "status": message.status.as_str(),
                        "ai_generated": message.ai_generated,
                        "failure_reason": message.failure_reason,
                        "created_at": message.created_at.to_rfc3339(),
                    },
                }),
            ),
            (
                broadcast::CONVERSATION_UPDATE,
                json!({
                    "conversation_id": conversation.id,
                    "last_message_preview": preview,
                    "is_ai_handling": false,
                }),
            ),
            (
                broadcast::UNREAD_UPDATE,
                json!({
                    "conversation_id": conversation.id,
                    "unread_count": 0,
                }),
            ),
        ];

        for (event, data) in events {
            if let Err(e) = self.ctx.event_bus().publish(org, event, data).await {
                warn!(event, error = %e, "broadcast failed");
            }
        }
    }
}
