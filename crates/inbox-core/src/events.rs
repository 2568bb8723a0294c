//! Normalized webhook events and broadcast event names
//!
//! Parsers turn vendor payloads into these shapes; everything downstream of
//! the parser boundary is provider-agnostic.

use chrono::{DateTime, Utc};

use crate::entities::{ContentKind, MessageStatus};

/// A normalized inbound message extracted from a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Provider-side id that scopes the event to one channel
    /// (page id, phone-number id, recipient id)
    pub channel_external_id: String,
    /// Provider-side id of the sending end user
    pub contact_external_id: String,
    pub contact_name: Option<String>,
    /// Provider message id - the dedup key when present
    pub external_message_id: Option<String>,
    /// Provider thread id, when the provider has stable threads
    pub external_thread_id: Option<String>,
    pub content: String,
    pub content_kind: ContentKind,
    pub occurred_at: DateTime<Utc>,
}

/// A normalized delivery/read/failure callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub channel_external_id: String,
    pub external_message_id: String,
    pub status: MessageStatus,
    pub failure_reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Result of parsing one raw webhook body
///
/// A single delivery can mix inbound messages and status callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedWebhook {
    pub inbound: Vec<InboundEvent>,
    pub statuses: Vec<StatusEvent>,
}

impl ParsedWebhook {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.statuses.is_empty()
    }
}

/// Broadcast event names published to the realtime collaborator
pub mod broadcast {
    pub const NEW_MESSAGE: &str = "new_message";
    pub const MESSAGE_STATUS: &str = "message_status";
    pub const CONVERSATION_UPDATE: &str = "conversation_update";
    pub const NEW_CONVERSATION: &str = "new_conversation";
    pub const AI_PROCESSING: &str = "ai_processing";
    pub const AI_REPLY: &str = "ai_reply";
    pub const AI_SUGGESTION: &str = "ai_suggestion";
    pub const AI_ERROR: &str = "ai_error";
    pub const UNREAD_UPDATE: &str = "unread_update";
    pub const NOTIFICATION: &str = "notification";
}
