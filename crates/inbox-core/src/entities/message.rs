//! Message entity and the delivery-status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Message direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "INBOUND",
            Self::Outbound => "OUTBOUND",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s == "OUTBOUND" {
            Self::Outbound
        } else {
            Self::Inbound
        }
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SenderKind {
    Contact,
    Agent,
    Ai,
    System,
}

impl SenderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "CONTACT",
            Self::Agent => "AGENT",
            Self::Ai => "AI",
            Self::System => "SYSTEM",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "AGENT" => Self::Agent,
            "AI" => Self::Ai,
            "SYSTEM" => Self::System,
            _ => Self::Contact,
        }
    }
}

/// Normalized content type across providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentKind {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    Document,
    Sticker,
    /// Attachment of a shape no finer kind matches
    Attachment,
}

impl ContentKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
            Self::Audio => "AUDIO",
            Self::Document => "DOCUMENT",
            Self::Sticker => "STICKER",
            Self::Attachment => "ATTACHMENT",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "IMAGE" => Self::Image,
            "VIDEO" => Self::Video,
            "AUDIO" => Self::Audio,
            "DOCUMENT" => Self::Document,
            "STICKER" => Self::Sticker,
            "ATTACHMENT" => Self::Attachment,
            _ => Self::Text,
        }
    }

    /// Placeholder body used when an event carries an attachment but no text
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Text => "",
            Self::Image => "[Image]",
            Self::Video => "[Video]",
            Self::Audio => "[Audio]",
            Self::Document => "[Document]",
            Self::Sticker => "[Sticker]",
            Self::Attachment => "[Attachment]",
        }
    }
}

/// Delivery status of a message
///
/// PENDING -> SENT -> DELIVERED -> READ, with FAILED as an absorbing
/// terminal state reachable from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageStatus {
    Pending,
    Sent,
    Delivered,
    Read,
    Failed,
}

impl MessageStatus {
    /// Monotonic ordering of statuses; FAILED ranks above everything so the
    /// single rank comparison also makes it absorbing.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::Sent => 2,
            Self::Delivered => 3,
            Self::Read => 4,
            Self::Failed => 5,
        }
    }

    /// Transition rule: apply `new` only when its rank is not lower than the
    /// current one. FAILED -> FAILED is the idempotent no-op; any other exit
    /// from FAILED is rejected.
    #[must_use]
    pub fn accepts(self, new: MessageStatus) -> bool {
        new.rank() >= self.rank()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Delivered => "DELIVERED",
            Self::Read => "READ",
            Self::Failed => "FAILED",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "SENT" => Self::Sent,
            "DELIVERED" => Self::Delivered,
            "READ" => Self::Read,
            "FAILED" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Maximum stored failure-reason length, in characters
pub const FAILURE_REASON_MAX_CHARS: usize = 500;

/// Message entity - the atomic unit in a conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Snowflake,
    pub conversation_id: Snowflake,
    /// Channel scope, denormalized so the dedup key (channel, external id)
    /// can be a storage-level unique index
    pub channel_id: Snowflake,
    pub direction: Direction,
    pub sender: SenderKind,
    pub content: String,
    pub content_kind: ContentKind,
    /// Provider message id - the dedup key, unique per channel when present
    pub external_id: Option<String>,
    pub status: MessageStatus,
    pub ai_generated: bool,
    pub ai_confidence: Option<f32>,
    pub failure_reason: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build an inbound contact message; the provider already delivered it,
    /// so it is born DELIVERED.
    pub fn inbound(
        id: Snowflake,
        conversation_id: Snowflake,
        channel_id: Snowflake,
        content: String,
        content_kind: ContentKind,
        external_id: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            channel_id,
            direction: Direction::Inbound,
            sender: SenderKind::Contact,
            content,
            content_kind,
            external_id,
            status: MessageStatus::Delivered,
            ai_generated: false,
            ai_confidence: None,
            failure_reason: None,
            delivered_at: Some(at),
            read_at: None,
            created_at: at,
        }
    }

    /// Build an outbound message in its initial PENDING state
    pub fn outbound(
        id: Snowflake,
        conversation_id: Snowflake,
        channel_id: Snowflake,
        sender: SenderKind,
        content: String,
        ai_confidence: Option<f32>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            channel_id,
            direction: Direction::Outbound,
            sender,
            content,
            content_kind: ContentKind::Text,
            external_id: None,
            status: MessageStatus::Pending,
            ai_generated: sender == SenderKind::Ai,
            ai_confidence,
            failure_reason: None,
            delivered_at: None,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    /// Check if message content is empty after trimming
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Truncate a provider error for storage as a failure reason
#[must_use]
pub fn truncate_failure_reason(reason: &str) -> String {
    reason.chars().take(FAILURE_REASON_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_monotonic() {
        use MessageStatus::*;

        assert!(Pending.accepts(Sent));
        assert!(Sent.accepts(Delivered));
        assert!(Delivered.accepts(Read));
        assert!(Read.accepts(Read));

        // late low-rank callbacks are rejected
        assert!(!Read.accepts(Sent));
        assert!(!Delivered.accepts(Pending));
    }

    #[test]
    fn test_failed_is_absorbing() {
        use MessageStatus::*;

        for from in [Pending, Sent, Delivered, Read] {
            assert!(from.accepts(Failed));
        }
        assert!(Failed.accepts(Failed));
        for to in [Pending, Sent, Delivered, Read] {
            assert!(!Failed.accepts(to));
        }
    }

    #[test]
    fn test_inbound_is_born_delivered() {
        let msg = Message::inbound(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "hello".to_string(),
            ContentKind::Text,
            Some("wamid.1".to_string()),
            Utc::now(),
        );
        assert_eq!(msg.status, MessageStatus::Delivered);
        assert_eq!(msg.direction, Direction::Inbound);
        assert!(msg.delivered_at.is_some());
        assert!(!msg.is_empty());
    }

    #[test]
    fn test_outbound_ai_flags() {
        let msg = Message::outbound(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            SenderKind::Ai,
            "generated".to_string(),
            Some(0.87),
        );
        assert_eq!(msg.status, MessageStatus::Pending);
        assert!(msg.ai_generated);

        let agent = Message::outbound(
            Snowflake::new(4),
            Snowflake::new(2),
            Snowflake::new(3),
            SenderKind::Agent,
            "typed".to_string(),
            None,
        );
        assert!(!agent.ai_generated);
    }

    #[test]
    fn test_failure_reason_truncation() {
        let long = "e".repeat(2_000);
        assert_eq!(truncate_failure_reason(&long).len(), FAILURE_REASON_MAX_CHARS);
        assert_eq!(truncate_failure_reason("boom"), "boom");
    }

    #[test]
    fn test_content_kind_placeholder() {
        assert_eq!(ContentKind::Image.placeholder(), "[Image]");
        assert_eq!(ContentKind::Sticker.placeholder(), "[Sticker]");
        assert_eq!(ContentKind::Text.placeholder(), "");
    }
}
