//! Response DTOs

use chrono::{DateTime, Utc};
use inbox_core::Message;
use serde::Serialize;

/// Summary returned from one webhook delivery
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct WebhookOutcome {
    pub processed_inbound: usize,
    pub processed_statuses: usize,
    pub skipped: usize,
}

/// Message representation for API responses
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub direction: &'static str,
    pub sender: &'static str,
    pub content: String,
    pub content_kind: &'static str,
    pub status: &'static str,
    pub ai_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            conversation_id: message.conversation_id.to_string(),
            direction: message.direction.as_str(),
            sender: message.sender.as_str(),
            content: message.content.clone(),
            content_kind: message.content_kind.as_str(),
            status: message.status.as_str(),
            ai_generated: message.ai_generated,
            ai_confidence: message.ai_confidence,
            failure_reason: message.failure_reason.clone(),
            created_at: message.created_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}

/// Outcome of a manual AI reply trigger
#[derive(Debug, Clone, Serialize)]
pub struct AiReplyResponse {
    /// "delegated" when the automation system accepted the reply and will
    /// call back asynchronously, "replied" when a message was dispatched
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageResponse>,
}

impl AiReplyResponse {
    #[must_use]
    pub fn delegated() -> Self {
        Self {
            status: "delegated",
            message: None,
        }
    }

    #[must_use]
    pub fn replied(message: MessageResponse) -> Self {
        Self {
            status: "replied",
            message: Some(message),
        }
    }
}

/// Non-committing AI suggestion
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    pub model: String,
}

/// Reported provider connection test
#[derive(Debug, Clone, Serialize)]
pub struct TestConnectionResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// OAuth consent URL for a channel connect flow
#[derive(Debug, Clone, Serialize)]
pub struct ConnectUrlResponse {
    pub url: String,
    pub state: String,
}

/// Result of an OAuth code exchange
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeResponse {
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Liveness probe response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            status: "ok",
            timestamp: Utc::now(),
        }
    }
}

/// Readiness probe response with dependency health
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
    pub cache: bool,
}

impl ReadinessResponse {
    #[must_use]
    pub fn ready(database: bool, cache: bool) -> Self {
        Self {
            ready: database && cache,
            database,
            cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inbox_core::{ContentKind, SenderKind, Snowflake};

    #[test]
    fn test_message_response_mapping() {
        let message = Message::inbound(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "hello".to_string(),
            ContentKind::Text,
            Some("mid.1".to_string()),
            Utc::now(),
        );
        let response = MessageResponse::from(&message);
        assert_eq!(response.direction, "INBOUND");
        assert_eq!(response.sender, "CONTACT");
        assert_eq!(response.status, "DELIVERED");
        assert!(!response.ai_generated);
    }

    #[test]
    fn test_ai_message_response() {
        let message = Message::outbound(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            SenderKind::Ai,
            "generated".to_string(),
            Some(0.8),
        );
        let response = MessageResponse::from(message);
        assert!(response.ai_generated);
        assert_eq!(response.ai_confidence, Some(0.8));
    }

    #[test]
    fn test_readiness() {
        assert!(ReadinessResponse::ready(true, true).ready);
        assert!(!ReadinessResponse::ready(true, false).ready);
    }
}
