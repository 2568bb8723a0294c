//! Conversation entity - a thread between one channel and one contact

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Conversation lifecycle status
///
/// Transitions are externally triggered; the pipeline never reopens a
/// closed conversation implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversationStatus {
    #[default]
    Open,
    Pending,
    Resolved,
    Closed,
}

impl ConversationStatus {
    /// Stable database/string form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Pending => "PENDING",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// Parse the stored form, defaulting unknown values to OPEN
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "RESOLVED" => Self::Resolved,
            "CLOSED" => Self::Closed,
            _ => Self::Open,
        }
    }
}

/// Conversation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "LOW" => Self::Low,
            "HIGH" => Self::High,
            "URGENT" => Self::Urgent,
            _ => Self::Normal,
        }
    }
}

/// Maximum stored preview length, in characters
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Snowflake,
    pub organization_id: Snowflake,
    pub channel_id: Snowflake,
    pub contact_id: Snowflake,
    /// Provider-side thread id, when the provider supplies one
    pub external_thread_id: Option<String>,
    pub status: ConversationStatus,
    pub priority: Priority,
    pub assignee_id: Option<Snowflake>,
    pub unread_count: i32,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_message_preview: Option<String>,
    pub ai_enabled: bool,
    pub is_ai_handling: bool,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new open conversation for a (channel, contact) pair
    pub fn new(
        id: Snowflake,
        organization_id: Snowflake,
        channel_id: Snowflake,
        contact_id: Snowflake,
        external_thread_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            organization_id,
            channel_id,
            contact_id,
            external_thread_id,
            status: ConversationStatus::Open,
            priority: Priority::Normal,
            assignee_id: None,
            unread_count: 0,
            last_message_at: None,
            last_message_preview: None,
            ai_enabled: true,
            is_ai_handling: false,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Register an accepted inbound message: bump unread, refresh preview
    pub fn register_inbound(&mut self, preview: String, at: DateTime<Utc>) {
        self.unread_count += 1;
        self.last_message_at = Some(at);
        self.last_message_preview = Some(preview);
        self.updated_at = at;
    }

    /// Register an outbound (agent or AI) message: unread resets to zero
    pub fn register_outbound(&mut self, preview: String, at: DateTime<Utc>) {
        self.unread_count = 0;
        self.is_ai_handling = false;
        self.last_message_at = Some(at);
        self.last_message_preview = Some(preview);
        self.updated_at = at;
    }
}

/// Truncate content to the stored preview length on a character boundary
#[must_use]
pub fn preview_of(content: &str) -> String {
    content.chars().take(PREVIEW_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation::new(
            Snowflake::new(1),
            Snowflake::new(10),
            Snowflake::new(20),
            Snowflake::new(30),
            None,
        )
    }

    #[test]
    fn test_unread_accounting() {
        let mut convo = conversation();
        let now = Utc::now();

        for _ in 0..3 {
            convo.register_inbound("hi".to_string(), now);
        }
        assert_eq!(convo.unread_count, 3);

        convo.register_outbound("reply".to_string(), now);
        assert_eq!(convo.unread_count, 0);
        assert!(!convo.is_ai_handling);
    }

    #[test]
    fn test_preview_truncation() {
        let long = "x".repeat(250);
        assert_eq!(preview_of(&long).chars().count(), PREVIEW_MAX_CHARS);
        assert_eq!(preview_of("short"), "short");

        // multibyte content must not split a character
        let emoji = "😀".repeat(120);
        let preview = preview_of(&emoji);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ConversationStatus::parse("CLOSED"), ConversationStatus::Closed);
        assert_eq!(ConversationStatus::parse("bogus"), ConversationStatus::Open);
        assert_eq!(Priority::parse("URGENT"), Priority::Urgent);
        assert_eq!(Priority::parse(""), Priority::Normal);
    }
}
