//! Notification and analytics records written inside the ingestion transaction

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Per-recipient notification row
///
/// Recipients are the conversation assignee when set, otherwise every
/// active OWNER/ADMIN/AGENT member of the organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub organization_id: Snowflake,
    pub user_id: Snowflake,
    pub conversation_id: Snowflake,
    pub message_id: Snowflake,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Notification kind for a freshly ingested inbound message
    pub const NEW_MESSAGE: &'static str = "new_message";

    pub fn new_message(
        id: Snowflake,
        organization_id: Snowflake,
        user_id: Snowflake,
        conversation_id: Snowflake,
        message_id: Snowflake,
    ) -> Self {
        Self {
            id,
            organization_id,
            user_id,
            conversation_id,
            message_id,
            kind: Self::NEW_MESSAGE.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Write-only analytics event; never read by business logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub id: Snowflake,
    pub organization_id: Snowflake,
    pub kind: String,
    pub conversation_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub const MESSAGE_RECEIVED: &'static str = "message_received";

    pub fn message_received(
        id: Snowflake,
        organization_id: Snowflake,
        conversation_id: Snowflake,
    ) -> Self {
        Self {
            id,
            organization_id,
            kind: Self::MESSAGE_RECEIVED.to_string(),
            conversation_id: Some(conversation_id),
            created_at: Utc::now(),
        }
    }
}
