//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the messages table
///
/// `(channel_id, external_id)` carries a partial unique index - the
/// authoritative webhook dedup guard.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub conversation_id: i64,
    pub channel_id: i64,
    pub direction: String,
    pub sender: String,
    pub content: String,
    pub content_kind: String,
    pub external_id: Option<String>,
    pub status: String,
    pub ai_generated: bool,
    pub ai_confidence: Option<f32>,
    pub failure_reason: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
