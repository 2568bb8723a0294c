//! Webhook audit log - append-only, never read by business logic

use chrono::{DateTime, Utc};

use crate::entities::ProviderKind;
use crate::value_objects::Snowflake;

/// One record per processed raw webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookLog {
    pub id: Snowflake,
    pub provider: ProviderKind,
    pub status_code: u16,
    pub error: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl WebhookLog {
    /// Record a successfully handled delivery
    pub fn success(id: Snowflake, provider: ProviderKind) -> Self {
        Self {
            id,
            provider,
            status_code: 200,
            error: None,
            received_at: Utc::now(),
        }
    }

    /// Record a rejected or failed delivery
    pub fn failure(
        id: Snowflake,
        provider: ProviderKind,
        status_code: u16,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id,
            provider,
            status_code,
            error: Some(error.into()),
            received_at: Utc::now(),
        }
    }
}
