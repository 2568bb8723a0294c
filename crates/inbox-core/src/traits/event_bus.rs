//! Fan-out port - fire-and-forget realtime broadcast
//!
//! The realtime delivery system is an external collaborator; this pipeline
//! only publishes named events to it and treats failures as non-fatal.

use async_trait::async_trait;

use crate::value_objects::Snowflake;

/// Routing scope for a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusScope {
    /// Everyone watching an organization's inbox
    Organization(Snowflake),
    /// One user's sessions (personal notifications)
    User(Snowflake),
}

/// Broadcast failure; callers log and continue, never propagate
#[derive(Debug, thiserror::Error)]
#[error("broadcast failed: {0}")]
pub struct PublishError(pub String);

/// Fire-and-forget publisher of named events
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(
        &self,
        scope: BusScope,
        event: &str,
        data: serde_json::Value,
    ) -> Result<(), PublishError>;
}
