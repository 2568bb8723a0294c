//! Message status reconciler
//!
//! Applies provider delivery/read/failure callbacks under the monotonic
//! transition rule: a callback is applied only when its rank is not lower
//! than the current status, and FAILED is absorbing.

use inbox_core::events::broadcast;
use inbox_core::{BusScope, MessageStatus, ProviderKind, StatusEvent};
use inbox_core::entities::message::truncate_failure_reason;
use serde_json::json;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Message status reconciler
pub struct StatusReconciler<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatusReconciler<'a> {
    /// Create a new StatusReconciler
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply one status callback. Returns `true` when a transition was
    /// applied; unresolved targets and rejected transitions are dropped
    /// with a log line, never errored.
    #[instrument(skip(self, event), fields(external_id = %event.external_message_id, status = ?event.status))]
    pub async fn apply(&self, provider: ProviderKind, event: &StatusEvent) -> ServiceResult<bool> {
        let Some(channel) = self
            .ctx
            .channel_repo()
            .find_active_by_external_id(provider, &event.channel_external_id)
            .await?
        else {
            info!(
                channel_external_id = %event.channel_external_id,
                "status callback for unknown channel, dropping"
            );
            return Ok(false);
        };

        let Some(message) = self
            .ctx
            .message_repo()
            .find_by_external_id(channel.id, &event.external_message_id)
            .await?
        else {
            info!("status callback for unknown message, dropping");
            return Ok(false);
        };

        if !message.status.accepts(event.status) {
            // Late low-rank callback, or an attempt to leave FAILED
            info!(
                current = ?message.status,
                incoming = ?event.status,
                "status transition rejected"
            );
            return Ok(false);
        }

        let failure_reason = event
            .failure_reason
            .as_deref()
            .map(truncate_failure_reason);
        self.ctx
            .message_repo()
            .update_status(
                message.id,
                event.status,
                None,
                failure_reason.as_deref(),
                event.occurred_at,
            )
            .await?;

        self.broadcast_status(
            channel.organization_id.into(),
            message.conversation_id.into(),
            message.id.into(),
            event.status,
            failure_reason,
        )
        .await;

        Ok(true)
    }

    async fn broadcast_status(
        &self,
        organization_id: i64,
        conversation_id: i64,
        message_id: i64,
        status: MessageStatus,
        failure_reason: Option<String>,
    ) {
        let result = self
            .ctx
            .event_bus()
            .publish(
                BusScope::Organization(organization_id.into()),
                broadcast::MESSAGE_STATUS,
                json!({
                    "conversation_id": conversation_id.to_string(),
                    "message_id": message_id.to_string(),
                    "status": status.as_str(),
                    "failure_reason": failure_reason,
                }),
            )
            .await;
        if let Err(e) = result {
            warn!(error = %e, "status broadcast failed");
        }
    }
}
