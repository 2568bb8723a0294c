//! Webhook ingestion service
//!
//! One entry point per raw webhook delivery: verify the signature over the
//! exact request bytes, parse, then per event resolve channel -> contact ->
//! conversation, persist atomically, fan out best-effort, and hand the
//! conversation to the AI orchestrator without delaying the response.

use inbox_core::events::broadcast;
use inbox_core::{
    AnalyticsEvent, BusScope, Channel, Contact, Conversation, InboundEvent,
    InboundPersistCommand, Message, Notification, PersistOutcome, ProviderKind, Snowflake,
    WebhookLog,
};
use inbox_core::entities::conversation::preview_of;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::dto::WebhookOutcome;

use super::ai_reply::AiReplyService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::reconcile::StatusReconciler;

/// Per-event outcome inside one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Processed,
    Skipped,
}

/// Webhook ingestion service
pub struct WebhookIngestService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WebhookIngestService<'a> {
    /// Create a new WebhookIngestService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Process one raw webhook delivery
    ///
    /// Skippable noise (unknown channels, duplicates, empty events) never
    /// fails the delivery; persistence-path errors do. A WebhookLog row is
    /// written on every path before returning.
    #[instrument(skip(self, raw_body, signature_header), fields(provider = %provider))]
    pub async fn process_webhook(
        &self,
        provider: ProviderKind,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> ServiceResult<WebhookOutcome> {
        if let Err(e) = self.verify_signature(provider, raw_body, signature_header) {
            self.write_log(provider, e.status_code(), Some(e.to_string())).await;
            return Err(e);
        }

        let payload: serde_json::Value = match serde_json::from_slice(raw_body) {
            Ok(value) => value,
            Err(e) => {
                let err = ServiceError::validation(format!("malformed webhook body: {e}"));
                self.write_log(provider, 400, Some(err.to_string())).await;
                return Err(err);
            }
        };

        let parsed = self.ctx.providers().parse(provider, &payload);
        let mut outcome = WebhookOutcome::default();

        for event in &parsed.inbound {
            match self.ingest_event(provider, event).await {
                Ok(IngestOutcome::Processed) => outcome.processed_inbound += 1,
                Ok(IngestOutcome::Skipped) => outcome.skipped += 1,
                Err(e) => {
                    self.write_log(provider, 500, Some(e.to_string())).await;
                    return Err(e);
                }
            }
        }

        let reconciler = StatusReconciler::new(self.ctx);
        for event in &parsed.statuses {
            match reconciler.apply(provider, event).await {
                Ok(true) => outcome.processed_statuses += 1,
                Ok(false) => outcome.skipped += 1,
                Err(e) => {
                    self.write_log(provider, 500, Some(e.to_string())).await;
                    return Err(e);
                }
            }
        }

        self.write_log(provider, 200, None).await;
        Ok(outcome)
    }

    /// HMAC verification over the raw request bytes
    ///
    /// Fails closed: a missing secret only passes outside production with
    /// the explicit `allow_unsigned` opt-in, and always logs a warning.
    fn verify_signature(
        &self,
        provider: ProviderKind,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> ServiceResult<()> {
        let config = self.ctx.webhooks().provider(provider);

        match (config.app_secret.as_deref(), signature_header) {
            (Some(secret), Some(header)) => {
                let implementation = self.ctx.providers().get(provider);
                if implementation.verify_signature(secret, raw_body, header) {
                    Ok(())
                } else {
                    Err(ServiceError::SignatureInvalid)
                }
            }
            (Some(_), None) => Err(ServiceError::SignatureMissing),
            (None, _) => {
                if self.ctx.webhooks().allow_unsigned
                    && !self.ctx.environment().is_production()
                {
                    warn!(
                        provider = %provider,
                        "accepting unsigned webhook: no app secret configured and \
                         allow_unsigned is set"
                    );
                    Ok(())
                } else {
                    Err(ServiceError::SignatureMissing)
                }
            }
        }
    }

    /// Steps 3-8 of the pipeline for one normalized inbound event
    pub async fn ingest_event(
        &self,
        provider: ProviderKind,
        event: &InboundEvent,
    ) -> ServiceResult<IngestOutcome> {
        // Channel resolution: unknown external ids are expected noise
        let Some(channel) = self
            .ctx
            .channel_repo()
            .find_active_by_external_id(provider, &event.channel_external_id)
            .await?
        else {
            info!(
                channel_external_id = %event.channel_external_id,
                "no active channel for event, skipping"
            );
            return Ok(IngestOutcome::Skipped);
        };

        // Empty content after sanitization is dropped
        let content = event.content.trim();
        if content.is_empty() {
            info!(channel = %channel.id, "inbound event with empty content, skipping");
            return Ok(IngestOutcome::Skipped);
        }

        // Dedup fast path; the unique index in the transaction below is the
        // authoritative guard against concurrent duplicates
        if let Some(external_id) = event.external_message_id.as_deref() {
            if self
                .ctx
                .message_repo()
                .find_by_external_id(channel.id, external_id)
                .await?
                .is_some()
            {
                info!(external_id, "duplicate webhook delivery, skipping");
                return Ok(IngestOutcome::Skipped);
            }
        }

        let contact = self.resolve_contact(provider, &channel, event).await?;
        let (conversation, new_conversation) =
            self.resolve_conversation(&channel, &contact, event).await?;

        // Single transaction: message + counters + notifications + analytics
        let message = Message::inbound(
            self.ctx.generate_id(),
            conversation.id,
            channel.id,
            content.to_string(),
            event.content_kind,
            event.external_message_id.clone(),
            event.occurred_at,
        );
        let preview = preview_of(content);
        let recipients = self.notification_recipients(&conversation).await?;
        let notifications: Vec<Notification> = recipients
            .iter()
            .map(|&user_id| {
                Notification::new_message(
                    self.ctx.generate_id(),
                    channel.organization_id,
                    user_id,
                    conversation.id,
                    message.id,
                )
            })
            .collect();

        let cmd = InboundPersistCommand {
            organization_id: channel.organization_id,
            conversation_id: conversation.id,
            preview: preview.clone(),
            occurred_at: event.occurred_at,
            notifications,
            analytics: AnalyticsEvent::message_received(
                self.ctx.generate_id(),
                channel.organization_id,
                conversation.id,
            ),
            message: message.clone(),
        };

        match self.ctx.ingestion_repo().persist_inbound(&cmd).await? {
            PersistOutcome::Inserted => {}
            PersistOutcome::Duplicate => {
                info!(
                    external_id = event.external_message_id.as_deref().unwrap_or(""),
                    "concurrent duplicate rejected by storage, skipping"
                );
                return Ok(IngestOutcome::Skipped);
            }
        }

        info!(
            conversation = %conversation.id,
            message = %message.id,
            new_conversation,
            "inbound message ingested"
        );

        // Post-commit, best-effort fan-out; each broadcast isolated
        self.fan_out(&channel, &contact, &conversation, &message, &preview, new_conversation, &recipients)
            .await;

        // AI handling must never delay or fail the webhook response
        let ctx = self.ctx.clone();
        let conversation_id = conversation.id;
        let trigger = content.to_string();
        tokio::spawn(async move {
            let ai = AiReplyService::new(&ctx);
            if let Err(e) = ai.handle_inbound(conversation_id, &trigger).await {
                info!(conversation = %conversation_id, error = %e, "background AI handling ended with error");
            }
        });

        Ok(IngestOutcome::Processed)
    }

    /// Find-or-create the contact; refresh the display name when it changed
    async fn resolve_contact(
        &self,
        provider: ProviderKind,
        channel: &Channel,
        event: &InboundEvent,
    ) -> ServiceResult<Contact> {
        let repo = self.ctx.contact_repo();
        let organization_id = channel.organization_id;

        if let Some(existing) = repo
            .find_by_provider_id(organization_id, provider, &event.contact_external_id)
            .await?
        {
            if existing.needs_name_refresh(event.contact_name.as_deref()) {
                let name = event.contact_name.as_deref().unwrap_or_default();
                repo.update_display_name(existing.id, name).await?;
            }
            return Ok(existing);
        }

        let contact = Contact::from_provider_id(
            self.ctx.generate_id(),
            organization_id,
            provider,
            event.contact_external_id.clone(),
            event.contact_name.clone(),
        );
        match repo.create(&contact).await {
            Ok(()) => Ok(contact),
            // A concurrent delivery may have created the contact first; the
            // identity unique index makes the lookup authoritative
            Err(create_err) => repo
                .find_by_provider_id(organization_id, provider, &event.contact_external_id)
                .await?
                .ok_or(ServiceError::Domain(create_err)),
        }
    }

    /// Conversation threading: exact external-thread-id match when the
    /// provider supplies one, otherwise the most-recently-updated thread for
    /// the (channel, contact) pair, otherwise a new conversation
    async fn resolve_conversation(
        &self,
        channel: &Channel,
        contact: &Contact,
        event: &InboundEvent,
    ) -> ServiceResult<(Conversation, bool)> {
        let repo = self.ctx.conversation_repo();

        let existing = match event.external_thread_id.as_deref() {
            Some(thread_id) => repo.find_by_external_thread(channel.id, thread_id).await?,
            None => repo.find_latest_for_pair(channel.id, contact.id).await?,
        };
        if let Some(conversation) = existing {
            return Ok((conversation, false));
        }

        let conversation = Conversation::new(
            self.ctx.generate_id(),
            channel.organization_id,
            channel.id,
            contact.id,
            event.external_thread_id.clone(),
        );
        repo.create(&conversation).await?;
        Ok((conversation, true))
    }

    /// Assignee when set, otherwise every notifiable member of the tenant
    async fn notification_recipients(
        &self,
        conversation: &Conversation,
    ) -> ServiceResult<Vec<Snowflake>> {
        if let Some(assignee) = conversation.assignee_id {
            return Ok(vec![assignee]);
        }
        Ok(self
            .ctx
            .member_repo()
            .find_notifiable(conversation.organization_id)
            .await?)
    }

    #[allow(clippy::too_many_arguments)]
    async fn fan_out(
        &self,
        channel: &Channel,
        contact: &Contact,
        conversation: &Conversation,
        message: &Message,
        preview: &str,
        new_conversation: bool,
        recipients: &[Snowflake],
    ) {
        let org = BusScope::Organization(channel.organization_id);

        self.publish(
            org,
            broadcast::NEW_MESSAGE,
            json!({
                "conversation_id": conversation.id,
                "message": {
                    "id": message.id,
                    "content": message.content,
                    "content_kind": message.content_kind.as_str(),
                    "direction": message.direction.as_str(),
                    "status": message.status.as_str(),
                    "created_at": message.created_at.to_rfc3339(),
                },
                "contact": {
                    "id": contact.id,
                    "display_name": contact.display_name,
                },
            }),
        )
        .await;

        self.publish(
            org,
            broadcast::UNREAD_UPDATE,
            json!({
                "conversation_id": conversation.id,
                "unread_count": conversation.unread_count + 1,
            }),
        )
        .await;

        self.publish(
            org,
            broadcast::CONVERSATION_UPDATE,
            json!({
                "conversation_id": conversation.id,
                "status": conversation.status.as_str(),
                "last_message_at": message.created_at.to_rfc3339(),
                "last_message_preview": preview,
            }),
        )
        .await;

        if new_conversation {
            self.publish(
                org,
                broadcast::NEW_CONVERSATION,
                json!({
                    "conversation": {
                        "id": conversation.id,
                        "channel_id": channel.id,
                        "contact_id": contact.id,
                        "status": conversation.status.as_str(),
                    },
                }),
            )
            .await;
        }

        for &user_id in recipients {
            self.publish(
                BusScope::User(user_id),
                broadcast::NOTIFICATION,
                json!({
                    "kind": Notification::NEW_MESSAGE,
                    "conversation_id": conversation.id,
                    "message_id": message.id,
                }),
            )
            .await;
        }
    }

    /// Publish one broadcast; failures are logged and isolated
    async fn publish(&self, scope: BusScope, event: &str, data: serde_json::Value) {
        if let Err(e) = self.ctx.event_bus().publish(scope, event, data).await {
            warn!(event, error = %e, "broadcast failed");
        }
    }

    /// Append the audit record; failures must not mask the pipeline outcome
    async fn write_log(&self, provider: ProviderKind, status_code: u16, error: Option<String>) {
        let log = match error {
            None => WebhookLog::success(self.ctx.generate_id(), provider),
            Some(detail) => {
                WebhookLog::failure(self.ctx.generate_id(), provider, status_code, detail)
            }
        };
        if let Err(e) = self.ctx.webhook_log_repo().record(&log).await {
            warn!(error = %e, "failed to write webhook log");
        }
    }
}
