//! AI reply orchestrator
//!
//! Builds per-conversation context, selects a strategy from the tenant's AI
//! mode (suggest-only, auto-reply via automation delegation, or direct
//! completion fallback), and dispatches through the shared outbound path.
//! Whatever fails, `is_ai_handling` is cleared and an `ai_error` event is
//! broadcast so the UI never shows a stuck processing state.

use inbox_ai::{ChatTurn, CompletionRequest, DelegationRequest};
use inbox_core::events::broadcast;
use inbox_core::{
    AiMode, AiSettings, BusScope, Conversation, DomainError, SenderKind, Snowflake,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::dto::{AiReplyResponse, AutomationCallbackRequest, MessageResponse, SuggestionResponse};

use super::context::ServiceContext;
use super::dispatch::OutboundDispatcher;
use super::error::{ServiceError, ServiceResult};

const MAX_TRAINING_DOCS: i64 = 8;
const DOC_CHAR_CAP: usize = 2_500;
const TRAINING_JOINED_CAP: usize = 14_000;
const HISTORY_LIMIT: i64 = 20;
const HISTORY_CHAR_CAP: usize = 2_000;
const FALLBACK_GREETING: &str = "Hello! How can I help you today?";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful customer support assistant. Answer using the conversation \
     history and the provided knowledge base. Be concise and polite.";

/// Assembled, length-capped generation context
struct AssembledContext {
    training: String,
    history: Vec<ChatTurn>,
    latest: String,
    contact_name: Option<String>,
}

/// AI reply orchestrator
pub struct AiReplyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AiReplyService<'a> {
    /// Create a new AiReplyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Automatic trigger from a freshly ingested inbound message
    ///
    /// Precondition failures are a silent no-op here; generation failures
    /// in SUGGESTION mode are logged only.
    #[instrument(skip(self, trigger))]
    pub async fn handle_inbound(
        &self,
        conversation_id: Snowflake,
        trigger: &str,
    ) -> ServiceResult<()> {
        let (conversation, settings) = match self.preconditions(conversation_id, false).await {
            Ok(pair) => pair,
            Err(ServiceError::Domain(
                DomainError::AiDisabledForConversation | DomainError::AiDisabledForOrganization,
            )) => return Ok(()),
            Err(e) => return Err(e),
        };

        match settings.mode {
            AiMode::Off => Ok(()),
            AiMode::Suggestion => {
                if let Err(e) = self
                    .generate_suggestion(&conversation, &settings, Some(trigger))
                    .await
                {
                    // suggestion failures never surface as conversation errors
                    info!(conversation = %conversation.id, error = %e, "suggestion generation failed");
                }
                Ok(())
            }
            AiMode::AutoReply => self
                .auto_reply(&conversation, &settings, Some(trigger))
                .await
                .map(|_| ()),
        }
    }

    /// Explicit manual trigger; `force` bypasses the enabled checks
    #[instrument(skip(self))]
    pub async fn trigger_manual(
        &self,
        conversation_id: Snowflake,
        force: bool,
    ) -> ServiceResult<AiReplyResponse> {
        let (conversation, settings) = self.preconditions(conversation_id, force).await?;
        match self.auto_reply(&conversation, &settings, None).await? {
            Some(message) => Ok(AiReplyResponse::replied(message)),
            None => Ok(AiReplyResponse::delegated()),
        }
    }

    /// Manual suggestion generation
    #[instrument(skip(self))]
    pub async fn suggest(
        &self,
        conversation_id: Snowflake,
        force: bool,
    ) -> ServiceResult<SuggestionResponse> {
        let (conversation, settings) = self.preconditions(conversation_id, force).await?;
        self.generate_suggestion(&conversation, &settings, None).await
    }

    /// Re-entry point for the automation callback: validate the payload and
    /// perform the same dispatch as the direct path. Internal failures end
    /// in the `ai_error` broadcast path, not in HTTP errors.
    #[instrument(skip(self, request))]
    pub async fn complete_from_callback(
        &self,
        request: &AutomationCallbackRequest,
    ) -> ServiceResult<()> {
        let (Some(org_raw), Some(convo_raw)) = (
            request.organization_id.as_deref(),
            request.conversation_id.as_deref(),
        ) else {
            return Err(ServiceError::validation(
                "organizationId and conversationId are required",
            ));
        };
        let organization_id = Snowflake::parse(org_raw)
            .map_err(|_| ServiceError::validation("invalid organizationId"))?;
        let conversation_id = Snowflake::parse(convo_raw)
            .map_err(|_| ServiceError::validation("invalid conversationId"))?;

        let conversation = self.require_conversation(conversation_id).await?;
        if conversation.organization_id != organization_id {
            return Err(ServiceError::validation(
                "conversation does not belong to organization",
            ));
        }

        // Explicit error from the automation system, or a missing response:
        // clear the processing state and tell the UI
        let response_text = request
            .ai_response
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let text = match (request.error.as_deref(), response_text) {
            (None, Some(text)) => text,
            (error, _) => {
                let error = error.unwrap_or("automation returned an empty response");
                warn!(conversation = %conversation.id, error, "automation callback reported failure");
                self.fail_ai_handling(&conversation, error).await;
                return Ok(());
            }
        };

        let dispatched = OutboundDispatcher::new(self.ctx)
            .dispatch(&conversation, SenderKind::Ai, text, request.confidence)
            .await;
        match dispatched {
            Ok(message) => {
                self.publish(
                    BusScope::Organization(conversation.organization_id),
                    broadcast::AI_REPLY,
                    json!({
                        "conversation_id": conversation.id,
                        "message_id": message.id,
                        "model": request.model,
                        "tokens_used": request.tokens_used,
                    }),
                )
                .await;
                Ok(())
            }
            Err(e) => {
                self.fail_ai_handling(&conversation, &e.to_string()).await;
                Err(e)
            }
        }
    }

    // ========================================================================
    // Strategy execution
    // ========================================================================

    /// AUTO_REPLY strategy: mark handling, try delegation, fall back to a
    /// direct completion. Returns `None` when delegation was accepted.
    async fn auto_reply(
        &self,
        conversation: &Conversation,
        settings: &AiSettings,
        trigger: Option<&str>,
    ) -> ServiceResult<Option<MessageResponse>> {
        self.ctx
            .conversation_repo()
            .set_ai_handling(conversation.id, true)
            .await?;
        self.publish(
            BusScope::Organization(conversation.organization_id),
            broadcast::AI_PROCESSING,
            json!({"conversation_id": conversation.id}),
        )
        .await;

        match self.delegate_or_complete(conversation, settings, trigger).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.fail_ai_handling(conversation, &e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn delegate_or_complete(
        &self,
        conversation: &Conversation,
        settings: &AiSettings,
        trigger: Option<&str>,
    ) -> ServiceResult<Option<MessageResponse>> {
        let assembled = self.assemble_context(conversation, trigger).await?;

        // Tenant automation URL first, then the global default
        let automation_url = settings
            .automation_url
            .clone()
            .or_else(|| self.ctx.ai().automation_url.clone());
        if let Some(url) = automation_url {
            match self.try_delegate(conversation, &assembled, &url).await {
                Ok(()) => {
                    info!(conversation = %conversation.id, "reply delegated to automation webhook");
                    return Ok(None);
                }
                Err(e) => {
                    warn!(
                        conversation = %conversation.id,
                        error = %e,
                        "automation delegation failed, falling back to direct completion"
                    );
                }
            }
        }

        let completion = self
            .ctx
            .llm()
            .complete(&self.completion_request(settings, &assembled))
            .await?;

        let message = OutboundDispatcher::new(self.ctx)
            .dispatch(
                conversation,
                SenderKind::Ai,
                &completion.text,
                completion.confidence,
            )
            .await?;

        self.publish(
            BusScope::Organization(conversation.organization_id),
            broadcast::AI_REPLY,
            json!({
                "conversation_id": conversation.id,
                "message_id": message.id,
                "model": completion.model,
                "tokens_used": completion.tokens_used,
            }),
        )
        .await;

        Ok(Some(MessageResponse::from(message)))
    }

    async fn try_delegate(
        &self,
        conversation: &Conversation,
        assembled: &AssembledContext,
        url: &str,
    ) -> ServiceResult<()> {
        let callback_url = self
            .ctx
            .ai()
            .public_base_url
            .as_deref()
            .map(|base| format!("{}/webhooks/automation/callback", base.trim_end_matches('/')))
            .ok_or_else(|| {
                ServiceError::validation("automation delegation needs PUBLIC_BASE_URL for callbacks")
            })?;

        let request = DelegationRequest {
            organization_id: conversation.organization_id,
            conversation_id: conversation.id,
            message: assembled.latest.clone(),
            contact_name: assembled.contact_name.clone(),
            history: assembled.history.clone(),
            callback_url,
        };
        self.ctx.automation().delegate(url, &request).await?;
        Ok(())
    }

    /// SUGGESTION strategy: generate and broadcast, never auto-send
    async fn generate_suggestion(
        &self,
        conversation: &Conversation,
        settings: &AiSettings,
        trigger: Option<&str>,
    ) -> ServiceResult<SuggestionResponse> {
        let assembled = self.assemble_context(conversation, trigger).await?;
        let completion = self
            .ctx
            .llm()
            .complete(&self.completion_request(settings, &assembled))
            .await?;

        self.publish(
            BusScope::Organization(conversation.organization_id),
            broadcast::AI_SUGGESTION,
            json!({
                "conversation_id": conversation.id,
                "suggestion": completion.text,
                "confidence": completion.confidence,
            }),
        )
        .await;

        Ok(SuggestionResponse {
            suggestion: completion.text,
            confidence: completion.confidence,
            tokens_used: completion.tokens_used,
            model: completion.model,
        })
    }

    // ========================================================================
    // Context assembly
    // ========================================================================

    async fn assemble_context(
        &self,
        conversation: &Conversation,
        trigger: Option<&str>,
    ) -> ServiceResult<AssembledContext> {
        let docs = self
            .ctx
            .training_repo()
            .find_recent_active(conversation.organization_id, MAX_TRAINING_DOCS)
            .await?;
        let mut training = String::new();
        for doc in docs {
            let capped: String = doc.content.chars().take(DOC_CHAR_CAP).collect();
            let block = format!("## {}\n{}\n\n", doc.title, capped);
            if training.chars().count() + block.chars().count() > TRAINING_JOINED_CAP {
                break;
            }
            training.push_str(&block);
        }

        let messages = self
            .ctx
            .message_repo()
            .find_recent(conversation.id, HISTORY_LIMIT)
            .await?;
        let history: Vec<ChatTurn> = messages
            .iter()
            .map(|m| {
                let content: String = m.content.chars().take(HISTORY_CHAR_CAP).collect();
                if m.sender == SenderKind::Contact {
                    ChatTurn::user(content)
                } else {
                    ChatTurn::assistant(content)
                }
            })
            .collect();

        // The triggering message, else the latest user turn, else a greeting
        let latest = trigger
            .map(str::to_string)
            .or_else(|| {
                history
                    .iter()
                    .rev()
                    .find(|turn| turn.role == "user")
                    .map(|turn| turn.content.clone())
            })
            .unwrap_or_else(|| FALLBACK_GREETING.to_string());

        let contact_name = self
            .ctx
            .contact_repo()
            .find_by_id(conversation.contact_id)
            .await?
            .and_then(|c| c.display_name);

        Ok(AssembledContext {
            training,
            history,
            latest,
            contact_name,
        })
    }

    fn completion_request(
        &self,
        settings: &AiSettings,
        assembled: &AssembledContext,
    ) -> CompletionRequest {
        let model = if settings.model.is_empty() {
            self.ctx.ai().default_model.clone()
        } else {
            settings.model.clone()
        };
        CompletionRequest {
            model,
            system_prompt: settings
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            training_context: assembled.training.clone(),
            history: assembled.history.clone(),
            latest_message: assembled.latest.clone(),
        }
    }

    // ========================================================================
    // Preconditions and failure handling
    // ========================================================================

    async fn preconditions(
        &self,
        conversation_id: Snowflake,
        force: bool,
    ) -> ServiceResult<(Conversation, AiSettings)> {
        let conversation = self.require_conversation(conversation_id).await?;
        let settings = self
            .ctx
            .ai_settings_repo()
            .find(conversation.organization_id)
            .await?
            .unwrap_or_else(|| self.disabled_settings(conversation.organization_id));

        if !force {
            if !conversation.ai_enabled {
                return Err(DomainError::AiDisabledForConversation.into());
            }
            if !settings.allows_generation() {
                return Err(DomainError::AiDisabledForOrganization.into());
            }
        }

        Ok((conversation, settings))
    }

    /// Settings used when the tenant never configured AI; generation only
    /// happens through these under an explicit `force`
    fn disabled_settings(&self, organization_id: Snowflake) -> AiSettings {
        AiSettings {
            organization_id,
            enabled: false,
            mode: AiMode::Off,
            model: self.ctx.ai().default_model.clone(),
            temperature: 0.7,
            max_tokens: 500,
            system_prompt: None,
            automation_url: None,
        }
    }

    async fn require_conversation(&self, id: Snowflake) -> ServiceResult<Conversation> {
        self.ctx
            .conversation_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", id))
    }

    /// Terminal failure path: clear the handling flag and tell the UI
    async fn fail_ai_handling(&self, conversation: &Conversation, error: &str) {
        if let Err(e) = self
            .ctx
            .conversation_repo()
            .set_ai_handling(conversation.id, false)
            .await
        {
            warn!(conversation = %conversation.id, error = %e, "failed to clear AI-handling flag");
        }
        self.publish(
            BusScope::Organization(conversation.organization_id),
            broadcast::AI_ERROR,
            json!({
                "conversation_id": conversation.id,
                "error": error,
            }),
        )
        .await;
    }

    async fn publish(&self, scope: BusScope, event: &str, data: serde_json::Value) {
        if let Err(e) = self.ctx.event_bus().publish(scope, event, data).await {
            warn!(event, error = %e, "broadcast failed");
        }
    }
}
