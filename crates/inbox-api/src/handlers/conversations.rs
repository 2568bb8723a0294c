//! Conversation handlers
//!
//! The agent send path and the manual AI triggers.

use axum::{
    extract::{Path, State},
    Json,
};

use inbox_service::{
    AiReplyRequest, AiReplyResponse, AiReplyService, MessageResponse, OutboundDispatcher,
    SendMessageRequest, SuggestionResponse,
};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

use super::parse_id;

/// Agent outbound send
///
/// POST /conversations/{conversation_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let conversation_id = parse_id(&conversation_id, "conversation_id")?;

    let response = OutboundDispatcher::new(state.service_context())
        .send_agent_message(conversation_id, &request.content)
        .await?;
    Ok(Json(response))
}

/// Manual AI reply trigger
///
/// POST /conversations/{conversation_id}/ai-reply
pub async fn trigger_ai_reply(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    payload: Option<Json<AiReplyRequest>>,
) -> ApiResult<Json<AiReplyResponse>> {
    let conversation_id = parse_id(&conversation_id, "conversation_id")?;
    let force = payload.map(|Json(request)| request.force).unwrap_or(false);

    let response = AiReplyService::new(state.service_context())
        .trigger_manual(conversation_id, force)
        .await?;
    Ok(Json(response))
}

/// Manual AI suggestion
///
/// POST /conversations/{conversation_id}/ai-suggest
pub async fn suggest_ai_reply(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    payload: Option<Json<AiReplyRequest>>,
) -> ApiResult<Json<SuggestionResponse>> {
    let conversation_id = parse_id(&conversation_id, "conversation_id")?;
    let force = payload.map(|Json(request)| request.force).unwrap_or(false);

    let response = AiReplyService::new(state.service_context())
        .suggest(conversation_id, force)
        .await?;
    Ok(Json(response))
}
