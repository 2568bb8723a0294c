//! Webhook handlers
//!
//! One GET/POST pair per provider family plus the automation callback. The
//! POST handler consumes the raw body bytes so the HMAC covers exactly what
//! the provider signed.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;

use inbox_common::signature::constant_time_eq;
use inbox_service::{
    AiReplyService, AutomationCallbackRequest, WebhookIngestService, WebhookOutcome,
};

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

use super::parse_provider;

/// Shared-secret header on automation callbacks
const CALLBACK_SECRET_HEADER: &str = "x-automation-secret";

/// Challenge verification
///
/// GET /webhooks/{provider}
///
/// Echoes `hub.challenge` only when `hub.mode` is "subscribe" and the
/// verify token matches the provider's configured secret.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<String> {
    let provider = parse_provider(&provider)?;

    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge");

    let expected = state
        .config()
        .webhooks
        .provider(provider)
        .verify_token
        .as_deref();

    match (mode, token, challenge, expected) {
        (Some("subscribe"), Some(token), Some(challenge), Some(expected))
            if constant_time_eq(token.as_bytes(), expected.as_bytes()) =>
        {
            Ok(challenge.clone())
        }
        _ => Err(ApiError::VerificationFailed),
    }
}

/// Event delivery
///
/// POST /webhooks/{provider}
pub async fn receive_webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookOutcome>> {
    let provider = parse_provider(&provider)?;

    let signature = headers
        .get("x-hub-signature-256")
        .or_else(|| headers.get("x-hub-signature"))
        .and_then(|value| value.to_str().ok());

    let outcome = WebhookIngestService::new(state.service_context())
        .process_webhook(provider, &body, signature)
        .await?;

    Ok(Json(outcome))
}

/// Automation callback
///
/// POST /webhooks/automation/callback
///
/// Responds 200 once internal processing has been attempted; processing
/// failures end in the `ai_error` broadcast path, not in HTTP errors. The
/// optional shared secret is compared in constant time before anything runs.
pub async fn automation_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AutomationCallbackRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if let Some(secret) = state.config().ai.automation_callback_secret.as_deref() {
        let provided = headers
            .get(CALLBACK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if !constant_time_eq(provided.as_bytes(), secret.as_bytes()) {
            return Err(ApiError::VerificationFailed);
        }
    }

    if let Err(e) = AiReplyService::new(state.service_context())
        .complete_from_callback(&request)
        .await
    {
        warn!(error = %e, "automation callback processing failed");
    }

    Ok(Json(json!({"received": true})))
}
