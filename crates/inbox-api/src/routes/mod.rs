//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{channels, conversations, health, webhooks};
use crate::state::AppState;

/// Create the main router (health routes are mounted separately so probes
/// bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/webhooks", webhook_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Webhook routes: one GET/POST pair per provider family plus the
/// automation callback (static segment wins over the provider parameter)
fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/automation/callback", post(webhooks::automation_callback))
        .route(
            "/:provider",
            get(webhooks::verify_webhook).post(webhooks::receive_webhook),
        )
}

/// Internal API routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Conversations
        .route(
            "/conversations/:conversation_id/messages",
            post(conversations::send_message),
        )
        .route(
            "/conversations/:conversation_id/ai-reply",
            post(conversations::trigger_ai_reply),
        )
        .route(
            "/conversations/:conversation_id/ai-suggest",
            post(conversations::suggest_ai_reply),
        )
        // Channel connection surface
        .route("/channels/:channel_id/test", post(channels::test_connection))
        .route("/channels/:channel_id/connect-url", get(channels::connect_url))
        .route("/channels/:channel_id/exchange", post(channels::exchange_code))
}
