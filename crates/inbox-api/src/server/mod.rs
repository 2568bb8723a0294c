//! Server setup and initialization
//!
//! Wires the Postgres repositories, Redis publisher, provider registry, and
//! AI collaborators into the service context, then runs the Axum server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use inbox_ai::{HttpAutomationClient, OpenAiClient};
use inbox_cache::{Publisher, RedisPool};
use inbox_channels::ProviderRegistry;
use inbox_common::{AppConfig, AppError};
use inbox_core::SnowflakeGenerator;
use inbox_db::{
    create_pool, DatabaseConfig, PgAiSettingsRepository, PgChannelRepository,
    PgContactRepository, PgConversationRepository, PgIngestionRepository, PgMemberRepository,
    PgMessageRepository, PgTrainingDocRepository, PgWebhookLogRepository,
};
use inbox_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config().clone();
    let router = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    // health probes bypass the rate limiter
    let router = router.merge(health_routes());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Database pool
    info!("Connecting to PostgreSQL...");
    let db_config = DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Redis pool + publisher (the fan-out bus)
    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    let publisher = Publisher::new(redis_pool.clone());
    info!("Redis connection established");

    // Provider registry, built once (closed over the provider enum)
    let registry = ProviderRegistry::from_config(&config.providers);

    // AI collaborators share one bounded-timeout HTTP client
    let ai_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.ai.timeout_secs))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build AI HTTP client: {e}")))?;
    let llm = OpenAiClient::new(
        ai_http.clone(),
        config.ai.api_key.clone(),
        config.ai.base_url.clone(),
    );
    let automation = HttpAutomationClient::new(ai_http);

    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .channel_repo(Arc::new(PgChannelRepository::new(pool.clone())))
        .contact_repo(Arc::new(PgContactRepository::new(pool.clone())))
        .conversation_repo(Arc::new(PgConversationRepository::new(pool.clone())))
        .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
        .ingestion_repo(Arc::new(PgIngestionRepository::new(pool.clone())))
        .webhook_log_repo(Arc::new(PgWebhookLogRepository::new(pool.clone())))
        .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
        .training_repo(Arc::new(PgTrainingDocRepository::new(pool.clone())))
        .ai_settings_repo(Arc::new(PgAiSettingsRepository::new(pool.clone())))
        .event_bus(Arc::new(publisher))
        .providers(Arc::new(registry))
        .llm(Arc::new(llm))
        .automation(Arc::new(automation))
        .snowflake_generator(snowflake_generator)
        .webhooks(config.webhooks.clone())
        .ai(config.ai.clone())
        .environment(config.app.env)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool, redis_pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
