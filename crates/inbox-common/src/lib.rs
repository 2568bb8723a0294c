//! # inbox-common
//!
//! Shared utilities: configuration loading, application errors, tracing
//! setup, and webhook signature primitives.

pub mod config;
pub mod error;
pub mod signature;
pub mod telemetry;

pub use config::{
    AiConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    ProviderWebhookConfig, ProvidersConfig, RateLimitConfig, RedisConfig, ServerConfig,
    SnowflakeConfig, WebhookConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
