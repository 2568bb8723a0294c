//! Configuration loading

pub mod app_config;

pub use app_config::{
    AiConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    ProviderWebhookConfig, ProvidersConfig, RateLimitConfig, RedisConfig, ServerConfig,
    SnowflakeConfig, WebhookConfig,
};
