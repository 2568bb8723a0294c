//! Application configuration structs
//!
//! Loads configuration from environment variables and config files.

use inbox_core::ProviderKind;
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub webhooks: WebhookConfig,
    pub providers: ProvidersConfig,
    pub ai: AiConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Per-provider webhook verification settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderWebhookConfig {
    /// Token echoed back during GET challenge verification
    pub verify_token: Option<String>,
    /// Tenant-agnostic HMAC signing secret for this provider family
    pub app_secret: Option<String>,
}

/// Webhook verification configuration
///
/// Verification fails closed: `allow_unsigned` must be explicitly set (and
/// the environment must not be production) before an unsigned delivery is
/// accepted, and only for providers with no secret configured.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub allow_unsigned: bool,
    #[serde(default)]
    pub whatsapp: ProviderWebhookConfig,
    #[serde(default)]
    pub messenger: ProviderWebhookConfig,
    #[serde(default)]
    pub instagram: ProviderWebhookConfig,
}

impl WebhookConfig {
    /// Settings for one provider family
    #[must_use]
    pub fn provider(&self, kind: ProviderKind) -> &ProviderWebhookConfig {
        match kind {
            ProviderKind::WhatsApp => &self.whatsapp,
            ProviderKind::Messenger => &self.messenger,
            ProviderKind::Instagram => &self.instagram,
        }
    }
}

/// Vendor API configuration shared by the Meta-family providers
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
    /// Meta app id, needed for the OAuth-style connect flow
    pub app_id: Option<String>,
    /// Meta app secret, needed for the OAuth code exchange
    pub app_secret: Option<String>,
    #[serde(default = "default_external_timeout_secs")]
    pub timeout_secs: u64,
}

/// AI reply configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// LLM API key; absence surfaces as an error at generation time
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub default_model: String,
    /// Global default automation webhook URL (tenant settings override)
    pub automation_url: Option<String>,
    /// Shared secret expected on automation callbacks
    pub automation_callback_secret: Option<String>,
    /// Public base URL of this service, used to build callback URLs
    pub public_base_url: Option<String>,
    #[serde(default = "default_external_timeout_secs")]
    pub timeout_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "inbox".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_external_timeout_secs() -> u64 {
    15
}

fn default_requests_per_second() -> u32 {
    25
}

fn default_burst() -> u32 {
    100
}

fn opt_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parsed_var("API_PORT").ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parsed_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(default_max_connections),
                min_connections: parsed_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(default_min_connections),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL"))?,
                max_connections: parsed_var("REDIS_MAX_CONNECTIONS")
                    .unwrap_or_else(default_redis_max_connections),
            },
            webhooks: WebhookConfig {
                allow_unsigned: parsed_var("WEBHOOK_ALLOW_UNSIGNED").unwrap_or(false),
                whatsapp: ProviderWebhookConfig {
                    verify_token: opt_var("WHATSAPP_VERIFY_TOKEN"),
                    app_secret: opt_var("WHATSAPP_APP_SECRET"),
                },
                messenger: ProviderWebhookConfig {
                    verify_token: opt_var("MESSENGER_VERIFY_TOKEN"),
                    app_secret: opt_var("MESSENGER_APP_SECRET"),
                },
                instagram: ProviderWebhookConfig {
                    verify_token: opt_var("INSTAGRAM_VERIFY_TOKEN"),
                    app_secret: opt_var("INSTAGRAM_APP_SECRET"),
                },
            },
            providers: ProvidersConfig {
                graph_base_url: env::var("GRAPH_BASE_URL")
                    .unwrap_or_else(|_| default_graph_base_url()),
                app_id: opt_var("META_APP_ID"),
                app_secret: opt_var("META_APP_SECRET"),
                timeout_secs: parsed_var("PROVIDER_TIMEOUT_SECS")
                    .unwrap_or_else(default_external_timeout_secs),
            },
            ai: AiConfig {
                api_key: opt_var("LLM_API_KEY"),
                base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| default_llm_base_url()),
                default_model: env::var("LLM_MODEL").unwrap_or_else(|_| default_llm_model()),
                automation_url: opt_var("AUTOMATION_WEBHOOK_URL"),
                automation_callback_secret: opt_var("AUTOMATION_CALLBACK_SECRET"),
                public_base_url: opt_var("PUBLIC_BASE_URL"),
                timeout_secs: parsed_var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(default_external_timeout_secs),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parsed_var("RATE_LIMIT_REQUESTS_PER_SECOND")
                    .unwrap_or_else(default_requests_per_second),
                burst: parsed_var("RATE_LIMIT_BURST").unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: parsed_var("WORKER_ID").unwrap_or(0),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_webhook_provider_lookup() {
        let config = WebhookConfig {
            allow_unsigned: false,
            whatsapp: ProviderWebhookConfig {
                verify_token: Some("wa-token".to_string()),
                app_secret: None,
            },
            messenger: ProviderWebhookConfig::default(),
            instagram: ProviderWebhookConfig::default(),
        };
        assert_eq!(
            config.provider(ProviderKind::WhatsApp).verify_token.as_deref(),
            Some("wa-token")
        );
        assert!(config.provider(ProviderKind::Messenger).verify_token.is_none());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "inbox");
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_max_connections(), 20);
        assert_eq!(default_external_timeout_secs(), 15);
        assert!(default_llm_base_url().starts_with("https://"));
    }
}
