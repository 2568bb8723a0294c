//! Closed provider registry
//!
//! One parser and one vendor client per provider family, resolved by the
//! provider enum. Built once at startup so no string-based dispatch leaks
//! into the rest of the codebase.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use inbox_common::ProvidersConfig;
use inbox_core::{ParsedWebhook, ProviderKind};

use crate::parsers;
use crate::provider::ChannelProvider;
use crate::providers::{InstagramProvider, MessengerProvider, WhatsAppProvider};

/// Registry mapping every [`ProviderKind`] to its implementation
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn ChannelProvider>>,
}

impl ProviderRegistry {
    /// Build the registry with one shared bounded-timeout HTTP client
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be constructed (startup-time only).
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build provider HTTP client");

        let mut providers: HashMap<ProviderKind, Arc<dyn ChannelProvider>> = HashMap::new();
        providers.insert(
            ProviderKind::WhatsApp,
            Arc::new(WhatsAppProvider::new(http.clone(), config.graph_base_url.clone())),
        );
        providers.insert(
            ProviderKind::Messenger,
            Arc::new(MessengerProvider::new(
                http.clone(),
                config.graph_base_url.clone(),
                config.app_id.clone(),
                config.app_secret.clone(),
            )),
        );
        providers.insert(
            ProviderKind::Instagram,
            Arc::new(InstagramProvider::new(
                http,
                config.graph_base_url.clone(),
                config.app_id.clone(),
                config.app_secret.clone(),
            )),
        );

        Self { providers }
    }

    /// Build a registry from explicit implementations (test doubles included)
    #[must_use]
    pub fn with_providers(providers: Vec<Arc<dyn ChannelProvider>>) -> Self {
        Self {
            providers: providers.into_iter().map(|p| (p.kind(), p)).collect(),
        }
    }

    /// Resolve the provider implementation for a kind
    ///
    /// The registry is closed over [`ProviderKind`], so resolution cannot
    /// fail after construction.
    #[must_use]
    pub fn get(&self, kind: ProviderKind) -> Arc<dyn ChannelProvider> {
        self.providers
            .get(&kind)
            .cloned()
            .expect("registry is closed over ProviderKind")
    }

    /// Run the pure parser for a provider family
    #[must_use]
    pub fn parse(&self, kind: ProviderKind, payload: &serde_json::Value) -> ParsedWebhook {
        parsers::parse_webhook(kind, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProvidersConfig {
        ProvidersConfig {
            graph_base_url: "https://graph.test/v19.0".to_string(),
            app_id: Some("app".to_string()),
            app_secret: Some("secret".to_string()),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_registry_is_closed_over_all_kinds() {
        let registry = ProviderRegistry::from_config(&config());
        for kind in ProviderKind::ALL {
            assert_eq!(registry.get(kind).kind(), kind);
        }
    }

    #[test]
    fn test_parse_dispatch() {
        let registry = ProviderRegistry::from_config(&config());
        let empty = serde_json::json!({});
        for kind in ProviderKind::ALL {
            assert!(registry.parse(kind, &empty).is_empty());
        }
    }
}
