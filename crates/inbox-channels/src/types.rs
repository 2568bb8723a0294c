//! Shared provider types

use inbox_core::{Channel, MessageStatus, ProviderKind};
use serde::Deserialize;

use crate::error::ProviderError;

/// Normalized result of a provider send call
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub status: MessageStatus,
    /// Provider-assigned message id, when the vendor returns one
    pub external_message_id: Option<String>,
    /// Raw vendor response for diagnostics
    pub raw_response: Option<serde_json::Value>,
}

impl SendOutcome {
    /// The common case: the vendor accepted the message and returned an id
    pub fn sent(external_message_id: Option<String>, raw: Option<serde_json::Value>) -> Self {
        Self {
            status: MessageStatus::Sent,
            external_message_id,
            raw_response: raw,
        }
    }
}

/// Credential blob stored on a channel, parsed at the provider boundary
///
/// The blob is managed (and encrypted at rest) by the channel CRUD surface;
/// this pipeline only ever reads it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelCredentials {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Page id for Messenger-family channels
    #[serde(default)]
    pub page_id: Option<String>,
}

impl ChannelCredentials {
    /// Parse the credential blob of a channel
    pub fn parse(channel: &Channel) -> Result<Self, ProviderError> {
        let raw = channel
            .credentials
            .as_deref()
            .ok_or(ProviderError::MissingCredentials(channel.provider))?;
        serde_json::from_str(raw)
            .map_err(|_| ProviderError::MissingCredentials(channel.provider))
    }

    /// Access token, required by every vendor call
    pub fn require_token(&self, provider: ProviderKind) -> Result<&str, ProviderError> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::MissingCredentials(provider))
    }
}

/// Result of an OAuth-style code exchange
#[derive(Debug, Clone)]
pub struct ConnectedAccount {
    /// Provider-side account id (page id, IG account id)
    pub external_id: String,
    pub display_name: Option<String>,
    /// Long-lived token to store in the channel credential blob
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_core::Snowflake;

    fn channel_with(credentials: Option<&str>) -> Channel {
        let mut channel = Channel::new(
            Snowflake::new(1),
            Snowflake::new(2),
            ProviderKind::Messenger,
            Some("page-1".to_string()),
        );
        channel.credentials = credentials.map(String::from);
        channel
    }

    #[test]
    fn test_parse_credentials() {
        let channel = channel_with(Some(r#"{"access_token":"tok","page_id":"page-1"}"#));
        let creds = ChannelCredentials::parse(&channel).unwrap();
        assert_eq!(creds.require_token(ProviderKind::Messenger).unwrap(), "tok");
        assert_eq!(creds.page_id.as_deref(), Some("page-1"));
    }

    #[test]
    fn test_missing_credentials() {
        let channel = channel_with(None);
        assert!(matches!(
            ChannelCredentials::parse(&channel),
            Err(ProviderError::MissingCredentials(ProviderKind::Messenger))
        ));

        let channel = channel_with(Some("{}"));
        let creds = ChannelCredentials::parse(&channel).unwrap();
        assert!(creds.require_token(ProviderKind::Messenger).is_err());
    }
}
