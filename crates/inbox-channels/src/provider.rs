//! The uniform provider interface

use async_trait::async_trait;
use inbox_core::{Channel, Contact, ProviderKind};

use crate::error::ProviderError;
use crate::types::{ConnectedAccount, SendOutcome};

/// Uniform interface implemented once per messaging vendor
///
/// `send_message` resolves the contact's provider-specific recipient id and
/// returns a normalized outcome; any non-2xx or transport failure raises a
/// typed error carrying the vendor response body, never a raw exception.
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// Which provider family this implementation serves
    fn kind(&self) -> ProviderKind;

    /// Whether the vendor offers a programmatic send API
    ///
    /// Providers without one have their outbound messages marked SENT with
    /// no external call.
    fn supports_send(&self) -> bool {
        true
    }

    /// Send a text message to the contact through this channel
    async fn send_message(
        &self,
        channel: &Channel,
        contact: &Contact,
        content: &str,
    ) -> Result<SendOutcome, ProviderError>;

    /// Verify the channel's credentials against the vendor API
    async fn test_connection(&self, channel: &Channel) -> Result<(), ProviderError>;

    /// Verify a webhook signature over the exact raw request bytes
    ///
    /// Shared default: constant-time HMAC compare of the
    /// `X-Hub-Signature(-256)` header.
    fn verify_signature(&self, secret: &str, payload: &[u8], header: &str) -> bool {
        inbox_common::signature::verify_hub_signature(secret, payload, header)
    }

    /// Build the OAuth-style consent URL, for providers with a connect flow
    fn connect_url(&self, _redirect_uri: &str, _state: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unsupported(self.kind()))
    }

    /// Exchange an OAuth code for a connected account
    async fn exchange_code(
        &self,
        _code: &str,
        _redirect_uri: &str,
    ) -> Result<ConnectedAccount, ProviderError> {
        Err(ProviderError::Unsupported(self.kind()))
    }
}
