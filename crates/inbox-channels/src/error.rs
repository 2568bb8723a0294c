//! Provider errors

use inbox_core::ProviderKind;
use thiserror::Error;

/// Typed errors raised by provider operations
///
/// Vendor API failures always carry the provider's response body so send
/// failures can be diagnosed from the stored failure reason.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API error (status {status}): {body}")]
    Api {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("channel has no {0} credentials configured")]
    MissingCredentials(ProviderKind),

    #[error("channel is not connected: missing {0} account id")]
    NotConnected(ProviderKind),

    #[error("contact has no {0} recipient id")]
    MissingRecipient(ProviderKind),

    #[error("{0} does not support this operation")]
    Unsupported(ProviderKind),

    #[error("{provider} connect flow is not configured: {detail}")]
    OauthNotConfigured {
        provider: ProviderKind,
        detail: &'static str,
    },

    #[error("unexpected {provider} response: {detail}")]
    UnexpectedResponse {
        provider: ProviderKind,
        detail: String,
    },
}

impl ProviderError {
    /// Whether the failure is a configuration problem on our side rather
    /// than a vendor-side fault
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials(_)
                | Self::NotConnected(_)
                | Self::MissingRecipient(_)
                | Self::Unsupported(_)
                | Self::OauthNotConfigured { .. }
        )
    }
}
