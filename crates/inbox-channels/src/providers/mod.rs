//! Vendor API client implementations, one per provider family

pub mod instagram;
pub mod messenger;
pub mod whatsapp;

pub use instagram::InstagramProvider;
pub use messenger::MessengerProvider;
pub use whatsapp::WhatsAppProvider;

use inbox_core::ProviderKind;

use crate::error::ProviderError;

/// Check a vendor response: non-2xx becomes a typed error carrying the
/// response body; a 2xx body that is not JSON is an unexpected response.
pub(crate) async fn read_json_response(
    provider: ProviderKind,
    response: reqwest::Response,
) -> Result<serde_json::Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|e| ProviderError::UnexpectedResponse {
            provider,
            detail: e.to_string(),
        })
}
