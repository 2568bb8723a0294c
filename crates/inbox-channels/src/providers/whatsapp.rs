//! WhatsApp Cloud API client
//!
//! Sends outbound messages via
//! `POST {graph}/{phone_number_id}/messages` and tests connectivity by
//! reading the phone-number object back.

use async_trait::async_trait;
use inbox_core::{Channel, Contact, ProviderKind};
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::ChannelProvider;
use crate::providers::read_json_response;
use crate::types::{ChannelCredentials, SendOutcome};

pub struct WhatsAppProvider {
    http: reqwest::Client,
    graph_base_url: String,
}

impl WhatsAppProvider {
    pub fn new(http: reqwest::Client, graph_base_url: impl Into<String>) -> Self {
        Self {
            http,
            graph_base_url: graph_base_url.into(),
        }
    }

    fn phone_number_id<'a>(&self, channel: &'a Channel) -> Result<&'a str, ProviderError> {
        channel
            .external_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ProviderError::NotConnected(ProviderKind::WhatsApp))
    }
}

#[async_trait]
impl ChannelProvider for WhatsAppProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::WhatsApp
    }

    async fn send_message(
        &self,
        channel: &Channel,
        contact: &Contact,
        content: &str,
    ) -> Result<SendOutcome, ProviderError> {
        let phone_number_id = self.phone_number_id(channel)?;
        let credentials = ChannelCredentials::parse(channel)?;
        let token = credentials.require_token(ProviderKind::WhatsApp)?;
        let recipient = contact
            .provider_id(ProviderKind::WhatsApp)
            .ok_or(ProviderError::MissingRecipient(ProviderKind::WhatsApp))?;

        debug!(channel = %channel.id, to = recipient, "sending WhatsApp message");

        let response = self
            .http
            .post(format!("{}/{}/messages", self.graph_base_url, phone_number_id))
            .bearer_auth(token)
            .json(&json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": recipient,
                "type": "text",
                "text": {"body": content},
            }))
            .send()
            .await?;

        let body = read_json_response(ProviderKind::WhatsApp, response).await?;
        let external_id = body["messages"][0]["id"].as_str().map(String::from);

        Ok(SendOutcome::sent(external_id, Some(body)))
    }

    async fn test_connection(&self, channel: &Channel) -> Result<(), ProviderError> {
        let phone_number_id = self.phone_number_id(channel)?;
        let credentials = ChannelCredentials::parse(channel)?;
        let token = credentials.require_token(ProviderKind::WhatsApp)?;

        let response = self
            .http
            .get(format!("{}/{}", self.graph_base_url, phone_number_id))
            .query(&[("fields", "display_phone_number,verified_name")])
            .bearer_auth(token)
            .send()
            .await?;

        read_json_response(ProviderKind::WhatsApp, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_core::Snowflake;

    fn provider() -> WhatsAppProvider {
        WhatsAppProvider::new(reqwest::Client::new(), "https://graph.test/v19.0")
    }

    #[tokio::test]
    async fn test_send_requires_recipient_id() {
        let mut channel = Channel::new(
            Snowflake::new(1),
            Snowflake::new(2),
            ProviderKind::WhatsApp,
            Some("pn-1".to_string()),
        );
        channel.credentials = Some(r#"{"access_token":"tok"}"#.to_string());

        // contact known only on messenger: no WhatsApp recipient id
        let contact = Contact::from_provider_id(
            Snowflake::new(3),
            Snowflake::new(2),
            ProviderKind::Messenger,
            "psid-1",
            None,
        );

        let err = provider()
            .send_message(&channel, &contact, "hi")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MissingRecipient(ProviderKind::WhatsApp)
        ));
    }

    #[tokio::test]
    async fn test_send_requires_connected_channel() {
        let channel = Channel::new(
            Snowflake::new(1),
            Snowflake::new(2),
            ProviderKind::WhatsApp,
            None,
        );
        let contact = Contact::from_provider_id(
            Snowflake::new(3),
            Snowflake::new(2),
            ProviderKind::WhatsApp,
            "15557654321",
            None,
        );

        let err = provider()
            .send_message(&channel, &contact, "hi")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::NotConnected(ProviderKind::WhatsApp)
        ));
    }
}
