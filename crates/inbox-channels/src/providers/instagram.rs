//! Instagram Messaging client
//!
//! Instagram DMs ride on the page messaging API: sends use the page access
//! token, while the channel is scoped by the linked Instagram business
//! account id. The connect flow resolves page -> instagram_business_account.

use async_trait::async_trait;
use inbox_core::{Channel, Contact, ProviderKind};
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::ChannelProvider;
use crate::providers::read_json_response;
use crate::types::{ChannelCredentials, ConnectedAccount, SendOutcome};

const OAUTH_DIALOG_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const OAUTH_SCOPES: &str =
    "pages_show_list,instagram_basic,instagram_manage_messages,pages_manage_metadata";

pub struct InstagramProvider {
    http: reqwest::Client,
    graph_base_url: String,
    app_id: Option<String>,
    app_secret: Option<String>,
}

impl InstagramProvider {
    pub fn new(
        http: reqwest::Client,
        graph_base_url: impl Into<String>,
        app_id: Option<String>,
        app_secret: Option<String>,
    ) -> Self {
        Self {
            http,
            graph_base_url: graph_base_url.into(),
            app_id,
            app_secret,
        }
    }

    fn oauth_app(&self) -> Result<(&str, &str), ProviderError> {
        match (self.app_id.as_deref(), self.app_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            (None, _) => Err(ProviderError::OauthNotConfigured {
                provider: self.kind(),
                detail: "missing app id",
            }),
            (_, None) => Err(ProviderError::OauthNotConfigured {
                provider: self.kind(),
                detail: "missing app secret",
            }),
        }
    }
}

#[async_trait]
impl ChannelProvider for InstagramProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Instagram
    }

    async fn send_message(
        &self,
        channel: &Channel,
        contact: &Contact,
        content: &str,
    ) -> Result<SendOutcome, ProviderError> {
        let credentials = ChannelCredentials::parse(channel)?;
        let token = credentials.require_token(self.kind())?;
        let recipient = contact
            .provider_id(self.kind())
            .ok_or(ProviderError::MissingRecipient(self.kind()))?;

        debug!(channel = %channel.id, to = recipient, "sending Instagram message");

        let response = self
            .http
            .post(format!("{}/me/messages", self.graph_base_url))
            .query(&[("access_token", token)])
            .json(&json!({
                "recipient": {"id": recipient},
                "message": {"text": content},
            }))
            .send()
            .await?;

        let body = read_json_response(self.kind(), response).await?;
        let external_id = body["message_id"].as_str().map(String::from);

        Ok(SendOutcome::sent(external_id, Some(body)))
    }

    async fn test_connection(&self, channel: &Channel) -> Result<(), ProviderError> {
        let credentials = ChannelCredentials::parse(channel)?;
        let token = credentials.require_token(self.kind())?;

        let response = self
            .http
            .get(format!("{}/me", self.graph_base_url))
            .query(&[("access_token", token), ("fields", "id,name")])
            .send()
            .await?;

        read_json_response(self.kind(), response).await?;
        Ok(())
    }

    fn connect_url(&self, redirect_uri: &str, state: &str) -> Result<String, ProviderError> {
        let (app_id, _) = self.oauth_app()?;
        Ok(format!(
            "{OAUTH_DIALOG_URL}?client_id={app_id}&redirect_uri={redirect_uri}&state={state}&scope={OAUTH_SCOPES}"
        ))
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ConnectedAccount, ProviderError> {
        let (app_id, app_secret) = self.oauth_app()?;

        let response = self
            .http
            .get(format!("{}/oauth/access_token", self.graph_base_url))
            .query(&[
                ("client_id", app_id),
                ("client_secret", app_secret),
                ("redirect_uri", redirect_uri),
                ("code", code),
            ])
            .send()
            .await?;
        let body = read_json_response(self.kind(), response).await?;
        let user_token = body["access_token"].as_str().ok_or_else(|| {
            ProviderError::UnexpectedResponse {
                provider: self.kind(),
                detail: "token exchange returned no access_token".to_string(),
            }
        })?;

        // Resolve the first managed page, then the IG account linked to it
        let response = self
            .http
            .get(format!("{}/me/accounts", self.graph_base_url))
            .query(&[
                ("access_token", user_token),
                ("fields", "id,name,access_token,instagram_business_account"),
            ])
            .send()
            .await?;
        let body = read_json_response(self.kind(), response).await?;

        let page = body["data"]
            .as_array()
            .and_then(|pages| {
                pages
                    .iter()
                    .find(|p| p["instagram_business_account"]["id"].is_string())
            })
            .ok_or_else(|| ProviderError::UnexpectedResponse {
                provider: self.kind(),
                detail: "no page with a linked Instagram account".to_string(),
            })?;

        let ig_id = page["instagram_business_account"]["id"]
            .as_str()
            .unwrap_or_default();
        let page_token =
            page["access_token"]
                .as_str()
                .ok_or_else(|| ProviderError::UnexpectedResponse {
                    provider: self.kind(),
                    detail: "page entry has no access token".to_string(),
                })?;

        Ok(ConnectedAccount {
            external_id: ig_id.to_string(),
            display_name: page["name"].as_str().map(String::from),
            access_token: page_token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_url_scopes() {
        let provider = InstagramProvider::new(
            reqwest::Client::new(),
            "https://graph.test/v19.0",
            Some("app-1".to_string()),
            Some("secret".to_string()),
        );
        let url = provider.connect_url("https://inbox.test/cb", "s1").unwrap();
        assert!(url.contains("instagram_manage_messages"));
        assert!(url.contains("client_id=app-1"));
    }
}
