//! Facebook Messenger (page inbox) client
//!
//! Sends via `POST {graph}/me/messages` with the page access token, tests
//! connectivity by reading the page object, and implements the OAuth-style
//! connect flow (consent dialog URL + code exchange + page lookup).

use async_trait::async_trait;
use inbox_core::{Channel, Contact, ProviderKind};
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::ChannelProvider;
use crate::providers::read_json_response;
use crate::types::{ChannelCredentials, ConnectedAccount, SendOutcome};

const OAUTH_DIALOG_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const OAUTH_SCOPES: &str = "pages_show_list,pages_messaging,pages_manage_metadata";

pub struct MessengerProvider {
    http: reqwest::Client,
    graph_base_url: String,
    app_id: Option<String>,
    app_secret: Option<String>,
}

impl MessengerProvider {
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
        let app_id = self.app_id.as_deref().ok_or(ProviderError::OauthNotConfigured {
            provider: self.kind(),
            detail: "missing app id",
        })?;
        let app_secret = self
            .app_secret
            .as_deref()
            .ok_or(ProviderError::OauthNotConfigured {
                provider: self.kind(),
                detail: "missing app secret",
            })?;
        Ok((app_id, app_secret))
    }

    /// Exchange the OAuth code for a short-lived user token
    async fn user_token(&self, code: &str, redirect_uri: &str) -> Result<String, ProviderError> {
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
        body["access_token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ProviderError::UnexpectedResponse {
                provider: self.kind(),
                detail: "token exchange returned no access_token".to_string(),
            })
    }

    /// List the pages the user manages and pick the first one
    async fn first_page(&self, user_token: &str) -> Result<ConnectedAccount, ProviderError> {
        let response = self
            .http
            .get(format!("{}/me/accounts", self.graph_base_url))
            .query(&[("access_token", user_token)])
            .send()
            .await?;

        let body = read_json_response(self.kind(), response).await?;
        let page = body["data"]
            .as_array()
            .and_then(|pages| pages.first())
            .ok_or_else(|| ProviderError::UnexpectedResponse {
                provider: self.kind(),
                detail: "user manages no pages".to_string(),
            })?;

        let page_id = page["id"].as_str().ok_or_else(|| ProviderError::UnexpectedResponse {
            provider: self.kind(),
            detail: "page entry has no id".to_string(),
        })?;
        let page_token =
            page["access_token"]
                .as_str()
                .ok_or_else(|| ProviderError::UnexpectedResponse {
                    provider: self.kind(),
                    detail: "page entry has no access token".to_string(),
                })?;

        Ok(ConnectedAccount {
            external_id: page_id.to_string(),
            display_name: page["name"].as_str().map(String::from),
            access_token: page_token.to_string(),
        })
    }
}

#[async_trait]
impl ChannelProvider for MessengerProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Messenger
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

        debug!(channel = %channel.id, to = recipient, "sending Messenger message");

        let response = self
            .http
            .post(format!("{}/me/messages", self.graph_base_url))
            .query(&[("access_token", token)])
            .json(&json!({
                "recipient": {"id": recipient},
                "messaging_type": "RESPONSE",
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
        let user_token = self.user_token(code, redirect_uri).await?;
        self.first_page(&user_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(app: bool) -> MessengerProvider {
        MessengerProvider::new(
            reqwest::Client::new(),
            "https://graph.test/v19.0",
            app.then(|| "app-1".to_string()),
            app.then(|| "app-secret".to_string()),
        )
    }

    #[test]
    fn test_connect_url() {
        let url = provider(true).connect_url("https://inbox.test/cb", "state-1").unwrap();
        assert!(url.starts_with(OAUTH_DIALOG_URL));
        assert!(url.contains("client_id=app-1"));
        assert!(url.contains("state=state-1"));
        assert!(url.contains("pages_messaging"));
    }

    #[test]
    fn test_connect_url_requires_app_config() {
        let err = provider(false).connect_url("https://inbox.test/cb", "s").unwrap_err();
        assert!(matches!(err, ProviderError::OauthNotConfigured { .. }));
    }
}
