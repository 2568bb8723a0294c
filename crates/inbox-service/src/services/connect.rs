//! Channel connection service
//!
//! Thin wrappers over the provider abstraction for connection testing and
//! the OAuth-style connect flow. Upstream failures are reported, never
//! propagated as unhandled errors.

use inbox_core::Snowflake;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::dto::{ConnectUrlResponse, ExchangeResponse, TestConnectionResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Channel connection service
pub struct ChannelConnectService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelConnectService<'a> {
    /// Create a new ChannelConnectService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Test a channel's credentials against the vendor API
    ///
    /// A reachable, authorized channel refreshes `last_sync_at`; failures
    /// come back as a reported result, not an error.
    #[instrument(skip(self))]
    pub async fn test(&self, channel_id: Snowflake) -> ServiceResult<TestConnectionResponse> {
        let channel = self.require_channel(channel_id).await?;
        let provider = self.ctx.providers().get(channel.provider);

        match provider.test_connection(&channel).await {
            Ok(()) => {
                self.ctx.channel_repo().touch_last_sync(channel.id).await?;
                info!(channel = %channel.id, "connection test passed");
                Ok(TestConnectionResponse {
                    ok: true,
                    error: None,
                })
            }
            Err(e) => {
                warn!(channel = %channel.id, error = %e, "connection test failed");
                Ok(TestConnectionResponse {
                    ok: false,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Build the OAuth consent URL for a channel's provider
    #[instrument(skip(self))]
    pub async fn connect_url(&self, channel_id: Snowflake) -> ServiceResult<ConnectUrlResponse> {
        let channel = self.require_channel(channel_id).await?;
        let provider = self.ctx.providers().get(channel.provider);
        let redirect_uri = self.redirect_uri()?;

        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let url = provider.connect_url(&redirect_uri, &state)?;
        Ok(ConnectUrlResponse { url, state })
    }

    /// Exchange an OAuth code and store the connected account on the channel
    #[instrument(skip(self, code))]
    pub async fn exchange(
        &self,
        channel_id: Snowflake,
        code: &str,
        redirect_uri: &str,
    ) -> ServiceResult<ExchangeResponse> {
        let channel = self.require_channel(channel_id).await?;
        let provider = self.ctx.providers().get(channel.provider);

        let account = provider.exchange_code(code, redirect_uri).await?;
        let credentials = serde_json::json!({
            "access_token": account.access_token,
            "page_id": account.external_id,
        })
        .to_string();

        self.ctx
            .channel_repo()
            .update_connection(channel.id, &account.external_id, &credentials)
            .await?;

        info!(channel = %channel.id, external_id = %account.external_id, "channel connected");

        Ok(ExchangeResponse {
            external_id: account.external_id,
            display_name: account.display_name,
        })
    }

    async fn require_channel(&self, id: Snowflake) -> ServiceResult<inbox_core::Channel> {
        self.ctx
            .channel_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Channel", id))
    }

    fn redirect_uri(&self) -> ServiceResult<String> {
        self.ctx
            .ai()
            .public_base_url
            .as_deref()
            .map(|base| format!("{}/channels/connect/callback", base.trim_end_matches('/')))
            .ok_or_else(|| ServiceError::validation("PUBLIC_BASE_URL is not configured"))
    }
}
