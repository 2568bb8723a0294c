//! Automation-webhook delegation port
//!
//! In AUTO_REPLY mode the orchestrator first offers the reply to an external
//! automation system. Only a 2xx response counts as accepted; the automation
//! system is then expected to call back asynchronously with the reply.

use async_trait::async_trait;
use inbox_core::Snowflake;
use serde::Serialize;
use tracing::debug;

use crate::llm::ChatTurn;

/// Payload POSTed to the automation webhook
#[derive(Debug, Clone, Serialize)]
pub struct DelegationRequest {
    #[serde(rename = "organizationId")]
    pub organization_id: Snowflake,
    #[serde(rename = "conversationId")]
    pub conversation_id: Snowflake,
    /// The message the automation should reply to
    pub message: String,
    #[serde(rename = "contactName", skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// Conversation history, oldest first
    pub history: Vec<ChatTurn>,
    /// Where the automation system must POST its reply
    #[serde(rename = "callbackUrl")]
    pub callback_url: String,
}

/// Automation delegation errors
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("automation webhook rejected delegation (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Delegation port
#[async_trait]
pub trait AutomationClient: Send + Sync {
    /// Offer the reply to the automation webhook at `url`
    async fn delegate(&self, url: &str, request: &DelegationRequest) -> Result<(), AutomationError>;
}

/// HTTP implementation posting JSON to the configured webhook
pub struct HttpAutomationClient {
    http: reqwest::Client,
}

impl HttpAutomationClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AutomationClient for HttpAutomationClient {
    async fn delegate(&self, url: &str, request: &DelegationRequest) -> Result<(), AutomationError> {
        debug!(conversation = %request.conversation_id, url, "delegating reply to automation webhook");

        let response = self.http.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AutomationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegation_payload_shape() {
        let request = DelegationRequest {
            organization_id: Snowflake::new(10),
            conversation_id: Snowflake::new(20),
            message: "help me".to_string(),
            contact_name: Some("Ada".to_string()),
            history: vec![ChatTurn::user("help me")],
            callback_url: "https://inbox.test/webhooks/automation/callback".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["organizationId"], "10");
        assert_eq!(value["conversationId"], "20");
        assert_eq!(value["callbackUrl"], "https://inbox.test/webhooks/automation/callback");
        assert_eq!(value["history"][0]["role"], "user");
    }
}
