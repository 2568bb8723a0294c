//! OpenAI-compatible chat-completions client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::llm::{ChatTurn, Completion, CompletionRequest, LlmClient, LlmError};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.into(),
        }
    }

    fn build_messages(request: &CompletionRequest) -> Vec<serde_json::Value> {
        let mut system = request.system_prompt.clone();
        if !request.training_context.is_empty() {
            system.push_str("\n\nUse the following knowledge base when answering:\n");
            system.push_str(&request.training_context);
        }

        let mut messages = vec![json!({"role": "system", "content": system})];
        for ChatTurn { role, content } in &request.history {
            messages.push(json!({"role": role, "content": content}));
        }
        messages.push(json!({"role": "user", "content": request.latest_message}));
        messages
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = json!({
            "model": request.model,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "messages": Self::build_messages(request),
        });

        debug!(model = %request.model, turns = request.history.len(), "requesting completion");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "LLM API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(e.to_string()))?;

        let text = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or("")
            .to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(Completion {
            text,
            confidence: None,
            tokens_used: api_response.usage.and_then(|u| u.total_tokens),
            model: api_response.model.unwrap_or_else(|| request.model.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            system_prompt: "You are a support assistant.".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            training_context: "Refund policy: 30 days.".to_string(),
            history: vec![ChatTurn::user("hi"), ChatTurn::assistant("hello!")],
            latest_message: "can I get a refund?".to_string(),
        }
    }

    #[test]
    fn test_message_assembly() {
        let messages = OpenAiClient::build_messages(&request());
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"]
            .as_str()
            .unwrap()
            .contains("Refund policy"));
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3]["content"], "can I get a refund?");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let client = OpenAiClient::new(reqwest::Client::new(), None, "https://llm.test/v1");
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
