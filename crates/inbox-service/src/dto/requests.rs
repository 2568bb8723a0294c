//! Request DTOs

use serde::Deserialize;
use validator::Validate;

/// Agent outbound send
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4096, message = "content must be 1-4096 characters"))]
    pub content: String,
}

/// Manual AI reply trigger
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiReplyRequest {
    /// Bypass the AI-enabled preconditions (manual trigger only)
    #[serde(default)]
    pub force: bool,
}

/// OAuth code exchange for a channel
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExchangeCodeRequest {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "redirect_uri is required"))]
    pub redirect_uri: String,
}

/// Automation callback body
///
/// Either `ai_response` (success) or `error` must be present; ids are
/// validated before the dispatch path re-enters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationCallbackRequest {
    pub organization_id: Option<String>,
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub tokens_used: Option<u32>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_validation() {
        let ok = SendMessageRequest {
            content: "hello".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = SendMessageRequest {
            content: String::new(),
        };
        assert!(empty.validate().is_err());

        let too_long = SendMessageRequest {
            content: "x".repeat(5000),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_callback_deserialization() {
        let body = r#"{
            "organizationId": "10",
            "conversationId": "20",
            "aiResponse": "Here is your answer",
            "confidence": 0.9,
            "tokensUsed": 120,
            "model": "gpt-4o-mini"
        }"#;
        let request: AutomationCallbackRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.organization_id.as_deref(), Some("10"));
        assert_eq!(request.ai_response.as_deref(), Some("Here is your answer"));
        assert!(request.error.is_none());
    }
}
