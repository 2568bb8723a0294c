//! LLM completion port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One turn of conversation history, already role-mapped
/// (contact -> "user", everything else -> "assistant")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Everything the orchestrator assembles for one generation
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Concatenated, length-capped training documents
    pub training_context: String,
    /// Conversation history, oldest first
    pub history: Vec<ChatTurn>,
    /// The message to reply to
    pub latest_message: String,
}

/// A generated completion plus optional usage metadata
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub confidence: Option<f32>,
    pub tokens_used: Option<u32>,
    pub model: String,
}

/// LLM collaborator errors
///
/// A missing API key or an empty completion is a reportable error, never a
/// silent empty reply.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("no LLM API key configured")]
    MissingApiKey,

    #[error("LLM API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM returned an empty completion")]
    EmptyCompletion,

    #[error("unexpected LLM response: {0}")]
    UnexpectedResponse(String),
}

/// Completion generation port
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}
