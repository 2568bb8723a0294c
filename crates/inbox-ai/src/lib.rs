//! # inbox-ai
//!
//! External AI collaborators behind ports: the LLM completion client used
//! for direct generation and suggestions, and the automation-webhook client
//! used for delegated replies.

pub mod automation;
pub mod llm;
pub mod openai;

pub use automation::{AutomationClient, AutomationError, DelegationRequest, HttpAutomationClient};
pub use llm::{ChatTurn, Completion, CompletionRequest, LlmClient, LlmError};
pub use openai::OpenAiClient;
