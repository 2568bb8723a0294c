//! Request and response DTOs

pub mod requests;
pub mod responses;

pub use requests::{AiReplyRequest, AutomationCallbackRequest, ExchangeCodeRequest, SendMessageRequest};
pub use responses::{
    AiReplyResponse, ConnectUrlResponse, ExchangeResponse, HealthResponse, MessageResponse,
    ReadinessResponse, SuggestionResponse, TestConnectionResponse, WebhookOutcome,
};
