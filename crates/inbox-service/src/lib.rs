//! # inbox-service
//!
//! Application layer: the webhook ingestion pipeline, message-status
//! reconciler, AI reply orchestrator, and the outbound dispatcher shared by
//! agent and AI sends. Services speak to infrastructure only through the
//! core ports held in [`ServiceContext`].

pub mod dto;
pub mod services;

pub use dto::{
    AiReplyRequest, AiReplyResponse, AutomationCallbackRequest, ConnectUrlResponse,
    ExchangeCodeRequest, ExchangeResponse, HealthResponse, MessageResponse, ReadinessResponse,
    SendMessageRequest, SuggestionResponse, TestConnectionResponse, WebhookOutcome,
};
pub use services::{
    AiReplyService, ChannelConnectService, IngestOutcome, OutboundDispatcher, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, StatusReconciler, WebhookIngestService,
};
