//! Application services

pub mod ai_reply;
pub mod connect;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod reconcile;

pub use ai_reply::AiReplyService;
pub use connect::ChannelConnectService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dispatch::OutboundDispatcher;
pub use error::{ServiceError, ServiceResult};
pub use ingest::{IngestOutcome, WebhookIngestService};
pub use reconcile::StatusReconciler;
