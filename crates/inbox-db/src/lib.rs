//! # inbox-db
//!
//! PostgreSQL persistence: `FromRow` models, entity mappers, repository
//! implementations of the core ports, and the transactional ingestion
//! unit of work.

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_env, DatabaseConfig};
pub use repositories::{
    PgAiSettingsRepository, PgChannelRepository, PgContactRepository, PgConversationRepository,
    PgIngestionRepository, PgMemberRepository, PgMessageRepository, PgTrainingDocRepository,
    PgWebhookLogRepository,
};

pub use sqlx::PgPool;
