//! PostgreSQL repository implementations

pub mod channel;
pub mod contact;
pub mod conversation;
pub mod error;
pub mod ingest;
pub mod member;
pub mod message;
pub mod settings;
pub mod training;
pub mod webhook_log;

pub use channel::PgChannelRepository;
pub use contact::PgContactRepository;
pub use conversation::PgConversationRepository;
pub use ingest::PgIngestionRepository;
pub use member::PgMemberRepository;
pub use message::PgMessageRepository;
pub use settings::PgAiSettingsRepository;
pub use training::PgTrainingDocRepository;
pub use webhook_log::PgWebhookLogRepository;
