//! Ports - interfaces the domain expects its collaborators to implement

pub mod event_bus;
pub mod repositories;

pub use event_bus::{BusScope, EventBus, PublishError};
pub use repositories::{
    AiSettingsRepository, ChannelRepository, ContactRepository, ConversationRepository,
    InboundPersistCommand, IngestionRepository, MemberRepository, MessageRepository,
    PersistOutcome, RepoResult, TrainingDocRepository, WebhookLogRepository,
};
