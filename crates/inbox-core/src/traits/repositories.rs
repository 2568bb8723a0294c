//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    AiSettings, AnalyticsEvent, Channel, Contact, Conversation, Message, MessageStatus,
    Notification, ProviderKind, TrainingDoc, WebhookLog,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Resolve the active channel owning a provider-side external id
    async fn find_active_by_external_id(
        &self,
        provider: ProviderKind,
        external_id: &str,
    ) -> RepoResult<Option<Channel>>;

    /// Refresh `last_sync_at` after a successful connection test
    async fn touch_last_sync(&self, id: Snowflake) -> RepoResult<()>;

    /// Store the account id and credential blob produced by an OAuth
    /// exchange (connect or reconnect)
    async fn update_connection(
        &self,
        id: Snowflake,
        external_id: &str,
        credentials: &str,
    ) -> RepoResult<()>;
}

// ============================================================================
// Contact Repository
// ============================================================================

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Find contact by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Contact>>;

    /// Find a contact by its provider-specific external id column
    async fn find_by_provider_id(
        &self,
        organization_id: Snowflake,
        provider: ProviderKind,
        external_id: &str,
    ) -> RepoResult<Option<Contact>>;

    /// Create a new contact
    async fn create(&self, contact: &Contact) -> RepoResult<()>;

    /// Refresh the display name (identity columns are immutable)
    async fn update_display_name(&self, id: Snowflake, display_name: &str) -> RepoResult<()>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find conversation by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>>;

    /// Exact match on a provider thread id within one channel
    async fn find_by_external_thread(
        &self,
        channel_id: Snowflake,
        external_thread_id: &str,
    ) -> RepoResult<Option<Conversation>>;

    /// Most-recently-updated conversation for a (channel, contact) pair
    async fn find_latest_for_pair(
        &self,
        channel_id: Snowflake,
        contact_id: Snowflake,
    ) -> RepoResult<Option<Conversation>>;

    /// Create a new conversation
    async fn create(&self, conversation: &Conversation) -> RepoResult<()>;

    /// Flip the AI-handling flag
    async fn set_ai_handling(&self, id: Snowflake, handling: bool) -> RepoResult<()>;

    /// Register an outbound message: reset unread to 0, clear the
    /// AI-handling flag, refresh preview and last-message timestamp
    async fn apply_outbound(
        &self,
        id: Snowflake,
        preview: &str,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Find a message by provider external id within a channel's conversations
    /// (the dedup lookup and the status-callback target resolution)
    async fn find_by_external_id(
        &self,
        channel_id: Snowflake,
        external_id: &str,
    ) -> RepoResult<Option<Message>>;

    /// Last `limit` messages of a conversation, returned oldest-first
    async fn find_recent(
        &self,
        conversation_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<Message>>;

    /// Insert an outbound message row (inbound rows go through
    /// [`IngestionRepository::persist_inbound`])
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Apply a status transition: sets/clears delivered/read timestamps and
    /// the failure reason according to the new status, and records the
    /// provider external id when the send returned one
    async fn update_status(
        &self,
        id: Snowflake,
        status: MessageStatus,
        external_id: Option<&str>,
        failure_reason: Option<&str>,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Ingestion unit of work
// ============================================================================

/// Everything written atomically for one accepted inbound message
#[derive(Debug, Clone)]
pub struct InboundPersistCommand {
    pub organization_id: Snowflake,
    pub conversation_id: Snowflake,
    pub message: Message,
    /// Preview already truncated to the stored length
    pub preview: String,
    pub occurred_at: DateTime<Utc>,
    pub notifications: Vec<Notification>,
    pub analytics: AnalyticsEvent,
}

/// Outcome of the transactional insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Inserted,
    /// The storage-level unique constraint fired: the message was already
    /// processed by a concurrent delivery. Treated as success.
    Duplicate,
}

#[async_trait]
pub trait IngestionRepository: Send + Sync {
    /// Single transaction: bump conversation counters/preview, insert the
    /// message row, insert notification rows, record the analytics event.
    /// A duplicate-key violation on the message external id commits nothing
    /// and reports [`PersistOutcome::Duplicate`].
    async fn persist_inbound(&self, cmd: &InboundPersistCommand) -> RepoResult<PersistOutcome>;
}

// ============================================================================
// Webhook log Repository
// ============================================================================

#[async_trait]
pub trait WebhookLogRepository: Send + Sync {
    /// Append one audit record; never read back by business logic
    async fn record(&self, log: &WebhookLog) -> RepoResult<()>;
}

// ============================================================================
// External collaborator boundaries (read-only)
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Active OWNER/ADMIN/AGENT members of an organization - the default
    /// notification recipients when a conversation has no assignee
    async fn find_notifiable(&self, organization_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}

#[async_trait]
pub trait TrainingDocRepository: Send + Sync {
    /// Most-recently-updated active training documents, newest first
    async fn find_recent_active(
        &self,
        organization_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<TrainingDoc>>;
}

#[async_trait]
pub trait AiSettingsRepository: Send + Sync {
    /// Organization AI settings; `None` means AI was never configured
    async fn find(&self, organization_id: Snowflake) -> RepoResult<Option<AiSettings>>;
}
