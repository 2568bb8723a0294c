//! Service context - dependency container for services
//!
//! Holds the repository ports, the fan-out bus, the provider registry, the
//! AI collaborators, and the configuration views the services need.

use std::sync::Arc;

use inbox_ai::{AutomationClient, LlmClient};
use inbox_channels::ProviderRegistry;
use inbox_common::{AiConfig, Environment, WebhookConfig};
use inbox_core::{
    AiSettingsRepository, ChannelRepository, ContactRepository, ConversationRepository, EventBus,
    IngestionRepository, MemberRepository, MessageRepository, Snowflake, SnowflakeGenerator,
    TrainingDocRepository, WebhookLogRepository,
};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    channel_repo: Arc<dyn ChannelRepository>,
    contact_repo: Arc<dyn ContactRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    message_repo: Arc<dyn MessageRepository>,
    ingestion_repo: Arc<dyn IngestionRepository>,
    webhook_log_repo: Arc<dyn WebhookLogRepository>,
    member_repo: Arc<dyn MemberRepository>,
    training_repo: Arc<dyn TrainingDocRepository>,
    ai_settings_repo: Arc<dyn AiSettingsRepository>,

    event_bus: Arc<dyn EventBus>,
    providers: Arc<ProviderRegistry>,
    llm: Arc<dyn LlmClient>,
    automation: Arc<dyn AutomationClient>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    webhooks: Arc<WebhookConfig>,
    ai: Arc<AiConfig>,
    environment: Environment,
}

impl ServiceContext {
    /// Get the channel repository
    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.channel_repo.as_ref()
    }

    /// Get the contact repository
    pub fn contact_repo(&self) -> &dyn ContactRepository {
        self.contact_repo.as_ref()
    }

    /// Get the conversation repository
    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the ingestion unit of work
    pub fn ingestion_repo(&self) -> &dyn IngestionRepository {
        self.ingestion_repo.as_ref()
    }

    /// Get the webhook log repository
    pub fn webhook_log_repo(&self) -> &dyn WebhookLogRepository {
        self.webhook_log_repo.as_ref()
    }

    /// Get the member repository (read-only boundary)
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the training document repository (read-only boundary)
    pub fn training_repo(&self) -> &dyn TrainingDocRepository {
        self.training_repo.as_ref()
    }

    /// Get the AI settings repository (read-only boundary)
    pub fn ai_settings_repo(&self) -> &dyn AiSettingsRepository {
        self.ai_settings_repo.as_ref()
    }

    /// Get the fan-out event bus
    pub fn event_bus(&self) -> &dyn EventBus {
        self.event_bus.as_ref()
    }

    /// Get the provider registry
    pub fn providers(&self) -> &ProviderRegistry {
        self.providers.as_ref()
    }

    /// Get the LLM client
    pub fn llm(&self) -> &dyn LlmClient {
        self.llm.as_ref()
    }

    /// Get the automation delegation client
    pub fn automation(&self) -> &dyn AutomationClient {
        self.automation.as_ref()
    }

    /// Get the webhook verification configuration
    pub fn webhooks(&self) -> &WebhookConfig {
        self.webhooks.as_ref()
    }

    /// Get the AI configuration
    pub fn ai(&self) -> &AiConfig {
        self.ai.as_ref()
    }

    /// Get the runtime environment
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("environment", &self.environment)
            .field("repositories", &"...")
            .field("collaborators", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    channel_repo: Option<Arc<dyn ChannelRepository>>,
    contact_repo: Option<Arc<dyn ContactRepository>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    ingestion_repo: Option<Arc<dyn IngestionRepository>>,
    webhook_log_repo: Option<Arc<dyn WebhookLogRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    training_repo: Option<Arc<dyn TrainingDocRepository>>,
    ai_settings_repo: Option<Arc<dyn AiSettingsRepository>>,
    event_bus: Option<Arc<dyn EventBus>>,
    providers: Option<Arc<ProviderRegistry>>,
    llm: Option<Arc<dyn LlmClient>>,
    automation: Option<Arc<dyn AutomationClient>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    webhooks: Option<WebhookConfig>,
    ai: Option<AiConfig>,
    environment: Environment,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel_repo(mut self, repo: Arc<dyn ChannelRepository>) -> Self {
        self.channel_repo = Some(repo);
        self
    }

    pub fn contact_repo(mut self, repo: Arc<dyn ContactRepository>) -> Self {
        self.contact_repo = Some(repo);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn ingestion_repo(mut self, repo: Arc<dyn IngestionRepository>) -> Self {
        self.ingestion_repo = Some(repo);
        self
    }

    pub fn webhook_log_repo(mut self, repo: Arc<dyn WebhookLogRepository>) -> Self {
        self.webhook_log_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn training_repo(mut self, repo: Arc<dyn TrainingDocRepository>) -> Self {
        self.training_repo = Some(repo);
        self
    }

    pub fn ai_settings_repo(mut self, repo: Arc<dyn AiSettingsRepository>) -> Self {
        self.ai_settings_repo = Some(repo);
        self
    }

    pub fn event_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn providers(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.providers = Some(registry);
        self
    }

    pub fn llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn automation(mut self, automation: Arc<dyn AutomationClient>) -> Self {
        self.automation = Some(automation);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn webhooks(mut self, config: WebhookConfig) -> Self {
        self.webhooks = Some(config);
        self
    }

    pub fn ai(mut self, config: AiConfig) -> Self {
        self.ai = Some(config);
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        fn require<T>(value: Option<T>, name: &str) -> Result<T, ServiceError> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            channel_repo: require(self.channel_repo, "channel_repo")?,
            contact_repo: require(self.contact_repo, "contact_repo")?,
            conversation_repo: require(self.conversation_repo, "conversation_repo")?,
            message_repo: require(self.message_repo, "message_repo")?,
            ingestion_repo: require(self.ingestion_repo, "ingestion_repo")?,
            webhook_log_repo: require(self.webhook_log_repo, "webhook_log_repo")?,
            member_repo: require(self.member_repo, "member_repo")?,
            training_repo: require(self.training_repo, "training_repo")?,
            ai_settings_repo: require(self.ai_settings_repo, "ai_settings_repo")?,
            event_bus: require(self.event_bus, "event_bus")?,
            providers: require(self.providers, "providers")?,
            llm: require(self.llm, "llm")?,
            automation: require(self.automation, "automation")?,
            snowflake_generator: require(self.snowflake_generator, "snowflake_generator")?,
            webhooks: Arc::new(require(self.webhooks, "webhooks")?),
            ai: Arc::new(require(self.ai, "ai")?),
            environment: self.environment,
        })
    }
}
