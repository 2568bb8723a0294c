//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::{MessageStatus, ProviderKind};
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    /// Unknown channel external ids are expected operational noise on shared
    /// webhook endpoints, not failures.
    #[error("No active {provider} channel for external id {external_id}")]
    UnknownChannel {
        provider: ProviderKind,
        external_id: String,
    },

    #[error("Contact not found: {0}")]
    ContactNotFound(Snowflake),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("No message with external id {0} in channel scope")]
    UnknownExternalMessage(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message content is empty")]
    EmptyContent,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Duplicate message: external id {0} already processed")]
    DuplicateMessage(String),

    #[error("Status transition {from:?} -> {to:?} rejected")]
    InvalidStatusTransition {
        from: MessageStatus,
        to: MessageStatus,
    },

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("AI replies are disabled for this conversation")]
    AiDisabledForConversation,

    #[error("AI replies are disabled for this organization")]
    AiDisabledForOrganization,

    #[error("Contact has no {0} recipient id")]
    MissingRecipientId(ProviderKind),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::UnknownChannel { .. } => "UNKNOWN_CHANNEL_EXTERNAL_ID",
            Self::ContactNotFound(_) => "UNKNOWN_CONTACT",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::UnknownExternalMessage(_) => "UNKNOWN_EXTERNAL_MESSAGE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::DuplicateMessage(_) => "DUPLICATE_MESSAGE",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::AiDisabledForConversation => "AI_DISABLED_FOR_CONVERSATION",
            Self::AiDisabledForOrganization => "AI_DISABLED_FOR_ORGANIZATION",
            Self::MissingRecipientId(_) => "MISSING_RECIPIENT_ID",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotFound(_)
                | Self::UnknownChannel { .. }
                | Self::ContactNotFound(_)
                | Self::ConversationNotFound(_)
                | Self::MessageNotFound(_)
                | Self::UnknownExternalMessage(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::AiDisabledForConversation
                | Self::AiDisabledForOrganization
                | Self::MissingRecipientId(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateMessage(_) | Self::InvalidStatusTransition { .. }
        )
    }

    /// Errors the ingestion pipeline counts as "skipped" instead of failing
    /// the delivery: unknown channels, duplicates, empty bodies.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::UnknownChannel { .. } | Self::DuplicateMessage(_) | Self::EmptyContent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::ChannelNotFound(Snowflake::new(1));
        assert_eq!(err.code(), "UNKNOWN_CHANNEL");

        let err = DomainError::DuplicateMessage("mid.1".to_string());
        assert_eq!(err.code(), "DUPLICATE_MESSAGE");
    }

    #[test]
    fn test_classifiers() {
        assert!(DomainError::MessageNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::EmptyContent.is_validation());
        assert!(DomainError::DuplicateMessage("x".into()).is_conflict());
        assert!(DomainError::DuplicateMessage("x".into()).is_skippable());
        assert!(DomainError::UnknownChannel {
            provider: ProviderKind::WhatsApp,
            external_id: "123".into()
        }
        .is_skippable());
        assert!(!DomainError::DatabaseError("down".into()).is_skippable());
    }
}
