//! Service layer errors

use inbox_ai::{AutomationError, LlmError};
use inbox_channels::ProviderError;
use inbox_core::DomainError;
use thiserror::Error;

/// Errors surfaced by the application services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid webhook signature")]
    SignatureInvalid,

    #[error("Missing webhook signature")]
    SignatureMissing,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("AI generation failed: {0}")]
    Generation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Create a not-found error
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::SignatureInvalid | Self::SignatureMissing => 401,
            Self::Provider(_) | Self::Generation(_) => 502,
            Self::Internal(_) => 500,
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
        }
    }

    /// Stable error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::SignatureMissing => "SIGNATURE_MISSING",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Generation(_) => "AI_GENERATION_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        Self::Generation(err.to_string())
    }
}

impl From<AutomationError> for ServiceError {
    fn from(err: AutomationError) -> Self {
        Self::Generation(err.to_string())
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::not_found("Conversation", 7).status_code(), 404);
        assert_eq!(ServiceError::SignatureInvalid.status_code(), 401);
        assert_eq!(ServiceError::validation("bad").status_code(), 400);
        assert_eq!(ServiceError::Provider("down".into()).status_code(), 502);
        assert_eq!(
            ServiceError::Domain(DomainError::AiDisabledForConversation).status_code(),
            400
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ServiceError::SignatureMissing.error_code(), "SIGNATURE_MISSING");
        assert_eq!(
            ServiceError::Domain(DomainError::DuplicateMessage("m".into())).error_code(),
            "DUPLICATE_MESSAGE"
        );
    }
}
