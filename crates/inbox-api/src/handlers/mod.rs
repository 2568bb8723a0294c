//! Request handlers

pub mod channels;
pub mod conversations;
pub mod health;
pub mod webhooks;

use inbox_core::{ProviderKind, Snowflake};

use crate::response::ApiError;

/// Parse a provider path segment
pub(crate) fn parse_provider(raw: &str) -> Result<ProviderKind, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::UnknownProvider(raw.to_string()))
}

/// Parse a snowflake path segment
pub(crate) fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}
