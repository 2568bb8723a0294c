//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub. Events are
//! scoped either to everyone watching an organization's inbox or to one
//! user's sessions.

use inbox_core::Snowflake;

/// Channel prefix for organization-scoped events
pub const ORG_CHANNEL_PREFIX: &str = "org:";
/// Channel prefix for user-specific events
pub const USER_CHANNEL_PREFIX: &str = "user:";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Events for everyone in an organization
    Organization(Snowflake),
    /// Events for a specific user (all their sessions)
    User(Snowflake),
}

impl PubSubChannel {
    /// Create an organization channel
    #[must_use]
    pub fn organization(organization_id: Snowflake) -> Self {
        Self::Organization(organization_id)
    }

    /// Create a user channel
    #[must_use]
    pub fn user(user_id: Snowflake) -> Self {
        Self::User(user_id)
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Organization(id) => format!("{ORG_CHANNEL_PREFIX}{id}"),
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
        }
    }
}

impl From<inbox_core::BusScope> for PubSubChannel {
    fn from(scope: inbox_core::BusScope) -> Self {
        match scope {
            inbox_core::BusScope::Organization(id) => Self::Organization(id),
            inbox_core::BusScope::User(id) => Self::User(id),
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
