//! Channel entity - a tenant's connected instance of a messaging provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Messaging provider family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// WhatsApp Cloud API (Meta)
    WhatsApp,
    /// Facebook Messenger (Meta pages)
    Messenger,
    /// Instagram Messaging (Meta)
    Instagram,
}

impl ProviderKind {
    /// All known providers, in registry order
    pub const ALL: [ProviderKind; 3] = [Self::WhatsApp, Self::Messenger, Self::Instagram];

    /// Stable lowercase identifier used in routes and database columns
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WhatsApp => "whatsapp",
            Self::Messenger => "messenger",
            Self::Instagram => "instagram",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(Self::WhatsApp),
            "messenger" | "facebook" => Ok(Self::Messenger),
            "instagram" => Ok(Self::Instagram),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Error for unrecognized provider identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

/// Channel entity - one provider connection owned by an organization
///
/// The ingestion pipeline never mutates a channel except `last_sync_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub organization_id: Snowflake,
    pub provider: ProviderKind,
    /// Provider-side account id (page id, phone-number id, ...)
    pub external_id: Option<String>,
    /// Opaque encrypted credential blob (JSON) managed by the channel CRUD surface
    pub credentials: Option<String>,
    /// Per-channel webhook signing secret, when the provider supports one
    pub signing_secret: Option<String>,
    pub active: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    /// Create a new active channel
    pub fn new(
        id: Snowflake,
        organization_id: Snowflake,
        provider: ProviderKind,
        external_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            organization_id,
            provider,
            external_id,
            credentials: None,
            signing_secret: None,
            active: true,
            last_sync_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether this channel can receive events (connected and active)
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.active && self.external_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
        assert_eq!("facebook".parse::<ProviderKind>().unwrap(), ProviderKind::Messenger);
        assert!("telegram".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_channel_usable() {
        let mut channel = Channel::new(
            Snowflake::new(1),
            Snowflake::new(10),
            ProviderKind::WhatsApp,
            Some("15550001111".to_string()),
        );
        assert!(channel.is_usable());

        channel.active = false;
        assert!(!channel.is_usable());

        channel.active = true;
        channel.external_id = None;
        assert!(!channel.is_usable());
    }
}
