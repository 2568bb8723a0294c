//! Contact entity - a tenant-scoped end-user identity

use chrono::{DateTime, Utc};

use crate::entities::ProviderKind;
use crate::value_objects::Snowflake;

/// Contact entity
///
/// Keyed per provider by one external-id column. Identity fields are
/// immutable once set; only the display name may be refreshed from later
/// events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: Snowflake,
    pub organization_id: Snowflake,
    pub display_name: Option<String>,
    pub whatsapp_id: Option<String>,
    pub messenger_id: Option<String>,
    pub instagram_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Create a contact identified on one provider
    pub fn from_provider_id(
        id: Snowflake,
        organization_id: Snowflake,
        provider: ProviderKind,
        external_id: impl Into<String>,
        display_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let mut contact = Self {
            id,
            organization_id,
            display_name,
            whatsapp_id: None,
            messenger_id: None,
            instagram_id: None,
            created_at: now,
            updated_at: now,
        };
        contact.set_provider_id(provider, external_id.into());
        contact
    }

    /// Get the external id for a provider, if known
    #[must_use]
    pub fn provider_id(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::WhatsApp => self.whatsapp_id.as_deref(),
            ProviderKind::Messenger => self.messenger_id.as_deref(),
            ProviderKind::Instagram => self.instagram_id.as_deref(),
        }
    }

    /// Set the external id column for a provider
    pub fn set_provider_id(&mut self, provider: ProviderKind, external_id: String) {
        match provider {
            ProviderKind::WhatsApp => self.whatsapp_id = Some(external_id),
            ProviderKind::Messenger => self.messenger_id = Some(external_id),
            ProviderKind::Instagram => self.instagram_id = Some(external_id),
        }
    }

    /// Whether an incoming display name should replace the stored one
    #[must_use]
    pub fn needs_name_refresh(&self, incoming: Option<&str>) -> bool {
        match incoming {
            Some(name) if !name.trim().is_empty() => self.display_name.as_deref() != Some(name),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact::from_provider_id(
            Snowflake::new(1),
            Snowflake::new(10),
            ProviderKind::Messenger,
            "psid-123",
            Some("Ada".to_string()),
        )
    }

    #[test]
    fn test_provider_id_column() {
        let c = contact();
        assert_eq!(c.provider_id(ProviderKind::Messenger), Some("psid-123"));
        assert_eq!(c.provider_id(ProviderKind::WhatsApp), None);
    }

    #[test]
    fn test_name_refresh() {
        let c = contact();
        assert!(!c.needs_name_refresh(Some("Ada")));
        assert!(c.needs_name_refresh(Some("Ada L.")));
        assert!(!c.needs_name_refresh(Some("   ")));
        assert!(!c.needs_name_refresh(None));
    }
}
