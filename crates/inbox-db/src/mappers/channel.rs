//! Channel entity <-> model mapper

use inbox_core::{Channel, ProviderKind, Snowflake};

use crate::models::ChannelModel;

/// Parse the stored provider column; rows are only ever written from the
/// enum, so unknown values cannot occur outside manual edits
pub(crate) fn parse_provider(s: &str) -> ProviderKind {
    s.parse().unwrap_or(ProviderKind::WhatsApp)
}

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            organization_id: Snowflake::new(model.organization_id),
            provider: parse_provider(&model.provider),
            external_id: model.external_id,
            credentials: model.credentials,
            signing_secret: model.signing_secret,
            active: model.active,
            last_sync_at: model.last_sync_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("messenger"), ProviderKind::Messenger);
        assert_eq!(parse_provider("instagram"), ProviderKind::Instagram);
        assert_eq!(parse_provider("whatsapp"), ProviderKind::WhatsApp);
    }
}
