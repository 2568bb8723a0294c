//! Contact entity <-> model mapper

use inbox_core::{Contact, Snowflake};

use crate::models::ContactModel;

impl From<ContactModel> for Contact {
    fn from(model: ContactModel) -> Self {
        Contact {
            id: Snowflake::new(model.id),
            organization_id: Snowflake::new(model.organization_id),
            display_name: model.display_name,
            whatsapp_id: model.whatsapp_id,
            messenger_id: model.messenger_id,
            instagram_id: model.instagram_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
