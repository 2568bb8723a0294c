//! Contact database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the contacts table
///
/// One external-id column per provider; each is unique per organization.
#[derive(Debug, Clone, FromRow)]
pub struct ContactModel {
    pub id: i64,
    pub organization_id: i64,
    pub display_name: Option<String>,
    pub whatsapp_id: Option<String>,
    pub messenger_id: Option<String>,
    pub instagram_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
