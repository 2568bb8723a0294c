//! PostgreSQL implementation of ContactRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::{Contact, ContactRepository, ProviderKind, RepoResult, Snowflake};

use crate::models::ContactModel;

use super::error::{contact_not_found, map_db_error};

const CONTACT_COLUMNS: &str = "id, organization_id, display_name, whatsapp_id, messenger_id, \
     instagram_id, created_at, updated_at";

/// Column holding the external id for a provider
fn provider_column(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::WhatsApp => "whatsapp_id",
        ProviderKind::Messenger => "messenger_id",
        ProviderKind::Instagram => "instagram_id",
    }
}

/// PostgreSQL implementation of ContactRepository
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    /// Create a new PgContactRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Contact>> {
        let result = sqlx::query_as::<_, ContactModel>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Contact::from))
    }

    #[instrument(skip(self))]
    async fn find_by_provider_id(
        &self,
        organization_id: Snowflake,
        provider: ProviderKind,
        external_id: &str,
    ) -> RepoResult<Option<Contact>> {
        let column = provider_column(provider);
        let result = sqlx::query_as::<_, ContactModel>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             WHERE organization_id = $1 AND {column} = $2"
        ))
        .bind(organization_id.into_inner())
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Contact::from))
    }

    #[instrument(skip(self, contact))]
    async fn create(&self, contact: &Contact) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts
                (id, organization_id, display_name, whatsapp_id, messenger_id, instagram_id,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(contact.id.into_inner())
        .bind(contact.organization_id.into_inner())
        .bind(&contact.display_name)
        .bind(&contact.whatsapp_id)
        .bind(&contact.messenger_id)
        .bind(&contact.instagram_id)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_display_name(&self, id: Snowflake, display_name: &str) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE contacts SET display_name = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(display_name)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(contact_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_column() {
        assert_eq!(provider_column(ProviderKind::WhatsApp), "whatsapp_id");
        assert_eq!(provider_column(ProviderKind::Messenger), "messenger_id");
        assert_eq!(provider_column(ProviderKind::Instagram), "instagram_id");
    }
}
