//! PostgreSQL implementation of AiSettingsRepository (read-only boundary)

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::{AiSettings, AiSettingsRepository, RepoResult, Snowflake};

use crate::models::AiSettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AiSettingsRepository
#[derive(Clone)]
pub struct PgAiSettingsRepository {
    pool: PgPool,
}

impl PgAiSettingsRepository {
    /// Create a new PgAiSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AiSettingsRepository for PgAiSettingsRepository {
    #[instrument(skip(self))]
    async fn find(&self, organization_id: Snowflake) -> RepoResult<Option<AiSettings>> {
        let result = sqlx::query_as::<_, AiSettingsModel>(
            r#"
            SELECT organization_id, enabled, mode, model, temperature, max_tokens,
                   system_prompt, automation_url
            FROM organization_ai_settings
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(AiSettings::from))
    }
}
