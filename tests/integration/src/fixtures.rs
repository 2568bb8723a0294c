//! Database fixtures for integration tests

use anyhow::Result;
use inbox_core::{ProviderKind, Snowflake};
use sqlx::PgPool;
use std::sync::atomic::{AtomicI64, Ordering};

static FIXTURE_COUNTER: AtomicI64 = AtomicI64::new(9_000_000);

/// Generate a unique fixture id
pub fn fixture_id() -> Snowflake {
    Snowflake::new(FIXTURE_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// A seeded tenant with one connected channel
pub struct TenantFixture {
    pub organization_id: Snowflake,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    /// Provider-side channel id to target in webhook payloads
    pub channel_external_id: String,
}

/// Seed an organization, one notifiable member, and an active WhatsApp
/// channel
pub async fn seed_tenant(pool: &PgPool) -> Result<TenantFixture> {
    let organization_id = fixture_id();
    let user_id = fixture_id();
    let channel_id = fixture_id();
    let channel_external_id = format!("pn-{channel_id}");

    sqlx::query("INSERT INTO organizations (id, name) VALUES ($1, $2)")
        .bind(organization_id.into_inner())
        .bind(format!("org-{organization_id}"))
        .execute(pool)
        .await?;

    sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
        .bind(user_id.into_inner())
        .bind(format!("agent-{user_id}@example.com"))
        .execute(pool)
        .await?;

    sqlx::query(
        "INSERT INTO organization_members (organization_id, user_id, role, active) \
         VALUES ($1, $2, 'AGENT', TRUE)",
    )
    .bind(organization_id.into_inner())
    .bind(user_id.into_inner())
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO channels (id, organization_id, provider, external_id, credentials, active) \
         VALUES ($1, $2, $3, $4, $5, TRUE)",
    )
    .bind(channel_id.into_inner())
    .bind(organization_id.into_inner())
    .bind(ProviderKind::WhatsApp.as_str())
    .bind(&channel_external_id)
    .bind(r#"{"access_token":"fixture-token"}"#)
    .execute(pool)
    .await?;

    Ok(TenantFixture {
        organization_id,
        user_id,
        channel_id,
        channel_external_id,
    })
}

/// A WhatsApp text-message webhook body targeting a fixture channel
pub fn whatsapp_text_body(
    channel_external_id: &str,
    message_id: &str,
    from: &str,
    text: &str,
) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {"phone_number_id": channel_external_id},
                    "contacts": [{"profile": {"name": "Fixture Contact"}, "wa_id": from}],
                    "messages": [{
                        "from": from,
                        "id": message_id,
                        "timestamp": "1700000000",
                        "type": "text",
                        "text": {"body": text}
                    }]
                }
            }]
        }]
    }))
    .expect("fixture body serializes")
}
