//! Training document and AI settings models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the training_docs table
#[derive(Debug, Clone, FromRow)]
pub struct TrainingDocModel {
    pub id: i64,
    pub organization_id: i64,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Database model for the organization_ai_settings table
#[derive(Debug, Clone, FromRow)]
pub struct AiSettingsModel {
    pub organization_id: i64,
    pub enabled: bool,
    pub mode: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: i32,
    pub system_prompt: Option<String>,
    pub automation_url: Option<String>,
}
