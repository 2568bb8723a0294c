//! Training document and AI settings mappers

use inbox_core::{AiMode, AiSettings, Snowflake, TrainingDoc};

use crate::models::{AiSettingsModel, TrainingDocModel};

impl From<TrainingDocModel> for TrainingDoc {
    fn from(model: TrainingDocModel) -> Self {
        TrainingDoc {
            id: Snowflake::new(model.id),
            organization_id: Snowflake::new(model.organization_id),
            title: model.title,
            content: model.content,
            active: model.active,
            updated_at: model.updated_at,
        }
    }
}

impl From<AiSettingsModel> for AiSettings {
    fn from(model: AiSettingsModel) -> Self {
        AiSettings {
            organization_id: Snowflake::new(model.organization_id),
            enabled: model.enabled,
            mode: AiMode::parse(&model.mode),
            model: model.model,
            temperature: model.temperature,
            max_tokens: model.max_tokens.max(0) as u32,
            system_prompt: model.system_prompt,
            automation_url: model.automation_url,
        }
    }
}
