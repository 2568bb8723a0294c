//! AI configuration and training documents (read-only collaborator data)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Organization-level AI reply mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiMode {
    #[default]
    Off,
    /// Generate a non-committing suggestion for agents; never auto-send
    Suggestion,
    /// Generate and dispatch a reply automatically
    AutoReply,
}

impl AiMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Suggestion => "SUGGESTION",
            Self::AutoReply => "AUTO_REPLY",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "SUGGESTION" => Self::Suggestion,
            "AUTO_REPLY" => Self::AutoReply,
            _ => Self::Off,
        }
    }
}

/// Organization AI settings, owned by the settings collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub organization_id: Snowflake,
    pub enabled: bool,
    pub mode: AiMode,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
    /// Tenant-specific automation webhook URL; falls back to the global default
    pub automation_url: Option<String>,
}

impl AiSettings {
    /// Whether the orchestrator may run at all for this organization
    #[inline]
    pub fn allows_generation(&self) -> bool {
        self.enabled && self.mode != AiMode::Off
    }
}

/// Training document used to ground AI completions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingDoc {
    pub id: Snowflake,
    pub organization_id: Snowflake,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(AiMode::parse("AUTO_REPLY"), AiMode::AutoReply);
        assert_eq!(AiMode::parse("SUGGESTION"), AiMode::Suggestion);
        assert_eq!(AiMode::parse("anything"), AiMode::Off);
    }

    #[test]
    fn test_allows_generation() {
        let mut settings = AiSettings {
            organization_id: Snowflake::new(1),
            enabled: true,
            mode: AiMode::AutoReply,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            system_prompt: None,
            automation_url: None,
        };
        assert!(settings.allows_generation());

        settings.mode = AiMode::Off;
        assert!(!settings.allows_generation());

        settings.mode = AiMode::Suggestion;
        settings.enabled = false;
        assert!(!settings.allows_generation());
    }
}
