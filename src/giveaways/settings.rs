use super::error::{GiveawayError, GiveawayResult};
use std::collections::HashMap;

/// Key of the AI description toggle
pub const LLM_DESCRIPTION_KEY: &str = "giveaways.llm_description";

/// Declaration of one per-group setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub default_value: &'static str,
}

/// Settings owned by the giveaways feature
pub const SETTING_DEFINITIONS: &[SettingDefinition] = &[SettingDefinition {
    key: LLM_DESCRIPTION_KEY,
    label: "Use AI for descriptions",
    description: "Generate giveaway descriptions with a language model",
    default_value: "false",
}];

/// Typed view of a group's giveaway settings, parsed once from the raw
/// key/value rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GiveawaySettings {
    pub llm_description: bool,
}

impl GiveawaySettings {
    /// Parses the rows of `group_settings`. Unknown keys are ignored,
    /// empty values fall back to the default.
    pub fn from_map(values: &HashMap<String, String>) -> GiveawayResult<Self> {
        let mut settings = Self::default();

        if let Some(raw) = values.get(LLM_DESCRIPTION_KEY).filter(|v| !v.trim().is_empty()) {
            settings.llm_description = parse_bool(LLM_DESCRIPTION_KEY, raw)?;
        }

        Ok(settings)
    }

    /// Description to store for a new giveaway.
    ///
    /// AI generation is not wired in, so the admin's text is always kept.
    pub fn prepare_description(&self, description: &str) -> String {
        if self.llm_description {
            tracing::info!("AI descriptions are enabled but no generator is configured, keeping admin text");
        }
        description.trim().to_string()
    }
}

/// Accepts the usual spellings: `1/t/true/yes/on` and `0/f/false/no/off`
pub fn parse_bool(key: &str, raw: &str) -> GiveawayResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "no" | "off" => Ok(false),
        other => Err(GiveawayError::Validation(format!(
            "invalid boolean '{other}' for setting {key}"
        ))),
    }
}
