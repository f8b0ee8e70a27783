//! Workspace configuration.
//!
//! Read from `<project>/.intake/config.toml` when present. `REDIS_URL` and
//! `OPENAI_API_KEY` from the environment override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IntakeResult;
use crate::questionnaire::ReopenPolicy;

const CONFIG_DIR: &str = ".intake";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default)]
    pub reopen_policy: ReopenPolicy,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

fn default_redis_url() -> String {
    intake_redis::client::DEFAULT_REDIS_URL.to_string()
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            reopen_policy: ReopenPolicy::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl IntakeConfig {
    pub fn path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load the project config, falling back to defaults when no file
    /// exists, then apply environment overrides.
    pub fn load(project_dir: &Path) -> IntakeResult<Self> {
        let path = Self::path(project_dir);
        let mut config = if path.exists() {
            debug!(path = %path.display(), "Loading config");
            let content = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&content)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> IntakeResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `REDIS_URL` and `OPENAI_API_KEY` from a variable source.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("REDIS_URL").filter(|u| !u.trim().is_empty()) {
            self.redis_url = url;
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.assistant.api_key = Some(key);
        }
    }
}

/// Settings of the optional text-generation assistant used for client
/// summaries and fee-quote notes. The questionnaire never depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantAvailability {
    Enabled { model: String },
    Disabled { reason: String },
}

impl AssistantConfig {
    pub fn availability(&self) -> AssistantAvailability {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => AssistantAvailability::Enabled {
                model: self.model.clone(),
            },
            _ => AssistantAvailability::Disabled {
                reason: "OPENAI_API_KEY is not configured; summaries and quote notes are unavailable"
                    .to_string(),
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.availability(), AssistantAvailability::Enabled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IntakeConfig::default();
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.reopen_policy, ReopenPolicy::KeepCompleted);
        assert!(!config.assistant.is_enabled());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = IntakeConfig::from_toml_str(
            r#"
            reopen_policy = "revert_to_in_progress"

            [assistant]
            model = "gpt-4o"
            "#,
        )
        .unwrap();
        assert_eq!(config.reopen_policy, ReopenPolicy::RevertToInProgress);
        assert_eq!(config.assistant.model, "gpt-4o");
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(IntakeConfig::from_toml_str("reopen_policy = 3").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = IntakeConfig::default();
        config.apply_overrides(|key| match key {
            "REDIS_URL" => Some("redis://cache:6380".to_string()),
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        });
        assert_eq!(config.redis_url, "redis://cache:6380");
        assert_eq!(
            config.assistant.availability(),
            AssistantAvailability::Enabled { model: "gpt-4o-mini".to_string() }
        );
    }

    #[test]
    fn test_blank_key_disables_assistant() {
        let assistant = AssistantConfig {
            api_key: Some("   ".to_string()),
            ..AssistantConfig::default()
        };
        assert!(matches!(assistant.availability(), AssistantAvailability::Disabled { .. }));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join(format!("intake-config-{}", uuid::Uuid::new_v4()));
        let config = IntakeConfig::load(&dir).unwrap();
        assert_eq!(config.reopen_policy, ReopenPolicy::KeepCompleted);
    }
}
