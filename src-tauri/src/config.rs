//! Backend configuration
//!
//! Read from `<app_config_dir>/config.json`. A missing file means defaults;
//! `ANTHROPIC_API_KEY` and `TASKDECK_USER` override the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-3-5-haiku-latest".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Signed-in user; `None` runs the app in preview mode
    pub user_id: Option<String>,
    pub database_file: String,
    pub anthropic: AnthropicConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            database_file: "taskdeck.db".to_string(),
            anthropic: AnthropicConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `dir`, then apply environment overrides
    pub fn load(dir: &Path) -> DomainResult<Self> {
        let mut config = Self::from_file(&dir.join(CONFIG_FILE))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Internal(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| DomainError::InvalidInput(format!("Malformed {}: {}", path.display(), e)))
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.anthropic.api_key = Some(key);
        }
        if let Some(user) = var("TASKDECK_USER").filter(|u| !u.trim().is_empty()) {
            self.user_id = Some(user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_file, "taskdeck.db");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"user_id":"ana","anthropic":{"max_tokens":256}}"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.user_id.as_deref(), Some("ana"));
        assert_eq!(config.anthropic.max_tokens, 256);
        assert_eq!(config.anthropic.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ user_id: ").unwrap();
        assert!(matches!(AppConfig::from_file(&path), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "ANTHROPIC_API_KEY" => Some("sk-test".to_string()),
            "TASKDECK_USER" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.user_id, None);
    }
}
