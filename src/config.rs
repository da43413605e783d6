use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ui::theme::Theme;

/// What the per-question countdown does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPolicy {
    /// Countdown is shown; running out only changes the label.
    Advisory,
    /// No countdown is shown.
    Off,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    #[serde(default = "default_timer")]
    pub timer: TimerPolicy,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,
    #[serde(default = "default_fast_model")]
    pub fast_model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_theme() -> String {
    "dark".to_string()
}
fn default_batch_size() -> usize {
    10
}
fn default_toast_secs() -> u64 {
    5
}
fn default_timer() -> TimerPolicy {
    TimerPolicy::Advisory
}
fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_reasoning_model() -> String {
    "gemini-3-pro-preview".to_string()
}
fn default_fast_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_request_timeout_secs() -> u64 {
    90
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            batch_size: default_batch_size(),
            toast_secs: default_toast_secs(),
            timer: default_timer(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            reasoning_model: default_reasoning_model(),
            fast_model: default_fast_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pilotprep")
            .join("config.toml")
    }

    /// Clamp numeric fields into usable ranges after deserialization.
    pub fn validate(&mut self) {
        self.batch_size = self.batch_size.clamp(1, 30);
        self.toast_secs = self.toast_secs.clamp(1, 60);
        self.request_timeout_secs = self.request_timeout_secs.clamp(5, 600);
        if Theme::load(&self.theme).is_none() {
            tracing::warn!(theme = %self.theme, "unknown theme, using default");
            self.theme = default_theme();
        }
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn toggle_theme(&mut self) {
        self.theme = if self.theme == "dark" {
            "light".to_string()
        } else {
            "dark".to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.toast_secs, 5);
        assert_eq!(config.timer, TimerPolicy::Advisory);
        assert_eq!(config.fast_model, "gemini-2.5-flash");
        assert!(config.api_base_url.starts_with("https://"));
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
theme = "light"
batch_size = 5
timer = "off"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.timer, TimerPolicy::Off);
        assert_eq!(config.reasoning_model, "gemini-3-pro-preview");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.batch_size, deserialized.batch_size);
        assert_eq!(config.timer, deserialized.timer);
        assert_eq!(config.api_key_env, deserialized.api_key_env);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.batch_size = 0;
        config.toast_secs = 1000;
        config.theme = "no-such-theme".to_string();
        config.validate();
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.toast_secs, 60);
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_validate_keeps_loadable_theme() {
        let mut config = Config::default();
        config.theme = "light".to_string();
        config.validate();
        assert_eq!(config.theme, "light");
    }

    #[test]
    fn test_toggle_theme() {
        let mut config = Config::default();
        config.toggle_theme();
        assert_eq!(config.theme, "light");
        config.toggle_theme();
        assert_eq!(config.theme, "dark");
    }
}
