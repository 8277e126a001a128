use crate::error::{AssistError, AssistResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Engine
    pub engine: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub engine_timeout_secs: u64,
    pub min_action_chars: usize,

    // Actions
    pub default_target_lang: String,
    pub summary_max_sentences: usize,
    pub summary_max_words: usize,

    // Daemon
    pub socket_path: Option<String>,
    pub max_request_bytes: u64,
    pub audit_enabled: bool,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: "ollama".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            engine_timeout_secs: 10,
            min_action_chars: crate::core::engine::DEFAULT_MIN_ACTION_CHARS,
            default_target_lang: "English".to_string(),
            summary_max_sentences: 3,
            summary_max_words: 60,
            socket_path: None,
            max_request_bytes: 64 * 1024,
            audit_enabled: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from file, or fall back to defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path())?;
        if let Ok(engine) = std::env::var("POLYASSIST_ENGINE") {
            if !engine.trim().is_empty() {
                config.engine = engine.trim().to_lowercase();
            }
        }
        Ok(config)
    }

    /// Load config from an explicit path
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Reject settings the daemon cannot run with
    pub fn validate(&self) -> AssistResult<()> {
        if !self.ollama_url.starts_with("http://") && !self.ollama_url.starts_with("https://") {
            return Err(AssistError::Config(format!(
                "ollama_url must be an http(s) URL, got '{}'",
                self.ollama_url
            )));
        }
        if self.summary_max_sentences == 0 || self.summary_max_words == 0 {
            return Err(AssistError::Config(
                "summary limits must be greater than zero".to_string(),
            ));
        }
        if self.max_request_bytes < 1024 {
            return Err(AssistError::Config(
                "max_request_bytes must be at least 1024".to_string(),
            ));
        }
        Ok(())
    }

    /// Bounded wait applied to a single engine call (zero disables it)
    pub fn engine_timeout(&self) -> Option<Duration> {
        if self.engine_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.engine_timeout_secs))
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("polyassist")
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("POLYASSIST_CONFIG") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    config_dir().join("config.json")
}
