//! Configuration settings for Studymate.

use crate::error::{Result, StudyError};
use crate::pomodoro::PomodoroDurations;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub pomodoro: PomodoroSettings,
    pub notifications: NotificationSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Language model settings. Any OpenAI-compatible endpoint works.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model used by the agent and the study tools.
    pub model: String,
    /// Base URL of an OpenAI-compatible API (default: OpenAI).
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Maximum LLM calls per agent run.
    pub max_iterations: usize,
    /// Sampling temperature for study content.
    pub temperature: f32,
    /// Maximum tokens for generated study content.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_iterations: 5,
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 30,
        }
    }
}

/// Pomodoro phase lengths and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroSettings {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    /// Number of focus sessions when none is requested.
    pub default_sessions: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            default_sessions: crate::pomodoro::DEFAULT_SESSIONS,
        }
    }
}

impl PomodoroSettings {
    pub fn durations(&self) -> PomodoroDurations {
        PomodoroDurations::from_minutes(self.focus_minutes, self.break_minutes)
    }
}

/// Where timer and Pomodoro notifications go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Message bus endpoint. Notifications are only logged when unset.
    pub webhook_url: Option<String>,
    /// Recipients mentioned in each message.
    pub mentions: Vec<String>,
    /// Delivery attempts per message, including the first.
    pub attempts: u32,
    /// Pause between delivery attempts.
    pub retry_delay_secs: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            mentions: vec!["user".to_string()],
            attempts: 3,
            retry_delay_secs: 2,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.pomodoro.focus_minutes == 0 || self.pomodoro.break_minutes == 0 {
            return Err(StudyError::Config(
                "pomodoro.focus_minutes and pomodoro.break_minutes must be positive".to_string(),
            ));
        }
        if self.pomodoro.default_sessions == 0 {
            return Err(StudyError::Config(
                "pomodoro.default_sessions must be positive".to_string(),
            ));
        }
        if self.llm.max_iterations == 0 {
            return Err(StudyError::Config(
                "llm.max_iterations must be positive".to_string(),
            ));
        }
        if self.notifications.attempts == 0 {
            return Err(StudyError::Config(
                "notifications.attempts must be positive".to_string(),
            ));
        }
        if let Some(url) = self.notifications.webhook_url.as_deref().filter(|u| !u.is_empty()) {
            url::Url::parse(url).map_err(|e| {
                StudyError::Config(format!("notifications.webhook_url is invalid: {}", e))
            })?;
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| StudyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studymate")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Address the HTTP server binds to.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
