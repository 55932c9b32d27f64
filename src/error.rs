//! Error types for Studymate.

use thiserror::Error;

/// Library-level error type for Studymate operations.
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No timer found with ID {0}")]
    TimerNotFound(u64),

    #[error("No active Pomodoro session")]
    NoActiveSession,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

impl StudyError {
    /// Whether the error was caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StudyError::InvalidInput(_) | StudyError::TimerNotFound(_) | StudyError::NoActiveSession
        )
    }
}

/// Result type alias for Studymate operations.
pub type Result<T> = std::result::Result<T, StudyError>;
