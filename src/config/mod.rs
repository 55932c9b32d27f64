//! Configuration module for Studymate.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, Prompts, TutorPrompts};
pub use settings::{
    GeneralSettings, LlmSettings, NotificationSettings, PomodoroSettings, PromptSettings,
    ServerSettings, Settings,
};
