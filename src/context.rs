//! Shared study state: the timer registry and the Pomodoro slot.

use crate::config::{PomodoroSettings, Settings};
use crate::error::Result;
use crate::notify::{self, Notifier};
use crate::pomodoro::PomodoroController;
use crate::timer::TimerRegistry;
use std::sync::Arc;

/// Everything the study tools and status endpoints operate on.
///
/// Cheap to clone; clones share state. Each instance is independent, so
/// tests can build as many as they like.
#[derive(Clone)]
pub struct StudyContext {
    pub timers: TimerRegistry,
    pub pomodoro: PomodoroController,
    default_sessions: u32,
}

impl StudyContext {
    pub fn new(notifier: Arc<dyn Notifier>, pomodoro: &PomodoroSettings) -> Self {
        Self {
            timers: TimerRegistry::new(notifier.clone()),
            pomodoro: PomodoroController::new(pomodoro.durations(), notifier),
            default_sessions: pomodoro.default_sessions,
        }
    }

    /// Build a context with the notifier described in the settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let notifier = notify::from_settings(&settings.notifications)?;
        Ok(Self::new(notifier, &settings.pomodoro))
    }

    /// Session count used when a Pomodoro is started without one.
    pub fn default_sessions(&self) -> u32 {
        self.default_sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_contexts_are_isolated() {
        let settings = Settings::default();
        let first = StudyContext::from_settings(&settings).unwrap();
        let second = StudyContext::from_settings(&settings).unwrap();

        first.timers.set_timer(5, "math", None).unwrap();
        first.pomodoro.start("math", 2).unwrap();

        assert_eq!(first.timers.list_active().len(), 1);
        assert!(second.timers.list_active().is_empty());
        assert!(second.pomodoro.get_status().is_none());
        assert_eq!(second.timers.set_timer(5, "art", None).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let context = StudyContext::from_settings(&Settings::default()).unwrap();
        let clone = context.clone();
        clone.timers.set_timer(5, "math", None).unwrap();
        assert_eq!(context.timers.list_active().len(), 1);
        assert_eq!(context.default_sessions(), 4);
    }
}
