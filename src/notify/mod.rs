//! Notification sinks for timer and Pomodoro events.
//!
//! Notifications are best-effort: a failing sink never affects the state
//! transition that triggered it.

mod webhook;

pub use webhook::WebhookNotifier;

use crate::config::NotificationSettings;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Trait for delivering user-facing notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message.
    async fn notify(&self, message: &str) -> Result<()>;

    /// Short name used in diagnostics.
    fn name(&self) -> &str;
}

/// Notifier that only writes to the log. Used when no bus is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        info!(target: "studymate::notify", "{}", message);
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Deliver `message`, logging any failure instead of returning it.
pub async fn notify_best_effort(notifier: &dyn Notifier, message: &str) {
    if let Err(e) = notifier.notify(message).await {
        warn!("Failed to send {} notification: {}", notifier.name(), e);
    }
}

/// Build the notifier described by the settings.
pub fn from_settings(settings: &NotificationSettings) -> Result<Arc<dyn Notifier>> {
    match settings.webhook_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => Ok(Arc::new(
            WebhookNotifier::new(url, settings.mentions.clone())?.with_retry(
                settings.attempts,
                Duration::from_secs(settings.retry_delay_secs),
            ),
        )),
        None => Ok(Arc::new(LogNotifier)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::StudyError;
    use std::sync::Mutex;

    /// Records every message it receives.
    #[derive(Default)]
    pub struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> Result<()> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    /// Always fails.
    pub struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _message: &str) -> Result<()> {
            Err(StudyError::Notification("bus unreachable".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FailingNotifier, RecordingNotifier};
    use super::*;

    #[tokio::test]
    async fn test_best_effort_swallows_failures() {
        notify_best_effort(&FailingNotifier, "Timer completed").await;
    }

    #[tokio::test]
    async fn test_best_effort_delivers() {
        let notifier = RecordingNotifier::default();
        notify_best_effort(&notifier, "hello").await;
        assert_eq!(notifier.messages(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_from_settings_defaults_to_log() {
        let notifier = from_settings(&NotificationSettings::default()).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn test_from_settings_webhook() {
        let settings = NotificationSettings {
            webhook_url: Some("http://localhost:5555/messages".to_string()),
            mentions: vec!["user".to_string()],
            ..NotificationSettings::default()
        };
        let notifier = from_settings(&settings).unwrap();
        assert_eq!(notifier.name(), "webhook");
    }
}
