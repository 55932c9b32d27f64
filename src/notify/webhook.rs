//! Webhook notifier that posts messages to an external message bus.

use super::Notifier;
use crate::error::{Result, StudyError};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const WEBHOOK_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Posts `{content, mentions}` JSON to a configured URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Url,
    mentions: Vec<String>,
    attempts: u32,
    retry_delay: Duration,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    mentions: &'a [String],
}

impl WebhookNotifier {
    /// Create a notifier for the given endpoint.
    pub fn new(url: &str, mentions: Vec<String>) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| StudyError::Config(format!("Invalid webhook URL '{}': {}", url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(StudyError::Config(format!(
                "Webhook URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url,
            mentions,
            attempts: DEFAULT_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Try each message up to `attempts` times, pausing `delay` in between.
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    async fn post(&self, payload: &WebhookPayload<'_>) -> Result<()> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StudyError::Notification(format!(
                "Webhook returned {}",
                status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn notify(&self, message: &str) -> Result<()> {
        let payload = WebhookPayload {
            content: message,
            mentions: &self.mentions,
        };

        let mut attempt = 1;
        loop {
            match self.post(&payload).await {
                Ok(()) => break,
                Err(e) if attempt < self.attempts => {
                    warn!(
                        "Webhook attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, self.attempts, e, self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!("Notification delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        assert!(WebhookNotifier::new("not a url", vec![]).is_err());
        assert!(WebhookNotifier::new("ftp://example.com/bus", vec![]).is_err());
    }

    #[test]
    fn test_payload_shape() {
        let mentions = vec!["user".to_string()];
        let payload = WebhookPayload {
            content: "Timer completed: Review for math",
            mentions: &mentions,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["content"], "Timer completed: Review for math");
        assert_eq!(json["mentions"][0], "user");
    }

    mod delivery {
        use super::*;
        use axum::{extract::State, http::StatusCode, routing::post, Router};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        /// Bus stub that rejects the first `failures` deliveries.
        struct FlakyBus {
            hits: AtomicUsize,
            failures: usize,
        }

        async fn receive(State(bus): State<Arc<FlakyBus>>) -> StatusCode {
            let hit = bus.hits.fetch_add(1, Ordering::SeqCst) + 1;
            if hit <= bus.failures {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::OK
            }
        }

        async fn spawn_bus(failures: usize) -> (Arc<FlakyBus>, String) {
            let bus = Arc::new(FlakyBus {
                hits: AtomicUsize::new(0),
                failures,
            });
            let app = Router::new()
                .route("/bus", post(receive))
                .with_state(bus.clone());
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            (bus, format!("http://{}/bus", addr))
        }

        #[tokio::test]
        async fn test_retries_until_delivered() {
            let (bus, url) = spawn_bus(2).await;
            let notifier = WebhookNotifier::new(&url, vec![])
                .unwrap()
                .with_retry(3, Duration::from_millis(10));

            notifier.notify("Timer completed: Review for math").await.unwrap();
            assert_eq!(bus.hits.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_gives_up_after_last_attempt() {
            let (bus, url) = spawn_bus(usize::MAX).await;
            let notifier = WebhookNotifier::new(&url, vec![])
                .unwrap()
                .with_retry(2, Duration::from_millis(10));

            let err = notifier.notify("Break over").await.unwrap_err();
            assert!(matches!(err, StudyError::Notification(_)));
            assert_eq!(bus.hits.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_zero_attempts_still_tries_once() {
            let (bus, url) = spawn_bus(0).await;
            let notifier = WebhookNotifier::new(&url, vec![])
                .unwrap()
                .with_retry(0, Duration::ZERO);

            notifier.notify("Pomodoro session completed").await.unwrap();
            assert_eq!(bus.hits.load(Ordering::SeqCst), 1);
        }
    }
}
