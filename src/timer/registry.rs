//! Registry of scheduled study timers.

use super::{ActiveTimer, Timer, TimerId, TimerStatus};
use crate::error::{Result, StudyError};
use crate::notify::{notify_best_effort, Notifier};
use crate::scheduler::Deferred;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Name given to timers created without one.
pub const DEFAULT_TIMER_NAME: &str = "Study Session";

/// Process-wide store of timers and their completion tasks.
///
/// Cloning is cheap; clones share the same timers.
#[derive(Clone)]
pub struct TimerRegistry {
    shared: Arc<Shared>,
}

struct Shared {
    table: Mutex<TimerTable>,
    notifier: Arc<dyn Notifier>,
}

struct TimerTable {
    next_id: TimerId,
    timers: BTreeMap<TimerId, TimerEntry>,
}

struct TimerEntry {
    timer: Timer,
    completion: Option<Deferred>,
}

impl TimerRegistry {
    /// Create an empty registry that reports completions to `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            shared: Arc::new(Shared {
                table: Mutex::new(TimerTable {
                    next_id: 1,
                    timers: BTreeMap::new(),
                }),
                notifier,
            }),
        }
    }

    /// Schedule a timer and return its ID without waiting for it.
    #[instrument(skip(self))]
    pub fn set_timer(
        &self,
        duration_minutes: u32,
        subject: &str,
        name: Option<&str>,
    ) -> Result<TimerId> {
        if duration_minutes == 0 {
            return Err(StudyError::InvalidInput(
                "Timer duration must be at least one minute".to_string(),
            ));
        }
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(StudyError::InvalidInput(
                "Timer subject must not be empty".to_string(),
            ));
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_TIMER_NAME);

        let duration = Duration::from_secs(u64::from(duration_minutes) * 60);
        let deadline = Instant::now() + duration;
        let end_time = Utc::now() + chrono::Duration::minutes(i64::from(duration_minutes));

        let mut table = self.shared.table();
        let id = table.next_id;
        table.next_id += 1;

        let shared = self.shared.clone();
        let completion = Deferred::at(deadline, async move { shared.complete(id).await });

        table.timers.insert(
            id,
            TimerEntry {
                timer: Timer {
                    id,
                    subject: subject.to_string(),
                    name: name.to_string(),
                    duration_minutes,
                    end_time,
                    status: TimerStatus::Active,
                    deadline,
                },
                completion: Some(completion),
            },
        );

        info!(
            "Timer {} set: {} for {} ({} minutes)",
            id, name, subject, duration_minutes
        );
        Ok(id)
    }

    /// All active timers in ascending ID order.
    ///
    /// A timer whose deadline has just passed is still listed with zero
    /// minutes remaining until its completion task has run.
    pub fn list_active(&self) -> Vec<ActiveTimer> {
        self.shared
            .table()
            .timers
            .values()
            .filter(|e| e.timer.status == TimerStatus::Active)
            .map(|e| ActiveTimer {
                id: e.timer.id,
                name: e.timer.name.clone(),
                subject: e.timer.subject.clone(),
                duration_minutes: e.timer.duration_minutes,
                end_time: e.timer.end_time,
                remaining: e.timer.remaining(),
            })
            .collect()
    }

    /// Cancel an active timer.
    ///
    /// Unknown IDs and timers that already finished report
    /// [`StudyError::TimerNotFound`].
    #[instrument(skip(self))]
    pub fn cancel(&self, id: TimerId) -> Result<()> {
        let mut table = self.shared.table();
        let entry = table
            .timers
            .get_mut(&id)
            .filter(|e| e.timer.status == TimerStatus::Active)
            .ok_or(StudyError::TimerNotFound(id))?;

        entry.timer.status = TimerStatus::Cancelled;
        if let Some(task) = entry.completion.take() {
            task.cancel();
        }

        info!("Timer {} cancelled", id);
        Ok(())
    }

    /// Snapshot of a timer in any state.
    pub fn get(&self, id: TimerId) -> Option<Timer> {
        self.shared.table().timers.get(&id).map(|e| e.timer.clone())
    }

    /// Number of timers ever created in this registry.
    pub fn len(&self) -> usize {
        self.shared.table().timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Shared {
    fn table(&self) -> MutexGuard<'_, TimerTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Completion callback, run once the timer's deadline passes.
    async fn complete(&self, id: TimerId) {
        let message = {
            let mut table = self.table();
            match table.timers.get_mut(&id) {
                Some(entry) if entry.timer.status == TimerStatus::Active => {
                    entry.timer.status = TimerStatus::Completed;
                    entry.completion = None;
                    format!(
                        "Timer completed: {} for {}",
                        entry.timer.name, entry.timer.subject
                    )
                }
                _ => {
                    debug!("Timer {} no longer active, skipping completion", id);
                    return;
                }
            }
        };

        info!("{}", message);
        notify_best_effort(self.notifier.as_ref(), &message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::{FailingNotifier, RecordingNotifier};
    use crate::notify::LogNotifier;

    fn registry() -> TimerRegistry {
        TimerRegistry::new(Arc::new(LogNotifier))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_strictly_increase() {
        let timers = registry();
        let ids: Vec<TimerId> = (1..=5)
            .map(|d| timers.set_timer(d, "math", None).unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        timers.cancel(5).unwrap();
        assert_eq!(timers.set_timer(1, "math", None).unwrap(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_and_list_immediately() {
        let timers = registry();
        let id = timers.set_timer(25, "physics", Some("Pomodoro Focus")).unwrap();
        assert_eq!(id, 1);

        let active = timers.list_active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, 1);
        assert_eq!(active[0].name, "Pomodoro Focus");
        assert_eq!(active[0].subject, "physics");
        assert!(active[0].minutes_remaining() >= 24 && active[0].minutes_remaining() <= 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_name() {
        let timers = registry();
        let id = timers.set_timer(10, "history", None).unwrap();
        assert_eq!(timers.get(id).unwrap().name, DEFAULT_TIMER_NAME);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_invalid_input() {
        let timers = registry();
        assert!(matches!(
            timers.set_timer(0, "math", None),
            Err(StudyError::InvalidInput(_))
        ));
        assert!(matches!(
            timers.set_timer(5, "   ", None),
            Err(StudyError::InvalidInput(_))
        ));
        assert!(timers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_completes_and_notifies() {
        let notifier = Arc::new(RecordingNotifier::default());
        let timers = TimerRegistry::new(notifier.clone());
        let id = timers.set_timer(1, "math", Some("Drill")).unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(timers.get(id).unwrap().status, TimerStatus::Completed);
        assert!(timers.list_active().is_empty());
        assert_eq!(
            notifier.messages(),
            vec!["Timer completed: Drill for math".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_failure_does_not_block_completion() {
        let timers = TimerRegistry::new(Arc::new(FailingNotifier));
        let id = timers.set_timer(2, "biology", None).unwrap();

        tokio::time::sleep(Duration::from_secs(121)).await;

        assert_eq!(timers.get(id).unwrap().status, TimerStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_twice() {
        let notifier = Arc::new(RecordingNotifier::default());
        let timers = TimerRegistry::new(notifier.clone());
        let id = timers.set_timer(5, "math", None).unwrap();

        assert!(timers.cancel(id).is_ok());
        assert!(matches!(timers.cancel(id), Err(StudyError::TimerNotFound(1))));
        assert_eq!(timers.get(id).unwrap().status, TimerStatus::Cancelled);

        // The cancelled timer must not complete later.
        tokio::time::sleep(Duration::from_secs(10 * 60)).await;
        assert_eq!(timers.get(id).unwrap().status, TimerStatus::Cancelled);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_completion_is_noop() {
        let timers = registry();
        let id = timers.set_timer(1, "math", None).unwrap();
        tokio::time::sleep(Duration::from_secs(90)).await;

        assert!(matches!(timers.cancel(id), Err(StudyError::TimerNotFound(_))));
        assert_eq!(timers.get(id).unwrap().status, TimerStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_unknown() {
        let timers = registry();
        assert!(matches!(timers.cancel(42), Err(StudyError::TimerNotFound(42))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_active_excludes_terminal_timers() {
        let timers = registry();
        let short = timers.set_timer(1, "math", None).unwrap();
        let cancelled = timers.set_timer(30, "art", None).unwrap();
        let running = timers.set_timer(45, "music", None).unwrap();
        timers.cancel(cancelled).unwrap();

        tokio::time::sleep(Duration::from_secs(2 * 60)).await;

        let ids: Vec<TimerId> = timers.list_active().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![running]);
        assert_eq!(timers.get(short).unwrap().status, TimerStatus::Completed);
        assert_eq!(timers.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_active_orders_by_id() {
        let timers = registry();
        timers.set_timer(50, "c", None).unwrap();
        timers.set_timer(10, "a", None).unwrap();
        timers.set_timer(30, "b", None).unwrap();

        let ids: Vec<TimerId> = timers.list_active().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_counts_down() {
        let timers = registry();
        timers.set_timer(10, "math", None).unwrap();
        tokio::time::sleep(Duration::from_secs(4 * 60 + 30)).await;

        let active = timers.list_active();
        assert_eq!(active[0].minutes_remaining(), 5);
        assert_eq!(active[0].seconds_remaining(), 30);
    }
}
