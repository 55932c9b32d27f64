//! Study timers.
//!
//! A timer is a single-shot countdown tied to a subject. It starts active
//! and ends either completed (the countdown ran out) or cancelled.

mod registry;

pub use registry::{TimerRegistry, DEFAULT_TIMER_NAME};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Timer identifier. Assigned sequentially starting at 1 and never reused.
pub type TimerId = u64;

/// Lifecycle state of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Active,
    Completed,
    Cancelled,
}

impl TimerStatus {
    /// Terminal states never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TimerStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Active => "active",
            TimerStatus::Completed => "completed",
            TimerStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled study timer.
#[derive(Debug, Clone, Serialize)]
pub struct Timer {
    pub id: TimerId,
    pub subject: String,
    pub name: String,
    pub duration_minutes: u32,
    /// Wall-clock time the countdown ends.
    pub end_time: DateTime<Utc>,
    pub status: TimerStatus,
    /// Monotonic deadline used for remaining-time math.
    #[serde(skip)]
    deadline: Instant,
}

impl Timer {
    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Read-model of an active timer, as returned by
/// [`TimerRegistry::list_active`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTimer {
    pub id: TimerId,
    pub name: String,
    pub subject: String,
    pub duration_minutes: u32,
    pub end_time: DateTime<Utc>,
    pub remaining: Duration,
}

impl ActiveTimer {
    /// Whole minutes remaining, rounded down.
    pub fn minutes_remaining(&self) -> u64 {
        self.remaining.as_secs() / 60
    }

    /// Seconds past the last whole minute.
    pub fn seconds_remaining(&self) -> u64 {
        self.remaining.as_secs() % 60
    }
}

impl std::fmt::Display for ActiveTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID {}: {} - {} ({} minutes remaining)",
            self.id,
            self.name,
            self.subject,
            self.minutes_remaining()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!TimerStatus::Active.is_terminal());
        assert!(TimerStatus::Completed.is_terminal());
        assert!(TimerStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_active_timer_display() {
        let timer = ActiveTimer {
            id: 2,
            name: "Review".to_string(),
            subject: "chemistry".to_string(),
            duration_minutes: 30,
            end_time: Utc::now(),
            remaining: Duration::from_secs(12 * 60 + 41),
        };
        assert_eq!(timer.minutes_remaining(), 12);
        assert_eq!(timer.seconds_remaining(), 41);
        assert_eq!(
            timer.to_string(),
            "ID 2: Review - chemistry (12 minutes remaining)"
        );
    }
}
