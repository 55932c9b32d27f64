//! Pomodoro sessions: repeated focus/break cycles for one subject.
//!
//! Only one session is live at a time. A session runs
//! `focus → break → focus → … → focus` and completes after the last focus
//! phase; there is no trailing break.

mod controller;

pub use controller::PomodoroController;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of focus sessions used when none is requested.
pub const DEFAULT_SESSIONS: u32 = 4;

/// Current phase within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a session is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a Pomodoro session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub subject: String,
    pub total_sessions: u32,
    /// 1-based index of the current focus session.
    pub current_session: u32,
    pub phase: Phase,
    pub status: SessionStatus,
}

impl PomodoroSession {
    fn new(subject: &str, total_sessions: u32) -> Self {
        Self {
            subject: subject.to_string(),
            total_sessions,
            current_session: 1,
            phase: Phase::Focus,
            status: SessionStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

impl std::fmt::Display for PomodoroSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pomodoro for {}: session {}/{}, {} phase ({})",
            self.subject, self.current_session, self.total_sessions, self.phase, self.status
        )
    }
}

/// Phase lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroDurations {
    pub focus: Duration,
    pub short_break: Duration,
}

impl PomodoroDurations {
    pub fn from_minutes(focus: u32, short_break: u32) -> Self {
        Self {
            focus: Duration::from_secs(u64::from(focus) * 60),
            short_break: Duration::from_secs(u64::from(short_break) * 60),
        }
    }

    /// Length of the given phase.
    pub fn of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Focus => self.focus,
            Phase::Break => self.short_break,
        }
    }
}

impl Default for PomodoroDurations {
    fn default() -> Self {
        Self::from_minutes(25, 5)
    }
}
