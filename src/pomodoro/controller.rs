//! Single-slot Pomodoro session controller and its driver loop.

use super::{Phase, PomodoroDurations, PomodoroSession, SessionStatus};
use crate::error::{Result, StudyError};
use crate::notify::{notify_best_effort, Notifier};
use crate::scheduler::{sleep_unless_cancelled, Deferred};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Owns the single live Pomodoro session.
///
/// Starting a session replaces whatever session was live before. Each
/// session is tagged with a generation number; a driver only mutates the
/// slot while its generation is still the live one.
#[derive(Clone)]
pub struct PomodoroController {
    shared: Arc<Shared>,
}

struct Shared {
    slot: Mutex<Slot>,
    durations: PomodoroDurations,
    notifier: Arc<dyn Notifier>,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    live: Option<LiveSession>,
}

struct LiveSession {
    generation: u64,
    session: PomodoroSession,
    driver: Deferred,
}

/// Transition produced by the driver at the end of a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PhaseEvent {
    FocusFinished { subject: String, session: u32, total: u32 },
    BreakFinished { subject: String, session: u32, total: u32 },
    Completed { subject: String, total: u32 },
}

impl std::fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseEvent::FocusFinished { subject, session, total } => write!(
                f,
                "Focus session {}/{} completed for {}. Time for a break.",
                session, total, subject
            ),
            PhaseEvent::BreakFinished { subject, session, total } => write!(
                f,
                "Break over. Starting focus session {}/{} for {}.",
                session, total, subject
            ),
            PhaseEvent::Completed { subject, total } => write!(
                f,
                "Pomodoro session completed for {}: {} focus sessions done.",
                subject, total
            ),
        }
    }
}

impl PomodoroController {
    pub fn new(durations: PomodoroDurations, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                durations,
                notifier,
            }),
        }
    }

    pub fn durations(&self) -> PomodoroDurations {
        self.shared.durations
    }

    /// Start a new session, replacing any live one, and launch its driver.
    #[instrument(skip(self))]
    pub fn start(&self, subject: &str, sessions: u32) -> Result<PomodoroSession> {
        if sessions == 0 {
            return Err(StudyError::InvalidInput(
                "A Pomodoro needs at least one session".to_string(),
            ));
        }
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(StudyError::InvalidInput(
                "Pomodoro subject must not be empty".to_string(),
            ));
        }

        let mut slot = self.shared.slot();
        if let Some(previous) = slot.live.take() {
            previous.driver.cancel();
            if previous.session.is_active() {
                info!(
                    "Discarding Pomodoro for {} at session {}/{}",
                    previous.session.subject,
                    previous.session.current_session,
                    previous.session.total_sessions
                );
            }
        }

        slot.generation += 1;
        let generation = slot.generation;
        let session = PomodoroSession::new(subject, sessions);

        let shared = self.shared.clone();
        let driver = Deferred::spawn(move |token| shared.drive(generation, token));

        slot.live = Some(LiveSession {
            generation,
            session: session.clone(),
            driver,
        });

        info!("Pomodoro started for {} with {} sessions", subject, sessions);
        Ok(session)
    }

    /// Current session, if any. Completed sessions are reported until
    /// replaced.
    pub fn get_status(&self) -> Option<PomodoroSession> {
        self.shared.slot().live.as_ref().map(|l| l.session.clone())
    }

    /// Stop the active session and clear the slot.
    #[instrument(skip(self))]
    pub fn stop(&self) -> Result<PomodoroSession> {
        let mut slot = self.shared.slot();
        match slot.live.take() {
            Some(live) if live.session.is_active() => {
                live.driver.cancel();
                info!("Pomodoro for {} stopped", live.session.subject);
                Ok(live.session)
            }
            other => {
                slot.live = other;
                Err(StudyError::NoActiveSession)
            }
        }
    }
}

impl Shared {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Phase of the session with this generation, if it is still live and
    /// active.
    fn live_phase(&self, generation: u64) -> Option<Phase> {
        self.slot()
            .live
            .as_ref()
            .filter(|l| l.generation == generation && l.session.is_active())
            .map(|l| l.session.phase)
    }

    /// Apply the end-of-phase transition for `generation`.
    ///
    /// Returns `None` without touching the slot if that session has been
    /// superseded or stopped.
    fn advance(&self, generation: u64) -> Option<PhaseEvent> {
        let mut slot = self.slot();
        let live = slot
            .live
            .as_mut()
            .filter(|l| l.generation == generation && l.session.is_active())?;
        let session = &mut live.session;
        let phase = session.phase;

        let event = match phase {
            Phase::Focus if session.current_session >= session.total_sessions => {
                session.status = SessionStatus::Completed;
                PhaseEvent::Completed {
                    subject: session.subject.clone(),
                    total: session.total_sessions,
                }
            }
            Phase::Focus => {
                session.phase = Phase::Break;
                PhaseEvent::FocusFinished {
                    subject: session.subject.clone(),
                    session: session.current_session,
                    total: session.total_sessions,
                }
            }
            Phase::Break => {
                session.phase = Phase::Focus;
                session.current_session += 1;
                PhaseEvent::BreakFinished {
                    subject: session.subject.clone(),
                    session: session.current_session,
                    total: session.total_sessions,
                }
            }
        };
        Some(event)
    }

    /// Driver loop for one session generation.
    async fn drive(self: Arc<Self>, generation: u64, token: CancellationToken) {
        loop {
            let Some(phase) = self.live_phase(generation) else {
                return;
            };

            if !sleep_unless_cancelled(&token, self.durations.of(phase)).await {
                debug!("Pomodoro driver {} cancelled", generation);
                return;
            }

            let Some(event) = self.advance(generation) else {
                debug!("Pomodoro driver {} superseded", generation);
                return;
            };

            info!("{}", event);
            notify_best_effort(self.notifier.as_ref(), &event.to_string()).await;

            if matches!(event, PhaseEvent::Completed { .. }) {
                return;
            }
        }
    }
}
