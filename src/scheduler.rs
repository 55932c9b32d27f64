//! Cancellable deferred tasks.
//!
//! Every background job in Studymate (timer completion, Pomodoro drivers)
//! runs through [`Deferred`], so cancellation is always observable by the
//! task instead of relying on each caller to poll shared state.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Handle to a background task that can be cancelled cooperatively.
#[derive(Debug)]
pub struct Deferred {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Deferred {
    /// Spawn `work`, handing it the token it must observe for cancellation.
    pub fn spawn<F, Fut>(work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(work(token.clone()));
        Self { token, handle }
    }

    /// Run `work` once `deadline` is reached, unless cancelled first.
    ///
    /// Cancellation only prevents `work` from starting; once the deadline
    /// fires the work runs to completion.
    pub fn at<Fut>(deadline: Instant, work: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::spawn(move |token| async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => work.await,
            }
        })
    }

    /// Run `work` after `delay`, unless cancelled first.
    pub fn after<Fut>(delay: Duration, work: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::at(Instant::now() + delay, work)
    }

    /// Request cancellation. The task exits at its next check.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the underlying task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Sleep for `duration`, returning `false` if `token` is cancelled first.
pub async fn sleep_unless_cancelled(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_deferred_runs_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let task = Deferred::after(Duration::from_secs(60), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(!task.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_deferred_never_runs() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let task = Deferred::after(Duration::from_secs(60), async move {
            flag.store(true, Ordering::SeqCst);
        });

        task.cancel();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert!(!fired.load(Ordering::SeqCst));
        assert!(task.is_cancelled());
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_unless_cancelled() {
        let token = CancellationToken::new();
        assert!(sleep_unless_cancelled(&token, Duration::from_secs(5)).await);

        token.cancel();
        assert!(!sleep_unless_cancelled(&token, Duration::from_secs(5)).await);
    }
}
