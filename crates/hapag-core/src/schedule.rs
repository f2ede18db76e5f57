//! Fixed-interval background task shared by both pollers.
//!
//! Cycles run one at a time inside the task. A cycle that outlasts the period
//! swallows the ticks it missed instead of queueing them, so requests never
//! overlap.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to a running periodic task.
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub(crate) struct PeriodicTask {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl PeriodicTask {
    /// Spawn `cycle` every `period`, starting immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<F, Fut>(name: &'static str, period: Duration, mut cycle: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            biased;
                            _ = task_token.cancelled() => break,
                            _ = cycle() => {}
                        }
                    }
                }
            }

            debug!("{} task stopped", name);
        });

        Self {
            handle,
            cancel_token,
        }
    }

    /// Whether the task is still looping.
    pub(crate) fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled() && !self.handle.is_finished()
    }

    /// Signal the task to stop at its next await point.
    pub(crate) fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
