//! Debouncer
//!
//! Cancelable scheduled task for search-style callers: every trigger replaces
//! the previous one, and only a task that survives a full quiet period runs.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

// == Debouncer ==
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    // == Trigger ==
    /// Schedules `task` to run after the quiet period, cancelling whatever
    /// was scheduled before, including a superseded task already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel() {
            debug!("debounced task superseded");
        }

        let quiet_period = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            task.await;
        }));
    }

    // == Cancel ==
    /// Drops the scheduled task. Returns whether one was still outstanding.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a scheduled task is waiting or running.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
