//! Busy flag with a minimum visible duration.
//!
//! `show()` raises the flag. `hide()` lowers it immediately when the flag has
//! been up for at least the minimum duration, otherwise it schedules the
//! transition for the remainder. A later `show()` cancels a scheduled
//! transition so a stale timer can never clear a fresh busy period.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{sleep, Instant},
};
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

pub const DEFAULT_MIN_DISPLAY: Duration = Duration::from_millis(3000);

#[derive(Default)]
struct LoadingTimer {
    started_at: Option<Instant>,
    pending_hide: Option<JoinHandle<()>>,
}

impl LoadingTimer {
    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending_hide.take() {
            task.abort();
        }
    }
}

pub struct LoadingFeedback {
    min_display: Duration,
    state: Arc<watch::Sender<bool>>,
    timer: Mutex<LoadingTimer>,
}

impl Default for LoadingFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingFeedback {
    pub fn new() -> Self {
        Self::with_min_display(DEFAULT_MIN_DISPLAY)
    }

    pub fn with_min_display(min_display: Duration) -> Self {
        let (state, _) = watch::channel(false);
        Self {
            min_display,
            state: Arc::new(state),
            timer: Mutex::new(LoadingTimer::default()),
        }
    }

    pub fn min_display(&self) -> Duration {
        self.min_display
    }

    pub fn show(&self) {
        let mut timer = self.timer();
        timer.cancel_pending();
        timer.started_at = Some(Instant::now());
        self.state.send_replace(true);
    }

    /// Must be called from within a tokio runtime: a deferred transition is a
    /// spawned task.
    pub fn hide(&self) {
        let mut timer = self.timer();
        timer.cancel_pending();

        let remaining = timer
            .started_at
            .map(|started_at| self.min_display.saturating_sub(started_at.elapsed()))
            .unwrap_or(Duration::ZERO);

        if remaining.is_zero() {
            self.state.send_replace(false);
            return;
        }

        debug!(
            remaining_ms = remaining.as_millis() as u64,
            "deferring busy flag release"
        );
        let state = Arc::clone(&self.state);
        timer.pending_hide = Some(tokio::spawn(async move {
            sleep(remaining).await;
            state.send_replace(false);
        }));
    }

    pub fn is_loading(&self) -> bool {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Yields the current value first, then every change.
    pub fn stream(&self) -> WatchStream<bool> {
        WatchStream::new(self.state.subscribe())
    }

    fn timer(&self) -> MutexGuard<'_, LoadingTimer> {
        self.timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for LoadingFeedback {
    fn drop(&mut self) {
        self.timer().cancel_pending();
    }
}

#[cfg(test)]
#[path = "tests/loading_tests.rs"]
mod tests;
