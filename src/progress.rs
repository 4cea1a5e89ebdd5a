//! How a long render talks back to whoever started it.  The renderer
//! reports percent-complete once per finished row, says when it is
//! done, and polls for cancellation between rows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;

/// Receives progress from a render and may ask it to stop.
pub trait ProgressSink {
    /// Called at row granularity with a value in 0..=100.
    fn on_progress(&mut self, percent: u8);

    /// Called once, after the last row of a render that was not
    /// cancelled.
    fn on_complete(&mut self);

    /// Polled between rows; returning true stops the render with
    /// `FractalError::Cancelled`.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Ignores everything and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _percent: u8) {}
    fn on_complete(&mut self) {}
}

/// Cancels once the shared flag is raised, from any thread.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    /// A flag that has not been raised.
    pub fn new() -> Self {
        CancelFlag::default()
    }

    /// A handle onto the same flag.
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Raises the flag; renders polling it stop at the next row.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl ProgressSink for CancelFlag {
    fn on_progress(&mut self, _percent: u8) {}
    fn on_complete(&mut self) {}

    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Logs every tenth percent.
#[derive(Clone, Debug, Default)]
pub struct LogProgress {
    last: Option<u8>,
}

impl ProgressSink for LogProgress {
    fn on_progress(&mut self, percent: u8) {
        let decile = percent / 10;
        if self.last != Some(decile) {
            self.last = Some(decile);
            info!("Calculating image: {}% complete", percent);
        }
    }

    fn on_complete(&mut self) {
        info!("Calculating image: done");
    }
}

/// Percent of `total` rows done once `done` rows are finished, mapped
/// into the `[from, to]` slice of the overall bar.
pub(crate) fn row_percent(done: usize, total: usize, from: u8, to: u8) -> u8 {
    let span = f64::from(to - from);
    let fraction = done as f64 / total.max(1) as f64;
    (f64::from(from) + fraction * span + 0.5).min(100.0) as u8
}
