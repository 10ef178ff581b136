//! Execution timing helpers

use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock timer for one named operation
#[derive(Debug, Clone)]
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Name given at construction
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Run `f`, log how long it took, and hand back its result untouched.
pub fn timed<T, F>(label: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    timed_with_elapsed(label, f).0
}

/// Like [`timed`], but also returns the measured duration.
pub fn timed_with_elapsed<T, F>(label: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let timer = Timer::start(label);
    let result = f();
    let elapsed = timer.elapsed();
    debug!(
        operation = timer.name(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Execution time"
    );
    (result, elapsed)
}
