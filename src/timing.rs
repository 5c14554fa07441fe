//! Scoped execution timing.

use std::time::{Duration, Instant};

use tracing::info;

/// Logs how long a call site took when dropped.
///
/// ```ignore
/// let _timer = ScopedTimer::start("handle_query");
/// // ... work ...
/// ```
pub struct ScopedTimer {
    label: &'static str,
    started: Instant,
}

impl ScopedTimer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        info!(
            label = self.label,
            elapsed = %format_elapsed(self.elapsed()),
            "{} finished",
            self.label
        );
    }
}

/// Human-readable duration: `250ms`, `3.42s`, `2m 5s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.2}s", seconds)
    } else {
        let minutes = (seconds / 60.0).floor() as u64;
        let remaining = seconds % 60.0;
        format!("{}m {:.0}s", minutes, remaining)
    }
}
