//! Progress and ETA derivation.
//!
//! Pure functions of `(scanned, total, elapsed)` plus a small holder for the
//! scan start time. Rendering is left to the caller.

use std::fmt;
use std::time::{Duration, Instant};

/// Estimated time to completion.
///
/// `elapsed * (total - scanned) / scanned`, in integer nanoseconds so the
/// same inputs always give the same estimate. `None` until something has
/// been scanned.
pub fn estimate_remaining(scanned: usize, total: usize, elapsed: Duration) -> Option<Duration> {
    if scanned == 0 {
        return None;
    }
    let remaining = total.saturating_sub(scanned) as u128;
    let nanos = elapsed.as_nanos() * remaining / scanned as u128;
    Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
}

/// Format an ETA: `"Ns"` under a minute, `"Mm Ss"` under an hour, `"Hh Mm"`
/// beyond. Each unit is truncated, never rounded.
pub fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Tracks when a scan started and turns counter updates into snapshots.
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    started: Instant,
}

impl ProgressReporter {
    /// Start the clock now.
    pub fn start() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self { started }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self, scanned: usize, total: usize) -> ProgressSnapshot {
        ProgressSnapshot::new(scanned, total, self.elapsed())
    }
}

/// Progress at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub scanned: usize,
    pub total: usize,
    pub elapsed: Duration,
    pub eta: Option<Duration>,
}

impl ProgressSnapshot {
    pub fn new(scanned: usize, total: usize, elapsed: Duration) -> Self {
        Self {
            scanned,
            total,
            elapsed,
            eta: estimate_remaining(scanned, total, elapsed),
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.scanned as f64 * 100.0 / self.total as f64
        }
    }

    /// Formatted ETA, or `"calculating..."` before the first probe completes.
    pub fn eta_display(&self) -> String {
        self.eta
            .map(format_eta)
            .unwrap_or_else(|| "calculating...".to_string())
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanned {}/{} ports ({:.1}%) | Elapsed: {:.1}s | ETC: {}",
            self.scanned,
            self.total,
            self.percent(),
            self.elapsed.as_secs_f64(),
            self.eta_display()
        )
    }
}
