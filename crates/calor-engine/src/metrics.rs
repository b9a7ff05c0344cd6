//! Per-run performance metrics.
//!
//! [`RunMetrics`] is filled in by the
//! [`TimeStepper`](crate::TimeStepper) as it goes and handed back with the
//! [`RunOutput`](crate::RunOutput). The engine itself never logs.

/// Timing and counters for one run.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Time spent in `prepare()` (forward transform for spectral solvers).
    pub prepare_us: u64,
    /// Cumulative time spent in `advance()`.
    pub stepping_us: u64,
    /// Cumulative time spent materializing periodic snapshots.
    pub capture_us: u64,
    /// Time spent materializing the final field.
    pub finalize_us: u64,
    /// Steps executed.
    pub steps: u64,
    /// Snapshots stored (after deduplication).
    pub captures: u64,
}

impl RunMetrics {
    /// Sum of all timed phases.
    pub fn total_us(&self) -> u64 {
        self.prepare_us + self.stepping_us + self.capture_us + self.finalize_us
    }

    /// Mean `advance()` time, or `None` if no step ran.
    pub fn mean_step_us(&self) -> Option<f64> {
        (self.steps > 0).then(|| self.stepping_us as f64 / self.steps as f64)
    }
}

pub(crate) fn elapsed_us(start: std::time::Instant) -> u64 {
    start.elapsed().as_micros() as u64
}
