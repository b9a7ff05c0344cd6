//! Benchmark profiles and utilities for the Calor heat-equation solvers.
//!
//! Each profile reproduces the constants of one reference benchmark:
//!
//! - [`spectral_profile`]: silver, dt = 0.005 to t = 60, snapshot every 100 steps
//! - [`stencil_profile`]: silver, dt = 0.0003 to t = 60, snapshot every 1667 steps
//! - [`laplace_profile`]: α = 0.01, dt = 1e-4 to t = 0.05, narrow pulse, no snapshots
//!
//! [`profile`] picks the matching one for a [`SolverKind`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::Instant;

use calor_engine::{ConfigError, Duration, RunConfig, RunOutput, SolverKind, StepError, TimeStepper};
use calor_grid::GaussianBump;

/// A configuration plus how many times the reference benchmark repeats it.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchProfile {
    /// Solver under test.
    pub kind: SolverKind,
    /// Run configuration.
    pub config: RunConfig,
    /// Repetitions averaged into the reported time.
    pub executions: u32,
}

/// Spectral benchmark at `nx × ny`. Matches [`RunConfig::default`].
pub fn spectral_profile(nx: usize, ny: usize) -> RunConfig {
    RunConfig::with_resolution(nx, ny)
}

/// Explicit-stencil benchmark at `nx × ny`.
///
/// dt = 0.0003 stays inside the stability limit up to roughly 2200² points.
pub fn stencil_profile(nx: usize, ny: usize) -> RunConfig {
    RunConfig {
        dt: 3e-4,
        save_interval: 1667,
        ..RunConfig::with_resolution(nx, ny)
    }
}

/// Sparse-Laplacian benchmark at `nx × ny`.
///
/// The pulse is `100 · exp(-100 r²)`, i.e. σ = 1/√200.
pub fn laplace_profile(nx: usize, ny: usize) -> RunConfig {
    RunConfig {
        alpha: 0.01,
        dt: 1e-4,
        duration: Duration::Until(0.05),
        save_interval: 0,
        initial: GaussianBump {
            sigma: (1.0f64 / 200.0).sqrt(),
            ..GaussianBump::default()
        },
        ..RunConfig::with_resolution(nx, ny)
    }
}

/// The reference profile for `kind`.
pub fn profile(kind: SolverKind, nx: usize, ny: usize) -> BenchProfile {
    match kind {
        SolverKind::Spectral(_) => BenchProfile {
            kind,
            config: spectral_profile(nx, ny),
            executions: 1,
        },
        SolverKind::Stencil => BenchProfile {
            kind,
            config: stencil_profile(nx, ny),
            executions: 1,
        },
        SolverKind::Sparse => BenchProfile {
            kind,
            config: laplace_profile(nx, ny),
            executions: 20,
        },
    }
}

/// Why a timed run failed.
#[derive(Debug)]
pub enum BenchError {
    /// Setup was rejected.
    Config(ConfigError),
    /// A step failed.
    Step(StepError),
}

impl std::fmt::Display for BenchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Step(e) => write!(f, "step: {e}"),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for BenchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for BenchError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

/// Run `profile` `executions` times (at least once) and return the mean
/// wall time in seconds with the output of the last run.
pub fn time_profile(profile: &BenchProfile) -> Result<(f64, RunOutput), BenchError> {
    let runs = profile.executions.max(1);
    let mut total = 0.0;
    let mut last = None;
    for _ in 0..runs {
        let t0 = Instant::now();
        let output = TimeStepper::from_config(&profile.config, profile.kind)?.run()?;
        total += t0.elapsed().as_secs_f64();
        last = Some(output);
    }
    match last {
        Some(output) => Ok((total / runs as f64, output)),
        None => Err(BenchError::Step(StepError::Aborted)),
    }
}
