//! Run orchestration for the Calor heat-equation solvers.
//!
//! Ties a validated [`RunConfig`] to a [`Solver`], drives it with the
//! [`TimeStepper`] state machine, and collects snapshots into a
//! [`SnapshotStore`]. No file I/O happens here; see `calor-io`.
//!
//! ```
//! use calor_engine::{Duration, RunConfig, SolverKind, TimeStepper};
//!
//! let config = RunConfig {
//!     duration: Duration::Steps(10),
//!     save_interval: 3,
//!     ..RunConfig::with_resolution(16, 16)
//! };
//! let output = TimeStepper::from_config(&config, SolverKind::default())?.run()?;
//! assert_eq!(output.snapshots.len(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod metrics;
pub mod snapshot;
pub mod stepper;

pub use cancel::CancelToken;
pub use config::{ConfigError, Duration, RunConfig};
pub use metrics::RunMetrics;
pub use snapshot::{Snapshot, SnapshotStore};
pub use stepper::{Phase, RunOutput, StepError, TimeStepper};

use std::fmt;
use std::str::FromStr;

use calor_core::{Solver, SolverError};
use calor_grid::Grid;
use calor_solvers::{ExplicitStencil, SparseLaplacian, SpectralOperator, SpectralSolver};
use calor_transform::{build_engine, DctBackend};

/// Which numerical strategy a run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Exact modal decay in the cosine basis.
    Spectral(DctBackend),
    /// Forward Euler with the 5-point stencil.
    Stencil,
    /// Forward Euler with an assembled sparse Laplacian.
    Sparse,
}

impl Default for SolverKind {
    fn default() -> Self {
        Self::Spectral(DctBackend::default())
    }
}

impl SolverKind {
    /// Every strategy, spectral backends first.
    pub const ALL: [SolverKind; 4] = [
        Self::Spectral(DctBackend::Fft),
        Self::Spectral(DctBackend::Direct),
        Self::Stencil,
        Self::Sparse,
    ];

    /// Identifier used in output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spectral(DctBackend::Fft) => "seq_fft",
            Self::Spectral(DctBackend::Direct) => "seq_dct",
            Self::Stencil => "seq_stencil_explicit",
            Self::Sparse => "seq_laplace",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fft" | "spectral" => return Ok(Self::Spectral(DctBackend::Fft)),
            "dct" | "direct" => return Ok(Self::Spectral(DctBackend::Direct)),
            "stencil" => return Ok(Self::Stencil),
            "laplace" | "sparse" => return Ok(Self::Sparse),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|k| k.label() == s)
            .ok_or_else(|| {
                format!("unknown solver '{s}' (expected fft|dct|stencil|laplace)")
            })
    }
}

/// Build the solver `kind` for `grid`.
///
/// # Errors
///
/// [`ConfigError::Parameter`] for a bad `alpha`/`dt`,
/// [`ConfigError::Unstable`] if an explicit solver cannot take `dt`.
pub fn build_solver(
    kind: SolverKind,
    grid: &Grid,
    alpha: f64,
    dt: f64,
) -> Result<Box<dyn Solver>, ConfigError> {
    let label = kind.label();
    let lift = |e: SolverError| ConfigError::from_solver(label, e);
    let solver: Box<dyn Solver> = match kind {
        SolverKind::Spectral(backend) => {
            let operator = SpectralOperator::builder(grid).alpha(alpha).dt(dt).build()?;
            let engine = build_engine(backend, grid.nx(), grid.ny());
            let solver = SpectralSolver::new(engine, operator)
                .map_err(|e| lift(e.into()))?
                .with_name(label);
            Box::new(solver)
        }
        SolverKind::Stencil => Box::new(ExplicitStencil::new(grid, alpha, dt).map_err(lift)?),
        SolverKind::Sparse => Box::new(SparseLaplacian::new(grid, alpha, dt).map_err(lift)?),
    };
    Ok(solver)
}

impl TimeStepper {
    /// Validate `config`, build its grid, initial field, and solver, and
    /// return a stepper ready to run.
    pub fn from_config(config: &RunConfig, kind: SolverKind) -> Result<Self, ConfigError> {
        let (grid, initial) = config.build()?;
        let solver = build_solver(kind, &grid, config.alpha, config.dt)?;
        TimeStepper::new(
            solver,
            initial,
            config.dt,
            config.num_steps(),
            config.save_interval,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_and_label() {
        for kind in SolverKind::ALL {
            assert_eq!(kind.label().parse::<SolverKind>(), Ok(kind));
        }
        assert_eq!("fft".parse(), Ok(SolverKind::Spectral(DctBackend::Fft)));
        assert_eq!("laplace".parse(), Ok(SolverKind::Sparse));
        assert!("gpu".parse::<SolverKind>().is_err());
        assert_eq!(SolverKind::default().to_string(), "seq_fft");
    }

    #[test]
    fn built_solver_carries_label() {
        let grid = Grid::new(8, 8, 1.0, 1.0).unwrap();
        for kind in SolverKind::ALL {
            let s = build_solver(kind, &grid, 1e-3, 1e-3).unwrap();
            assert_eq!(s.name(), kind.label());
        }
    }

    #[test]
    fn explicit_kinds_report_unstable_with_name() {
        let grid = Grid::new(11, 11, 1.0, 1.0).unwrap();
        for kind in [SolverKind::Stencil, SolverKind::Sparse] {
            match build_solver(kind, &grid, 1.0, 1.0) {
                Err(ConfigError::Unstable { solver, .. }) => assert_eq!(solver, kind.label()),
                Err(other) => panic!("expected Unstable, got {other:?}"),
                Ok(_) => panic!("expected Unstable"),
            }
        }
        assert!(build_solver(SolverKind::default(), &grid, 1.0, 1.0).is_ok());
    }
}
