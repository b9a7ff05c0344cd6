//! Error types for the Calor heat-equation solvers.
//!
//! Construction-time failures ([`GridError`], [`ParameterError`]) are
//! detected before any stepping begins. Run-time failures surface as
//! [`SolverError`], which wraps [`BackendError`] when the transform
//! primitive itself cannot execute.

use std::error::Error;
use std::fmt;

/// Which grid axis an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The x axis (rows, `nx`, `Lx`).
    X,
    /// The y axis (columns, `ny`, `Ly`).
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Invalid grid geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Fewer than two points along an axis; spacing `L/(n-1)` is undefined.
    TooFewPoints {
        /// The offending axis.
        axis: Axis,
        /// The configured point count.
        points: usize,
    },
    /// Domain extent is zero, negative, or not finite.
    NonPositiveExtent {
        /// The offending axis.
        axis: Axis,
        /// The configured extent.
        extent: f64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { axis, points } => {
                write!(f, "n{axis} must be at least 2, got {points}")
            }
            Self::NonPositiveExtent { axis, extent } => {
                write!(f, "L{axis} must be finite and positive, got {extent}")
            }
        }
    }
}

impl Error for GridError {}

/// Invalid physical or numerical parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterError {
    /// Thermal diffusivity is zero, negative, or not finite.
    Diffusivity {
        /// The configured alpha.
        value: f64,
    },
    /// Timestep is zero, negative, or not finite.
    Timestep {
        /// The configured dt.
        value: f64,
    },
    /// Final time is negative or not finite, so no step count exists.
    Duration {
        /// The configured t_final.
        value: f64,
    },
    /// Initial-condition parameter is out of range.
    InitialCondition {
        /// Which parameter and why.
        reason: String,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diffusivity { value } => {
                write!(f, "alpha must be finite and positive, got {value}")
            }
            Self::Timestep { value } => write!(f, "dt must be finite and positive, got {value}"),
            Self::Duration { value } => {
                write!(f, "t_final must be finite and non-negative, got {value}")
            }
            Self::InitialCondition { reason } => write!(f, "invalid initial condition: {reason}"),
        }
    }
}

impl Error for ParameterError {}

/// The transform primitive could not execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// Input array shape does not match what the engine was planned for.
    ShapeMismatch {
        /// Shape the engine expects.
        expected: (usize, usize),
        /// Number of cells actually supplied.
        found_len: usize,
    },
    /// Device or host resources ran out (e.g. accelerator memory).
    ResourceExhausted {
        /// Human-readable description.
        reason: String,
    },
    /// The transform failed for any other reason.
    ExecutionFailed {
        /// Human-readable description.
        reason: String,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                expected,
                found_len,
            } => write!(
                f,
                "shape mismatch: expected {}x{} ({} cells), got {found_len} cells",
                expected.0,
                expected.1,
                expected.0 * expected.1
            ),
            Self::ResourceExhausted { reason } => write!(f, "resources exhausted: {reason}"),
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for BackendError {}

/// Errors from a [`Solver`](crate::Solver) during setup or stepping.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// The transform backend failed.
    Backend(BackendError),
    /// A parameter was rejected while building the solver.
    Parameter(ParameterError),
    /// `dt` exceeds the explicit scheme's stability limit.
    Unstable {
        /// The configured timestep.
        dt: f64,
        /// The largest stable timestep for this grid and diffusivity.
        max_dt: f64,
    },
    /// A NaN or infinity appeared in a materialized field.
    NonFinite {
        /// Flat row-major index of the first bad cell.
        cell: usize,
    },
    /// `advance()` or `materialize()` was called before `prepare()`.
    NotPrepared,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(e) => write!(f, "backend: {e}"),
            Self::Parameter(e) => write!(f, "parameter: {e}"),
            Self::Unstable { dt, max_dt } => {
                write!(f, "unstable configuration: dt={dt} exceeds limit {max_dt}")
            }
            Self::NonFinite { cell } => write!(f, "non-finite value at cell {cell}"),
            Self::NotPrepared => write!(f, "solver used before prepare()"),
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e),
            Self::Parameter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for SolverError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

impl From<ParameterError> for SolverError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}
