//! Run configuration, validation, and error types.
//!
//! [`RunConfig`] is the single immutable description of a run.
//! [`validate()`](RunConfig::validate) checks every invariant up front so
//! that nothing inside the stepping loop has to.

use std::error::Error;
use std::fmt;

use calor_core::{Field, GridError, ParameterError, SolverError};
use calor_grid::{GaussianBump, Grid};

// ── Duration ───────────────────────────────────────────────────────

/// How long a run lasts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Duration {
    /// An explicit step count.
    Steps(u64),
    /// Simulated end time; the step count is `floor(t_final / dt)`.
    Until(f64),
}

/// Relative slack applied before flooring `t_final / dt`, so that
/// quotients like `0.3 / 0.1` count 3 steps, not 2.
const STEP_COUNT_EPSILON: f64 = 1e-9;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected before any step executes.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Invalid grid geometry.
    Grid(GridError),
    /// Invalid physical, numerical, or initial-condition parameter.
    Parameter(ParameterError),
    /// `dt` exceeds the chosen solver's stability limit.
    Unstable {
        /// Name of the solver that refused.
        solver: String,
        /// The configured timestep.
        dt: f64,
        /// The solver's limit.
        max_dt: f64,
    },
    /// The solver failed while being prepared.
    Solver(SolverError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Parameter(e) => write!(f, "parameter: {e}"),
            Self::Unstable { solver, dt, max_dt } => write!(
                f,
                "unstable configuration: {solver} requires dt <= {max_dt}, got {dt}"
            ),
            Self::Solver(e) => write!(f, "solver: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Parameter(e) => Some(e),
            Self::Solver(e) => Some(e),
            Self::Unstable { .. } => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ParameterError> for ConfigError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

impl From<calor_grid::BuildError> for ConfigError {
    fn from(e: calor_grid::BuildError) -> Self {
        match e {
            calor_grid::BuildError::Grid(e) => Self::Grid(e),
            calor_grid::BuildError::Parameter(e) => Self::Parameter(e),
        }
    }
}

impl ConfigError {
    /// Lift a solver construction error, tagging stability failures with
    /// the solver's name.
    pub fn from_solver(solver: &str, e: SolverError) -> Self {
        match e {
            SolverError::Unstable { dt, max_dt } => Self::Unstable {
                solver: solver.to_string(),
                dt,
                max_dt,
            },
            SolverError::Parameter(e) => Self::Parameter(e),
            other => Self::Solver(other),
        }
    }
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Everything needed to set up one heat-equation run.
///
/// `Default` is the reference benchmark: a 256×256 unit square of silver
/// (α = 1.6563e-4 m²/s) heated by a 100° Gaussian, stepped at dt = 0.005
/// to t = 60 with a snapshot every 100 steps.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Points along x.
    pub nx: usize,
    /// Points along y.
    pub ny: usize,
    /// Domain extent along x.
    pub lx: f64,
    /// Domain extent along y.
    pub ly: f64,
    /// Thermal diffusivity.
    pub alpha: f64,
    /// Timestep.
    pub dt: f64,
    /// Run length.
    pub duration: Duration,
    /// Capture a snapshot every this many steps. `0` disables periodic
    /// captures; the initial and final snapshots are always taken.
    pub save_interval: u64,
    /// Initial temperature field.
    pub initial: GaussianBump,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            nx: 256,
            ny: 256,
            lx: 1.0,
            ly: 1.0,
            alpha: 1.6563e-4,
            dt: 0.005,
            duration: Duration::Until(60.0),
            save_interval: 100,
            initial: GaussianBump::default(),
        }
    }
}

impl RunConfig {
    /// Default benchmark at a different resolution.
    pub fn with_resolution(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            ..Self::default()
        }
    }

    /// Check every invariant, returning the first violation.
    ///
    /// Order: grid geometry, diffusivity, timestep, duration, initial
    /// condition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Grid::new(self.nx, self.ny, self.lx, self.ly)?;
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(ParameterError::Diffusivity { value: self.alpha }.into());
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ParameterError::Timestep { value: self.dt }.into());
        }
        if let Duration::Until(t_final) = self.duration {
            if !(t_final.is_finite() && t_final >= 0.0) {
                return Err(ParameterError::Duration { value: t_final }.into());
            }
        }
        self.initial.validate()?;
        Ok(())
    }

    /// Number of steps the run will take.
    ///
    /// Meaningful only for a validated configuration; an invalid
    /// `Until` duration yields 0.
    ///
    /// `Until(t_final)` counts `floor(t_final / dt · (1 + 1e-9))`, not a
    /// bare truncation of the quotient. The two differ when rounding
    /// leaves the quotient just below an integer: `0.3 / 0.1` is
    /// `2.9999999999999996`, which truncates to 2 but counts 3 steps here.
    ///
    /// ```
    /// use calor_engine::{Duration, RunConfig};
    ///
    /// assert_eq!(RunConfig::default().num_steps(), 12_000);
    ///
    /// let c = RunConfig { dt: 0.1, duration: Duration::Until(0.3), ..RunConfig::default() };
    /// assert_eq!((0.3f64 / 0.1) as u64, 2);
    /// assert_eq!(c.num_steps(), 3);
    /// ```
    pub fn num_steps(&self) -> u64 {
        match self.duration {
            Duration::Steps(n) => n,
            Duration::Until(t_final) => {
                let raw = t_final / self.dt;
                if !(raw.is_finite() && raw > 0.0) {
                    return 0;
                }
                (raw * (1.0 + STEP_COUNT_EPSILON)).floor() as u64
            }
        }
    }

    /// Simulated end time, `num_steps · dt`.
    pub fn t_final(&self) -> f64 {
        self.num_steps() as f64 * self.dt
    }

    /// Validate, then build the grid and sample the initial field.
    pub fn build(&self) -> Result<(Grid, Field), ConfigError> {
        self.validate()?;
        Ok(calor_grid::build(
            self.nx,
            self.ny,
            self.lx,
            self.ly,
            &self.initial,
        )?)
    }
}
