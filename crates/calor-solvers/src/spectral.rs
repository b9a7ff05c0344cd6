//! Spectral (cosine-transform) diffusion solver.
//!
//! Under zero-flux boundaries the discrete Laplacian is diagonal in the
//! cosine basis, so one timestep of `∂u/∂t = α∇²u` is an elementwise
//! multiplication of the coefficients by
//!
//! ```text
//! E(p, q) = exp(α · λ(p, q) · dt)
//! λ(p, q) = (2/dx²) · (cos(πp/nx) + cos(πq/ny) − 2)
//! ```
//!
//! Every `λ ≤ 0`, so `0 < E ≤ 1` for any positive `α` and `dt`: the scheme
//! has no stability limit. Mode `(0, 0)` has `λ = 0` and `E = 1`, which is
//! why the spatial mean never changes.
//!
//! Constructed via the builder pattern: [`SpectralOperator::builder`].

use std::f64::consts::PI;

use calor_core::{BackendError, Field, FrequencyField, ParameterError, Solver, SolverError};
use calor_grid::Grid;
use calor_transform::TransformEngine;

use crate::check_positive;

/// Laplacian eigenvalue `λ(p, q)` for every cosine mode of `grid`.
///
/// # Examples
///
/// ```
/// use calor_grid::Grid;
/// use calor_solvers::spectral::eigenvalues;
///
/// let grid = Grid::new(4, 4, 3.0, 3.0).unwrap(); // dx = 1
/// let lambda = eigenvalues(&grid);
/// assert_eq!(lambda.get(0, 0), Some(0.0));
/// assert!(lambda.as_slice().iter().all(|&l| l <= 0.0));
/// ```
pub fn eigenvalues(grid: &Grid) -> FrequencyField {
    let (nx, ny) = grid.shape();
    let c = 2.0 / (grid.dx() * grid.dx());
    let cos_p: Vec<f64> = (0..nx).map(|p| (PI * p as f64 / nx as f64).cos()).collect();
    let cos_q: Vec<f64> = (0..ny).map(|q| (PI * q as f64 / ny as f64).cos()).collect();
    FrequencyField::from_fn(nx, ny, |p, q| c * (cos_p[p] + cos_q[q] - 2.0))
}

/// The per-mode multiplier applied once per step.
///
/// Built once per run and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionOperator {
    values: FrequencyField,
    alpha: f64,
    dt: f64,
}

impl EvolutionOperator {
    /// `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Multiplier for mode `(p, q)`.
    pub fn get(&self, p: usize, q: usize) -> Option<f64> {
        self.values.get(p, q)
    }

    /// All multipliers as a coefficient array.
    pub fn values(&self) -> &FrequencyField {
        &self.values
    }

    /// Diffusivity the operator was built with.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Timestep the operator was built with.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Smallest multiplier (fastest-decaying mode).
    pub fn min(&self) -> f64 {
        self.values.as_slice().iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// Largest multiplier (always mode `(0, 0)`, equal to 1).
    pub fn max(&self) -> f64 {
        self.values.as_slice().iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Namespace for [`SpectralOperator::builder`].
pub struct SpectralOperator;

/// Builder for [`EvolutionOperator`].
///
/// Required: `alpha` and `dt`, both finite and positive.
pub struct SpectralOperatorBuilder<'g> {
    grid: &'g Grid,
    alpha: Option<f64>,
    dt: Option<f64>,
}

impl SpectralOperator {
    /// Start building the evolution operator for `grid`.
    ///
    /// ```
    /// use calor_grid::Grid;
    /// use calor_solvers::SpectralOperator;
    ///
    /// let grid = Grid::new(8, 8, 1.0, 1.0).unwrap();
    /// let op = SpectralOperator::builder(&grid).alpha(0.01).dt(0.1).build().unwrap();
    /// assert_eq!(op.get(0, 0), Some(1.0));
    /// assert!(op.min() > 0.0);
    /// ```
    pub fn builder(grid: &Grid) -> SpectralOperatorBuilder<'_> {
        SpectralOperatorBuilder {
            grid,
            alpha: None,
            dt: None,
        }
    }
}

impl<'g> SpectralOperatorBuilder<'g> {
    /// Thermal diffusivity `α`.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Timestep `dt`.
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// The eigenvalue field this builder will exponentiate.
    pub fn eigenvalues(&self) -> FrequencyField {
        eigenvalues(self.grid)
    }

    /// Build the operator.
    ///
    /// # Errors
    ///
    /// [`ParameterError::Diffusivity`] or [`ParameterError::Timestep`] if
    /// either value is missing, non-positive, or not finite.
    pub fn build(self) -> Result<EvolutionOperator, ParameterError> {
        let alpha = self.alpha.unwrap_or(f64::NAN);
        let dt = self.dt.unwrap_or(f64::NAN);
        check_positive(alpha, dt)?;

        let mut values = eigenvalues(self.grid);
        for v in values.as_mut_slice() {
            *v = (alpha * *v * dt).exp();
        }
        Ok(EvolutionOperator { values, alpha, dt })
    }
}

/// The spectral solver: state lives in cosine space between materializations.
///
/// Each `advance()` is one elementwise multiply; transforms run only in
/// `prepare()` (forward) and `materialize()` (inverse).
pub struct SpectralSolver {
    name: String,
    engine: Box<dyn TransformEngine>,
    operator: EvolutionOperator,
    state: Option<FrequencyField>,
}

impl SpectralSolver {
    /// Pair a transform engine with an evolution operator.
    ///
    /// Returns [`BackendError::ShapeMismatch`] if the engine was planned
    /// for a different shape than the operator.
    pub fn new(
        engine: Box<dyn TransformEngine>,
        operator: EvolutionOperator,
    ) -> Result<Self, BackendError> {
        let (nx, ny) = operator.shape();
        if engine.shape() != (nx, ny) {
            let (ex, ey) = engine.shape();
            return Err(BackendError::ShapeMismatch {
                expected: (nx, ny),
                found_len: ex * ey,
            });
        }
        Ok(Self {
            name: "seq_fft".to_string(),
            engine,
            operator,
            state: None,
        })
    }

    /// Override the identifier used in output paths.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The evolution operator.
    pub fn operator(&self) -> &EvolutionOperator {
        &self.operator
    }

    /// Current coefficients, if prepared.
    pub fn coefficients(&self) -> Option<&FrequencyField> {
        self.state.as_ref()
    }
}

impl Solver for SpectralSolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&mut self, initial: &Field) -> Result<(), SolverError> {
        self.state = Some(self.engine.forward(initial)?);
        Ok(())
    }

    fn advance(&mut self) -> Result<(), SolverError> {
        let state = self.state.as_mut().ok_or(SolverError::NotPrepared)?;
        state.hadamard_assign(self.operator.values())?;
        Ok(())
    }

    fn materialize(&self) -> Result<Field, SolverError> {
        let state = self.state.as_ref().ok_or(SolverError::NotPrepared)?;
        Ok(self.engine.inverse(state)?)
    }
}
