//! The [`Solver`] trait: one time-integration strategy for the heat equation.
//!
//! A solver owns the evolving state for the whole run. The stepper calls
//! [`prepare`](Solver::prepare) once with the initial field, then
//! [`advance`](Solver::advance) once per step, and
//! [`materialize`](Solver::materialize) whenever a spatial field is needed
//! (snapshots and the final result).

use crate::error::SolverError;
use crate::field::Field;

/// A time-integration strategy driven by the stepper.
///
/// # Contract
///
/// - `advance()` MUST be deterministic: same state produces identical output.
/// - `materialize()` MUST NOT change the state.
/// - `max_dt()` is queried once before stepping, not per step.
///
/// # Object safety
///
/// This trait is object-safe; the stepper stores solvers as
/// `Box<dyn Solver>`.
///
/// # Examples
///
/// A solver that never changes its field:
///
/// ```
/// use calor_core::{Field, Solver, SolverError};
///
/// struct Frozen(Option<Field>);
///
/// impl Solver for Frozen {
///     fn name(&self) -> &str { "frozen" }
///
///     fn prepare(&mut self, initial: &Field) -> Result<(), SolverError> {
///         self.0 = Some(initial.clone());
///         Ok(())
///     }
///
///     fn advance(&mut self) -> Result<(), SolverError> {
///         self.0.as_ref().map(|_| ()).ok_or(SolverError::NotPrepared)
///     }
///
///     fn materialize(&self) -> Result<Field, SolverError> {
///         self.0.clone().ok_or(SolverError::NotPrepared)
///     }
/// }
///
/// let mut s = Frozen(None);
/// s.prepare(&Field::filled(2, 2, 1.0)).unwrap();
/// s.advance().unwrap();
/// assert_eq!(s.materialize().unwrap().mean(), 1.0);
/// ```
pub trait Solver: Send {
    /// Identifier used in output paths and error reports
    /// (e.g. `"seq_fft"`).
    fn name(&self) -> &str;

    /// Load the initial field into the solver's working representation.
    fn prepare(&mut self, initial: &Field) -> Result<(), SolverError>;

    /// Advance the state by one timestep.
    fn advance(&mut self) -> Result<(), SolverError>;

    /// Produce the current state as a spatial field.
    fn materialize(&self) -> Result<Field, SolverError>;

    /// Largest stable timestep, or `None` if the scheme is unconditionally
    /// stable.
    fn max_dt(&self) -> Option<f64> {
        None
    }
}
