//! Reusable engine and solver fixtures.
//!
//! - [`CountingEngine`] — wraps a real engine and counts calls.
//! - [`FailingEngine`] — fails deterministically after N inverse calls.
//! - [`DecaySolver`] — multiplies the field by a constant every step.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use calor_core::{BackendError, Field, FrequencyField, Solver, SolverError};
use calor_transform::TransformEngine;

/// Delegates to an inner engine and counts forward/inverse calls.
///
/// The counters are shared handles, so a test can keep a clone after the
/// engine has been moved into a solver.
pub struct CountingEngine {
    inner: Box<dyn TransformEngine>,
    pub forward_calls: Arc<AtomicUsize>,
    pub inverse_calls: Arc<AtomicUsize>,
}

impl CountingEngine {
    pub fn new(inner: Box<dyn TransformEngine>) -> Self {
        Self {
            inner,
            forward_calls: Arc::new(AtomicUsize::new(0)),
            inverse_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl TransformEngine for CountingEngine {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    fn forward(&self, field: &Field) -> Result<FrequencyField, BackendError> {
        self.forward_calls.fetch_add(1, Ordering::Relaxed);
        self.inner.forward(field)
    }

    fn inverse(&self, coeffs: &FrequencyField) -> Result<Field, BackendError> {
        self.inverse_calls.fetch_add(1, Ordering::Relaxed);
        self.inner.inverse(coeffs)
    }
}

/// An engine whose inverse transform succeeds `succeed_count` times and
/// then reports [`BackendError::ResourceExhausted`], standing in for an
/// accelerator running out of memory mid-run.
pub struct FailingEngine {
    inner: Box<dyn TransformEngine>,
    succeed_count: usize,
    calls: AtomicUsize,
}

impl FailingEngine {
    pub fn new(inner: Box<dyn TransformEngine>, succeed_count: usize) -> Self {
        Self {
            inner,
            succeed_count,
            calls: AtomicUsize::new(0),
        }
    }
}

impl TransformEngine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    fn forward(&self, field: &Field) -> Result<FrequencyField, BackendError> {
        self.inner.forward(field)
    }

    fn inverse(&self, coeffs: &FrequencyField) -> Result<Field, BackendError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(BackendError::ResourceExhausted {
                reason: format!("device buffer pool exhausted after {n} transforms"),
            });
        }
        self.inner.inverse(coeffs)
    }
}

/// Multiplies the whole field by `factor` on every step.
///
/// Handy for stepper tests: after `s` steps every cell equals
/// `initial · factor^s`, so snapshot contents identify their step.
pub struct DecaySolver {
    factor: f64,
    max_dt: Option<f64>,
    state: Option<Field>,
}

impl DecaySolver {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            max_dt: None,
            state: None,
        }
    }

    /// Report `max_dt` as this solver's stability limit.
    pub fn with_max_dt(mut self, max_dt: f64) -> Self {
        self.max_dt = Some(max_dt);
        self
    }
}

impl Solver for DecaySolver {
    fn name(&self) -> &str {
        "decay"
    }

    fn prepare(&mut self, initial: &Field) -> Result<(), SolverError> {
        self.state = Some(initial.clone());
        Ok(())
    }

    fn advance(&mut self) -> Result<(), SolverError> {
        let state = self.state.as_mut().ok_or(SolverError::NotPrepared)?;
        for v in state.as_mut_slice() {
            *v *= self.factor;
        }
        Ok(())
    }

    fn materialize(&self) -> Result<Field, SolverError> {
        self.state.clone().ok_or(SolverError::NotPrepared)
    }

    fn max_dt(&self) -> Option<f64> {
        self.max_dt
    }
}
