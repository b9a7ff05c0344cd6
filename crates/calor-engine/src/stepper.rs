//! The time-stepping state machine.
//!
//! ```text
//! Initialized ──step()──▶ Running ──step()×num_steps──▶ Completed
//!      │                     │
//!      └──── any failure ────┴──────────────▶ Aborted
//! ```
//!
//! The first [`step()`](TimeStepper::step) prepares the solver and records
//! the initial field as snapshot 0. Every later call advances the solver
//! by one `dt`; a periodic snapshot is taken first if the pre-increment
//! step index is a multiple of `save_interval`. The call that reaches
//! `num_steps` also materializes and records the final field.
//!
//! There is no retry. A solver, backend, or cancellation failure moves
//! the stepper to [`Phase::Aborted`] and every later call fails.

use std::fmt;
use std::time::Instant;

use calor_core::{Field, ParameterError, Solver, SolverError};

use crate::cancel::CancelToken;
use crate::config::ConfigError;
use crate::metrics::{elapsed_us, RunMetrics};
use crate::snapshot::{Snapshot, SnapshotStore};

// Compile-time assertion: TimeStepper is Send (dyn Solver is Send).
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<TimeStepper>();
    }
};

// ── Phase ──────────────────────────────────────────────────────────

/// Where the stepper is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Built; solver not yet prepared.
    Initialized,
    /// Prepared; `step_index() < num_steps`.
    Running,
    /// Final snapshot recorded.
    Completed,
    /// A step failed or was cancelled.
    Aborted,
}

// ── StepError ──────────────────────────────────────────────────────

/// Error returned from [`TimeStepper::step()`].
#[derive(Debug, PartialEq)]
pub enum StepError {
    /// The solver failed; the run is aborted.
    Solver {
        /// Solver name.
        solver: String,
        /// Step index at which the failure happened.
        step: u64,
        /// The underlying error.
        source: SolverError,
    },
    /// The cancel token was set before this step ran.
    Cancelled {
        /// Step index that would have run next.
        step: u64,
    },
    /// The run already completed.
    Finished,
    /// The run was aborted by an earlier error.
    Aborted,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solver {
                solver,
                step,
                source,
            } => write!(f, "{solver} failed at step {step}: {source}"),
            Self::Cancelled { step } => write!(f, "run cancelled before step {step}"),
            Self::Finished => write!(f, "run already completed"),
            Self::Aborted => write!(f, "run was aborted by an earlier error"),
        }
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Solver { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── RunOutput ──────────────────────────────────────────────────────

/// Everything a completed run produces.
#[derive(Debug)]
pub struct RunOutput {
    /// Field at `t = num_steps · dt`.
    pub final_field: Field,
    /// Every snapshot, initial and final included.
    pub snapshots: SnapshotStore,
    /// Timings and counters.
    pub metrics: RunMetrics,
}

// ── TimeStepper ────────────────────────────────────────────────────

/// Drives a [`Solver`] from the initial field to `num_steps · dt`,
/// capturing snapshots along the way.
pub struct TimeStepper {
    solver: Box<dyn Solver>,
    initial: Option<Field>,
    dt: f64,
    num_steps: u64,
    save_interval: u64,
    step: u64,
    phase: Phase,
    store: SnapshotStore,
    final_field: Option<Field>,
    cancel: Option<CancelToken>,
    metrics: RunMetrics,
}

impl TimeStepper {
    /// Wrap `solver` for a run of `num_steps` steps of `dt`.
    ///
    /// `save_interval == 0` disables periodic captures.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Parameter`] if `dt` is not finite and positive.
    /// - [`ConfigError::Unstable`] if `dt` exceeds the solver's
    ///   [`max_dt()`](Solver::max_dt).
    pub fn new(
        solver: Box<dyn Solver>,
        initial: Field,
        dt: f64,
        num_steps: u64,
        save_interval: u64,
    ) -> Result<Self, ConfigError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ParameterError::Timestep { value: dt }.into());
        }
        if let Some(max_dt) = solver.max_dt() {
            if dt > max_dt {
                return Err(ConfigError::Unstable {
                    solver: solver.name().to_string(),
                    dt,
                    max_dt,
                });
            }
        }
        Ok(Self {
            solver,
            initial: Some(initial),
            dt,
            num_steps,
            save_interval,
            step: 0,
            phase: Phase::Initialized,
            store: SnapshotStore::new(),
            final_field: None,
            cancel: None,
            metrics: RunMetrics::default(),
        })
    }

    /// Check `token` before every step.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Steps completed so far.
    pub fn step_index(&self) -> u64 {
        self.step
    }

    /// Simulated time, `step_index() · dt`.
    pub fn time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    /// Total steps this run will take.
    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    /// The solver's name.
    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Snapshots recorded so far.
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.store
    }

    /// Metrics accumulated so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Materialize the current spatial field without recording it.
    pub fn current_field(&self) -> Result<Field, StepError> {
        if let Some(field) = &self.final_field {
            return Ok(field.clone());
        }
        if let (Phase::Initialized, Some(initial)) = (self.phase, &self.initial) {
            return Ok(initial.clone());
        }
        if self.phase == Phase::Aborted {
            return Err(StepError::Aborted);
        }
        self.solver.materialize().map_err(|e| self.solver_error(e))
    }

    /// Run one transition. Returns the phase after it.
    ///
    /// # Errors
    ///
    /// [`StepError::Finished`] after completion, [`StepError::Aborted`]
    /// after a failure, otherwise whatever made this step fail (which
    /// also aborts the run).
    pub fn step(&mut self) -> Result<Phase, StepError> {
        match self.phase {
            Phase::Completed => return Err(StepError::Finished),
            Phase::Aborted => return Err(StepError::Aborted),
            Phase::Initialized | Phase::Running => {}
        }
        let result = match self.phase {
            Phase::Initialized => self.start(),
            _ => self.advance_one(),
        };
        match result {
            Ok(()) => Ok(self.phase),
            Err(e) => {
                self.phase = Phase::Aborted;
                Err(e)
            }
        }
    }

    /// Step until completion and hand back the results.
    pub fn run(mut self) -> Result<RunOutput, StepError> {
        while self.step()? != Phase::Completed {}
        self.into_output()
    }

    /// The results of a completed run.
    ///
    /// Returns [`StepError::Aborted`] if the run did not complete.
    pub fn into_output(self) -> Result<RunOutput, StepError> {
        match (self.phase, self.final_field) {
            (Phase::Completed, Some(final_field)) => Ok(RunOutput {
                final_field,
                snapshots: self.store,
                metrics: self.metrics,
            }),
            _ => Err(StepError::Aborted),
        }
    }

    fn start(&mut self) -> Result<(), StepError> {
        let initial = self.initial.take().ok_or(StepError::Aborted)?;
        let t0 = Instant::now();
        self.solver
            .prepare(&initial)
            .map_err(|e| self.solver_error(e))?;
        self.metrics.prepare_us = elapsed_us(t0);
        self.capture(initial)?;
        self.phase = Phase::Running;
        if self.step == self.num_steps {
            self.finish()?;
        }
        Ok(())
    }

    fn advance_one(&mut self) -> Result<(), StepError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(StepError::Cancelled { step: self.step });
        }

        if self.save_interval > 0
            && self.step % self.save_interval == 0
            && !self.store.contains_step(self.step)
        {
            let t0 = Instant::now();
            let field = self
                .solver
                .materialize()
                .map_err(|e| self.solver_error(e))?;
            self.capture(field)?;
            self.metrics.capture_us += elapsed_us(t0);
        }

        let t0 = Instant::now();
        self.solver.advance().map_err(|e| self.solver_error(e))?;
        self.metrics.stepping_us += elapsed_us(t0);
        self.step += 1;
        self.metrics.steps = self.step;

        if self.step == self.num_steps {
            self.finish()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StepError> {
        let t0 = Instant::now();
        // Only a zero-step run reaches here with its final step already
        // stored; the final field is then the initial field, bit for bit.
        let stored = self.store.get_step(self.step).map(|snap| snap.field.clone());
        let field = match stored {
            Some(field) => field,
            None => {
                let field = self
                    .solver
                    .materialize()
                    .map_err(|e| self.solver_error(e))?;
                self.capture(field.clone())?;
                field
            }
        };
        self.metrics.finalize_us = elapsed_us(t0);
        self.final_field = Some(field);
        self.phase = Phase::Completed;
        Ok(())
    }

    fn capture(&mut self, field: Field) -> Result<(), StepError> {
        if let Some(cell) = field.first_non_finite() {
            return Err(self.solver_error(SolverError::NonFinite { cell }));
        }
        let stored = self.store.record(Snapshot {
            step: self.step,
            time: self.time(),
            field,
        });
        if stored {
            self.metrics.captures += 1;
        }
        Ok(())
    }

    fn solver_error(&self, source: SolverError) -> StepError {
        StepError::Solver {
            solver: self.solver.name().to_string(),
            step: self.step,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_grid::Grid;
    use calor_solvers::{SpectralOperator, SpectralSolver};
    use calor_test_utils::DecaySolver;
    use calor_transform::FftDct;

    fn stepper(num_steps: u64, save_interval: u64) -> TimeStepper {
        TimeStepper::new(
            Box::new(DecaySolver::new(0.5)),
            Field::filled(2, 3, 1.0),
            0.1,
            num_steps,
            save_interval,
        )
        .unwrap()
    }

    #[test]
    fn phases_progress_linearly() {
        let mut s = stepper(2, 0);
        assert_eq!(s.phase(), Phase::Initialized);
        assert_eq!(s.step(), Ok(Phase::Running));
        assert_eq!(s.step_index(), 0);
        assert_eq!(s.step(), Ok(Phase::Running));
        assert_eq!(s.step(), Ok(Phase::Completed));
        assert_eq!(s.step_index(), 2);
        assert_eq!(s.step(), Err(StepError::Finished));
    }

    #[test]
    fn cadence_deduplicates_final_and_initial() {
        let out = stepper(10, 3).run().unwrap();
        assert_eq!(out.snapshots.steps(), vec![0, 3, 6, 9, 10]);
        assert_eq!(out.metrics.captures, 5);
        assert_eq!(out.metrics.steps, 10);
        // Contents identify their step: 0.5^s.
        for snap in &out.snapshots {
            let expected = 0.5f64.powi(snap.step as i32);
            assert_eq!(snap.field.get(0, 0), Some(expected));
        }
    }

    #[test]
    fn final_step_on_interval_is_stored_once() {
        let out = stepper(9, 3).run().unwrap();
        assert_eq!(out.snapshots.steps(), vec![0, 3, 6, 9]);
    }

    #[test]
    fn zero_interval_keeps_only_endpoints() {
        let out = stepper(5, 0).run().unwrap();
        assert_eq!(out.snapshots.steps(), vec![0, 5]);
        assert_eq!(out.snapshots.times(), vec![0.0, 0.5]);
    }

    #[test]
    fn zero_steps_yields_single_snapshot() {
        let mut s = stepper(0, 3);
        assert_eq!(s.step(), Ok(Phase::Completed));
        let out = s.into_output().unwrap();
        assert_eq!(out.snapshots.len(), 1);
        assert_eq!(out.final_field, Field::filled(2, 3, 1.0));
    }

    #[test]
    fn zero_steps_spectral_final_field_is_initial_snapshot() {
        let grid = Grid::new(16, 12, 1.0, 1.0).unwrap();
        let initial = Field::from_fn(16, 12, |i, j| (i * 12 + j) as f64 * 0.37);
        let op = SpectralOperator::builder(&grid)
            .alpha(0.1)
            .dt(0.01)
            .build()
            .unwrap();
        let solver = SpectralSolver::new(Box::new(FftDct::new(16, 12)), op).unwrap();
        let out = TimeStepper::new(Box::new(solver), initial.clone(), 0.01, 0, 4)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(out.snapshots.len(), 1);
        assert_eq!(out.final_field, initial);
        assert_eq!(out.snapshots.last().unwrap().field, out.final_field);
        assert_eq!(out.metrics.captures, 1);
    }

    #[test]
    fn rejects_dt_above_solver_limit() {
        let err = TimeStepper::new(
            Box::new(DecaySolver::new(1.0).with_max_dt(0.01)),
            Field::zeros(2, 2),
            0.1,
            1,
            0,
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            ConfigError::Unstable {
                solver: "decay".to_string(),
                dt: 0.1,
                max_dt: 0.01
            }
        );
    }

    #[test]
    fn rejects_non_positive_dt() {
        let err = TimeStepper::new(Box::new(DecaySolver::new(1.0)), Field::zeros(2, 2), 0.0, 1, 0)
            .err()
            .unwrap();
        assert_eq!(
            err,
            ConfigError::Parameter(ParameterError::Timestep { value: 0.0 })
        );
    }

    #[test]
    fn non_finite_capture_aborts() {
        let mut s = TimeStepper::new(
            Box::new(DecaySolver::new(f64::INFINITY)),
            Field::filled(2, 2, 1.0),
            0.1,
            4,
            1,
        )
        .unwrap();
        s.step().unwrap(); // start
        s.step().unwrap(); // step 0 -> 1, field now infinite
        let err = s.step().unwrap_err();
        assert_eq!(
            err,
            StepError::Solver {
                solver: "decay".to_string(),
                step: 1,
                source: SolverError::NonFinite { cell: 0 }
            }
        );
        assert_eq!(s.phase(), Phase::Aborted);
        assert_eq!(s.step(), Err(StepError::Aborted));
        assert!(s.into_output().is_err());
    }

    #[test]
    fn current_field_tracks_progress() {
        let mut s = stepper(2, 0);
        assert_eq!(s.current_field().unwrap(), Field::filled(2, 3, 1.0));
        s.step().unwrap();
        s.step().unwrap();
        assert_eq!(s.current_field().unwrap(), Field::filled(2, 3, 0.5));
        assert!((s.time() - 0.1).abs() < 1e-15);
    }
}
