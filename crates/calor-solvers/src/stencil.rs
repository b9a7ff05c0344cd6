//! Explicit 5-point finite-difference solver.
//!
//! Forward Euler on the Neumann Laplacian:
//!
//! ```text
//! u[i,j] += α·dt · ( (u[i-1,j] - 2u[i,j] + u[i+1,j]) / dx²
//!                  + (u[i,j-1] - 2u[i,j] + u[i,j+1]) / dy² )
//! ```
//!
//! Out-of-range neighbours reflect onto the boundary cell
//! (`u[-1,j] = u[0,j]`), which is the zero-flux condition. The scheme is
//! only stable for `dt ≤ 1 / (2α(1/dx² + 1/dy²))`; construction refuses
//! anything larger.

use calor_core::{Field, Solver, SolverError};
use calor_grid::Grid;

use crate::{check_positive, explicit_max_dt};

/// Forward-Euler 5-point stencil.
#[derive(Debug)]
pub struct ExplicitStencil {
    name: String,
    nx: usize,
    ny: usize,
    /// `α·dt/dx²`
    rx: f64,
    /// `α·dt/dy²`
    ry: f64,
    max_dt: f64,
    state: Option<Field>,
    next: Vec<f64>,
}

impl ExplicitStencil {
    /// Build a stencil solver for `grid`.
    ///
    /// # Errors
    ///
    /// - [`SolverError::Parameter`] if `alpha` or `dt` is not finite and
    ///   positive.
    /// - [`SolverError::Unstable`] if `dt` exceeds the stability limit.
    ///
    /// ```
    /// use calor_grid::Grid;
    /// use calor_solvers::ExplicitStencil;
    ///
    /// let grid = Grid::new(11, 11, 1.0, 1.0).unwrap(); // dx = 0.1
    /// // Limit is dx²/(4α) = 0.025.
    /// assert!(ExplicitStencil::new(&grid, 0.1, 0.02).is_ok());
    /// assert!(ExplicitStencil::new(&grid, 0.1, 0.03).is_err());
    /// ```
    pub fn new(grid: &Grid, alpha: f64, dt: f64) -> Result<Self, SolverError> {
        check_positive(alpha, dt)?;
        let max_dt = explicit_max_dt(grid, alpha);
        if dt > max_dt {
            return Err(SolverError::Unstable { dt, max_dt });
        }
        Ok(Self {
            name: "seq_stencil_explicit".to_string(),
            nx: grid.nx(),
            ny: grid.ny(),
            rx: alpha * dt / (grid.dx() * grid.dx()),
            ry: alpha * dt / (grid.dy() * grid.dy()),
            max_dt,
            state: None,
            next: vec![0.0; grid.cell_count()],
        })
    }

    /// Override the identifier used in output paths.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Solver for ExplicitStencil {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&mut self, initial: &Field) -> Result<(), SolverError> {
        if initial.shape() != (self.nx, self.ny) {
            return Err(SolverError::Backend(calor_core::BackendError::ShapeMismatch {
                expected: (self.nx, self.ny),
                found_len: initial.len(),
            }));
        }
        self.state = Some(initial.clone());
        Ok(())
    }

    fn advance(&mut self) -> Result<(), SolverError> {
        let state = self.state.as_mut().ok_or(SolverError::NotPrepared)?;
        let (nx, ny) = (self.nx, self.ny);
        let u = state.as_slice();
        for i in 0..nx {
            let im = i.saturating_sub(1);
            let ip = (i + 1).min(nx - 1);
            for j in 0..ny {
                let jm = j.saturating_sub(1);
                let jp = (j + 1).min(ny - 1);
                let c = u[i * ny + j];
                let lap_x = u[im * ny + j] - 2.0 * c + u[ip * ny + j];
                let lap_y = u[i * ny + jm] - 2.0 * c + u[i * ny + jp];
                self.next[i * ny + j] = c + self.rx * lap_x + self.ry * lap_y;
            }
        }
        state.as_mut_slice().swap_with_slice(&mut self.next);
        Ok(())
    }

    fn materialize(&self) -> Result<Field, SolverError> {
        self.state.clone().ok_or(SolverError::NotPrepared)
    }

    fn max_dt(&self) -> Option<f64> {
        Some(self.max_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_core::ParameterError;

    fn grid(n: usize) -> Grid {
        Grid::new(n, n, 1.0, 1.0).unwrap()
    }

    #[test]
    fn uniform_field_stays_uniform() {
        let g = grid(5);
        let mut s = ExplicitStencil::new(&g, 0.1, 0.001).unwrap();
        s.prepare(&Field::filled(5, 5, 10.0)).unwrap();
        for _ in 0..20 {
            s.advance().unwrap();
        }
        let u = s.materialize().unwrap();
        assert!(u.as_slice().iter().all(|v| (v - 10.0).abs() < 1e-12));
    }

    #[test]
    fn hot_centre_spreads_and_conserves_heat() {
        let g = grid(5);
        let mut s = ExplicitStencil::new(&g, 0.1, 0.0125).unwrap();
        let mut u0 = Field::zeros(5, 5);
        *u0.get_mut(2, 2).unwrap() = 100.0;
        let before: f64 = u0.as_slice().iter().sum();
        s.prepare(&u0).unwrap();
        s.advance().unwrap();
        let u = s.materialize().unwrap();
        assert!(u.get(2, 2).unwrap() < 100.0);
        for (i, j) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert!(u.get(i, j).unwrap() > 0.0, "({i},{j}) should warm");
        }
        let after: f64 = u.as_slice().iter().sum();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn corner_reflects() {
        // Zero-flux: a corner only exchanges heat with its two interior
        // neighbours.
        let g = grid(3);
        let mut s = ExplicitStencil::new(&g, 1.0, 0.01).unwrap();
        let mut u0 = Field::zeros(3, 3);
        *u0.get_mut(0, 0).unwrap() = 1.0;
        s.prepare(&u0).unwrap();
        s.advance().unwrap();
        let u = s.materialize().unwrap();
        // rx = ry = 1.0 * 0.01 / 0.25 = 0.04
        assert!((u.get(0, 0).unwrap() - (1.0 - 0.04 - 0.04)).abs() < 1e-12);
        assert!((u.get(1, 0).unwrap() - 0.04).abs() < 1e-12);
        assert!((u.get(0, 1).unwrap() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn rejects_unstable_dt() {
        let g = grid(11);
        let err = ExplicitStencil::new(&g, 1.0, 1.0).unwrap_err();
        match err {
            SolverError::Unstable { dt, max_dt } => {
                assert_eq!(dt, 1.0);
                assert!((max_dt - 0.0025).abs() < 1e-15);
            }
            other => panic!("expected Unstable, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        let g = grid(4);
        assert_eq!(
            ExplicitStencil::new(&g, 0.0, 0.001).unwrap_err(),
            SolverError::Parameter(ParameterError::Diffusivity { value: 0.0 })
        );
    }

    #[test]
    fn max_dt_reported() {
        let g = grid(11);
        let s = ExplicitStencil::new(&g, 0.5, 0.001).unwrap();
        let limit = s.max_dt().unwrap();
        assert!((limit - 0.01 / 2.0).abs() < 1e-15);
    }
}
