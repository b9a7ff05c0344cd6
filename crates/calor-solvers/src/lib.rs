//! Heat-equation solvers for Calor.
//!
//! Every solver implements [`calor_core::Solver`] and advances
//! `∂u/∂t = α∇²u` under zero-flux boundaries by one fixed `dt` per call.
//!
//! - [`SpectralSolver`]: exact decay of each cosine mode. Unconditionally
//!   stable; conserves the spatial mean to rounding.
//! - [`ExplicitStencil`]: forward Euler with a reflecting 5-point stencil.
//! - [`SparseLaplacian`]: forward Euler with a pre-assembled CSR Laplacian.
//!
//! The two explicit solvers share the limit reported by
//! [`explicit_max_dt`] and refuse to build above it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod sparse;
pub mod spectral;
pub mod stencil;

pub use sparse::{neumann_laplacian, CsrMatrix, SparseLaplacian};
pub use spectral::{
    eigenvalues, EvolutionOperator, SpectralOperator, SpectralOperatorBuilder, SpectralSolver,
};
pub use stencil::ExplicitStencil;

use calor_core::ParameterError;
use calor_grid::Grid;

/// Largest stable forward-Euler timestep on `grid`:
/// `1 / (2α(1/dx² + 1/dy²))`, which is `dx²/(4α)` on a square grid.
///
/// ```
/// use calor_grid::Grid;
/// use calor_solvers::explicit_max_dt;
///
/// let grid = Grid::new(3, 3, 1.0, 1.0).unwrap(); // dx = 0.5
/// assert_eq!(explicit_max_dt(&grid, 1.0), 0.0625);
/// ```
pub fn explicit_max_dt(grid: &Grid, alpha: f64) -> f64 {
    let inv = 1.0 / (grid.dx() * grid.dx()) + 1.0 / (grid.dy() * grid.dy());
    1.0 / (2.0 * alpha * inv)
}

pub(crate) fn check_positive(alpha: f64, dt: f64) -> Result<(), ParameterError> {
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(ParameterError::Diffusivity { value: alpha });
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(ParameterError::Timestep { value: dt });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_positive_reports_first_offender() {
        assert!(check_positive(1.0, 1.0).is_ok());
        assert_eq!(
            check_positive(f64::NAN, -1.0).unwrap_err().to_string(),
            ParameterError::Diffusivity { value: f64::NAN }.to_string()
        );
        assert_eq!(
            check_positive(1.0, f64::INFINITY),
            Err(ParameterError::Timestep {
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn explicit_limit_on_rectangular_cells() {
        let grid = Grid::new(3, 5, 1.0, 1.0).unwrap(); // dx = 0.5, dy = 0.25
        let expected = 1.0 / (2.0 * 2.0 * (4.0 + 16.0));
        assert!((explicit_max_dt(&grid, 2.0) - expected).abs() < 1e-15);
    }
}
