//! Spatial grids and initial conditions for Calor.
//!
//! [`Grid`] is the immutable geometry every solver is built against;
//! [`GaussianBump`] samples the benchmark's initial temperature field.
//! [`build`] is the one-call GridBuilder: validate, then sample.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod grid;
pub mod initial;

pub use grid::Grid;
pub use initial::GaussianBump;

use calor_core::{Field, GridError, ParameterError};
use std::fmt;

/// Failure from [`build`]: either the geometry or the bump is invalid.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildError {
    /// Invalid grid geometry.
    Grid(GridError),
    /// Invalid initial-condition parameter.
    Parameter(ParameterError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Parameter(e) => write!(f, "parameter: {e}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Parameter(e) => Some(e),
        }
    }
}

impl From<GridError> for BuildError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ParameterError> for BuildError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

/// Build the grid and its initial Gaussian field in one call.
///
/// # Examples
///
/// ```
/// use calor_grid::{build, GaussianBump};
///
/// let (grid, u0) = build(2, 2, 1.0, 1.0, &GaussianBump::default()).unwrap();
/// assert_eq!(u0.shape(), grid.shape());
/// ```
pub fn build(
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
    bump: &GaussianBump,
) -> Result<(Grid, Field), BuildError> {
    let grid = Grid::new(nx, ny, lx, ly)?;
    let u0 = bump.sample(&grid)?;
    Ok((grid, u0))
}
