//! Uniform rectangular grid over `[0, Lx] × [0, Ly]`.

use calor_core::{Array2, Axis, GridError};

/// A uniform 2D grid with `nx × ny` points, endpoints included.
///
/// Point `(i, j)` sits at `(i·dx, j·dy)` with `dx = Lx/(nx-1)` and
/// `dy = Ly/(ny-1)`, the same sampling as `linspace(0, L, n)`.
/// Immutable after construction.
///
/// # Examples
///
/// ```
/// use calor_grid::Grid;
///
/// let grid = Grid::new(5, 3, 1.0, 2.0).unwrap();
/// assert_eq!(grid.cell_count(), 15);
/// assert_eq!(grid.dx(), 0.25);
/// assert_eq!(grid.dy(), 1.0);
/// assert_eq!(grid.x(4), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
    dx: f64,
    dy: f64,
}

impl Grid {
    /// Create a grid with `nx × ny` points spanning `[0, lx] × [0, ly]`.
    ///
    /// Returns `Err(GridError::TooFewPoints)` if either count is below 2,
    /// or `Err(GridError::NonPositiveExtent)` if either extent is not a
    /// finite positive number.
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Result<Self, GridError> {
        if nx < 2 {
            return Err(GridError::TooFewPoints {
                axis: Axis::X,
                points: nx,
            });
        }
        if ny < 2 {
            return Err(GridError::TooFewPoints {
                axis: Axis::Y,
                points: ny,
            });
        }
        if !lx.is_finite() || lx <= 0.0 {
            return Err(GridError::NonPositiveExtent {
                axis: Axis::X,
                extent: lx,
            });
        }
        if !ly.is_finite() || ly <= 0.0 {
            return Err(GridError::NonPositiveExtent {
                axis: Axis::Y,
                extent: ly,
            });
        }
        Ok(Self {
            nx,
            ny,
            lx,
            ly,
            dx: lx / (nx - 1) as f64,
            dy: ly / (ny - 1) as f64,
        })
    }

    /// Points along x.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Points along y.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Domain extent along x.
    pub fn lx(&self) -> f64 {
        self.lx
    }

    /// Domain extent along y.
    pub fn ly(&self) -> f64 {
        self.ly
    }

    /// Spacing along x.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Spacing along y.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Total number of grid points.
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// x coordinate of row `i`.
    pub fn x(&self, i: usize) -> f64 {
        // Pin the last sample to Lx exactly, as linspace does.
        if i + 1 == self.nx {
            self.lx
        } else {
            i as f64 * self.dx
        }
    }

    /// y coordinate of column `j`.
    pub fn y(&self, j: usize) -> f64 {
        if j + 1 == self.ny {
            self.ly
        } else {
            j as f64 * self.dy
        }
    }

    /// All x coordinates.
    pub fn xs(&self) -> Vec<f64> {
        (0..self.nx).map(|i| self.x(i)).collect()
    }

    /// All y coordinates.
    pub fn ys(&self) -> Vec<f64> {
        (0..self.ny).map(|j| self.y(j)).collect()
    }

    /// Evaluate `f(x, y)` at every grid point.
    pub fn sample<D>(&self, mut f: impl FnMut(f64, f64) -> f64) -> Array2<D> {
        Array2::from_fn(self.nx, self.ny, |i, j| f(self.x(i), self.y(j)))
    }
}
