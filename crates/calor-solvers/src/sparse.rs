//! Sparse-matrix Laplacian solver.
//!
//! Assembles the Neumann Laplacian once as a CSR matrix
//!
//! ```text
//! L = (Tx ⊗ Iy) / dx² + (Ix ⊗ Ty) / dy²
//! ```
//!
//! where `T` is the 1D second-difference matrix with the boundary rows
//! folded by reflection (`-1` on the end diagonals, `-2` elsewhere). Each
//! step is one sparse matrix-vector product: `u ← u + α·dt·(L u)`.
//! Agrees with [`ExplicitStencil`](crate::ExplicitStencil) to rounding,
//! with the same stability limit.

use calor_core::{BackendError, Field, Solver, SolverError};
use calor_grid::Grid;

use crate::{check_positive, explicit_max_dt};

/// Compressed sparse row matrix over `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Build from `(row, col, value)` triplets. Duplicates are summed and
    /// explicit zeros dropped.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        let mut sorted: Vec<(usize, usize, f64)> = triplets
            .iter()
            .copied()
            .filter(|&(r, c, _)| r < rows && c < cols)
            .collect();
        sorted.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut indptr = vec![0usize; rows + 1];
        let mut indices = Vec::with_capacity(sorted.len());
        let mut values: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;
        for (r, c, v) in sorted {
            if last == Some((r, c)) {
                if let Some(tail) = values.last_mut() {
                    *tail += v;
                }
                continue;
            }
            indices.push(c);
            values.push(v);
            indptr[r + 1] += 1;
            last = Some((r, c));
        }
        for r in 0..rows {
            indptr[r + 1] += indptr[r];
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            values,
        }
        .pruned()
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        Self {
            rows: n,
            cols: n,
            indptr: (0..=n).collect(),
            indices: (0..n).collect(),
            values: vec![1.0; n],
        }
    }

    /// 1D second difference with reflecting ends.
    ///
    /// For `n = 1` the single cell has no neighbours and the matrix is zero.
    pub fn neumann_second_difference(n: usize) -> Self {
        let mut t = Vec::with_capacity(3 * n);
        for i in 0..n {
            let mut diag = 0.0;
            if i > 0 {
                t.push((i, i - 1, 1.0));
                diag -= 1.0;
            }
            if i + 1 < n {
                t.push((i, i + 1, 1.0));
                diag -= 1.0;
            }
            t.push((i, i, diag));
        }
        Self::from_triplets(n, n, &t)
    }

    /// Kronecker product `self ⊗ other`.
    pub fn kron(&self, other: &CsrMatrix) -> Self {
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::with_capacity(self.nnz() * other.nnz());
        let mut values = Vec::with_capacity(self.nnz() * other.nnz());
        indptr.push(0);
        for a_row in 0..self.rows {
            for b_row in 0..other.rows {
                for (a_col, a_val) in self.row_entries(a_row) {
                    for (b_col, b_val) in other.row_entries(b_row) {
                        indices.push(a_col * other.cols + b_col);
                        values.push(a_val * b_val);
                    }
                }
                indptr.push(indices.len());
            }
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            values,
        }
    }

    /// `self · factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        for v in &mut self.values {
            *v *= factor;
        }
        self
    }

    /// `out = self · x`.
    ///
    /// # Errors
    ///
    /// [`BackendError::ShapeMismatch`] if `x` or `out` has the wrong length.
    pub fn mul_vec_into(&self, x: &[f64], out: &mut [f64]) -> Result<(), BackendError> {
        if x.len() != self.cols || out.len() != self.rows {
            return Err(BackendError::ShapeMismatch {
                expected: self.shape(),
                found_len: x.len(),
            });
        }
        for (r, slot) in out.iter_mut().enumerate() {
            *slot = self.row_entries(r).map(|(c, v)| v * x[c]).sum();
        }
        Ok(())
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Entry `(r, c)`, zero if not stored.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        if r >= self.rows {
            return 0.0;
        }
        self.row_entries(r)
            .find(|&(col, _)| col == c)
            .map_or(0.0, |(_, v)| v)
    }

    fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.rows).flat_map(move |r| self.row_entries(r).map(move |(c, v)| (r, c, v)))
    }

    fn row_entries(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.indptr[r]..self.indptr[r + 1];
        self.indices[span.clone()]
            .iter()
            .copied()
            .zip(self.values[span].iter().copied())
    }

    fn pruned(self) -> Self {
        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::with_capacity(self.nnz());
        let mut values = Vec::with_capacity(self.nnz());
        indptr.push(0);
        for r in 0..self.rows {
            for (c, v) in self.row_entries(r) {
                if v != 0.0 {
                    indices.push(c);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            indptr,
            indices,
            values,
        }
    }
}

/// Assemble the 2D Neumann Laplacian for `grid` in row-major cell order.
pub fn neumann_laplacian(grid: &Grid) -> CsrMatrix {
    let (nx, ny) = grid.shape();
    let tx = CsrMatrix::neumann_second_difference(nx).kron(&CsrMatrix::identity(ny));
    let ty = CsrMatrix::identity(nx).kron(&CsrMatrix::neumann_second_difference(ny));
    let lx = tx.scaled(1.0 / (grid.dx() * grid.dx()));
    let ly = ty.scaled(1.0 / (grid.dy() * grid.dy()));
    let t: Vec<_> = lx.triplets().chain(ly.triplets()).collect();
    CsrMatrix::from_triplets(nx * ny, nx * ny, &t)
}

/// Forward Euler driven by a pre-assembled sparse Laplacian.
#[derive(Debug)]
pub struct SparseLaplacian {
    name: String,
    shape: (usize, usize),
    /// `α·dt·L`
    step_matrix: CsrMatrix,
    max_dt: f64,
    state: Option<Field>,
    work: Vec<f64>,
}

impl SparseLaplacian {
    /// Assemble the Laplacian for `grid`.
    ///
    /// # Errors
    ///
    /// Same as [`ExplicitStencil::new`](crate::ExplicitStencil::new).
    pub fn new(grid: &Grid, alpha: f64, dt: f64) -> Result<Self, SolverError> {
        check_positive(alpha, dt)?;
        let max_dt = explicit_max_dt(grid, alpha);
        if dt > max_dt {
            return Err(SolverError::Unstable { dt, max_dt });
        }
        Ok(Self {
            name: "seq_laplace".to_string(),
            shape: grid.shape(),
            step_matrix: neumann_laplacian(grid).scaled(alpha * dt),
            max_dt,
            state: None,
            work: vec![0.0; grid.cell_count()],
        })
    }

    /// Override the identifier used in output paths.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The assembled `α·dt·L`.
    pub fn step_matrix(&self) -> &CsrMatrix {
        &self.step_matrix
    }
}

impl Solver for SparseLaplacian {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&mut self, initial: &Field) -> Result<(), SolverError> {
        if initial.shape() != self.shape {
            return Err(SolverError::Backend(BackendError::ShapeMismatch {
                expected: self.shape,
                found_len: initial.len(),
            }));
        }
        self.state = Some(initial.clone());
        Ok(())
    }

    fn advance(&mut self) -> Result<(), SolverError> {
        let state = self.state.as_mut().ok_or(SolverError::NotPrepared)?;
        self.step_matrix.mul_vec_into(state.as_slice(), &mut self.work)?;
        for (u, du) in state.as_mut_slice().iter_mut().zip(&self.work) {
            *u += du;
        }
        Ok(())
    }

    fn materialize(&self) -> Result<Field, SolverError> {
        self.state.clone().ok_or(SolverError::NotPrepared)
    }

    fn max_dt(&self) -> Option<f64> {
        Some(self.max_dt)
    }
}
