//! Row-major 2D arrays tagged with the domain they live in.
//!
//! [`Field`] holds temperatures on grid points; [`FrequencyField`] holds
//! cosine-mode coefficients. Both share the [`Array2`] storage, and the
//! zero-sized domain marker keeps them from being mixed up.

use std::fmt;
use std::marker::PhantomData;

use crate::error::BackendError;

/// Marker for arrays indexed by grid point `(i, j)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spatial;

/// Marker for arrays indexed by cosine mode `(p, q)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spectral;

/// A dense `nx × ny` array of `f64`, stored row-major.
///
/// Row index `i` runs along x (`nx` rows), column index `j` along y
/// (`ny` columns). The flat index of `(i, j)` is `i * ny + j`.
pub struct Array2<D> {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
    _domain: PhantomData<D>,
}

/// Temperature samples on the grid.
pub type Field = Array2<Spatial>;

/// Cosine-transform coefficients, one per mode pair `(p, q)`.
pub type FrequencyField = Array2<Spectral>;

impl<D> Array2<D> {
    /// An all-zero array of the given shape.
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self::filled(nx, ny, 0.0)
    }

    /// An array with every cell set to `value`.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
            _domain: PhantomData,
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Returns [`BackendError::ShapeMismatch`] if `data.len() != nx * ny`.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> Result<Self, BackendError> {
        if data.len() != nx * ny {
            return Err(BackendError::ShapeMismatch {
                expected: (nx, ny),
                found_len: data.len(),
            });
        }
        Ok(Self {
            nx,
            ny,
            data,
            _domain: PhantomData,
        })
    }

    /// Build an array by evaluating `f(i, j)` for every cell.
    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                data.push(f(i, j));
            }
        }
        Self {
            nx,
            ny,
            data,
            _domain: PhantomData,
        }
    }

    /// Number of rows (x samples or p modes).
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of columns (y samples or q modes).
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false` for arrays built from a valid grid.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(i, j)`, or `None` if out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.nx && j < self.ny {
            Some(self.data[i * self.ny + j])
        } else {
            None
        }
    }

    /// Mutable reference to the value at `(i, j)`, or `None` if out of bounds.
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut f64> {
        if i < self.nx && j < self.ny {
            Some(&mut self.data[i * self.ny + j])
        } else {
            None
        }
    }

    /// Row `i` as a slice of length `ny`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= nx`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.ny..(i + 1) * self.ny]
    }

    /// Iterator over rows.
    pub fn rows(&self) -> std::slice::Chunks<'_, f64> {
        self.data.chunks(self.ny.max(1))
    }

    /// The flat row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The flat row-major buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the array and return its buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Arithmetic mean over all cells.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Euclidean norm of the flat buffer.
    pub fn l2_norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Largest absolute value.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
    }

    /// Largest absolute elementwise difference, or `None` if shapes differ.
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs())),
        )
    }

    /// Flat index of the first NaN or infinite cell.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.data.iter().position(|v| !v.is_finite())
    }

    /// Elementwise product in place: `self[k] *= other[k]`.
    ///
    /// Returns [`BackendError::ShapeMismatch`] if the shapes differ.
    pub fn hadamard_assign(&mut self, other: &Self) -> Result<(), BackendError> {
        if self.shape() != other.shape() {
            return Err(BackendError::ShapeMismatch {
                expected: self.shape(),
                found_len: other.len(),
            });
        }
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a *= b;
        }
        Ok(())
    }

    /// Reinterpret the buffer in another domain without copying.
    ///
    /// Used by transform engines, which by definition move data
    /// between domains.
    pub fn into_domain<E>(self) -> Array2<E> {
        Array2 {
            nx: self.nx,
            ny: self.ny,
            data: self.data,
            _domain: PhantomData,
        }
    }
}

// Manual impls: derives would put bounds on the marker type.
impl<D> Clone for Array2<D> {
    fn clone(&self) -> Self {
        Self {
            nx: self.nx,
            ny: self.ny,
            data: self.data.clone(),
            _domain: PhantomData,
        }
    }
}

impl<D> PartialEq for Array2<D> {
    fn eq(&self, other: &Self) -> bool {
        self.nx == other.nx && self.ny == other.ny && self.data == other.data
    }
}

impl<D> fmt::Debug for Array2<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array2")
            .field("nx", &self.nx)
            .field("ny", &self.ny)
            .field("domain", &std::any::type_name::<D>())
            .finish_non_exhaustive()
    }
}
