//! The [`TransformEngine`] trait.

use calor_core::{Array2, BackendError, Field, FrequencyField};

/// A forward/inverse orthonormal 2D cosine transform pair.
///
/// `forward` is the type-II DCT and `inverse` the type-III DCT, both with
/// unitary ("ortho") scaling, applied along both axes. Implementations are
/// planned for one shape and reject any other.
///
/// # Contract
///
/// - `inverse(forward(x)) == x` up to rounding, for every real `x` of the
///   planned shape.
/// - Both directions preserve shape and return real values only; any
///   imaginary residue of an internal complex representation is dropped.
/// - Both directions are deterministic.
/// - A zero-sized shape is valid and maps empty arrays to empty arrays.
pub trait TransformEngine: Send {
    /// Backend name for reports.
    fn name(&self) -> &str;

    /// The `(nx, ny)` shape this engine was planned for.
    fn shape(&self) -> (usize, usize);

    /// Spatial field → cosine coefficients (DCT-II, ortho).
    fn forward(&self, field: &Field) -> Result<FrequencyField, BackendError>;

    /// Cosine coefficients → spatial field (DCT-III, ortho).
    fn inverse(&self, coeffs: &FrequencyField) -> Result<Field, BackendError>;
}

/// Reject arrays whose shape differs from the planned one.
pub(crate) fn check_shape<D>(
    planned: (usize, usize),
    array: &Array2<D>,
) -> Result<(), BackendError> {
    if array.shape() != planned {
        return Err(BackendError::ShapeMismatch {
            expected: planned,
            found_len: array.len(),
        });
    }
    Ok(())
}

/// Orthonormal scale factor for mode `k` of an `n`-point transform.
pub(crate) fn ortho_scale(k: usize, n: usize) -> f64 {
    if k == 0 {
        (1.0 / n as f64).sqrt()
    } else {
        (2.0 / n as f64).sqrt()
    }
}

/// Apply a 1D line transform along both axes of a row-major `nx × ny` buffer.
///
/// `along_y` transforms each row (length `ny`) in place; `along_x` is then
/// applied to each column (length `nx`) through a gather/scatter buffer.
/// An empty buffer (either dimension zero) is left untouched.
pub(crate) fn separable<FY, FX>(
    data: &mut [f64],
    nx: usize,
    ny: usize,
    mut along_y: FY,
    mut along_x: FX,
) where
    FY: FnMut(&mut [f64]),
    FX: FnMut(&mut [f64]),
{
    if data.is_empty() || nx == 0 || ny == 0 {
        return;
    }
    for row in data.chunks_mut(ny) {
        along_y(row);
    }
    let mut column = vec![0.0; nx];
    for j in 0..ny {
        for (i, c) in column.iter_mut().enumerate() {
            *c = data[i * ny + j];
        }
        along_x(&mut column);
        for (i, c) in column.iter().enumerate() {
            data[i * ny + j] = *c;
        }
    }
}
