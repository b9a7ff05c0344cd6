//! Direct-summation DCT using precomputed cosine bases.

use std::f64::consts::PI;

use calor_core::{BackendError, Field, FrequencyField};

use crate::engine::{check_shape, ortho_scale, separable, TransformEngine};

/// Orthonormal DCT-II basis for one axis, stored row-major as `basis[k][n]`.
#[derive(Clone, Debug)]
struct CosineBasis {
    n: usize,
    basis: Vec<f64>,
}

impl CosineBasis {
    fn new(n: usize) -> Self {
        let mut basis = Vec::with_capacity(n * n);
        for k in 0..n {
            let s = ortho_scale(k, n);
            for i in 0..n {
                let angle = PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64;
                basis.push(s * angle.cos());
            }
        }
        Self { n, basis }
    }

    /// `line := B · line`
    fn forward(&self, line: &mut [f64], scratch: &mut [f64]) {
        for (k, out) in scratch.iter_mut().enumerate() {
            let row = &self.basis[k * self.n..(k + 1) * self.n];
            *out = row.iter().zip(line.iter()).map(|(b, x)| b * x).sum();
        }
        line.copy_from_slice(scratch);
    }

    /// `line := Bᵀ · line`
    fn inverse(&self, line: &mut [f64], scratch: &mut [f64]) {
        scratch.fill(0.0);
        for (k, &coeff) in line.iter().enumerate() {
            let row = &self.basis[k * self.n..(k + 1) * self.n];
            for (out, b) in scratch.iter_mut().zip(row) {
                *out += b * coeff;
            }
        }
        line.copy_from_slice(scratch);
    }
}

/// Host engine evaluating the DCT as separable matrix products.
///
/// Each axis keeps an `n × n` orthonormal cosine basis; a 2D transform
/// costs `O(nx·ny·(nx+ny))`. Exact to rounding and simple to vectorize,
/// which makes it the reference the fast engine is checked against.
///
/// # Examples
///
/// ```
/// use calor_core::Field;
/// use calor_transform::{DirectDct, TransformEngine};
///
/// let engine = DirectDct::new(4, 4);
/// let u = Field::filled(4, 4, 3.0);
/// let c = engine.forward(&u).unwrap();
/// // A constant field has all its energy in mode (0, 0).
/// assert!((c.get(0, 0).unwrap() - 12.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct DirectDct {
    x: CosineBasis,
    y: CosineBasis,
}

impl DirectDct {
    /// Plan an engine for `nx × ny` arrays.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            x: CosineBasis::new(nx),
            y: CosineBasis::new(ny),
        }
    }
}

impl TransformEngine for DirectDct {
    fn name(&self) -> &str {
        "direct"
    }

    fn shape(&self) -> (usize, usize) {
        (self.x.n, self.y.n)
    }

    fn forward(&self, field: &Field) -> Result<FrequencyField, BackendError> {
        check_shape(self.shape(), field)?;
        let (nx, ny) = self.shape();
        let mut out = field.clone();
        let mut sx = vec![0.0; nx];
        let mut sy = vec![0.0; ny];
        separable(
            out.as_mut_slice(),
            nx,
            ny,
            |row| self.y.forward(row, &mut sy),
            |col| self.x.forward(col, &mut sx),
        );
        Ok(out.into_domain())
    }

    fn inverse(&self, coeffs: &FrequencyField) -> Result<Field, BackendError> {
        check_shape(self.shape(), coeffs)?;
        let (nx, ny) = self.shape();
        let mut out = coeffs.clone();
        let mut sx = vec![0.0; nx];
        let mut sy = vec![0.0; ny];
        separable(
            out.as_mut_slice(),
            nx,
            ny,
            |row| self.y.inverse(row, &mut sy),
            |col| self.x.inverse(col, &mut sx),
        );
        Ok(out.into_domain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthonormal() {
        for n in [2usize, 3, 5, 8] {
            let b = CosineBasis::new(n);
            for k in 0..n {
                for l in 0..n {
                    let dot: f64 = (0..n)
                        .map(|i| b.basis[k * n + i] * b.basis[l * n + i])
                        .sum();
                    let expected = if k == l { 1.0 } else { 0.0 };
                    assert!(
                        (dot - expected).abs() < 1e-12,
                        "n={n} <{k},{l}> = {dot}"
                    );
                }
            }
        }
    }

    #[test]
    fn single_mode_inverts_to_cosine() {
        let engine = DirectDct::new(4, 3);
        let mut c = FrequencyField::zeros(4, 3);
        *c.get_mut(1, 0).unwrap() = 1.0;
        let u = engine.inverse(&c).unwrap();
        // Mode (1, 0) varies along x only.
        for i in 0..4 {
            let expected = (2.0f64 / 4.0).sqrt()
                * (1.0f64 / 3.0).sqrt()
                * (PI * (2 * i + 1) as f64 / 8.0).cos();
            for j in 0..3 {
                assert!((u.get(i, j).unwrap() - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn rejects_wrong_shape() {
        let engine = DirectDct::new(4, 4);
        let err = engine.forward(&Field::zeros(4, 5)).unwrap_err();
        assert_eq!(
            err,
            BackendError::ShapeMismatch {
                expected: (4, 4),
                found_len: 20
            }
        );
    }
}
