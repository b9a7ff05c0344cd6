//! Fast DCT built on complex FFTs.
//!
//! Each 1D DCT-II of length `N` is computed with a single length-`N` FFT
//! (Makhoul's reordering): even-indexed samples are placed in order at the
//! front of the buffer and odd-indexed samples reversed at the back, the
//! buffer is transformed, and mode `k` is read off as the real part after
//! a quarter-wave twiddle `e^{-iπk/2N}`. The DCT-III runs the same steps
//! backwards through an inverse FFT.

use std::f64::consts::PI;
use std::sync::Arc;

use calor_core::{BackendError, Field, FrequencyField};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::engine::{check_shape, ortho_scale, separable, TransformEngine};

/// Plans and twiddles for one axis.
struct LinePlan {
    n: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    /// `e^{-iπk/2N}` for `k = 0..N`.
    twiddle: Vec<Complex<f64>>,
    /// Orthonormal scale per mode.
    scale: Vec<f64>,
}

/// Reusable per-call buffers for one axis.
struct LineScratch {
    buf: Vec<Complex<f64>>,
    fft: Vec<Complex<f64>>,
}

impl LinePlan {
    fn new(planner: &mut FftPlanner<f64>, n: usize) -> Self {
        let twiddle = (0..n)
            .map(|k| Complex::from_polar(1.0, -PI * k as f64 / (2 * n) as f64))
            .collect();
        let scale = (0..n).map(|k| ortho_scale(k, n)).collect();
        // A zero-length axis is never transformed; plan a trivial length.
        let len = n.max(1);
        Self {
            n,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
            twiddle,
            scale,
        }
    }

    fn scratch(&self) -> LineScratch {
        let len = self
            .forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len());
        LineScratch {
            buf: vec![Complex::new(0.0, 0.0); self.n],
            fft: vec![Complex::new(0.0, 0.0); len],
        }
    }

    fn dct2(&self, line: &mut [f64], s: &mut LineScratch) {
        let n = self.n;
        for (m, &x) in line.iter().step_by(2).enumerate() {
            s.buf[m] = Complex::new(x, 0.0);
        }
        for (m, &x) in line.iter().skip(1).step_by(2).enumerate() {
            s.buf[n - 1 - m] = Complex::new(x, 0.0);
        }
        self.forward.process_with_scratch(&mut s.buf, &mut s.fft);
        for (k, out) in line.iter_mut().enumerate() {
            *out = self.scale[k] * (s.buf[k] * self.twiddle[k]).re;
        }
    }

    fn dct3(&self, line: &mut [f64], s: &mut LineScratch) {
        let n = self.n;
        // Undo the orthonormal scaling to get the raw cosine sums C_k.
        let raw = |k: usize| if k < n { line[k] / self.scale[k] } else { 0.0 };
        for k in 0..n {
            let pair = Complex::new(raw(k), -raw(n - k));
            s.buf[k] = self.twiddle[k].conj() * pair;
        }
        self.inverse.process_with_scratch(&mut s.buf, &mut s.fft);
        let norm = 1.0 / n as f64;
        // Imaginary residue is rounding noise; only the real part is kept.
        for (m, out) in line.iter_mut().step_by(2).enumerate() {
            *out = s.buf[m].re * norm;
        }
        for (m, out) in line.iter_mut().skip(1).step_by(2).enumerate() {
            *out = s.buf[n - 1 - m].re * norm;
        }
    }
}

/// Host engine computing the DCT through `rustfft`.
///
/// `O(nx·ny·log(nx·ny))` per 2D transform. Plans are built once at
/// construction and shared by every call.
///
/// # Examples
///
/// ```
/// use calor_core::Field;
/// use calor_transform::{FftDct, TransformEngine};
///
/// let engine = FftDct::new(8, 6);
/// let u = Field::from_fn(8, 6, |i, j| (i * 6 + j) as f64);
/// let back = engine.inverse(&engine.forward(&u).unwrap()).unwrap();
/// assert!(u.max_abs_diff(&back).unwrap() < 1e-10);
/// ```
pub struct FftDct {
    x: LinePlan,
    y: LinePlan,
}

impl FftDct {
    /// Plan an engine for `nx × ny` arrays.
    pub fn new(nx: usize, ny: usize) -> Self {
        let mut planner = FftPlanner::new();
        let x = LinePlan::new(&mut planner, nx);
        let y = LinePlan::new(&mut planner, ny);
        Self { x, y }
    }
}

impl std::fmt::Debug for FftDct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftDct")
            .field("nx", &self.x.n)
            .field("ny", &self.y.n)
            .finish()
    }
}

impl TransformEngine for FftDct {
    fn name(&self) -> &str {
        "fft"
    }

    fn shape(&self) -> (usize, usize) {
        (self.x.n, self.y.n)
    }

    fn forward(&self, field: &Field) -> Result<FrequencyField, BackendError> {
        check_shape(self.shape(), field)?;
        let (nx, ny) = self.shape();
        let mut out = field.clone();
        let mut sx = self.x.scratch();
        let mut sy = self.y.scratch();
        separable(
            out.as_mut_slice(),
            nx,
            ny,
            |row| self.y.dct2(row, &mut sy),
            |col| self.x.dct2(col, &mut sx),
        );
        Ok(out.into_domain())
    }

    fn inverse(&self, coeffs: &FrequencyField) -> Result<Field, BackendError> {
        check_shape(self.shape(), coeffs)?;
        let (nx, ny) = self.shape();
        let mut out = coeffs.clone();
        let mut sx = self.x.scratch();
        let mut sy = self.y.scratch();
        separable(
            out.as_mut_slice(),
            nx,
            ny,
            |row| self.y.dct3(row, &mut sy),
            |col| self.x.dct3(col, &mut sx),
        );
        Ok(out.into_domain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dct2(x: &[f64]) -> Vec<f64> {
        let n = x.len();
        (0..n)
            .map(|k| {
                let sum: f64 = x
                    .iter()
                    .enumerate()
                    .map(|(i, v)| v * (PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64).cos())
                    .sum();
                ortho_scale(k, n) * sum
            })
            .collect()
    }

    #[test]
    fn line_dct2_matches_definition() {
        let mut planner = FftPlanner::new();
        for n in [2usize, 3, 4, 7, 16] {
            let plan = LinePlan::new(&mut planner, n);
            let mut s = plan.scratch();
            let x: Vec<f64> = (0..n).map(|i| ((i * 7 + 3) % 5) as f64 - 1.5).collect();
            let expected = naive_dct2(&x);
            let mut line = x.clone();
            plan.dct2(&mut line, &mut s);
            for (a, b) in line.iter().zip(&expected) {
                assert!((a - b).abs() < 1e-12, "n={n}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn line_dct3_inverts_dct2() {
        let mut planner = FftPlanner::new();
        for n in [2usize, 5, 8, 9] {
            let plan = LinePlan::new(&mut planner, n);
            let mut s = plan.scratch();
            let x: Vec<f64> = (0..n).map(|i| (i as f64).sin() * 10.0).collect();
            let mut line = x.clone();
            plan.dct2(&mut line, &mut s);
            plan.dct3(&mut line, &mut s);
            for (a, b) in line.iter().zip(&x) {
                assert!((a - b).abs() < 1e-12, "n={n}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn rejects_wrong_shape() {
        let engine = FftDct::new(4, 4);
        let coeffs = FrequencyField::zeros(2, 8);
        assert!(matches!(
            engine.inverse(&coeffs),
            Err(BackendError::ShapeMismatch { .. })
        ));
    }
}
