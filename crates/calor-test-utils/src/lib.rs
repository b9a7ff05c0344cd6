//! Test utilities and mock types for Calor development.
//!
//! Provides seeded random fields, field comparison helpers, and mock
//! implementations of [`TransformEngine`](calor_transform::TransformEngine)
//! and [`Solver`](calor_core::Solver) for exercising
//! the stepper without a real backend.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{CountingEngine, DecaySolver, FailingEngine};

use calor_core::{Array2, Field};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic field with values uniform in `[-100, 100)`.
pub fn random_field(nx: usize, ny: usize, seed: u64) -> Field {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Field::from_fn(nx, ny, |_, _| rng.random_range(-100.0..100.0))
}

/// Assert two arrays agree to within `rel_tol` of the larger magnitude.
///
/// The scale is `max(|a|_∞, |b|_∞, 1)`, so all-zero fields compare
/// absolutely.
#[track_caller]
pub fn assert_close<D>(a: &Array2<D>, b: &Array2<D>, rel_tol: f64) {
    let diff = a
        .max_abs_diff(b)
        .unwrap_or_else(|| panic!("shape mismatch: {:?} vs {:?}", a.shape(), b.shape()));
    let scale = a.max_abs().max(b.max_abs()).max(1.0);
    assert!(
        diff <= rel_tol * scale,
        "arrays differ by {diff} (tolerance {} at scale {scale})",
        rel_tol * scale
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_field_is_deterministic() {
        let a = random_field(5, 7, 42);
        let b = random_field(5, 7, 42);
        let c = random_field(5, 7, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.as_slice().iter().all(|v| (-100.0..100.0).contains(v)));
    }

    #[test]
    #[should_panic(expected = "arrays differ")]
    fn assert_close_detects_difference() {
        let a = Field::filled(2, 2, 1.0);
        let b = Field::filled(2, 2, 1.1);
        assert_close(&a, &b, 1e-9);
    }
}
