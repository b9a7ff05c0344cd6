//! Integration test: round-trip law and backend agreement.
//!
//! Both engines must satisfy `inverse(forward(x)) ≈ x` for arbitrary real
//! fields, and must agree with each other coefficient by coefficient.

use calor_core::{Field, FrequencyField};
use calor_test_utils::{assert_close, random_field};
use calor_transform::{build_engine, DctBackend, DirectDct, FftDct, TransformEngine};
use proptest::prelude::*;

const SHAPES: &[(usize, usize)] = &[(2, 2), (2, 7), (4, 4), (5, 3), (16, 16), (31, 12), (64, 48)];

#[test]
fn roundtrip_direct() {
    for (seed, &(nx, ny)) in SHAPES.iter().enumerate() {
        let engine = DirectDct::new(nx, ny);
        let x = random_field(nx, ny, seed as u64);
        let back = engine.inverse(&engine.forward(&x).unwrap()).unwrap();
        assert_close(&x, &back, 1e-9);
    }
}

#[test]
fn roundtrip_fft() {
    for (seed, &(nx, ny)) in SHAPES.iter().enumerate() {
        let engine = FftDct::new(nx, ny);
        let x = random_field(nx, ny, 100 + seed as u64);
        let back = engine.inverse(&engine.forward(&x).unwrap()).unwrap();
        assert_close(&x, &back, 1e-9);
    }
}

#[test]
fn backends_agree() {
    for (seed, &(nx, ny)) in SHAPES.iter().enumerate() {
        let x = random_field(nx, ny, 200 + seed as u64);
        let a = DirectDct::new(nx, ny).forward(&x).unwrap();
        let b = FftDct::new(nx, ny).forward(&x).unwrap();
        assert_close(&a, &b, 1e-10);

        let c = random_field(nx, ny, 300 + seed as u64).into_domain::<calor_core::Spectral>();
        let ia = DirectDct::new(nx, ny).inverse(&c).unwrap();
        let ib = FftDct::new(nx, ny).inverse(&c).unwrap();
        assert_close(&ia, &ib, 1e-10);
    }
}

#[test]
fn transform_is_unitary() {
    // Orthonormal scaling preserves the Euclidean norm.
    let x = random_field(20, 13, 7);
    for backend in [DctBackend::Direct, DctBackend::Fft] {
        let engine = build_engine(backend, 20, 13);
        let c = engine.forward(&x).unwrap();
        let rel = (c.l2_norm() - x.l2_norm()).abs() / x.l2_norm();
        assert!(rel < 1e-12, "{backend}: norm changed by {rel}");
    }
}

#[test]
fn constant_field_is_pure_mode_zero() {
    let x = Field::filled(6, 10, 2.5);
    for backend in [DctBackend::Direct, DctBackend::Fft] {
        let c = build_engine(backend, 6, 10).forward(&x).unwrap();
        let dc = c.get(0, 0).unwrap();
        assert!((dc - 2.5 * 60f64.sqrt()).abs() < 1e-10, "{backend}: dc={dc}");
        let rest = c.as_slice()[1..].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(rest < 1e-10, "{backend}: leakage {rest}");
    }
}

#[test]
fn zero_coefficients_invert_to_zero_field() {
    let c = FrequencyField::zeros(9, 4);
    for backend in [DctBackend::Direct, DctBackend::Fft] {
        let u = build_engine(backend, 9, 4).inverse(&c).unwrap();
        assert_eq!(u.max_abs(), 0.0, "{backend}");
    }
}

#[test]
fn zero_sized_shapes_map_empty_to_empty() {
    for (nx, ny) in [(0, 0), (0, 5), (4, 0)] {
        for backend in [DctBackend::Direct, DctBackend::Fft] {
            let engine = build_engine(backend, nx, ny);
            assert_eq!(engine.shape(), (nx, ny));
            let c = engine.forward(&Field::zeros(nx, ny)).unwrap();
            assert_eq!(c.shape(), (nx, ny), "{backend}");
            assert!(c.is_empty());
            let u = engine.inverse(&c).unwrap();
            assert_eq!(u.shape(), (nx, ny), "{backend}");
            // A non-empty array is still a shape mismatch.
            assert!(engine.forward(&Field::zeros(2, 2)).is_err(), "{backend}");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip_arbitrary_shapes(nx in 2usize..24, ny in 2usize..24, seed in any::<u64>()) {
        let x = random_field(nx, ny, seed);
        let engine = FftDct::new(nx, ny);
        let back = engine.inverse(&engine.forward(&x).unwrap()).unwrap();
        let diff = x.max_abs_diff(&back).unwrap();
        prop_assert!(diff <= 1e-9 * x.max_abs().max(1.0), "diff {}", diff);
    }
}
