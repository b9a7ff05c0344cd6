//! Integration tests: physical properties every solver must keep.

use calor_core::{Field, Solver};
use calor_grid::{GaussianBump, Grid};
use calor_solvers::{
    explicit_max_dt, ExplicitStencil, SparseLaplacian, SpectralOperator, SpectralSolver,
};
use calor_test_utils::{assert_close, random_field, CountingEngine};
use calor_transform::{build_engine, DctBackend, FftDct};

fn spectral(grid: &Grid, alpha: f64, dt: f64, backend: DctBackend) -> SpectralSolver {
    let op = SpectralOperator::builder(grid)
        .alpha(alpha)
        .dt(dt)
        .build()
        .unwrap();
    SpectralSolver::new(build_engine(backend, grid.nx(), grid.ny()), op).unwrap()
}

fn run(solver: &mut dyn Solver, u0: &Field, steps: usize) -> Field {
    solver.prepare(u0).unwrap();
    for _ in 0..steps {
        solver.advance().unwrap();
    }
    solver.materialize().unwrap()
}

#[test]
fn spectral_conserves_mean_over_long_runs() {
    let grid = Grid::new(4, 4, 3.0, 3.0).unwrap(); // dx = 1
    let u0 = random_field(4, 4, 11);
    let mut s = spectral(&grid, 1.0, 1.0, DctBackend::Fft);
    let u = run(&mut s, &u0, 10_000);
    assert!((u.mean() - u0.mean()).abs() < 1e-6);
    // Everything but the mean has decayed away.
    assert!(u.as_slice().iter().all(|v| (v - u0.mean()).abs() < 1e-6));
}

#[test]
fn spectral_is_stable_far_beyond_explicit_limit() {
    let grid = Grid::new(32, 32, 1.0, 1.0).unwrap();
    let dt = 1000.0 * explicit_max_dt(&grid, 0.1);
    let u0 = GaussianBump::default().sample(&grid).unwrap();
    let mut s = spectral(&grid, 0.1, dt, DctBackend::Fft);
    s.prepare(&u0).unwrap();
    let mut prev = u0.l2_norm();
    for _ in 0..50 {
        s.advance().unwrap();
        let u = s.materialize().unwrap();
        assert!(u.first_non_finite().is_none());
        let norm = u.l2_norm();
        assert!(norm <= prev * (1.0 + 1e-12), "norm grew: {prev} -> {norm}");
        prev = norm;
    }
}

#[test]
fn spectral_backends_agree_after_many_steps() {
    let grid = Grid::new(12, 9, 1.0, 1.0).unwrap();
    let u0 = random_field(12, 9, 3);
    let a = run(&mut spectral(&grid, 0.01, 0.05, DctBackend::Direct), &u0, 200);
    let b = run(&mut spectral(&grid, 0.01, 0.05, DctBackend::Fft), &u0, 200);
    assert_close(&a, &b, 1e-10);
}

#[test]
fn spectral_transforms_only_at_edges_of_run() {
    let grid = Grid::new(8, 8, 1.0, 1.0).unwrap();
    let engine = CountingEngine::new(Box::new(FftDct::new(8, 8)));
    let forward = engine.forward_calls.clone();
    let inverse = engine.inverse_calls.clone();
    let op = SpectralOperator::builder(&grid)
        .alpha(0.01)
        .dt(0.01)
        .build()
        .unwrap();
    let mut s = SpectralSolver::new(Box::new(engine), op).unwrap();
    run(&mut s, &random_field(8, 8, 1), 100);
    assert_eq!(forward.load(std::sync::atomic::Ordering::Relaxed), 1);
    assert_eq!(inverse.load(std::sync::atomic::Ordering::Relaxed), 1);
}

#[test]
fn stencil_and_sparse_agree() {
    let grid = Grid::new(20, 14, 1.0, 0.5).unwrap();
    let alpha = 0.02;
    let dt = 0.9 * explicit_max_dt(&grid, alpha);
    let u0 = GaussianBump::default().sample(&grid).unwrap();
    let a = run(&mut ExplicitStencil::new(&grid, alpha, dt).unwrap(), &u0, 300);
    let b = run(&mut SparseLaplacian::new(&grid, alpha, dt).unwrap(), &u0, 300);
    assert_close(&a, &b, 1e-10);
}

#[test]
fn explicit_solvers_conserve_heat() {
    let grid = Grid::new(16, 16, 1.0, 1.0).unwrap();
    let alpha = 0.05;
    let dt = explicit_max_dt(&grid, alpha) / 2.0;
    let u0 = random_field(16, 16, 5);
    for mut solver in [
        Box::new(ExplicitStencil::new(&grid, alpha, dt).unwrap()) as Box<dyn Solver>,
        Box::new(SparseLaplacian::new(&grid, alpha, dt).unwrap()),
    ] {
        let u = run(solver.as_mut(), &u0, 500);
        assert!(
            (u.mean() - u0.mean()).abs() < 1e-9,
            "{} drifted",
            solver.name()
        );
    }
}

#[test]
fn spectral_and_stencil_converge_together_on_fine_steps() {
    // Same PDE, different discretizations: with a small dt the two
    // trajectories stay close.
    let grid = Grid::new(24, 24, 1.0, 1.0).unwrap();
    let alpha = 1e-3;
    let dt = explicit_max_dt(&grid, alpha) / 10.0;
    let u0 = GaussianBump::default().sample(&grid).unwrap();
    let a = run(&mut spectral(&grid, alpha, dt, DctBackend::Fft), &u0, 100);
    let b = run(&mut ExplicitStencil::new(&grid, alpha, dt).unwrap(), &u0, 100);
    let rel = a.max_abs_diff(&b).unwrap() / u0.max_abs();
    assert!(rel < 1e-2, "relative gap {rel}");
}
