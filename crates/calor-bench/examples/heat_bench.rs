//! Timing driver for one heat-equation benchmark.
//!
//! Usage: `heat_bench [solver] [nx] [ny]`
//!
//! `solver` is one of `fft`, `dct`, `stencil`, `laplace` (default `fft`);
//! `nx`/`ny` default to 256. Runs the matching reference profile, prints
//! the mean wall time, and writes `results/` and `snapshots/` under the
//! working directory.

use std::process::ExitCode;

use calor_bench::{profile, time_profile};
use calor_engine::SolverKind;
use calor_io::OutputLayout;

fn parse_args() -> Result<(SolverKind, usize, usize), String> {
    let mut args = std::env::args().skip(1);
    let kind = match args.next() {
        Some(s) => s.parse::<SolverKind>()?,
        None => SolverKind::default(),
    };
    let nx = match args.next() {
        Some(s) => s.parse().map_err(|e| format!("bad nx '{s}': {e}"))?,
        None => 256,
    };
    let ny = match args.next() {
        Some(s) => s.parse().map_err(|e| format!("bad ny '{s}': {e}"))?,
        None => 256,
    };
    Ok((kind, nx, ny))
}

fn main() -> ExitCode {
    let (kind, nx, ny) = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("usage: heat_bench [fft|dct|stencil|laplace] [nx] [ny]");
            return ExitCode::FAILURE;
        }
    };

    let profile = profile(kind, nx, ny);
    println!("Executing {kind} with grid points [{nx},{ny}]");
    println!(
        "  alpha={} dt={} steps={} save_interval={} executions={}",
        profile.config.alpha,
        profile.config.dt,
        profile.config.num_steps(),
        profile.config.save_interval,
        profile.executions
    );

    let (secs, output) = match time_profile(&profile) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Time taken: {secs}s");
    let m = &output.metrics;
    println!(
        "  prepare={}us stepping={}us captures={} ({}us) finalize={}us",
        m.prepare_us, m.stepping_us, m.captures, m.capture_us, m.finalize_us
    );
    if let Some(mean) = m.mean_step_us() {
        println!("  mean step={mean:.2}us");
    }

    match OutputLayout::default().persist(kind.label(), &output) {
        Ok(paths) => {
            println!("Wrote {} files", paths.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
