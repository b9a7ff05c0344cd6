//! Integration test: persist a real run and read it back.

use std::path::PathBuf;

use calor_engine::{Duration, RunConfig, SolverKind, TimeStepper};
use calor_io::{read_matrix_file, OutputLayout, PersistError};
use calor_test_utils::random_field;
use proptest::prelude::*;

/// Fresh scratch directory under the system temp dir.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("calor-io-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn persist_writes_result_and_every_snapshot() {
    let config = RunConfig {
        dt: 0.01,
        duration: Duration::Steps(10),
        save_interval: 3,
        ..RunConfig::with_resolution(8, 6)
    };
    let kind = SolverKind::default();
    let output = TimeStepper::from_config(&config, kind).unwrap().run().unwrap();

    let root = scratch("persist");
    let layout = OutputLayout::under(&root);
    let written = layout.persist(kind.label(), &output).unwrap();

    assert_eq!(written.len(), 1 + output.snapshots.len());
    assert_eq!(written[0], root.join("results/seq_fft_8_6.csv"));
    let names: Vec<String> = written[1..]
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "seq_fft_t0.000.csv",
            "seq_fft_t0.030.csv",
            "seq_fft_t0.060.csv",
            "seq_fft_t0.090.csv",
            "seq_fft_t0.100.csv",
        ]
    );

    assert_eq!(read_matrix_file(&written[0]).unwrap(), output.final_field);
    for (path, snap) in written[1..].iter().zip(&output.snapshots) {
        assert_eq!(read_matrix_file(path).unwrap(), snap.field);
    }
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let root = scratch("missing");
    let err = read_matrix_file(&root.join("nope.csv")).unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn csv_roundtrip_is_lossless(nx in 1usize..12, ny in 1usize..12, seed in any::<u64>()) {
        let field = random_field(nx, ny, seed);
        let mut buf = Vec::new();
        calor_io::write_matrix(&mut buf, &field).unwrap();
        let back = calor_io::read_matrix(buf.as_slice()).unwrap();
        prop_assert_eq!(back, field);
    }
}
