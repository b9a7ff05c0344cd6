//! Where a run's files go.
//!
//! ```text
//! results/<solver>_<nx>_<ny>.csv      final field
//! snapshots/<solver>_t<time>.csv      one per snapshot, time to 3 decimals
//! ```
//!
//! Snapshots whose times round to the same three decimals share a file
//! name; the later one overwrites the earlier.

use std::fs;
use std::path::{Path, PathBuf};

use calor_engine::RunOutput;

use crate::csv::write_matrix_file;
use crate::error::PersistError;

/// Output directories for results and snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory for final fields.
    pub results_dir: PathBuf,
    /// Directory for snapshot sequences.
    pub snapshots_dir: PathBuf,
}

impl Default for OutputLayout {
    /// `results/` and `snapshots/` relative to the working directory.
    fn default() -> Self {
        Self::under(".")
    }
}

impl OutputLayout {
    /// `results/` and `snapshots/` under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            results_dir: root.join("results"),
            snapshots_dir: root.join("snapshots"),
        }
    }

    /// Path of the final-field file.
    ///
    /// ```
    /// use calor_io::OutputLayout;
    /// use std::path::Path;
    ///
    /// let layout = OutputLayout::under("out");
    /// assert_eq!(
    ///     layout.result_path("seq_fft", 256, 128),
    ///     Path::new("out/results/seq_fft_256_128.csv")
    /// );
    /// ```
    pub fn result_path(&self, solver: &str, nx: usize, ny: usize) -> PathBuf {
        self.results_dir.join(format!("{solver}_{nx}_{ny}.csv"))
    }

    /// Path of the snapshot file for simulated time `time`.
    ///
    /// ```
    /// use calor_io::OutputLayout;
    /// use std::path::Path;
    ///
    /// let layout = OutputLayout::under("out");
    /// assert_eq!(
    ///     layout.snapshot_path("seq_fft", 0.5),
    ///     Path::new("out/snapshots/seq_fft_t0.500.csv")
    /// );
    /// ```
    pub fn snapshot_path(&self, solver: &str, time: f64) -> PathBuf {
        self.snapshots_dir.join(format!("{solver}_t{time:.3}.csv"))
    }

    /// Create both directories and write the final field and every
    /// snapshot of `output`. Returns the paths written, final field first.
    pub fn persist(&self, solver: &str, output: &RunOutput) -> Result<Vec<PathBuf>, PersistError> {
        fs::create_dir_all(&self.results_dir)?;
        fs::create_dir_all(&self.snapshots_dir)?;

        let mut written = Vec::with_capacity(output.snapshots.len() + 1);
        let (nx, ny) = output.final_field.shape();
        let result = self.result_path(solver, nx, ny);
        write_matrix_file(&result, &output.final_field)?;
        written.push(result);

        for snap in &output.snapshots {
            let path = self.snapshot_path(solver, snap.time);
            write_matrix_file(&path, &snap.field)?;
            written.push(path);
        }
        Ok(written)
    }
}
