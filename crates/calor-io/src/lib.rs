//! CSV persistence for Calor runs.
//!
//! The solver core performs no file I/O. This crate turns a
//! [`RunOutput`](calor_engine::RunOutput) into files:
//!
//! - [`write_matrix`] / [`read_matrix`] stream a field as comma-delimited
//!   text, one grid row per line, numpy `%.18e` formatting
//! - [`OutputLayout`] decides the `results/` and `snapshots/` file names
//!   and [`persist`](OutputLayout::persist)s a whole run

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod csv;
pub mod error;
pub mod layout;

pub use csv::{format_value, read_matrix, read_matrix_file, write_matrix, write_matrix_file};
pub use error::PersistError;
pub use layout::OutputLayout;
