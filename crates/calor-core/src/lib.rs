//! Core types and traits for the Calor heat-equation solvers.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Calor workspace:
//! domain-tagged 2D arrays, the error taxonomy, and the [`Solver`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod solver;

pub use error::{Axis, BackendError, GridError, ParameterError, SolverError};
pub use field::{Array2, Field, FrequencyField, Spatial, Spectral};
pub use solver::Solver;
