//! Calor: solvers for the 2D heat equation `∂u/∂t = α∇²u` under
//! zero-flux boundaries.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Calor sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use calor::prelude::*;
//!
//! let config = RunConfig {
//!     duration: Duration::Steps(20),
//!     save_interval: 5,
//!     ..RunConfig::with_resolution(32, 32)
//! };
//! let initial_mean = config.build().unwrap().1.mean();
//!
//! let output = TimeStepper::from_config(&config, SolverKind::Spectral(DctBackend::Fft))
//!     .unwrap()
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(output.snapshots.steps(), vec![0, 5, 10, 15, 20]);
//! assert!((output.final_field.mean() - initial_mean).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `calor-core` | Field arrays, errors, the `Solver` trait |
//! | [`grid`] | `calor-grid` | Grids and initial conditions |
//! | [`transform`] | `calor-transform` | Orthonormal DCT engines |
//! | [`solvers`] | `calor-solvers` | Spectral, stencil, and sparse solvers |
//! | [`engine`] | `calor-engine` | Configuration and time stepping |
//! | [`io`] | `calor-io` | CSV persistence |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Field arrays, error taxonomy, and the solver trait (`calor-core`).
pub use calor_core as types;

/// Grids and initial conditions (`calor-grid`).
pub use calor_grid as grid;

/// Orthonormal cosine transform engines (`calor-transform`).
///
/// [`transform::TransformEngine`] is the backend seam; pick an
/// implementation with [`transform::build_engine`].
pub use calor_transform as transform;

/// Heat-equation solvers (`calor-solvers`).
pub use calor_solvers as solvers;

/// Run configuration, time stepping, and snapshots (`calor-engine`).
pub use calor_engine as engine;

/// CSV persistence (`calor-io`).
pub use calor_io as io;

/// Common imports for typical Calor usage.
///
/// ```rust
/// use calor::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use calor_core::{Field, FrequencyField, Solver};

    // Errors
    pub use calor_core::{BackendError, GridError, ParameterError, SolverError};
    pub use calor_engine::{ConfigError, StepError};
    pub use calor_io::PersistError;

    // Grid
    pub use calor_grid::{GaussianBump, Grid};

    // Transforms and solvers
    pub use calor_solvers::{ExplicitStencil, SparseLaplacian, SpectralOperator, SpectralSolver};
    pub use calor_transform::{build_engine, DctBackend, TransformEngine};

    // Engine
    pub use calor_engine::{
        CancelToken, Duration, Phase, RunConfig, RunMetrics, RunOutput, Snapshot, SnapshotStore,
        SolverKind, TimeStepper,
    };

    // Persistence
    pub use calor_io::OutputLayout;
}
