//! Orthonormal 2D cosine transform engines for Calor.
//!
//! The spectral solver only ever talks to the [`TransformEngine`] trait.
//! Two host backends implement it:
//!
//! - [`DirectDct`]: separable matrix products against precomputed cosine
//!   bases. Simple and exact; cubic cost.
//! - [`FftDct`]: one complex FFT per line via `rustfft`. The default.
//!
//! [`build_engine`] is the single construction-time backend choice.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direct;
pub mod engine;
pub mod fft;

pub use direct::DirectDct;
pub use engine::TransformEngine;
pub use fft::FftDct;

use std::fmt;
use std::str::FromStr;

/// Which transform backend to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DctBackend {
    /// [`DirectDct`].
    Direct,
    /// [`FftDct`].
    #[default]
    Fft,
}

impl fmt::Display for DctBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Fft => write!(f, "fft"),
        }
    }
}

impl FromStr for DctBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "fft" => Ok(Self::Fft),
            other => Err(format!("unknown DCT backend '{other}' (expected direct|fft)")),
        }
    }
}

/// Build a boxed engine of the requested backend for `nx × ny` arrays.
///
/// # Examples
///
/// ```
/// use calor_transform::{build_engine, DctBackend};
///
/// let engine = build_engine(DctBackend::Direct, 16, 8);
/// assert_eq!(engine.shape(), (16, 8));
/// assert_eq!(engine.name(), "direct");
/// ```
pub fn build_engine(backend: DctBackend, nx: usize, ny: usize) -> Box<dyn TransformEngine> {
    match backend {
        DctBackend::Direct => Box::new(DirectDct::new(nx, ny)),
        DctBackend::Fft => Box::new(FftDct::new(nx, ny)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_and_displays() {
        for b in [DctBackend::Direct, DctBackend::Fft] {
            assert_eq!(b.to_string().parse::<DctBackend>(), Ok(b));
        }
        assert!("gpu".parse::<DctBackend>().is_err());
        assert_eq!(DctBackend::default(), DctBackend::Fft);
    }
}
