//! Initial conditions.

use calor_core::{Field, ParameterError};

use crate::grid::Grid;

/// A Gaussian temperature bump:
///
/// ```text
/// u0(x, y) = A · exp(-((x - x0)² + (y - y0)²) / (2σ²))
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianBump {
    /// Peak temperature `A`.
    pub amplitude: f64,
    /// Centre x coordinate.
    pub x0: f64,
    /// Centre y coordinate.
    pub y0: f64,
    /// Width `σ`. Must be positive.
    pub sigma: f64,
}

impl Default for GaussianBump {
    /// 100° peak of width 0.2 centred on the unit square.
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            x0: 0.5,
            y0: 0.5,
            sigma: 0.2,
        }
    }
}

impl GaussianBump {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.amplitude.is_finite() {
            return Err(ParameterError::InitialCondition {
                reason: format!("amplitude must be finite, got {}", self.amplitude),
            });
        }
        if !self.x0.is_finite() || !self.y0.is_finite() {
            return Err(ParameterError::InitialCondition {
                reason: format!("centre must be finite, got ({}, {})", self.x0, self.y0),
            });
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(ParameterError::InitialCondition {
                reason: format!("sigma must be finite and positive, got {}", self.sigma),
            });
        }
        Ok(())
    }

    /// Value of the bump at `(x, y)`.
    pub fn at(&self, x: f64, y: f64) -> f64 {
        let r2 = (x - self.x0).powi(2) + (y - self.y0).powi(2);
        self.amplitude * (-r2 / (2.0 * self.sigma * self.sigma)).exp()
    }

    /// Sample the bump on `grid`.
    pub fn sample(&self, grid: &Grid) -> Result<Field, ParameterError> {
        self.validate()?;
        Ok(grid.sample(|x, y| self.at(x, y)))
    }
}
