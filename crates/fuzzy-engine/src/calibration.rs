//! Centroid calibration

use crate::FuzzyError;
use serde::{Deserialize, Serialize};

/// Affine remap of the achievable centroid range onto 0..=100
///
/// With the default output sets the centroid of a fully active `danger`
/// set is 29/3 and that of a fully active `alert` set is 266/3 on the
/// integer grid; these are the extremes any aggregated output can reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub min: f64,
    pub max: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            min: 29.0 / 3.0,
            max: 266.0 / 3.0,
        }
    }
}

impl Calibration {
    /// Create calibration bounds
    pub fn new(min: f64, max: f64) -> Result<Self, FuzzyError> {
        let calibration = Self { min, max };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Check `min < max`, both finite
    pub fn validate(&self) -> Result<(), FuzzyError> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(FuzzyError::InvalidCalibration {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Map a raw centroid to a clamped 0..=100 score
    pub fn apply(&self, raw: f64) -> f64 {
        let score = (raw - self.min) / (self.max - self.min) * 100.0;
        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 100.0)
        }
    }
}
