//! Exponential smoothing of the vigilance score

use serde::{Deserialize, Serialize};

/// One EMA step: `alpha * raw + (1 - alpha) * previous`
pub fn smooth(raw: f64, previous: f64, alpha: f64) -> f64 {
    alpha * raw + (1.0 - alpha) * previous
}

/// EMA over successive raw scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSmoother {
    /// Smoothing factor in (0, 1), higher = more weight on recent
    alpha: f64,
    /// Last smoothed score
    previous: f64,
}

impl ScoreSmoother {
    /// Create a smoother seeded with `initial`
    pub fn new(alpha: f64, initial: f64) -> Self {
        Self {
            alpha,
            previous: initial,
        }
    }

    /// Blend a raw score in and return the new smoothed score
    pub fn update(&mut self, raw: f64) -> f64 {
        self.previous = smooth(raw, self.previous, self.alpha);
        self.previous
    }

    /// Last smoothed score
    pub fn current(&self) -> f64 {
        self.previous
    }

    /// Smoothing factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Reseed the smoother
    pub fn reset(&mut self, initial: f64) {
        self.previous = initial;
    }
}
