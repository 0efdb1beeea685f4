//! DMS configuration

use crate::geometry::LandmarkIndices;
use crate::state::AdvisoryBands;
use crate::DmsError;
use event_window::DEFAULT_RETENTION_MS;
use fuzzy_engine::FuzzyConfig;
use serde::{Deserialize, Serialize};

/// Slow-blink detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// EAR below which the eye counts as closed
    pub closed_ear_threshold: f64,
    /// Closures strictly longer than this are slow blinks (milliseconds)
    pub min_closure_ms: u64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            closed_ear_threshold: 0.20,
            min_closure_ms: 300,
        }
    }
}

/// Yawn detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YawnConfig {
    /// MAR above which the mouth counts as yawning
    pub open_mar_threshold: f64,
    /// Minimum gap after a yawn ends before a new one counts (milliseconds)
    pub cooldown_ms: u64,
}

impl Default for YawnConfig {
    fn default() -> Self {
        Self {
            open_mar_threshold: 0.45,
            cooldown_ms: 1500,
        }
    }
}

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    pub blink: BlinkConfig,

    pub yawn: YawnConfig,

    /// Trailing window for the per-minute rates (milliseconds)
    pub window_retention_ms: u64,

    /// EMA factor in (0, 1)
    pub smoothing_alpha: f64,

    /// Score a session starts from
    pub initial_score: f64,

    /// Advisory band boundaries
    pub bands: AdvisoryBands,

    /// Fuzzy controller shapes, rules and calibration
    pub fuzzy: FuzzyConfig,

    /// Landmark indices for EAR/MAR
    pub landmarks: LandmarkIndices,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            blink: BlinkConfig::default(),
            yawn: YawnConfig::default(),
            window_retention_ms: DEFAULT_RETENTION_MS,
            smoothing_alpha: 0.15,
            initial_score: 100.0,
            bands: AdvisoryBands::default(),
            fuzzy: FuzzyConfig::default(),
            landmarks: LandmarkIndices::default(),
        }
    }
}

impl DmsConfig {
    /// Create strict config (reacts earlier and faster)
    pub fn strict() -> Self {
        Self {
            blink: BlinkConfig {
                closed_ear_threshold: 0.22,
                min_closure_ms: 250,
            },
            yawn: YawnConfig {
                open_mar_threshold: 0.40,
                cooldown_ms: 1000,
            },
            smoothing_alpha: 0.25,
            ..Default::default()
        }
    }

    /// Create lenient config (fewer false positives, slower response)
    pub fn lenient() -> Self {
        Self {
            blink: BlinkConfig {
                closed_ear_threshold: 0.18,
                min_closure_ms: 400,
            },
            yawn: YawnConfig {
                open_mar_threshold: 0.50,
                cooldown_ms: 2000,
            },
            smoothing_alpha: 0.10,
            ..Default::default()
        }
    }

    /// Check detector, smoother and band settings
    pub fn validate(&self) -> Result<(), DmsError> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha < 1.0) {
            return Err(DmsError::Config(format!(
                "smoothing_alpha must be in (0, 1), got {}",
                self.smoothing_alpha
            )));
        }
        if !(0.0..=100.0).contains(&self.initial_score) {
            return Err(DmsError::Config(format!(
                "initial_score must be in [0, 100], got {}",
                self.initial_score
            )));
        }
        if self.window_retention_ms == 0 {
            return Err(DmsError::Config("window_retention_ms must be positive".into()));
        }
        if !self.blink.closed_ear_threshold.is_finite() || self.blink.closed_ear_threshold <= 0.0 {
            return Err(DmsError::Config(format!(
                "closed_ear_threshold must be positive, got {}",
                self.blink.closed_ear_threshold
            )));
        }
        if !self.yawn.open_mar_threshold.is_finite() || self.yawn.open_mar_threshold <= 0.0 {
            return Err(DmsError::Config(format!(
                "open_mar_threshold must be positive, got {}",
                self.yawn.open_mar_threshold
            )));
        }
        self.bands.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(DmsConfig::default().validate().is_ok());
        assert!(DmsConfig::strict().validate().is_ok());
        assert!(DmsConfig::lenient().validate().is_ok());

        let strict = DmsConfig::strict();
        let lenient = DmsConfig::lenient();
        assert!(strict.blink.min_closure_ms < lenient.blink.min_closure_ms);
        assert!(strict.smoothing_alpha > lenient.smoothing_alpha);
    }

    #[test]
    fn test_invalid_alpha() {
        let config = DmsConfig {
            smoothing_alpha: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DmsError::Config(_))));
    }

    #[test]
    fn test_partial_json() {
        let config: DmsConfig =
            serde_json::from_str(r#"{"smoothing_alpha": 0.2, "yawn": {"cooldown_ms": 900}}"#).unwrap();

        assert_eq!(config.smoothing_alpha, 0.2);
        assert_eq!(config.yawn.cooldown_ms, 900);
        assert_eq!(config.yawn.open_mar_threshold, 0.45);
        assert_eq!(config.window_retention_ms, 60_000);
        assert_eq!(config.fuzzy, FuzzyConfig::default());
    }
}
