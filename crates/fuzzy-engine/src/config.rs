//! Controller configuration

use crate::calibration::Calibration;
use crate::membership::MembershipFunction;
use crate::rules::AggregationPolicy;
use crate::FuzzyError;
use serde::{Deserialize, Serialize};

/// Eye-openness terms (EAR)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeTerms {
    pub domain: (f64, f64),
    pub closed: MembershipFunction,
    pub tired: MembershipFunction,
    pub open: MembershipFunction,
}

impl Default for EyeTerms {
    fn default() -> Self {
        Self {
            domain: (0.0, 0.6),
            closed: MembershipFunction::trapezoidal(0.0, 0.0, 0.15, 0.19),
            // Ends at 0.29 so an EAR of 0.30 is fully "open"
            tired: MembershipFunction::triangular(0.17, 0.25, 0.29),
            open: MembershipFunction::trapezoidal(0.22, 0.24, 0.6, 0.6),
        }
    }
}

/// Yawn-rate terms (yawns per trailing minute)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YawnTerms {
    pub domain: (f64, f64),
    pub none: MembershipFunction,
    pub rare: MembershipFunction,
    pub moderate: MembershipFunction,
    pub frequent: MembershipFunction,
}

impl Default for YawnTerms {
    fn default() -> Self {
        Self {
            domain: (0.0, 10.0),
            none: MembershipFunction::trapezoidal(0.0, 0.0, 1.0, 2.0),
            rare: MembershipFunction::triangular(1.0, 2.0, 3.0),
            moderate: MembershipFunction::triangular(2.0, 3.0, 4.0),
            frequent: MembershipFunction::trapezoidal(3.0, 4.0, 10.0, 10.0),
        }
    }
}

/// Slow-blink-rate terms (slow blinks per trailing minute)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkTerms {
    pub domain: (f64, f64),
    pub normal: MembershipFunction,
    pub worrying: MembershipFunction,
    pub critical: MembershipFunction,
}

impl Default for BlinkTerms {
    fn default() -> Self {
        Self {
            domain: (0.0, 20.0),
            normal: MembershipFunction::trapezoidal(0.0, 0.0, 0.0, 2.0),
            worrying: MembershipFunction::trapezoidal(1.0, 2.0, 4.0, 5.0),
            critical: MembershipFunction::trapezoidal(4.0, 5.0, 20.0, 20.0),
        }
    }
}

/// Vigilance output sets over 0..=100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilanceTerms {
    pub danger: MembershipFunction,
    pub strong_fatigue: MembershipFunction,
    pub light_fatigue: MembershipFunction,
    pub alert: MembershipFunction,
}

impl Default for VigilanceTerms {
    fn default() -> Self {
        Self {
            danger: MembershipFunction::triangular(0.0, 0.0, 30.0),
            strong_fatigue: MembershipFunction::triangular(15.0, 35.0, 55.0),
            light_fatigue: MembershipFunction::triangular(40.0, 60.0, 80.0),
            alert: MembershipFunction::triangular(65.0, 100.0, 100.0),
        }
    }
}

/// Weights of the single-symptom rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    /// Moderate yawning alone -> strong fatigue
    pub moderate_yawning: f64,
    /// Worrying slow blinks alone -> light fatigue
    pub worrying_blinks: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            moderate_yawning: 0.8,
            worrying_blinks: 0.8,
        }
    }
}

impl RuleWeights {
    /// Check every weight lies in (0, 1]
    pub fn validate(&self) -> Result<(), FuzzyError> {
        for (name, value) in [
            ("moderate_yawning", self.moderate_yawning),
            ("worrying_blinks", self.worrying_blinks),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(FuzzyError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    pub eye: EyeTerms,
    pub yawn: YawnTerms,
    pub blink: BlinkTerms,
    pub vigilance: VigilanceTerms,
    pub weights: RuleWeights,
    pub policy: AggregationPolicy,
    /// Raw centroid range mapped onto 0..=100
    pub calibration: Calibration,
    /// Score returned when no rule fires
    pub no_evidence_score: f64,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            eye: EyeTerms::default(),
            yawn: YawnTerms::default(),
            blink: BlinkTerms::default(),
            vigilance: VigilanceTerms::default(),
            weights: RuleWeights::default(),
            policy: AggregationPolicy::Inhibitory,
            calibration: Calibration::default(),
            no_evidence_score: 100.0,
        }
    }
}
