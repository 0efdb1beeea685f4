//! Fuzzy Inference Engine
//!
//! Mamdani-style controller turning eye openness, yawn rate and slow-blink
//! rate into a 0-100 vigilance score:
//! - Fuzzification against labelled membership functions
//! - Fixed rule base with min/max connectives and rule weights
//! - Per-category aggregation with optional severity inhibition
//! - Discretized centroid defuzzification and affine calibration

mod calibration;
mod config;
mod controller;
mod labels;
mod membership;
mod rules;
mod variable;

pub use calibration::Calibration;
pub use config::{BlinkTerms, EyeTerms, FuzzyConfig, RuleWeights, VigilanceTerms, YawnTerms};
pub use controller::{FuzzyController, Inference};
pub use labels::{BlinkLabel, Category, EyeLabel, YawnLabel};
pub use membership::MembershipFunction;
pub use rules::{Activations, AggregationPolicy, Antecedent, Rule, RuleBase, Term};
pub use variable::LinguisticVariable;

use thiserror::Error;

/// Errors while building a controller from configuration
#[derive(Debug, Clone, Error)]
pub enum FuzzyError {
    /// Breakpoints not ordered or not finite
    #[error("Invalid breakpoints for {label}: {breakpoints:?}")]
    InvalidBreakpoints {
        label: String,
        breakpoints: Vec<f64>,
    },

    /// Domain with min >= max
    #[error("Invalid domain for {variable}: [{min}, {max}]")]
    InvalidDomain {
        variable: &'static str,
        min: f64,
        max: f64,
    },

    /// Linguistic variable without any term
    #[error("Linguistic variable {0} has no terms")]
    EmptyVariable(&'static str),

    /// Rule weight outside (0, 1]
    #[error("Rule weight {name} = {value} is outside (0, 1]")]
    InvalidWeight { name: &'static str, value: f64 },

    /// Calibration bounds with min >= max
    #[error("Invalid calibration bounds: min {min} must be below max {max}")]
    InvalidCalibration { min: f64, max: f64 },

    /// Fallback score outside 0..=100
    #[error("No-evidence score {0} is outside [0, 100]")]
    InvalidScore(f64),

    /// Output sets that never produce a centroid
    #[error("Output category {0} has no area to defuzzify")]
    EmptyOutput(&'static str),
}
