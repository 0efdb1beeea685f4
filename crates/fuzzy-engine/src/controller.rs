//! Mamdani Fuzzy Controller

use crate::calibration::Calibration;
use crate::config::FuzzyConfig;
use crate::labels::{BlinkLabel, Category, EyeLabel, YawnLabel};
use crate::rules::{Activations, AggregationPolicy, RuleBase, Term};
use crate::variable::LinguisticVariable;
use crate::FuzzyError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Resolution of the discretized vigilance axis (integer points 0..=100)
pub const VIGILANCE_SAMPLES: usize = 101;

/// Full result of one inference, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    /// Aggregated activations after the policy was applied
    pub activations: Activations,
    /// Centroid before calibration; `None` when no rule fired
    pub raw_centroid: Option<f64>,
    /// Calibrated vigilance score (0-100)
    pub score: f64,
}

impl Inference {
    /// True when no rule fired and the fallback score was used
    pub fn no_evidence(&self) -> bool {
        self.raw_centroid.is_none()
    }
}

/// Fuzzy vigilance controller
///
/// Immutable after construction: `infer` is a pure function of its
/// arguments.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    eye: LinguisticVariable<EyeLabel>,
    yawn: LinguisticVariable<YawnLabel>,
    blink: LinguisticVariable<BlinkLabel>,
    vigilance: LinguisticVariable<Category>,
    /// Sample point and the membership of every category at that point
    samples: Vec<(f64, [f64; Category::COUNT])>,
    rules: RuleBase,
    policy: AggregationPolicy,
    calibration: Calibration,
    no_evidence_score: f64,
}

impl FuzzyController {
    /// Build the controller with the standard rule base
    pub fn new(config: &FuzzyConfig) -> Result<Self, FuzzyError> {
        config.weights.validate()?;
        Self::with_rules(config, RuleBase::standard(&config.weights))
    }

    /// Build the controller around an explicit rule base
    pub fn with_rules(config: &FuzzyConfig, rules: RuleBase) -> Result<Self, FuzzyError> {
        let eye = LinguisticVariable::new(
            "eye",
            config.eye.domain,
            vec![
                (EyeLabel::Closed, config.eye.closed),
                (EyeLabel::Tired, config.eye.tired),
                (EyeLabel::Open, config.eye.open),
            ],
        )?;
        let yawn = LinguisticVariable::new(
            "yawn",
            config.yawn.domain,
            vec![
                (YawnLabel::None, config.yawn.none),
                (YawnLabel::Rare, config.yawn.rare),
                (YawnLabel::Moderate, config.yawn.moderate),
                (YawnLabel::Frequent, config.yawn.frequent),
            ],
        )?;
        let blink = LinguisticVariable::new(
            "blink",
            config.blink.domain,
            vec![
                (BlinkLabel::Normal, config.blink.normal),
                (BlinkLabel::Worrying, config.blink.worrying),
                (BlinkLabel::Critical, config.blink.critical),
            ],
        )?;
        let vigilance = LinguisticVariable::new(
            "vigilance",
            (0.0, 100.0),
            vec![
                (Category::Danger, config.vigilance.danger),
                (Category::StrongFatigue, config.vigilance.strong_fatigue),
                (Category::LightFatigue, config.vigilance.light_fatigue),
                (Category::Alert, config.vigilance.alert),
            ],
        )?;

        config.calibration.validate()?;
        if !(0.0..=100.0).contains(&config.no_evidence_score) {
            return Err(FuzzyError::InvalidScore(config.no_evidence_score));
        }

        let samples = vigilance
            .sample_points(VIGILANCE_SAMPLES)
            .into_iter()
            .map(|x| {
                let mut degrees = [0.0; Category::COUNT];
                for category in Category::ALL {
                    degrees[category.index()] = vigilance.degree(category, x);
                }
                (x, degrees)
            })
            .collect();

        info!(
            "Creating fuzzy controller: {} rules, {:?} aggregation, calibration [{:.3}, {:.3}]",
            rules.len(),
            config.policy,
            config.calibration.min,
            config.calibration.max
        );

        Ok(Self {
            eye,
            yawn,
            blink,
            vigilance,
            samples,
            rules,
            policy: config.policy,
            calibration: config.calibration,
            no_evidence_score: config.no_evidence_score,
        })
    }

    /// Vigilance score (0-100) for one sample
    pub fn infer(&self, ear: f64, yawn_count: f64, blink_count: f64) -> f64 {
        self.evaluate(ear, yawn_count, blink_count).score
    }

    /// Run the full inference and keep the intermediate results
    pub fn evaluate(&self, ear: f64, yawn_count: f64, blink_count: f64) -> Inference {
        let degree = |term: Term| match term {
            Term::Eye(label) => self.eye.degree(label, ear),
            Term::Yawn(label) => self.yawn.degree(label, yawn_count),
            Term::Blink(label) => self.blink.degree(label, blink_count),
        };

        let activations = self.rules.fire(&degree).aggregate(self.policy);
        let raw_centroid = self.defuzzify(&activations);
        let score = match raw_centroid {
            Some(raw) => self.calibration.apply(raw),
            None => self.no_evidence_score,
        };

        debug!(
            ear,
            yawn_count,
            blink_count,
            danger = activations.danger,
            strong_fatigue = activations.strong_fatigue,
            light_fatigue = activations.light_fatigue,
            alert = activations.alert,
            score,
            "Fuzzy inference"
        );

        Inference {
            activations,
            raw_centroid,
            score,
        }
    }

    /// Centroid of the clipped union over the vigilance grid.
    /// Returns `None` when the union is empty.
    pub fn defuzzify(&self, activations: &Activations) -> Option<f64> {
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (x, degrees) in &self.samples {
            let union = Category::ALL
                .iter()
                .map(|c| degrees[c.index()].min(activations.get(*c)))
                .fold(0.0, f64::max);
            numerator += x * union;
            denominator += union;
        }

        if denominator > 0.0 {
            Some(numerator / denominator)
        } else {
            None
        }
    }

    /// Calibration bounds implied by the output sets: centroids of a fully
    /// active most-severe and a fully active least-severe category.
    pub fn derive_calibration(&self) -> Result<Calibration, FuzzyError> {
        let only = |category: Category| {
            let mut activations = Activations::default();
            activations.raise(category, 1.0);
            self.defuzzify(&activations)
                .ok_or(FuzzyError::EmptyOutput(category.as_str()))
        };

        Calibration::new(only(Category::Danger)?, only(Category::Alert)?)
    }

    /// Calibration in use
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Aggregation policy in use
    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Rule base in use
    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Output variable
    pub fn vigilance(&self) -> &LinguisticVariable<Category> {
        &self.vigilance
    }
}
