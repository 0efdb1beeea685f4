//! Rule base and per-category aggregation

use crate::config::RuleWeights;
use crate::labels::{BlinkLabel, Category, EyeLabel, YawnLabel};
use serde::{Deserialize, Serialize};

/// Reference to one input label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Eye(EyeLabel),
    Yawn(YawnLabel),
    Blink(BlinkLabel),
}

/// Rule antecedent: min for conjunction, max for disjunction
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    Is(Term),
    All(Vec<Antecedent>),
    Any(Vec<Antecedent>),
}

impl Antecedent {
    /// Truth degree given the fuzzified inputs
    pub fn truth<F: Fn(Term) -> f64>(&self, degree: &F) -> f64 {
        match self {
            Antecedent::Is(term) => degree(*term),
            Antecedent::All(parts) => parts.iter().map(|p| p.truth(degree)).fold(1.0, f64::min),
            Antecedent::Any(parts) => parts.iter().map(|p| p.truth(degree)).fold(0.0, f64::max),
        }
    }
}

fn eye(label: EyeLabel) -> Antecedent {
    Antecedent::Is(Term::Eye(label))
}

fn yawn(label: YawnLabel) -> Antecedent {
    Antecedent::Is(Term::Yawn(label))
}

fn blink(label: BlinkLabel) -> Antecedent {
    Antecedent::Is(Term::Blink(label))
}

/// Single fuzzy rule
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: &'static str,
    pub antecedent: Antecedent,
    pub consequent: Category,
    /// Scales the activation; below 1 marks a softer, single-symptom signal
    pub weight: f64,
}

impl Rule {
    fn new(name: &'static str, antecedent: Antecedent, consequent: Category) -> Self {
        Self {
            name,
            antecedent,
            consequent,
            weight: 1.0,
        }
    }

    fn weighted(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Activation of this rule
    pub fn activation<F: Fn(Term) -> f64>(&self, degree: &F) -> f64 {
        self.antecedent.truth(degree) * self.weight
    }
}

/// Per-category aggregation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// The most severe active category suppresses every milder one
    #[default]
    Inhibitory,
    /// Independent per-category maxima; a mild rule may pull the centroid
    /// up while a severe symptom is present
    WeightedMax,
}

/// One activation degree per output category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Activations {
    pub danger: f64,
    pub strong_fatigue: f64,
    pub light_fatigue: f64,
    pub alert: f64,
}

impl Activations {
    /// Activation of `category`
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Danger => self.danger,
            Category::StrongFatigue => self.strong_fatigue,
            Category::LightFatigue => self.light_fatigue,
            Category::Alert => self.alert,
        }
    }

    fn slot(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Danger => &mut self.danger,
            Category::StrongFatigue => &mut self.strong_fatigue,
            Category::LightFatigue => &mut self.light_fatigue,
            Category::Alert => &mut self.alert,
        }
    }

    /// Raise `category` to at least `value`
    pub fn raise(&mut self, category: Category, value: f64) {
        let slot = self.slot(category);
        *slot = slot.max(value);
    }

    /// True when no category is active
    pub fn is_zero(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c) <= 0.0)
    }

    /// Apply the aggregation policy to raw per-category maxima
    pub fn aggregate(self, policy: AggregationPolicy) -> Self {
        match policy {
            AggregationPolicy::WeightedMax => self,
            AggregationPolicy::Inhibitory => {
                // Only the most severe active category survives
                let mut inhibited = Self::default();
                if let Some(category) = Category::ALL.into_iter().find(|c| self.get(*c) > 0.0) {
                    *inhibited.slot(category) = self.get(category);
                }
                inhibited
            }
        }
    }
}

/// Fixed rule base
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Build from explicit rules
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The deployed driver-vigilance rule base
    pub fn standard(weights: &RuleWeights) -> Self {
        use BlinkLabel as B;
        use Category::*;
        use EyeLabel as E;
        use YawnLabel as Y;

        let rules = vec![
            Rule::new("eyes_closed", eye(E::Closed), Danger),
            Rule::new(
                "tired_eyes_frequent_yawns",
                Antecedent::All(vec![eye(E::Tired), yawn(Y::Frequent)]),
                Danger,
            ),
            Rule::new(
                "open_eyes_frequent_yawns",
                Antecedent::All(vec![eye(E::Open), yawn(Y::Frequent)]),
                Danger,
            ),
            Rule::new("critical_slow_blinks", blink(B::Critical), Danger),
            Rule::new(
                "worrying_blinks_frequent_yawns",
                Antecedent::All(vec![blink(B::Worrying), yawn(Y::Frequent)]),
                Danger,
            ),
            Rule::new(
                "tired_eyes_with_symptom",
                Antecedent::All(vec![
                    eye(E::Tired),
                    Antecedent::Any(vec![yawn(Y::Moderate), blink(B::Worrying)]),
                ]),
                StrongFatigue,
            ),
            Rule::new(
                "moderate_yawns_worrying_blinks",
                Antecedent::All(vec![yawn(Y::Moderate), blink(B::Worrying)]),
                StrongFatigue,
            ),
            Rule::new("moderate_yawns", yawn(Y::Moderate), StrongFatigue)
                .weighted(weights.moderate_yawning),
            Rule::new(
                "tired_eyes_few_yawns",
                Antecedent::All(vec![
                    eye(E::Tired),
                    Antecedent::Any(vec![yawn(Y::None), yawn(Y::Rare)]),
                ]),
                LightFatigue,
            ),
            Rule::new(
                "open_eyes_rare_yawns",
                Antecedent::All(vec![eye(E::Open), yawn(Y::Rare)]),
                LightFatigue,
            ),
            Rule::new("worrying_blinks", blink(B::Worrying), LightFatigue)
                .weighted(weights.worrying_blinks),
            Rule::new(
                "all_clear",
                Antecedent::All(vec![eye(E::Open), yawn(Y::None), blink(B::Normal)]),
                Alert,
            ),
        ];

        Self { rules }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the rule base is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Raw per-category maxima over all rules
    pub fn fire<F: Fn(Term) -> f64>(&self, degree: &F) -> Activations {
        let mut activations = Activations::default();
        for rule in &self.rules {
            activations.raise(rule.consequent, rule.activation(degree));
        }
        activations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crisp(on: &'static [Term]) -> impl Fn(Term) -> f64 {
        move |term| if on.contains(&term) { 1.0 } else { 0.0 }
    }

    #[test]
    fn test_connectives() {
        let degree = |term: Term| match term {
            Term::Eye(_) => 0.3,
            Term::Yawn(_) => 0.8,
            Term::Blink(_) => 0.5,
        };

        let all = Antecedent::All(vec![eye(EyeLabel::Open), yawn(YawnLabel::None)]);
        let any = Antecedent::Any(vec![eye(EyeLabel::Open), blink(BlinkLabel::Normal)]);

        assert_eq!(all.truth(&degree), 0.3);
        assert_eq!(any.truth(&degree), 0.5);
    }

    #[test]
    fn test_standard_rule_count() {
        let rules = RuleBase::standard(&RuleWeights::default());
        assert_eq!(rules.len(), 12);
    }

    #[test]
    fn test_all_clear_fires_alert_only() {
        let rules = RuleBase::standard(&RuleWeights::default());
        let degree = crisp(&[
            Term::Eye(EyeLabel::Open),
            Term::Yawn(YawnLabel::None),
            Term::Blink(BlinkLabel::Normal),
        ]);

        let raw = rules.fire(&degree);
        assert_eq!(raw.alert, 1.0);
        assert_eq!(raw.danger, 0.0);
        assert_eq!(raw.light_fatigue, 0.0);
    }

    #[test]
    fn test_weighted_single_symptom() {
        let rules = RuleBase::standard(&RuleWeights::default());
        let degree = crisp(&[
            Term::Eye(EyeLabel::Open),
            Term::Yawn(YawnLabel::None),
            Term::Blink(BlinkLabel::Worrying),
        ]);

        let raw = rules.fire(&degree);
        assert!((raw.light_fatigue - 0.8).abs() < 1e-12);
        assert_eq!(raw.alert, 0.0);
    }

    #[test]
    fn test_inhibition_suppresses_milder_categories() {
        let raw = Activations {
            danger: 0.5,
            strong_fatigue: 0.4,
            light_fatigue: 1.0,
            alert: 1.0,
        };

        let inhibited = raw.aggregate(AggregationPolicy::Inhibitory);
        assert_eq!(
            inhibited,
            Activations {
                danger: 0.5,
                ..Default::default()
            }
        );

        // Without danger, strong fatigue is the most severe active category
        let milder = Activations { danger: 0.0, ..raw }.aggregate(AggregationPolicy::Inhibitory);
        assert_eq!(milder.strong_fatigue, 0.4);
        assert_eq!(milder.light_fatigue, 0.0);
        assert_eq!(milder.alert, 0.0);

        assert!(Activations::default().aggregate(AggregationPolicy::Inhibitory).is_zero());
    }

    #[test]
    fn test_weighted_max_leaves_activations() {
        let raw = Activations {
            danger: 1.0,
            light_fatigue: 0.8,
            ..Default::default()
        };
        assert_eq!(raw.aggregate(AggregationPolicy::WeightedMax), raw);
    }
}
