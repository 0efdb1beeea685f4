//! Linguistic Variables

use crate::membership::MembershipFunction;
use crate::FuzzyError;
use std::fmt::Debug;

/// Named axis with labelled membership functions covering its domain
#[derive(Debug, Clone)]
pub struct LinguisticVariable<L> {
    name: &'static str,
    min: f64,
    max: f64,
    terms: Vec<(L, MembershipFunction)>,
}

impl<L: Copy + PartialEq + Debug> LinguisticVariable<L> {
    /// Create a variable over `[min, max]`, validating every term
    pub fn new(
        name: &'static str,
        (min, max): (f64, f64),
        terms: Vec<(L, MembershipFunction)>,
    ) -> Result<Self, FuzzyError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(FuzzyError::InvalidDomain { variable: name, min, max });
        }
        if terms.is_empty() {
            return Err(FuzzyError::EmptyVariable(name));
        }
        for (label, mf) in &terms {
            mf.validate(&format!("{}.{:?}", name, label))?;
        }

        Ok(Self { name, min, max, terms })
    }

    /// Variable name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Domain bounds
    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Labels in declaration order
    pub fn labels(&self) -> impl Iterator<Item = L> + '_ {
        self.terms.iter().map(|(label, _)| *label)
    }

    /// Membership function of `label`
    pub fn term(&self, label: L) -> Option<&MembershipFunction> {
        self.terms
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, mf)| mf)
    }

    /// Clamp a runtime sample into the domain. NaN maps to the lower bound.
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            self.min
        } else {
            x.clamp(self.min, self.max)
        }
    }

    /// Degree of `label` at `x`; out-of-domain samples take the nearest
    /// boundary's degree. Unknown labels have degree 0.
    pub fn degree(&self, label: L, x: f64) -> f64 {
        let x = self.clamp(x);
        self.term(label).map_or(0.0, |mf| mf.degree(x))
    }

    /// Degrees of every label at `x`
    pub fn fuzzify(&self, x: f64) -> Vec<(L, f64)> {
        let x = self.clamp(x);
        self.terms
            .iter()
            .map(|(label, mf)| (*label, mf.degree(x)))
            .collect()
    }

    /// `count` evenly spaced points from `min` to `max` inclusive
    pub fn sample_points(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let span = self.max - self.min;
                let last = (count - 1) as f64;
                (0..count)
                    .map(|i| self.min + span * i as f64 / last)
                    .collect()
            }
        }
    }
}
