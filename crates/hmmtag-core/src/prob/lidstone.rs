//! # Lidstone Estimation
//!
//! Additive smoothing with one reserved bin for outcomes never seen under a
//! condition:
//!
//! $$ P(o) = \frac{c(o) + \gamma}{N + \gamma (B + 1)} $$
//!
//! where $N$ is the number of observations under the condition and $B$ the
//! number of distinct observed outcomes. The distribution sums to one over
//! the observed outcomes plus the unseen bin, and every outcome gets a
//! strictly positive probability. Log-probabilities are base 2.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};
use crate::prob::freq::{ConditionalFreqDist, FreqDist};

/// Default additive constant.
pub const DEFAULT_GAMMA: f64 = 0.01;

/// Reject non-finite or non-positive smoothing constants.
pub(crate) fn validate_gamma(gamma: f64) -> Result<()> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(HmmError::InvalidConfig(format!(
            "gamma must be finite and > 0, got {gamma}"
        )));
    }
    Ok(())
}

/// A Lidstone-smoothed distribution over the outcomes of one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LidstoneParts", into = "LidstoneParts")]
pub struct LidstoneDist {
    freq: FreqDist,
    gamma: f64,
    /// B + 1: observed outcomes plus the unseen bin.
    bins: usize,
}

impl LidstoneDist {
    /// Smooth `freq` with additive constant `gamma`.
    pub fn new(freq: FreqDist, gamma: f64) -> Result<Self> {
        validate_gamma(gamma)?;
        let bins = freq.bins() + 1;
        Ok(Self { freq, gamma, bins })
    }

    fn denominator(&self) -> f64 {
        self.freq.total() as f64 + self.gamma * self.bins as f64
    }

    /// Smoothed probability of `outcome`; never zero.
    pub fn prob(&self, outcome: &str) -> f64 {
        (self.freq.count(outcome) as f64 + self.gamma) / self.denominator()
    }

    /// Base-2 log of [`prob`](Self::prob). Always finite and `<= 0`.
    pub fn logprob(&self, outcome: &str) -> f64 {
        self.prob(outcome).log2()
    }

    /// Probability mass given to any single unseen outcome.
    pub fn unseen_prob(&self) -> f64 {
        self.gamma / self.denominator()
    }

    /// Base-2 log of [`unseen_prob`](Self::unseen_prob).
    pub fn unseen_logprob(&self) -> f64 {
        self.unseen_prob().log2()
    }

    /// The additive constant.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Number of bins, including the reserved unseen bin.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of training observations under this condition.
    pub fn total(&self) -> u64 {
        self.freq.total()
    }

    /// Observed outcomes and their raw counts.
    pub fn samples(&self) -> impl Iterator<Item = (&str, u64)> {
        self.freq.samples()
    }
}

/// Persisted form of a [`LidstoneDist`]; `bins` is derived on load.
#[derive(Serialize, Deserialize)]
struct LidstoneParts {
    freq: FreqDist,
    gamma: f64,
}

impl TryFrom<LidstoneParts> for LidstoneDist {
    type Error = HmmError;

    fn try_from(parts: LidstoneParts) -> Result<Self> {
        Self::new(parts.freq, parts.gamma)
    }
}

impl From<LidstoneDist> for LidstoneParts {
    fn from(dist: LidstoneDist) -> Self {
        Self {
            freq: dist.freq,
            gamma: dist.gamma,
        }
    }
}

/// Raw counts plus the smoothing constant: everything needed to rebuild a
/// [`ConditionalProbDist`] and the models built on one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SmoothedCounts {
    pub(crate) counts: ConditionalFreqDist,
    pub(crate) gamma: f64,
}

impl TryFrom<SmoothedCounts> for ConditionalProbDist {
    type Error = HmmError;

    fn try_from(parts: SmoothedCounts) -> Result<Self> {
        Self::lidstone(parts.counts, parts.gamma)
    }
}

impl From<ConditionalProbDist> for SmoothedCounts {
    fn from(table: ConditionalProbDist) -> Self {
        let dists = table
            .dists
            .into_iter()
            .map(|(condition, dist)| (condition, dist.freq))
            .collect();
        Self {
            counts: ConditionalFreqDist::from_inner(dists),
            gamma: table.gamma,
        }
    }
}

/// One [`LidstoneDist`] per observed condition.
///
/// Persisted as raw counts and `gamma`, so loading re-runs the same
/// validation and estimation as training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SmoothedCounts", into = "SmoothedCounts")]
pub struct ConditionalProbDist {
    dists: HashMap<String, LidstoneDist>,
    gamma: f64,
}

impl ConditionalProbDist {
    /// Smooth every condition of `freq` with the same `gamma`.
    pub fn lidstone(freq: ConditionalFreqDist, gamma: f64) -> Result<Self> {
        validate_gamma(gamma)?;
        let dists = freq
            .into_inner()
            .into_iter()
            .map(|(condition, fd)| Ok((condition, LidstoneDist::new(fd, gamma)?)))
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { dists, gamma })
    }

    /// Distribution for `condition`.
    ///
    /// # Errors
    /// [`HmmError::UnknownCondition`] if the condition was never observed.
    pub fn get(&self, condition: &str) -> Result<&LidstoneDist> {
        self.dists
            .get(condition)
            .ok_or_else(|| HmmError::UnknownCondition {
                condition: condition.to_string(),
            })
    }

    /// log2 P(outcome | condition). Unseen outcomes are smoothed, unknown
    /// conditions are an error.
    pub fn logprob(&self, condition: &str, outcome: &str) -> Result<f64> {
        Ok(self.get(condition)?.logprob(outcome))
    }

    /// Returns `true` if `condition` was observed in training.
    pub fn contains(&self, condition: &str) -> bool {
        self.dists.contains_key(condition)
    }

    /// Observed conditions, in no particular order.
    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.dists.keys().map(String::as_str)
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.dists.len()
    }

    /// Returns `true` if there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.dists.is_empty()
    }

    /// The additive constant shared by every condition.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noun_table() -> ConditionalProbDist {
        let cfd: ConditionalFreqDist = [("NOUN", "dog"), ("NOUN", "cat"), ("NOUN", "dog")]
            .into_iter()
            .collect();
        ConditionalProbDist::lidstone(cfd, DEFAULT_GAMMA).unwrap()
    }

    #[test]
    fn test_lidstone_formula() {
        let table = noun_table();
        let dist = table.get("NOUN").unwrap();

        // N = 3, B = 2, bins = 3
        let denom = 3.0 + 0.01 * 3.0;
        assert_eq!(dist.bins(), 3);
        assert!((dist.prob("dog") - 2.01 / denom).abs() < 1e-12);
        assert!((dist.prob("cat") - 1.01 / denom).abs() < 1e-12);
        assert!((dist.prob("fish") - 0.01 / denom).abs() < 1e-12);
        assert!((dist.logprob("dog") - (2.01f64 / denom).log2()).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let table = noun_table();
        let dist = table.get("NOUN").unwrap();

        let seen: f64 = dist.samples().map(|(o, _)| dist.logprob(o).exp2()).sum();
        let total = seen + dist.unseen_logprob().exp2();
        assert!((total - 1.0).abs() < 1e-9, "sum was {total}");
    }

    #[test]
    fn test_unseen_outcome_is_finite_and_smaller() {
        let table = noun_table();
        let unseen = table.logprob("NOUN", "unseenword").unwrap();
        let seen = table.logprob("NOUN", "cat").unwrap();

        assert!(unseen.is_finite());
        assert!(unseen < 0.0);
        assert!(unseen < seen);
    }

    #[test]
    fn test_unknown_condition() {
        let table = noun_table();
        let err = table.logprob("VERB", "dog").unwrap_err();
        assert!(matches!(err, HmmError::UnknownCondition { ref condition } if condition == "VERB"));
    }

    #[test]
    fn test_invalid_gamma() {
        for gamma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = ConditionalProbDist::lidstone(ConditionalFreqDist::new(), gamma);
            assert!(matches!(result, Err(HmmError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_load_rebuilds_from_counts() {
        let table = noun_table();
        let json = serde_json::to_string(&table).unwrap();
        let restored: ConditionalProbDist = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, table);

        let dist: LidstoneDist =
            serde_json::from_str(r#"{"freq": {"dog": 2, "cat": 1}, "gamma": 0.01, "bins": 99}"#)
                .unwrap();
        assert_eq!(dist.bins(), 3);
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn test_load_rejects_invalid_gamma() {
        for gamma in ["0.0", "-5.0"] {
            let dist = format!(r#"{{"freq": {{"dog": 1}}, "gamma": {gamma}}}"#);
            assert!(serde_json::from_str::<LidstoneDist>(&dist).is_err());

            let table = format!(
                r#"{{"counts": {{"dists": {{"NOUN": {{"dog": 1}}}}}}, "gamma": {gamma}}}"#
            );
            assert!(serde_json::from_str::<ConditionalProbDist>(&table).is_err());
        }
    }
}
