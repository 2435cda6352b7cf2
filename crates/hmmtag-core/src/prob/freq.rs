//! Frequency counting for `(condition, outcome)` pairs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Outcome counts observed under a single condition.
///
/// Persisted as the bare `outcome -> count` map; the total is recomputed
/// and zero counts are dropped when loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, u64>", into = "HashMap<String, u64>")]
pub struct FreqDist {
    counts: HashMap<String, u64>,
    total: u64,
}

impl FreqDist {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `outcome`.
    pub fn observe(&mut self, outcome: &str) {
        self.add(outcome, 1);
    }

    /// Record `count` occurrences of `outcome`.
    pub fn add(&mut self, outcome: &str, count: u64) {
        if count == 0 {
            return;
        }
        match self.counts.get_mut(outcome) {
            Some(c) => *c += count,
            None => {
                self.counts.insert(outcome.to_string(), count);
            }
        }
        self.total += count;
    }

    /// Number of times `outcome` was observed (0 if never).
    pub fn count(&self, outcome: &str) -> u64 {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    /// Total number of observations (N).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct outcomes observed (B).
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Iterate over observed outcomes and their counts, in no particular order.
    pub fn samples(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: FreqDist) {
        for (outcome, count) in other.counts {
            *self.counts.entry(outcome).or_insert(0) += count;
        }
        self.total += other.total;
    }
}

impl From<HashMap<String, u64>> for FreqDist {
    fn from(counts: HashMap<String, u64>) -> Self {
        let mut dist = Self::new();
        for (outcome, count) in counts {
            dist.add(&outcome, count);
        }
        dist
    }
}

impl From<FreqDist> for HashMap<String, u64> {
    fn from(dist: FreqDist) -> Self {
        dist.counts
    }
}

/// Per-condition outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalFreqDist {
    dists: HashMap<String, FreqDist>,
}

impl ConditionalFreqDist {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one `(condition, outcome)` pair.
    pub fn observe(&mut self, condition: &str, outcome: &str) {
        match self.dists.get_mut(condition) {
            Some(dist) => dist.observe(outcome),
            None => {
                let mut dist = FreqDist::new();
                dist.observe(outcome);
                self.dists.insert(condition.to_string(), dist);
            }
        }
    }

    /// Counts observed under `condition`, if any.
    pub fn get(&self, condition: &str) -> Option<&FreqDist> {
        self.dists.get(condition)
    }

    /// Iterate over the observed conditions, in no particular order.
    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.dists.keys().map(String::as_str)
    }

    /// Number of observed conditions.
    pub fn len(&self) -> usize {
        self.dists.len()
    }

    /// Returns `true` if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.dists.is_empty()
    }

    /// Union of counts. Associative and commutative, so partial tables built
    /// on separate threads can be combined in any order.
    pub fn merge(mut self, other: ConditionalFreqDist) -> Self {
        for (condition, dist) in other.dists {
            self.dists.entry(condition).or_default().merge(dist);
        }
        self
    }

    pub(crate) fn into_inner(self) -> HashMap<String, FreqDist> {
        self.dists
    }

    pub(crate) fn from_inner(dists: HashMap<String, FreqDist>) -> Self {
        Self { dists }
    }
}

impl<C: AsRef<str>, O: AsRef<str>> FromIterator<(C, O)> for ConditionalFreqDist {
    fn from_iter<I: IntoIterator<Item = (C, O)>>(iter: I) -> Self {
        let mut cfd = Self::new();
        for (condition, outcome) in iter {
            cfd.observe(condition.as_ref(), outcome.as_ref());
        }
        cfd
    }
}
