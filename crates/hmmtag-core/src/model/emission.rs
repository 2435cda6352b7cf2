//! # Emission Model
//!
//! log2 P(word | tag), estimated from `(tag, lowercased word)` pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};
use crate::prob::lidstone::SmoothedCounts;
use crate::prob::{ConditionalFreqDist, ConditionalProbDist};
use crate::types::{TaggedWord, fold_case};

/// Smoothed word distributions, one per tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SmoothedCounts", into = "SmoothedCounts")]
pub struct EmissionModel {
    table: ConditionalProbDist,
    vocabulary_size: usize,
}

impl TryFrom<SmoothedCounts> for EmissionModel {
    type Error = HmmError;

    fn try_from(parts: SmoothedCounts) -> Result<Self> {
        Self::from_counts(parts.counts, parts.gamma)
    }
}

impl From<EmissionModel> for SmoothedCounts {
    fn from(model: EmissionModel) -> Self {
        model.table.into()
    }
}

impl EmissionModel {
    /// Add the `(tag, word)` pairs of one sentence to `counts`.
    pub fn count_sentence(counts: &mut ConditionalFreqDist, sentence: &[TaggedWord]) {
        for (word, tag) in sentence {
            counts.observe(tag, &fold_case(word));
        }
    }

    /// Smooth the collected counts.
    pub fn from_counts(counts: ConditionalFreqDist, gamma: f64) -> Result<Self> {
        let vocabulary_size = counts
            .conditions()
            .filter_map(|tag| counts.get(tag))
            .flat_map(|dist| dist.samples().map(|(word, _)| word))
            .collect::<HashSet<_>>()
            .len();
        let table = ConditionalProbDist::lidstone(counts, gamma)?;
        Ok(Self {
            table,
            vocabulary_size,
        })
    }

    /// log2 P(word | tag). The word is case-folded before lookup.
    ///
    /// # Errors
    /// [`HmmError::UnknownCondition`](crate::HmmError::UnknownCondition) if
    /// `tag` never emitted a word in training.
    pub fn logprob(&self, tag: &str, word: &str) -> Result<f64> {
        self.logprob_folded(tag, &fold_case(word))
    }

    /// Same as [`logprob`](Self::logprob) for a word that is already folded.
    pub(crate) fn logprob_folded(&self, tag: &str, word: &str) -> Result<f64> {
        self.table.logprob(tag, word)
    }

    /// Emitting tags, sorted.
    pub fn states(&self) -> Vec<String> {
        let mut states: Vec<String> = self.table.conditions().map(str::to_string).collect();
        states.sort();
        states
    }

    /// Number of distinct (folded) words seen in training.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// The underlying smoothed table.
    pub fn table(&self) -> &ConditionalProbDist {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prob::DEFAULT_GAMMA;

    fn sentence(pairs: &[(&str, &str)]) -> Vec<TaggedWord> {
        pairs
            .iter()
            .map(|(w, t)| (w.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn test_words_are_case_folded() {
        let mut counts = ConditionalFreqDist::new();
        EmissionModel::count_sentence(&mut counts, &sentence(&[("The", "DET"), ("the", "DET")]));
        let model = EmissionModel::from_counts(counts, DEFAULT_GAMMA).unwrap();

        assert_eq!(model.vocabulary_size(), 1);
        let lower = model.logprob("DET", "the").unwrap();
        let upper = model.logprob("DET", "THE").unwrap();
        assert_eq!(lower, upper);
        // N = 2, B = 1: (2 + 0.01) / (2 + 0.02)
        assert!((lower - (2.01f64 / 2.02).log2()).abs() < 1e-12);
    }

    #[test]
    fn test_states_sorted() {
        let mut counts = ConditionalFreqDist::new();
        EmissionModel::count_sentence(
            &mut counts,
            &sentence(&[("runs", "VERB"), ("the", "DET"), ("dog", "NOUN")]),
        );
        let model = EmissionModel::from_counts(counts, DEFAULT_GAMMA).unwrap();
        assert_eq!(model.states(), vec!["DET", "NOUN", "VERB"]);
    }
}
