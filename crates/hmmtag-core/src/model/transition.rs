//! # Transition Model
//!
//! log2 P(tag_t | tag_{t-1}) over tag bigrams framed by `<s>` and `</s>`.
//! `<s>` is a condition; `</s>` is only ever an outcome.

use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};
use crate::prob::lidstone::SmoothedCounts;
use crate::prob::{ConditionalFreqDist, ConditionalProbDist};
use crate::types::{END_TAG, START_TAG, TaggedWord};

/// Smoothed next-tag distributions, one per preceding tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SmoothedCounts", into = "SmoothedCounts")]
pub struct TransitionModel {
    table: ConditionalProbDist,
}

impl TryFrom<SmoothedCounts> for TransitionModel {
    type Error = HmmError;

    fn try_from(parts: SmoothedCounts) -> Result<Self> {
        Self::from_counts(parts.counts, parts.gamma)
    }
}

impl From<TransitionModel> for SmoothedCounts {
    fn from(model: TransitionModel) -> Self {
        model.table.into()
    }
}

impl TransitionModel {
    /// Add `(<s>, t1)`, `(t_i, t_i+1)` and `(t_n, </s>)` for one sentence.
    ///
    /// Empty sentences contribute nothing.
    pub fn count_sentence(counts: &mut ConditionalFreqDist, sentence: &[TaggedWord]) {
        if sentence.is_empty() {
            return;
        }
        let mut prev = START_TAG;
        for (_, tag) in sentence {
            counts.observe(prev, tag);
            prev = tag.as_str();
        }
        counts.observe(prev, END_TAG);
    }

    /// Smooth the collected counts.
    pub fn from_counts(counts: ConditionalFreqDist, gamma: f64) -> Result<Self> {
        Ok(Self {
            table: ConditionalProbDist::lidstone(counts, gamma)?,
        })
    }

    /// log2 P(next | prev).
    ///
    /// # Errors
    /// [`HmmError::UnknownCondition`](crate::HmmError::UnknownCondition) if
    /// `prev` is `</s>` or a tag never seen in training.
    pub fn logprob(&self, prev: &str, next: &str) -> Result<f64> {
        self.table.logprob(prev, next)
    }

    /// The underlying smoothed table.
    pub fn table(&self) -> &ConditionalProbDist {
        &self.table
    }
}
