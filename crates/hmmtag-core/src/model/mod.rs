//! # Hidden Markov Model
//!
//! - **Hidden states**: part-of-speech tags discovered from training data
//! - **Observations**: case-folded words
//!
//! The model owns a smoothed [`EmissionModel`] and [`TransitionModel`], the
//! fixed states list and a `tag -> index` map. It is immutable once built and
//! can be shared by any number of [`ViterbiDecoder`]s.
//!
//! Besides the log-probability tables it keeps dense *cost* tables
//! (cost = -log2 P, lower is better) indexed by state, which the decoder
//! reads in its inner loop.

pub mod emission;
pub mod trainer;
pub mod transition;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decoder::ViterbiDecoder;
use crate::error::{HmmError, Result};
use crate::prob::lidstone::SmoothedCounts;
use crate::types::{END_TAG, START_TAG, is_boundary};

pub use emission::EmissionModel;
pub use trainer::{Trainer, TrainerConfig};
pub use transition::TransitionModel;

/// Dense transition costs over the states list.
#[derive(Debug, Clone, Default)]
pub(crate) struct CostTables {
    /// `start[s]` = -log2 P(s | <s>)
    pub(crate) start: Vec<f64>,
    /// `end[s]` = -log2 P(</s> | s)
    pub(crate) end: Vec<f64>,
    /// `transition[p * n + s]` = -log2 P(s | p)
    pub(crate) transition: Vec<f64>,
}

impl CostTables {
    fn build(transition: &TransitionModel, states: &[String]) -> Result<Self> {
        let n = states.len();
        let mut tables = Self {
            start: Vec::with_capacity(n),
            end: Vec::with_capacity(n),
            transition: Vec::with_capacity(n * n),
        };
        for state in states {
            tables.start.push(-transition.logprob(START_TAG, state)?);
            tables.end.push(-transition.logprob(state, END_TAG)?);
        }
        for prev in states {
            for state in states {
                tables.transition.push(-transition.logprob(prev, state)?);
            }
        }
        Ok(tables)
    }
}

/// Persisted form: raw counts and gamma for both tables. Smoothing, the
/// states list and the cost tables are all rebuilt on load.
#[derive(Serialize, Deserialize)]
struct ModelParts {
    emission: SmoothedCounts,
    transition: SmoothedCounts,
}

impl TryFrom<ModelParts> for HmmModel {
    type Error = HmmError;

    fn try_from(parts: ModelParts) -> Result<Self> {
        let emission = EmissionModel::from_counts(parts.emission.counts, parts.emission.gamma)?;
        let transition =
            TransitionModel::from_counts(parts.transition.counts, parts.transition.gamma)?;
        Self::from_parts(emission, transition)
    }
}

impl From<HmmModel> for ModelParts {
    fn from(model: HmmModel) -> Self {
        Self {
            emission: model.emission.into(),
            transition: model.transition.into(),
        }
    }
}

/// A trained part-of-speech HMM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelParts", into = "ModelParts")]
pub struct HmmModel {
    emission: EmissionModel,
    transition: TransitionModel,
    states: Vec<String>,
    state_index: HashMap<String, usize>,
    costs: CostTables,
}

impl HmmModel {
    /// Assemble a model from trained tables.
    ///
    /// The states list is the sorted set of emitting tags. Every state, and
    /// `<s>`, must also be a transition condition; neither boundary tag may
    /// emit, and `</s>` may not be a condition.
    pub fn from_parts(emission: EmissionModel, transition: TransitionModel) -> Result<Self> {
        let states = emission.states();
        if states.is_empty() {
            return Err(HmmError::EmptyCorpus);
        }
        if let Some(tag) = states.iter().find(|tag| is_boundary(tag)) {
            return Err(HmmError::ReservedTag { tag: tag.clone() });
        }
        if transition.table().contains(END_TAG) {
            return Err(HmmError::ReservedTag {
                tag: END_TAG.to_string(),
            });
        }
        for condition in std::iter::once(START_TAG).chain(states.iter().map(String::as_str)) {
            if !transition.table().contains(condition) {
                return Err(HmmError::UnknownCondition {
                    condition: condition.to_string(),
                });
            }
        }

        let state_index = states
            .iter()
            .enumerate()
            .map(|(i, tag)| (tag.clone(), i))
            .collect();
        let costs = CostTables::build(&transition, &states)?;

        Ok(Self {
            emission,
            transition,
            states,
            state_index,
            costs,
        })
    }

    /// log2 P(word | tag). The word is case-folded before lookup.
    ///
    /// Unseen words get the smoothed unseen-bin probability.
    ///
    /// # Errors
    /// [`HmmError::UnknownCondition`] if `tag` is not a trained state.
    pub fn emission_logprob(&self, tag: &str, word: &str) -> Result<f64> {
        self.emission.logprob(tag, word)
    }

    /// log2 P(next | prev), with `<s>`/`</s>` as boundary tags.
    ///
    /// # Errors
    /// [`HmmError::UnknownCondition`] if `prev` is `</s>` or untrained.
    pub fn transition_logprob(&self, prev: &str, next: &str) -> Result<f64> {
        self.transition.logprob(prev, next)
    }

    /// The fixed states list (non-boundary tags, sorted).
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Number of non-boundary states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Index of `tag` in the states list.
    pub fn state_index(&self, tag: &str) -> Option<usize> {
        self.state_index.get(tag).copied()
    }

    /// The smoothed word distributions.
    pub fn emission(&self) -> &EmissionModel {
        &self.emission
    }

    /// The smoothed next-tag distributions.
    pub fn transition(&self) -> &TransitionModel {
        &self.transition
    }

    pub(crate) fn costs(&self) -> &CostTables {
        &self.costs
    }

    /// A fresh decoder borrowing this model.
    pub fn decoder(&self) -> ViterbiDecoder<'_> {
        ViterbiDecoder::new(self)
    }

    /// Tag a sentence with the most likely tag sequence.
    ///
    /// # Examples
    /// ```
    /// use hmmtag_core::{Trainer, TaggedSentence};
    ///
    /// let corpus: Vec<TaggedSentence> = vec![
    ///     vec![("the".into(), "DET".into()), ("dog".into(), "NOUN".into())],
    ///     vec![("a".into(), "DET".into()), ("cat".into(), "NOUN".into())],
    /// ];
    /// let model = Trainer::default().train(&corpus).unwrap();
    ///
    /// assert_eq!(model.tag(&["The", "cat"]).unwrap(), vec!["DET", "NOUN"]);
    /// ```
    pub fn tag<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<String>> {
        self.decoder().decode(words)
    }

    /// Serialize the model to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a model from JSON, re-smoothing the stored counts and
    /// rebuilding the states list and cost tables.
    ///
    /// # Errors
    /// [`HmmError::Serialization`] for malformed JSON, otherwise the same
    /// errors as training (e.g. [`HmmError::InvalidConfig`] for a bad gamma).
    pub fn from_json(json: &str) -> Result<Self> {
        let parts: ModelParts = serde_json::from_str(json)?;
        parts.try_into()
    }

    /// Write the model as JSON to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a model written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
