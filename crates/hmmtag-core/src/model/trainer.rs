//! # Supervised Training
//!
//! Counts emissions and transitions over a tagged corpus and smooths them
//! into an [`HmmModel`]. Counting is a pure reduction over sentences, so it
//! can optionally run on the rayon thread pool.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{HmmError, Result};
use crate::model::HmmModel;
use crate::model::emission::EmissionModel;
use crate::model::transition::TransitionModel;
use crate::prob::ConditionalFreqDist;
use crate::prob::lidstone::{DEFAULT_GAMMA, validate_gamma};
use crate::types::{TaggedSentence, is_boundary};

/// Configuration for the trainer.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Lidstone additive constant shared by both models
    pub gamma: f64,
    /// Aggregate counts on the rayon thread pool
    pub parallel: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            parallel: false,
        }
    }
}

impl TrainerConfig {
    /// Create a new trainer configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the smoothing constant.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Enable or disable parallel count aggregation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Raw counts collected from part of a corpus.
#[derive(Debug, Default)]
struct Counts {
    emission: ConditionalFreqDist,
    transition: ConditionalFreqDist,
    sentences: usize,
    tokens: usize,
    skipped: usize,
}

impl Counts {
    fn add_sentence(mut self, sentence: &TaggedSentence) -> Result<Self> {
        if sentence.is_empty() {
            self.skipped += 1;
            return Ok(self);
        }
        if let Some((_, tag)) = sentence.iter().find(|(_, tag)| is_boundary(tag)) {
            return Err(HmmError::ReservedTag { tag: tag.clone() });
        }

        EmissionModel::count_sentence(&mut self.emission, sentence);
        TransitionModel::count_sentence(&mut self.transition, sentence);
        self.sentences += 1;
        self.tokens += sentence.len();
        Ok(self)
    }

    fn merge(self, other: Counts) -> Counts {
        Counts {
            emission: self.emission.merge(other.emission),
            transition: self.transition.merge(other.transition),
            sentences: self.sentences + other.sentences,
            tokens: self.tokens + other.tokens,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Builds an [`HmmModel`] from tagged sentences.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Create a trainer with the given configuration.
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Estimate emission and transition tables from `sentences`.
    ///
    /// Words are lowercased before counting. Empty sentences are skipped.
    ///
    /// # Errors
    /// - [`HmmError::InvalidConfig`] for a bad smoothing constant
    /// - [`HmmError::ReservedTag`] if the data uses `<s>` or `</s>` as a tag
    /// - [`HmmError::EmptyCorpus`] if there is not a single tagged word
    pub fn train(&self, sentences: &[TaggedSentence]) -> Result<HmmModel> {
        validate_gamma(self.config.gamma)?;

        let counts = if self.config.parallel {
            sentences
                .par_iter()
                .try_fold(Counts::default, |acc, sentence| acc.add_sentence(sentence))
                .try_reduce(Counts::default, |a, b| Ok(a.merge(b)))?
        } else {
            sentences
                .iter()
                .try_fold(Counts::default(), |acc, sentence| acc.add_sentence(sentence))?
        };

        if counts.skipped > 0 {
            warn!(skipped = counts.skipped, "skipped empty training sentences");
        }
        if counts.tokens == 0 {
            return Err(HmmError::EmptyCorpus);
        }

        let emission = EmissionModel::from_counts(counts.emission, self.config.gamma)?;
        let transition = TransitionModel::from_counts(counts.transition, self.config.gamma)?;
        let model = HmmModel::from_parts(emission, transition)?;

        debug!(
            sentences = counts.sentences,
            tokens = counts.tokens,
            states = model.num_states(),
            vocabulary = model.emission().vocabulary_size(),
            gamma = self.config.gamma,
            "trained HMM"
        );

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaggedWord;

    fn sentence(pairs: &[(&str, &str)]) -> TaggedSentence {
        pairs
            .iter()
            .map(|(w, t)| (w.to_string(), t.to_string()))
            .collect::<Vec<TaggedWord>>()
    }

    fn corpus() -> Vec<TaggedSentence> {
        vec![
            sentence(&[("The", "DET"), ("dog", "NOUN"), ("runs", "VERB")]),
            sentence(&[("a", "DET"), ("cat", "NOUN"), ("sleeps", "VERB")]),
            sentence(&[]),
            sentence(&[("Dogs", "NOUN"), ("bark", "VERB"), ("loudly", "ADV")]),
        ]
    }

    #[test]
    fn test_train_states() {
        let model = Trainer::default().train(&corpus()).unwrap();
        assert_eq!(model.states(), &["ADV", "DET", "NOUN", "VERB"]);
        assert_eq!(model.emission().vocabulary_size(), 9);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let corpus = corpus();
        let sequential = Trainer::default().train(&corpus).unwrap();
        let parallel = Trainer::new(TrainerConfig::new().with_parallel(true))
            .train(&corpus)
            .unwrap();

        assert_eq!(sequential.states(), parallel.states());
        assert_eq!(sequential.emission(), parallel.emission());
        assert_eq!(sequential.transition(), parallel.transition());
    }

    #[test]
    fn test_empty_corpus() {
        let err = Trainer::default().train(&[]).unwrap_err();
        assert!(matches!(err, HmmError::EmptyCorpus));

        let err = Trainer::default().train(&[sentence(&[])]).unwrap_err();
        assert!(matches!(err, HmmError::EmptyCorpus));
    }

    #[test]
    fn test_reserved_tag_rejected() {
        let bad = vec![sentence(&[("hello", "<s>")])];
        let err = Trainer::default().train(&bad).unwrap_err();
        assert!(matches!(err, HmmError::ReservedTag { ref tag } if tag == "<s>"));

        let err = Trainer::new(TrainerConfig::new().with_parallel(true))
            .train(&[sentence(&[("bye", "</s>")])])
            .unwrap_err();
        assert!(matches!(err, HmmError::ReservedTag { .. }));
    }

    #[test]
    fn test_invalid_gamma() {
        let err = Trainer::new(TrainerConfig::new().with_gamma(0.0))
            .train(&corpus())
            .unwrap_err();
        assert!(matches!(err, HmmError::InvalidConfig(_)));
    }
}
