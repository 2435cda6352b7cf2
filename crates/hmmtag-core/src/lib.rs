//! # hmmtag core
//!
//! A part-of-speech tagger built on a discrete Hidden Markov Model.
//! Emission and transition tables are estimated from tagged sentences with
//! Lidstone smoothing, and sentences are decoded with exact Viterbi.
//!
//! Probabilities are reported as base-2 log-probabilities. Inside the
//! decoder every score is a cost, `-log2 P`, and the recurrence minimises.
//!
//! ## Quick Start
//!
//! ```rust
//! use hmmtag_core::{Evaluator, TaggedSentence, Trainer};
//!
//! fn sentence(pairs: &[(&str, &str)]) -> TaggedSentence {
//!     pairs.iter().map(|(w, t)| (w.to_string(), t.to_string())).collect()
//! }
//!
//! let corpus = vec![
//!     sentence(&[("the", "DET"), ("dog", "NOUN"), ("runs", "VERB")]),
//!     sentence(&[("a", "DET"), ("cat", "NOUN"), ("sleeps", "VERB")]),
//! ];
//! let model = Trainer::default().train(&corpus).unwrap();
//!
//! assert_eq!(model.tag(&["the", "cat", "runs"]).unwrap(), vec!["DET", "NOUN", "VERB"]);
//!
//! let report = Evaluator::new(&model).evaluate(&corpus).unwrap();
//! assert_eq!(report.accuracy(), 1.0);
//! ```
pub mod decoder;
pub mod error;
pub mod eval;
pub mod model;
pub mod prob;
pub mod types;

// Re-export primary API
pub use decoder::{DecoderPhase, ViterbiDecoder};
pub use error::{HmmError, Result};
pub use eval::{EvaluationReport, Evaluator, MistaggedSentence};
pub use model::{EmissionModel, HmmModel, Trainer, TrainerConfig, TransitionModel};
pub use prob::{ConditionalFreqDist, ConditionalProbDist, DEFAULT_GAMMA, LidstoneDist};
pub use types::{END_TAG, START_TAG, TaggedSentence, TaggedWord};

/// Train a model with the default configuration.
pub fn train(sentences: &[TaggedSentence]) -> Result<HmmModel> {
    Trainer::default().train(sentences)
}
