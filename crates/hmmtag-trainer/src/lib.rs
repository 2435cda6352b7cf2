//! # hmmtag trainer
//!
//! Everything around the tagger core: reading tagged corpora, holding out a
//! test split, reporting accuracy and tagging raw text from the command line.

pub mod data;
pub mod tokenizer;
pub mod trainer;

pub use data::{load_tagged_corpus, parse_tagged_corpus, split_train_test};
pub use tokenizer::{Token, Tokenizer};
pub use trainer::{EvaluateOptions, TaggedToken, format_report, run_evaluation, run_tagging};
