//! # Viterbi Decoding
//!
//! Exact single-best decoding over a trained [`HmmModel`](crate::HmmModel).
//! All scores are costs (-log2 P): the recurrence minimises.

mod trellis;
pub mod viterbi;

pub use viterbi::{DecoderPhase, ViterbiDecoder};
