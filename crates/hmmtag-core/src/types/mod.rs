pub mod sentence;
pub mod tag;

pub use sentence::{TaggedSentence, TaggedWord, fold_case, split_tagged};
pub use tag::{END_TAG, START_TAG, is_boundary};
