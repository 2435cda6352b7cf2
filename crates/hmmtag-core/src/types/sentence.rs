//! # Tagged Sentences
//!
//! Training and gold data are ordered `(word, tag)` pairs. Words are
//! case-folded with [`fold_case`] before they reach any model table.

/// A `(word, tag)` pair as it appears in a corpus.
pub type TaggedWord = (String, String);

/// An ordered sequence of tagged words.
pub type TaggedSentence = Vec<TaggedWord>;

/// Case-fold a word for model storage and lookup.
///
/// Training and decoding both go through this function, so the casing of the
/// input never affects lookups.
pub fn fold_case(word: &str) -> String {
    word.to_lowercase()
}

/// Split a tagged sentence into its case-folded words and its gold tags.
pub fn split_tagged(sentence: &[TaggedWord]) -> (Vec<String>, Vec<&str>) {
    sentence
        .iter()
        .map(|(word, tag)| (fold_case(word), tag.as_str()))
        .unzip()
}
