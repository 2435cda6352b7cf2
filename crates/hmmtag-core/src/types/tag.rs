//! # Boundary Tags
//!
//! Tags are plain strings discovered from training data. Two synthetic tags
//! frame every sentence in the transition model and never emit words.

/// Synthetic tag preceding the first word of every sentence.
pub const START_TAG: &str = "<s>";

/// Synthetic tag following the last word of every sentence.
pub const END_TAG: &str = "</s>";

/// Returns `true` for `<s>` and `</s>`.
pub fn is_boundary(tag: &str) -> bool {
    tag == START_TAG || tag == END_TAG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_tags() {
        assert!(is_boundary("<s>"));
        assert!(is_boundary("</s>"));
        assert!(!is_boundary("NOUN"));
        assert!(!is_boundary("s"));
    }
}
