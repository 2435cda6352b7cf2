//! # Word Tokenizer
//!
//! Splits raw text into word tokens for tagging. Whitespace separates
//! tokens; punctuation characters become tokens of their own, except for
//! apostrophes and hyphens inside a word ("don't", "well-known").

/// A token extracted from raw text with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text, as it appears in the input
    pub text: String,
    /// Start byte offset in the original string
    pub start: usize,
    /// End byte offset in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Characters kept inside a word when surrounded by alphanumerics.
const JOINERS: &[char] = &['\'', '-'];

/// Whitespace and punctuation tokenizer.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize raw text into a sequence of tokens.
    ///
    /// # Examples
    /// ```
    /// use hmmtag_trainer::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("The dog barks, loudly.");
    /// let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(words, ["The", "dog", "barks", ",", "loudly", "."]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word_start: Option<usize> = None;
        let mut chars = input.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if c.is_alphanumeric() {
                word_start.get_or_insert(idx);
                continue;
            }

            let next_is_word = chars.peek().is_some_and(|(_, n)| n.is_alphanumeric());
            if word_start.is_some() && JOINERS.contains(&c) && next_is_word {
                continue;
            }

            if let Some(start) = word_start.take() {
                Self::push(&mut tokens, input, start, idx);
            }
            if !c.is_whitespace() {
                Self::push(&mut tokens, input, idx, idx + c.len_utf8());
            }
        }

        // Emit final token if non-empty
        if let Some(start) = word_start {
            Self::push(&mut tokens, input, start, input.len());
        }

        tokens
    }

    fn push(tokens: &mut Vec<Token>, input: &str, start: usize, end: usize) {
        tokens.push(Token {
            text: input[start..end].to_string(),
            start,
            end,
            index: tokens.len(),
        });
    }

    /// Tokenize and keep only the token texts.
    pub fn words(&self, input: &str) -> Vec<String> {
        self.tokenize(input).into_iter().map(|t| t.text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("The cat in the hat came back");

        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[0].text, "The");
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].end, 3);
        assert_eq!(tokens[6].index, 6);
    }

    #[test]
    fn test_punctuation_is_split() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.words("Hello, world!"),
            vec!["Hello", ",", "world", "!"]
        );
        assert_eq!(tokenizer.words("(yes)"), vec!["(", "yes", ")"]);
    }

    #[test]
    fn test_joiners_inside_words() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.words("I don't like well-known things -"),
            vec!["I", "don't", "like", "well-known", "things", "-"]
        );
        assert_eq!(tokenizer.words("'quoted'"), vec!["'", "quoted", "'"]);
    }

    #[test]
    fn test_unicode_offsets() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("café au lait");
        assert_eq!(tokens[0].text, "café");
        assert_eq!(tokens[0].end, "café".len());
        assert_eq!(tokens[1].start, "café ".len());
    }

    #[test]
    fn test_tokenize_empty() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \t\n").is_empty());
    }
}
