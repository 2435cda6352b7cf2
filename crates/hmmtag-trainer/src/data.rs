//! Data loading for tagged training corpora.
//!
//! One `word<TAB>tag` pair per line, sentences separated by blank lines.
//! Lines starting with `# `, or with `#` and holding no tab, are comments,
//! so a `#` token (`#<TAB>#`) is kept.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use hmmtag_core::TaggedSentence;
use tracing::warn;

/// Load a tagged corpus from a file.
pub fn load_tagged_corpus<P: AsRef<Path>>(path: P) -> io::Result<Vec<TaggedSentence>> {
    let file = File::open(path)?;
    parse_tagged_corpus(BufReader::new(file))
}

/// Parse a tagged corpus from any buffered reader.
///
/// Lines that are not exactly `word<TAB>tag` are skipped with a warning.
pub fn parse_tagged_corpus<R: BufRead>(reader: R) -> io::Result<Vec<TaggedSentence>> {
    let mut sentences = Vec::new();
    let mut current = TaggedSentence::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }

        if is_comment(line) {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').map(str::trim).collect();
        match parts.as_slice() {
            [word, tag] if !word.is_empty() && !tag.is_empty() => {
                current.push((word.to_string(), tag.to_string()));
            }
            _ => warn!(line = lineno + 1, content = line, "skipping malformed corpus line"),
        }
    }

    // Don't forget the last sentence
    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

fn is_comment(line: &str) -> bool {
    line.starts_with("# ") || (line.starts_with('#') && !line.contains('\t'))
}

/// Hold out the last `test_size` sentences as the test set.
///
/// Returns `(train, test)`. At least one training sentence must remain.
pub fn split_train_test(
    corpus: &[TaggedSentence],
    test_size: usize,
) -> anyhow::Result<(&[TaggedSentence], &[TaggedSentence])> {
    if test_size >= corpus.len() {
        anyhow::bail!(
            "test size {} leaves no training data in a corpus of {} sentences",
            test_size,
            corpus.len()
        );
    }
    Ok(corpus.split_at(corpus.len() - test_size))
}
