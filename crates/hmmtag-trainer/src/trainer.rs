//! Train/evaluate and tagging workflows behind the CLI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use hmmtag_core::{EvaluationReport, Evaluator, HmmModel, Trainer, TrainerConfig};
use serde::Serialize;
use tracing::info;

use crate::data::{load_tagged_corpus, split_train_test};
use crate::tokenizer::Tokenizer;

/// Options for a train-then-evaluate run.
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Tagged corpus to split
    pub corpus: PathBuf,
    /// Number of trailing sentences held out for testing
    pub test_size: usize,
    /// Trainer settings
    pub trainer: TrainerConfig,
    /// Decode the test set on the rayon thread pool
    pub parallel_eval: bool,
    /// Mis-tagged sentences to keep in the report
    pub max_mistakes: usize,
    /// Where to write the trained model, if anywhere
    pub output: Option<PathBuf>,
}

impl EvaluateOptions {
    pub fn new(corpus: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            test_size: 500,
            trainer: TrainerConfig::default(),
            parallel_eval: false,
            max_mistakes: hmmtag_core::eval::DEFAULT_MAX_MISTAKES,
            output: None,
        }
    }
}

/// Load the corpus, train on all but the last `test_size` sentences and
/// score the model on the rest.
pub fn run_evaluation(options: &EvaluateOptions) -> anyhow::Result<EvaluationReport> {
    let corpus = load_tagged_corpus(&options.corpus)
        .with_context(|| format!("failed to read corpus {}", options.corpus.display()))?;
    info!(sentences = corpus.len(), path = %options.corpus.display(), "loaded corpus");

    let (train, test) = split_train_test(&corpus, options.test_size)?;
    info!(train = train.len(), test = test.len(), "split corpus");

    let model = Trainer::new(options.trainer.clone())
        .train(train)
        .context("training failed")?;
    info!(states = ?model.states(), "trained model");

    if let Some(path) = &options.output {
        model
            .save(path)
            .with_context(|| format!("failed to write model {}", path.display()))?;
        info!(path = %path.display(), "model saved");
    }

    let evaluator = Evaluator::new(&model).with_max_mistakes(options.max_mistakes);
    let report = if options.parallel_eval {
        evaluator.evaluate_par(test)?
    } else {
        evaluator.evaluate(test)?
    };

    info!(
        sentences = report.sentences,
        correct = report.correct,
        incorrect = report.incorrect,
        accuracy = report.accuracy(),
        "evaluation complete"
    );
    Ok(report)
}

/// One word of a tagged sentence, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
    pub start: usize,
    pub end: usize,
}

/// Tag raw text with a saved model.
pub fn run_tagging(model_path: &Path, text: &str) -> anyhow::Result<Vec<TaggedToken>> {
    let model = HmmModel::load(model_path)
        .with_context(|| format!("failed to load model {}", model_path.display()))?;

    let tokens = Tokenizer::new().tokenize(text);
    if tokens.is_empty() {
        anyhow::bail!("nothing to tag: input has no words");
    }

    let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    let tags = model.tag(&words)?;

    Ok(tokens
        .into_iter()
        .zip(tags)
        .map(|(token, tag)| TaggedToken {
            word: token.text,
            tag,
            start: token.start,
            end: token.end,
        })
        .collect())
}

/// Human-readable accuracy summary with the kept mis-tagged sentences.
pub fn format_report(report: &EvaluationReport) -> String {
    let mut out = format!(
        "Tagging accuracy for test set of {} sentences: {:.4} ({}/{})\n",
        report.sentences,
        report.accuracy(),
        report.correct,
        report.total()
    );
    for mistake in &report.mistakes {
        out.push_str(&format!("\nsentence {}:\n", mistake.index));
        for (i, word) in mistake.words.iter().enumerate() {
            let gold = &mistake.gold[i];
            let predicted = &mistake.predicted[i];
            if gold == predicted {
                out.push_str(&format!("  {word}/{gold}\n"));
            } else {
                out.push_str(&format!("  {word}/{predicted} (gold {gold}) <--\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    const CORPUS: &str = "\
the\tDET
dog\tNOUN
runs\tVERB

a\tDET
cat\tNOUN
sleeps\tVERB

the\tDET
cat\tNOUN
runs\tVERB
";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hmmtag-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_evaluate_then_tag() {
        let dir = scratch_dir("eval");
        let corpus = dir.join("corpus.tsv");
        let model_path = dir.join("model.json");
        fs::write(&corpus, CORPUS).unwrap();

        let mut options = EvaluateOptions::new(&corpus);
        options.test_size = 1;
        options.output = Some(model_path.clone());
        let report = run_evaluation(&options).unwrap();

        assert_eq!(report.sentences, 1);
        assert_eq!(report.accuracy(), 1.0);
        assert!(format_report(&report).contains("1.0000"));

        let tagged = run_tagging(&model_path, "The dog sleeps").unwrap();
        let tags: Vec<_> = tagged.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, ["DET", "NOUN", "VERB"]);
        assert_eq!(tagged[1].word, "dog");
        assert_eq!((tagged[1].start, tagged[1].end), (4, 7));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_parallel_evaluation_matches() {
        let dir = scratch_dir("par");
        let corpus = dir.join("corpus.tsv");
        fs::write(&corpus, CORPUS).unwrap();

        let mut options = EvaluateOptions::new(&corpus);
        options.test_size = 1;
        let sequential = run_evaluation(&options).unwrap();
        options.parallel_eval = true;
        options.trainer = TrainerConfig::new().with_parallel(true);
        let parallel = run_evaluation(&options).unwrap();

        assert_eq!(sequential, parallel);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_corpus() {
        let options = EvaluateOptions::new("/nonexistent/corpus.tsv");
        let err = run_evaluation(&options).unwrap_err();
        assert!(err.to_string().contains("failed to read corpus"));
    }

    #[test]
    fn test_format_report_marks_errors() {
        let report = EvaluationReport {
            sentences: 1,
            skipped: 0,
            correct: 1,
            incorrect: 1,
            mistakes: vec![hmmtag_core::MistaggedSentence {
                index: 0,
                words: vec!["a".into(), "dog".into()],
                gold: vec!["DET".into(), "VERB".into()],
                predicted: vec!["DET".into(), "NOUN".into()],
            }],
        };
        let text = format_report(&report);
        assert!(text.contains("0.5000"));
        assert!(text.contains("a/DET\n"));
        assert!(text.contains("dog/NOUN (gold VERB) <--"));
    }
}
