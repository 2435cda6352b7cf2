//! # Tagging Accuracy
//!
//! Decodes gold-tagged sentences with a trained model and counts
//! position-by-position agreement with the gold tags.

use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::decoder::ViterbiDecoder;
use crate::error::Result;
use crate::model::HmmModel;
use crate::types::{TaggedSentence, split_tagged};

/// Default number of mis-tagged sentences kept in a report.
pub const DEFAULT_MAX_MISTAKES: usize = 10;

/// A sentence whose predicted tags differ from the gold tags somewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MistaggedSentence {
    /// Position of the sentence in the evaluated corpus.
    pub index: usize,
    /// Words as they appear in the corpus (original casing).
    pub words: Vec<String>,
    /// Gold tags from the corpus.
    pub gold: Vec<String>,
    /// Tags chosen by the decoder.
    pub predicted: Vec<String>,
}

impl MistaggedSentence {
    /// Positions where prediction and gold disagree.
    pub fn error_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.gold
            .iter()
            .zip(&self.predicted)
            .enumerate()
            .filter(|(_, (gold, predicted))| gold != predicted)
            .map(|(i, _)| i)
    }
}

/// Outcome of scoring one sentence.
enum SentenceScore {
    Skipped,
    Scored {
        correct: usize,
        incorrect: usize,
        mistake: Option<MistaggedSentence>,
    },
}

/// Aggregate accuracy over an evaluation set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Sentences decoded.
    pub sentences: usize,
    /// Empty sentences that were not decoded.
    pub skipped: usize,
    /// Words whose predicted tag matched the gold tag.
    pub correct: usize,
    /// Words whose predicted tag differed from the gold tag.
    pub incorrect: usize,
    /// The first mis-tagged sentences, in corpus order.
    pub mistakes: Vec<MistaggedSentence>,
}

impl EvaluationReport {
    /// `correct / (correct + incorrect)`, or `0.0` if nothing was scored.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total > 0 {
            self.correct as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Number of tagged words compared.
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    fn record(&mut self, score: SentenceScore, max_mistakes: usize) {
        match score {
            SentenceScore::Skipped => self.skipped += 1,
            SentenceScore::Scored {
                correct,
                incorrect,
                mistake,
            } => {
                self.sentences += 1;
                self.correct += correct;
                self.incorrect += incorrect;
                if let Some(mistake) = mistake {
                    if self.mistakes.len() < max_mistakes {
                        self.mistakes.push(mistake);
                    }
                }
            }
        }
    }
}

/// Scores a trained model against gold-tagged sentences.
#[derive(Debug, Clone)]
pub struct Evaluator<'m> {
    model: &'m HmmModel,
    max_mistakes: usize,
}

impl<'m> Evaluator<'m> {
    /// Evaluator keeping up to [`DEFAULT_MAX_MISTAKES`] mis-tagged sentences.
    pub fn new(model: &'m HmmModel) -> Self {
        Self {
            model,
            max_mistakes: DEFAULT_MAX_MISTAKES,
        }
    }

    /// Keep at most `max_mistakes` mis-tagged sentences in the report.
    pub fn with_max_mistakes(mut self, max_mistakes: usize) -> Self {
        self.max_mistakes = max_mistakes;
        self
    }

    fn score_sentence(
        &self,
        decoder: &mut ViterbiDecoder<'m>,
        index: usize,
        sentence: &TaggedSentence,
    ) -> Result<SentenceScore> {
        if sentence.is_empty() {
            warn!(index, "skipping empty evaluation sentence");
            return Ok(SentenceScore::Skipped);
        }

        let (words, gold) = split_tagged(sentence);
        let predicted = decoder.decode(&words)?;

        let correct = gold
            .iter()
            .zip(&predicted)
            .filter(|(gold, predicted)| **gold == predicted.as_str())
            .count();
        let incorrect = gold.len() - correct;

        let mistake = (incorrect > 0).then(|| MistaggedSentence {
            index,
            words: sentence.iter().map(|(word, _)| word.clone()).collect(),
            gold: gold.iter().map(|tag| tag.to_string()).collect(),
            predicted,
        });

        Ok(SentenceScore::Scored {
            correct,
            incorrect,
            mistake,
        })
    }

    /// Decode every sentence in order with a single decoder.
    pub fn evaluate(&self, gold: &[TaggedSentence]) -> Result<EvaluationReport> {
        let mut decoder = self.model.decoder();
        let mut report = EvaluationReport::default();
        for (index, sentence) in gold.iter().enumerate() {
            let score = self.score_sentence(&mut decoder, index, sentence)?;
            report.record(score, self.max_mistakes);
        }
        Ok(report)
    }

    /// Same as [`evaluate`](Self::evaluate), decoding sentences on the rayon
    /// thread pool with one decoder per worker.
    pub fn evaluate_par(&self, gold: &[TaggedSentence]) -> Result<EvaluationReport> {
        let scores = gold
            .par_iter()
            .enumerate()
            .map_init(
                || self.model.decoder(),
                |decoder, (index, sentence)| self.score_sentence(decoder, index, sentence),
            )
            .collect::<Result<Vec<_>>>()?;

        let mut report = EvaluationReport::default();
        for score in scores {
            report.record(score, self.max_mistakes);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Trainer;

    fn sentence(pairs: &[(&str, &str)]) -> TaggedSentence {
        pairs
            .iter()
            .map(|(w, t)| (w.to_string(), t.to_string()))
            .collect()
    }

    fn trained() -> HmmModel {
        Trainer::default()
            .train(&[
                sentence(&[("the", "DET"), ("dog", "NOUN"), ("runs", "VERB")]),
                sentence(&[("a", "DET"), ("cat", "NOUN"), ("sleeps", "VERB")]),
            ])
            .unwrap()
    }

    fn gold() -> Vec<TaggedSentence> {
        vec![
            sentence(&[("The", "DET"), ("Cat", "NOUN"), ("runs", "VERB")]),
            sentence(&[]),
            // "dog" is a noun everywhere in training; gold says VERB
            sentence(&[("a", "DET"), ("dog", "VERB")]),
            sentence(&[("the", "DET"), ("dog", "NOUN"), ("sleeps", "VERB")]),
        ]
    }

    #[test]
    fn test_accuracy() {
        let model = trained();
        let report = Evaluator::new(&model).evaluate(&gold()).unwrap();

        assert_eq!(report.sentences, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.correct, 7);
        assert_eq!(report.incorrect, 1);
        assert_eq!(report.total(), 8);
        assert!((report.accuracy() - 7.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_mistakes_recorded() {
        let model = trained();
        let report = Evaluator::new(&model).evaluate(&gold()).unwrap();

        assert_eq!(report.mistakes.len(), 1);
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.index, 2);
        assert_eq!(mistake.words, vec!["a", "dog"]);
        assert_eq!(mistake.predicted, vec!["DET", "NOUN"]);
        assert_eq!(mistake.error_positions().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_max_mistakes() {
        let model = trained();
        let report = Evaluator::new(&model)
            .with_max_mistakes(0)
            .evaluate(&gold())
            .unwrap();
        assert!(report.mistakes.is_empty());
        assert_eq!(report.incorrect, 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let model = trained();
        let mut corpus = gold();
        for _ in 0..5 {
            corpus.extend(gold());
        }
        let evaluator = Evaluator::new(&model).with_max_mistakes(3);

        let sequential = evaluator.evaluate(&corpus).unwrap();
        let parallel = evaluator.evaluate_par(&corpus).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.mistakes.len(), 3);
        assert!(parallel.mistakes.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn test_empty_evaluation_set() {
        let model = trained();
        let report = Evaluator::new(&model).evaluate(&[]).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.accuracy(), 0.0);
    }
}
