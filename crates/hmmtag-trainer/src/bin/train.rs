//! hmmtag command line
//!
//! Trains an HMM tagger on a tagged corpus, reports held-out accuracy and
//! tags raw sentences with a saved model.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hmmtag_core::{DEFAULT_GAMMA, TrainerConfig};
use hmmtag_trainer::{EvaluateOptions, format_report, run_evaluation, run_tagging};

/// CLI arguments
#[derive(Parser)]
#[command(name = "hmmtag-train")]
#[command(about = "Train and run an HMM part-of-speech tagger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a corpus and report accuracy on its last sentences
    Evaluate {
        /// Tagged corpus (word<TAB>tag per line, blank line between sentences)
        #[arg(short, long)]
        corpus: PathBuf,

        /// Number of trailing sentences held out for testing
        #[arg(short, long, default_value_t = 500)]
        test_size: usize,

        /// Lidstone smoothing constant
        #[arg(short, long, default_value_t = DEFAULT_GAMMA)]
        gamma: f64,

        /// Train and evaluate on all cores
        #[arg(short, long)]
        parallel: bool,

        /// Number of mis-tagged sentences to print
        #[arg(short = 'm', long, default_value_t = 10)]
        show_mistakes: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write the trained model to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Tag a sentence with a saved model
    Tag {
        /// Model written by `evaluate --output`
        #[arg(short, long)]
        model: PathBuf,

        /// Print the tagged tokens as JSON
        #[arg(long)]
        json: bool,

        /// Sentence to tag
        #[arg(required = true)]
        sentence: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate {
            corpus,
            test_size,
            gamma,
            parallel,
            show_mistakes,
            json,
            output,
        } => {
            let options = EvaluateOptions {
                corpus,
                test_size,
                trainer: TrainerConfig::new()
                    .with_gamma(gamma)
                    .with_parallel(parallel),
                parallel_eval: parallel,
                max_mistakes: show_mistakes,
                output,
            };
            let report = run_evaluation(&options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_report(&report));
            }
        }
        Commands::Tag {
            model,
            json,
            sentence,
        } => {
            let tagged = run_tagging(&model, &sentence.join(" "))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tagged)?);
            } else {
                let line: Vec<String> = tagged
                    .iter()
                    .map(|t| format!("{}/{}", t.word, t.tag))
                    .collect();
                println!("{}", line.join(" "));
            }
        }
    }

    Ok(())
}
