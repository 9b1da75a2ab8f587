//! Command line argument parsing for the veracity CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Text classified after training when `--text` is not given.
pub const DEFAULT_EXAMPLE_TEXT: &str = "This product is amazing, I love it!";

/// Veracity - fake product review detection
#[derive(Parser, Debug, Clone)]
#[command(name = "veracity")]
#[command(about = "Detect fake product reviews with TF-IDF features and Naive Bayes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct VeracityArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl VeracityArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a pipeline on a labeled CSV file and classify an example text
    Train(TrainArgs),

    /// Classify texts with a saved pipeline
    Predict(PredictArgs),

    /// Evaluate a saved pipeline on a labeled CSV file
    Evaluate(EvaluateArgs),

    /// Show the normalized form of a text
    Normalize(NormalizeArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled CSV file (text, label; label 1 = fake)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Save the trained pipeline to this file
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub output: Option<PathBuf>,

    /// Text to classify once training is done
    #[arg(short, long, default_value = DEFAULT_EXAMPLE_TEXT)]
    pub text: String,

    /// Hold out this fraction of the records for evaluation
    #[arg(long, value_name = "FRACTION")]
    pub test_fraction: Option<f64>,

    /// Seed for the train/test shuffle
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Saved pipeline file
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Texts to classify
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Saved pipeline file
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Labeled CSV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Arguments for normalization
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Pipeline configuration file (JSON); only the normalizer section is used
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Text to normalize
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
