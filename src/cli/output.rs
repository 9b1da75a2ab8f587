//! Output formatting for CLI commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, VeracityArgs};
use crate::error::Result;
use crate::ml::evaluation::Evaluation;
use crate::ml::naive_bayes::NaiveBayesKind;
use crate::ml::types::Label;

/// Classification of one text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub text: String,
    pub normalized: String,
    pub label: Label,
    pub probability_genuine: f64,
    pub probability_fake: f64,
}

/// Result structure for the predict command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResults {
    pub predictions: Vec<PredictionResult>,
}

/// Result structure for the train command.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub input: String,
    pub records_loaded: usize,
    pub rows_skipped: usize,
    pub training_records: usize,
    pub vocabulary_size: usize,
    pub classifier: NaiveBayesKind,
    pub evaluation: Option<Evaluation>,
    pub model_path: Option<String>,
    pub prediction: PredictionResult,
    pub duration_ms: u64,
}

/// Result structure for the evaluate command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub input: String,
    pub rows_skipped: usize,
    pub evaluation: Evaluation,
}

/// Result structure for the normalize command.
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub text: String,
    pub normalized: String,
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &VeracityArgs) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: fmt::Display>(message: &str, result: &T, args: &VeracityArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    print!("{result}");
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &VeracityArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let confidence = match self.label {
            Label::Genuine => self.probability_genuine,
            Label::Fake => self.probability_fake,
        };
        writeln!(f, "{}\t{:.3}\t{}", self.label, confidence, self.text)
    }
}

impl fmt::Display for PredictionResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prediction in &self.predictions {
            write!(f, "{prediction}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TrainingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training Summary:")?;
        writeln!(f, "═════════════════")?;
        writeln!(f, "Input: {}", self.input)?;
        writeln!(
            f,
            "Records: {} loaded, {} skipped, {} used for training",
            self.records_loaded, self.rows_skipped, self.training_records
        )?;
        writeln!(f, "Vocabulary size: {}", self.vocabulary_size)?;
        writeln!(f, "Classifier: {:?} Naive Bayes", self.classifier)?;
        writeln!(f, "Training time: {}ms", self.duration_ms)?;
        if let Some(path) = &self.model_path {
            writeln!(f, "Model saved to: {path}")?;
        }

        if let Some(evaluation) = &self.evaluation {
            writeln!(f)?;
            write_evaluation(f, evaluation)?;
        }

        writeln!(f)?;
        writeln!(f, "Example: {}", self.prediction.text)?;
        writeln!(f, "Prediction: {}", self.prediction.label)
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input: {} ({} rows skipped)", self.input, self.rows_skipped)?;
        writeln!(f)?;
        write_evaluation(f, &self.evaluation)
    }
}

impl fmt::Display for NormalizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.normalized)
    }
}

fn write_evaluation(f: &mut fmt::Formatter<'_>, evaluation: &Evaluation) -> fmt::Result {
    writeln!(f, "Evaluation ({} records):", evaluation.total())?;
    writeln!(f, "═══════════════════════")?;
    writeln!(f, "Accuracy: {:.4}", evaluation.accuracy)?;
    writeln!(f)?;
    writeln!(f, "Confusion matrix (rows = actual, columns = predicted):")?;
    writeln!(f, "{:>10} {:>10} {:>10}", "", Label::Genuine, Label::Fake)?;
    for actual in Label::ALL {
        writeln!(
            f,
            "{:>10} {:>10} {:>10}",
            actual,
            evaluation.confusion_matrix.get(actual, Label::Genuine),
            evaluation.confusion_matrix.get(actual, Label::Fake)
        )?;
    }
    writeln!(f)?;
    writeln!(
        f,
        "{:>10} {:>10} {:>10} {:>10} {:>10}",
        "", "precision", "recall", "f1", "support"
    )?;
    for metrics in &evaluation.per_class {
        writeln!(
            f,
            "{:>10} {:>10.4} {:>10.4} {:>10.4} {:>10}",
            metrics.label, metrics.precision, metrics.recall, metrics.f1, metrics.support
        )?;
    }
    Ok(())
}
