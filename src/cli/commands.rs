//! Command implementations for the veracity CLI.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::analysis::normalizer::TextNormalizer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset::{CsvRecordReader, train_test_split};
use crate::ml::types::Label;
use crate::pipeline::{PipelineConfig, TrainedPipeline, train_pipeline};

/// Execute a CLI command.
pub fn execute_command(args: VeracityArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
        Command::Normalize(normalize_args) => normalize(normalize_args, &args),
    }
}

/// Train a pipeline, optionally evaluate and save it, then classify the
/// example text.
fn train(args: &TrainArgs, cli_args: &VeracityArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let dataset = CsvRecordReader::new()
        .load(&args.input)
        .with_context(|| format!("Failed to load training data from {}", args.input.display()))?;

    let (training_records, test_records) = match args.test_fraction {
        Some(fraction) => {
            let (train, test) = train_test_split(&dataset.records, fraction, args.seed)
                .context("Failed to split training data")?;
            (train, Some(test))
        }
        None => (dataset.records.clone(), None),
    };

    let start = Instant::now();
    let pipeline = train_pipeline(&training_records, &config).context("Training failed")?;
    let duration_ms = start.elapsed().as_millis() as u64;
    info!("Training finished in {duration_ms}ms");

    let evaluation = match &test_records {
        Some(records) => Some(
            pipeline
                .evaluate(records)
                .context("Evaluation on the held-out split failed")?,
        ),
        None => None,
    };

    if let Some(path) = &args.output {
        pipeline
            .save(path)
            .with_context(|| format!("Failed to save model to {}", path.display()))?;
    }

    let prediction = classify(&pipeline, &args.text)?;

    output_result(
        "Training complete",
        &TrainingResult {
            input: args.input.display().to_string(),
            records_loaded: dataset.len(),
            rows_skipped: dataset.skipped,
            training_records: training_records.len(),
            vocabulary_size: pipeline.vectorizer().vocabulary_size(),
            classifier: pipeline.config().classifier.kind,
            evaluation,
            model_path: args.output.as_ref().map(|p| p.display().to_string()),
            prediction,
            duration_ms,
        },
        cli_args,
    )?;

    Ok(())
}

/// Classify texts with a saved pipeline.
fn predict(args: &PredictArgs, cli_args: &VeracityArgs) -> Result<()> {
    let pipeline = load_model(&args.model)?;
    let predictions = args
        .texts
        .iter()
        .map(|text| classify(&pipeline, text))
        .collect::<Result<Vec<_>>>()?;

    output_result("Predictions", &PredictionResults { predictions }, cli_args)?;
    Ok(())
}

/// Evaluate a saved pipeline on labeled data.
fn evaluate(args: &EvaluateArgs, cli_args: &VeracityArgs) -> Result<()> {
    let pipeline = load_model(&args.model)?;
    let dataset = CsvRecordReader::new()
        .load(&args.input)
        .with_context(|| format!("Failed to load test data from {}", args.input.display()))?;

    let evaluation = pipeline
        .evaluate(&dataset.records)
        .context("Evaluation failed")?;

    output_result(
        "Evaluation complete",
        &EvaluationResult {
            input: args.input.display().to_string(),
            rows_skipped: dataset.skipped,
            evaluation,
        },
        cli_args,
    )?;
    Ok(())
}

/// Print the normalized form of a text.
fn normalize(args: &NormalizeArgs, cli_args: &VeracityArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let normalizer = TextNormalizer::with_config(config.normalizer)?;

    output_result(
        "Normalized text",
        &NormalizationResult {
            text: args.text.clone(),
            normalized: normalizer.normalize(&args.text),
        },
        cli_args,
    )?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            PipelineConfig::from_json_file(path)
                .with_context(|| format!("Invalid configuration file {}", path.display()))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn load_model(path: &Path) -> Result<TrainedPipeline> {
    TrainedPipeline::load(path).with_context(|| format!("Failed to load model from {}", path.display()))
}

fn classify(pipeline: &TrainedPipeline, text: &str) -> Result<PredictionResult> {
    let label = pipeline.predict_one(text)?;
    let probabilities = pipeline.predict_proba(text)?;

    Ok(PredictionResult {
        text: text.to_string(),
        normalized: pipeline.normalizer().normalize(text),
        label,
        probability_genuine: probabilities[Label::Genuine.index()],
        probability_fake: probabilities[Label::Fake.index()],
    })
}
