//! Training and inference pipeline.
//!
//! [`train_pipeline`] runs Normalizer -> Vectorizer -> Classifier over labeled
//! records and returns a [`TrainedPipeline`], which replays the same stages to
//! classify new text and to evaluate on held-out records.
//!
//! # Examples
//!
//! ```
//! use veracity::ml::types::{Label, RawRecord};
//! use veracity::pipeline::{PipelineConfig, train_pipeline};
//!
//! let records = vec![
//!     RawRecord::new("great amazing love it", Label::Genuine),
//!     RawRecord::new("buy now fake spam free money", Label::Fake),
//! ];
//! let pipeline = train_pipeline(&records, &PipelineConfig::default()).unwrap();
//! assert_eq!(
//!     pipeline.predict_one("great amazing love it product").unwrap(),
//!     Label::Genuine
//! );
//! ```

pub mod artifact;
pub mod config;

pub use artifact::PipelineArtifact;
pub use config::PipelineConfig;

use log::{debug, info};
use rayon::prelude::*;

use crate::analysis::normalizer::TextNormalizer;
use crate::error::{Result, VeracityError};
use crate::ml::evaluation::{ConfusionMatrix, Evaluation};
use crate::ml::naive_bayes::NaiveBayesClassifier;
use crate::ml::tfidf::TfIdfVectorizer;
use crate::ml::types::{FeatureVector, Label, NUM_CLASSES, RawRecord};

/// Train every stage on `records`.
///
/// Nothing is returned unless all stages succeed.
pub fn train_pipeline(records: &[RawRecord], config: &PipelineConfig) -> Result<TrainedPipeline> {
    if records.is_empty() {
        return Err(VeracityError::invalid_input(
            "cannot train a pipeline without records",
        ));
    }
    config.validate()?;

    info!("Normalizing {} records", records.len());
    let normalizer = TextNormalizer::with_config(config.normalizer.clone())?;
    let corpus: Vec<String> = records
        .par_iter()
        .map(|record| normalizer.normalize(&record.text))
        .collect();
    let labels: Vec<Label> = records.iter().map(|record| record.label).collect();

    info!("Fitting TF-IDF vectorizer");
    let mut vectorizer = TfIdfVectorizer::new(config.vectorizer.clone())?;
    let vectors = vectorizer.fit(&corpus)?;
    debug!("Vocabulary has {} terms", vectorizer.vocabulary_size());

    info!("Training {:?} Naive Bayes classifier", config.classifier.kind);
    let mut classifier = NaiveBayesClassifier::new(config.classifier.clone())?;
    classifier.fit(&vectors, &labels)?;

    Ok(TrainedPipeline {
        config: config.clone(),
        normalizer,
        vectorizer,
        classifier,
    })
}

/// A fitted vectorizer and the classifier trained on its output.
///
/// The two are only ever used together, so vectors always match the
/// dimension the classifier expects.
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    config: PipelineConfig,
    normalizer: TextNormalizer,
    vectorizer: TfIdfVectorizer,
    classifier: NaiveBayesClassifier,
}

impl TrainedPipeline {
    /// Reassemble a pipeline from fitted stages.
    ///
    /// Fails with `InvalidInput` if a stage is unfitted, inconsistent, or
    /// was built with settings other than `config`, or if the stages
    /// disagree on the feature dimension.
    pub fn from_parts(
        config: PipelineConfig,
        vectorizer: TfIdfVectorizer,
        classifier: NaiveBayesClassifier,
    ) -> Result<Self> {
        config.validate()?;
        vectorizer.validate()?;
        classifier.validate()?;
        if vectorizer.config() != &config.vectorizer {
            return Err(VeracityError::invalid_input(
                "vectorizer settings differ from the pipeline configuration",
            ));
        }
        if classifier.config() != &config.classifier {
            return Err(VeracityError::invalid_input(
                "classifier settings differ from the pipeline configuration",
            ));
        }
        let model = classifier
            .model()
            .ok_or_else(|| VeracityError::invalid_input("classifier is not trained"))?;
        if !vectorizer.is_fitted() {
            return Err(VeracityError::invalid_input("vectorizer is not fitted"));
        }
        if model.n_features() != vectorizer.vocabulary_size() {
            return Err(VeracityError::invalid_input(format!(
                "classifier expects {} features but the vocabulary has {} terms",
                model.n_features(),
                vectorizer.vocabulary_size()
            )));
        }

        Ok(TrainedPipeline {
            normalizer: TextNormalizer::with_config(config.normalizer.clone())?,
            config,
            vectorizer,
            classifier,
        })
    }

    /// Get the configuration the pipeline was trained with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get the text normalizer.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Get the fitted vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// Get the trained classifier.
    pub fn classifier(&self) -> &NaiveBayesClassifier {
        &self.classifier
    }

    /// Normalize and vectorize a text.
    pub fn features(&self, text: &str) -> Result<FeatureVector> {
        self.vectorizer.transform(&self.normalizer.normalize(text))
    }

    /// Classify a single text.
    pub fn predict_one(&self, text: &str) -> Result<Label> {
        self.classifier.predict(&self.features(text)?)
    }

    /// Class probabilities of a single text, in [`Label::index`] order.
    pub fn predict_proba(&self, text: &str) -> Result<[f64; NUM_CLASSES]> {
        self.classifier.predict_proba(&self.features(text)?)
    }

    /// Classify many texts in parallel.
    pub fn predict_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<Label>> {
        texts
            .par_iter()
            .map(|text| self.predict_one(text.as_ref()))
            .collect()
    }

    /// Predict every record and compare against its label.
    pub fn evaluate(&self, records: &[RawRecord]) -> Result<Evaluation> {
        info!("Evaluating on {} records", records.len());
        let outcomes: Vec<(Label, Label)> = records
            .par_iter()
            .map(|record| Ok((record.label, self.predict_one(&record.text)?)))
            .collect::<Result<_>>()?;

        let evaluation = Evaluation::from_confusion_matrix(outcomes.into_iter().collect::<ConfusionMatrix>());
        debug!("Accuracy {:.4}", evaluation.accuracy);
        Ok(evaluation)
    }
}
