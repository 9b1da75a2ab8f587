//! # Veracity
//!
//! Fake product review detection for Rust.
//!
//! ## Features
//!
//! - Configurable text normalization (stop words, suffix stripping)
//! - TF-IDF features over unigrams and bigrams
//! - Multinomial and Gaussian Naive Bayes
//! - Held-out evaluation with confusion matrix and per-class metrics
//! - Single-file trained pipeline artifacts

pub mod analysis;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod pipeline;

pub mod prelude {
    pub use crate::analysis::normalizer::{NormalizerConfig, TextNormalizer};
    pub use crate::dataset::{load_records, train_test_split};
    pub use crate::error::{Result, VeracityError};
    pub use crate::ml::{Evaluation, FeatureVector, Label, RawRecord};
    pub use crate::pipeline::{PipelineConfig, TrainedPipeline, train_pipeline};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
