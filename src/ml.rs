//! Feature extraction and classification.
//!
//! [`tfidf`] turns normalized review text into weighted term vectors,
//! [`naive_bayes`] learns to separate genuine from fake reviews on those
//! vectors, and [`evaluation`] scores predictions against known labels.

pub mod evaluation;
pub mod naive_bayes;
pub mod tfidf;
pub mod types;

pub use evaluation::{ClassMetrics, ConfusionMatrix, Evaluation};
pub use naive_bayes::{NaiveBayesClassifier, NaiveBayesConfig, NaiveBayesKind};
pub use tfidf::{Norm, TfIdfVectorizer, VectorizerConfig};
pub use types::{FeatureVector, Label, RawRecord};
