//! Pipeline configuration.
//!
//! Every section has defaults, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "vectorizer": { "max_features": 2000, "sublinear_tf": true },
//!   "classifier": { "kind": "gaussian" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizerConfig;
use crate::error::{Result, VeracityError};
use crate::ml::naive_bayes::NaiveBayesConfig;
use crate::ml::tfidf::VectorizerConfig;

/// Settings for all pipeline stages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Text normalization.
    pub normalizer: NormalizerConfig,
    /// TF-IDF feature extraction.
    pub vectorizer: VectorizerConfig,
    /// Naive Bayes classification.
    pub classifier: NaiveBayesConfig,
}

impl PipelineConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            VeracityError::invalid_input(format!(
                "cannot read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.normalizer.validate()?;
        self.vectorizer.validate()?;
        self.classifier.validate()
    }
}
