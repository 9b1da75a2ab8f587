//! Common types for review classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VeracityError;

/// Number of classes the classifier distinguishes.
pub const NUM_CLASSES: usize = 2;

/// Review class.
///
/// The declaration order is the class ordering: `Genuine` has index 0 and wins
/// ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// A review written by a real customer.
    Genuine,
    /// A fabricated or spam review.
    Fake,
}

impl Label {
    /// All labels in class order.
    pub const ALL: [Label; NUM_CLASSES] = [Label::Genuine, Label::Fake];

    /// Class index (`Genuine` = 0, `Fake` = 1).
    pub fn index(self) -> usize {
        match self {
            Label::Genuine => 0,
            Label::Fake => 1,
        }
    }

    /// Label for a class index.
    pub fn from_index(index: usize) -> Option<Label> {
        Label::ALL.get(index).copied()
    }

    /// Interpret the label column of the data file: `"1"` is fake, anything
    /// else is genuine.
    pub fn from_raw(raw: &str) -> Label {
        if raw.trim() == "1" {
            Label::Fake
        } else {
            Label::Genuine
        }
    }

    /// Lowercase name of the label.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Genuine => "genuine",
            Label::Fake => "fake",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Label {
    type Err = VeracityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genuine" | "0" => Ok(Label::Genuine),
            "fake" | "1" => Ok(Label::Fake),
            other => Err(VeracityError::invalid_input(format!(
                "unknown label {other:?}, expected \"genuine\" or \"fake\""
            ))),
        }
    }
}

/// A labeled review as loaded from the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Review text.
    pub text: String,
    /// Ground-truth class.
    pub label: Label,
}

impl RawRecord {
    /// Create a new record.
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        RawRecord {
            text: text.into(),
            label,
        }
    }
}

/// Dense numeric features for one document.
///
/// Its length is the vocabulary size of the vectorizer that produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Create a vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        FeatureVector(vec![0.0; len])
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Feature values.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Mutable feature values.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }

    /// Value of a single feature.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Indices and values of the non-zero features.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, value)| *value != 0.0)
    }

    /// Consume the vector and return its values.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }
}
