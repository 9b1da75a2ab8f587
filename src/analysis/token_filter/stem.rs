//! Stemming token filter and stemmer implementations.

use serde::{Deserialize, Serialize};

use super::Filter;
use crate::analysis::token::TokenStream;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

pub mod suffix;

pub use suffix::SuffixStemmer;

/// A single suffix-stripping rule: a word ending in `suffix` has it
/// replaced by `replacement`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    /// Suffix to match at the end of a word.
    pub suffix: String,
    /// Text substituted for the suffix (usually empty).
    #[serde(default)]
    pub replacement: String,
}

impl SuffixRule {
    /// Create a rule that strips `suffix`.
    pub fn strip<S: Into<String>>(suffix: S) -> Self {
        SuffixRule {
            suffix: suffix.into(),
            replacement: String::new(),
        }
    }

    /// Create a rule that replaces `suffix` with `replacement`.
    pub fn replace<S: Into<String>, R: Into<String>>(suffix: S, replacement: R) -> Self {
        SuffixRule {
            suffix: suffix.into(),
            replacement: replacement.into(),
        }
    }
}

/// Filter that applies stemming to tokens.
pub struct StemFilter {
    /// The stemmer to use.
    stemmer: Box<dyn Stemmer>,
}

impl std::fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a stem filter with the default suffix stemmer.
    pub fn new() -> Self {
        StemFilter {
            stemmer: Box::new(SuffixStemmer::new()),
        }
    }

    /// Create a stem filter with a custom stemmer.
    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> TokenStream {
        let filtered_tokens = tokens
            .map(|token| {
                let stemmed = self.stemmer.stem(&token.text);
                token.with_text(stemmed)
            })
            .collect::<Vec<_>>();

        Box::new(filtered_tokens.into_iter())
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}
