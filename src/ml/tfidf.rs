//! TF-IDF vectorizer for text feature extraction.
//!
//! The vectorizer works on normalized text (tokens separated by whitespace).
//! Fitting builds a vocabulary of the most frequent n-grams and their inverse
//! document frequencies; transforming maps a text onto that fixed vocabulary.
//!
//! Weighting conventions:
//!
//! - term frequency is the raw count, or `1 + ln(count)` with `sublinear_tf`;
//! - IDF is `ln((1 + n) / (1 + df)) + 1`, or `ln(n / df) + 1` without
//!   `smooth_idf`;
//! - each row is then scaled to unit L2 (or L1) norm; all-zero rows stay zero.
//!
//! # Examples
//!
//! ```
//! use veracity::ml::tfidf::TfIdfVectorizer;
//!
//! let mut vectorizer = TfIdfVectorizer::default();
//! let vectors = vectorizer.fit(&["great amaz love", "buy fake spam"]).unwrap();
//! assert_eq!(vectors.len(), 2);
//!
//! let features = vectorizer.transform("great product").unwrap();
//! assert_eq!(features.len(), vectorizer.vocabulary_size());
//! ```

use ahash::{AHashMap, AHashSet};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::{Result, VeracityError};
use crate::ml::types::FeatureVector;

/// Default cap on the vocabulary size.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Row normalization applied after TF-IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Scale rows to unit Euclidean length.
    #[default]
    L2,
    /// Scale rows so absolute values sum to one.
    L1,
    /// Leave rows unscaled.
    None,
}

/// Vectorizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Maximum number of terms kept, ranked by corpus frequency.
    pub max_features: usize,
    /// Inclusive range of n-gram sizes; `(1, 2)` means unigrams and bigrams.
    pub ngram_range: (usize, usize),
    /// Use `1 + ln(tf)` instead of the raw count.
    pub sublinear_tf: bool,
    /// Add one to document counts as if an extra document held every term.
    pub smooth_idf: bool,
    /// Row normalization.
    pub norm: Norm,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: (1, 2),
            sublinear_tf: false,
            smooth_idf: true,
            norm: Norm::L2,
        }
    }
}

impl VectorizerConfig {
    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(VeracityError::invalid_config(
                "max_features must be greater than zero",
            ));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(VeracityError::invalid_config(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        Ok(())
    }
}

/// Vocabulary and weights learned by [`TfIdfVectorizer::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedVocabulary {
    /// Term -> feature index.
    vocabulary: AHashMap<String, usize>,
    /// Feature index -> term.
    terms: Vec<String>,
    /// Number of fitted documents containing each term.
    document_frequency: Vec<usize>,
    /// Inverse document frequency of each term.
    idf: Vec<f64>,
    /// Number of documents seen during fitting.
    n_documents: usize,
}

impl FittedVocabulary {
    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in feature-index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Feature index of a term.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF weights in feature-index order.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Document frequency of a term.
    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.index_of(term).map(|idx| self.document_frequency[idx])
    }

    /// Number of documents the vocabulary was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Check that the per-term tables agree with each other.
    ///
    /// A vocabulary built by `fit` always passes; one read back from storage
    /// may not.
    pub fn validate(&self) -> Result<()> {
        let n_terms = self.terms.len();
        if self.idf.len() != n_terms || self.document_frequency.len() != n_terms {
            return Err(VeracityError::invalid_input(format!(
                "vocabulary has {} terms but {} idf weights and {} document frequencies",
                n_terms,
                self.idf.len(),
                self.document_frequency.len()
            )));
        }
        if self.vocabulary.len() != n_terms {
            return Err(VeracityError::invalid_input(format!(
                "vocabulary maps {} terms but lists {}",
                self.vocabulary.len(),
                n_terms
            )));
        }
        for (idx, term) in self.terms.iter().enumerate() {
            if self.vocabulary.get(term) != Some(&idx) {
                return Err(VeracityError::invalid_input(format!(
                    "term {term:?} is not mapped to feature index {idx}"
                )));
            }
        }
        if let Some(weight) = self.idf.iter().find(|w| !w.is_finite()) {
            return Err(VeracityError::invalid_input(format!(
                "idf weight {weight} is not finite"
            )));
        }
        Ok(())
    }
}

/// TF-IDF vectorizer over word n-grams.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    fitted: Option<FittedVocabulary>,
    #[serde(skip)]
    tokenizer: WhitespaceTokenizer,
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(TfIdfVectorizer {
            config,
            fitted: None,
            tokenizer: WhitespaceTokenizer::new(),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Whether [`fit`](Self::fit) has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The fitted vocabulary, if any.
    pub fn vocabulary(&self) -> Option<&FittedVocabulary> {
        self.fitted.as_ref()
    }

    /// Check the configuration and, if fitted, the vocabulary.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if let Some(fitted) = &self.fitted {
            fitted.validate()?;
        }
        Ok(())
    }

    /// Size of the fitted vocabulary (0 before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.fitted.as_ref().map_or(0, FittedVocabulary::len)
    }

    /// Fit the vocabulary on a corpus and return the corpus vectors.
    ///
    /// On error the previously fitted state, if any, is left untouched.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<Vec<FeatureVector>> {
        if corpus.is_empty() {
            return Err(VeracityError::invalid_input(
                "cannot fit a vectorizer on an empty corpus",
            ));
        }

        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|doc| self.extract_terms(doc.as_ref()))
            .collect();

        let mut term_counts: AHashMap<&str, usize> = AHashMap::new();
        let mut doc_counts: AHashMap<&str, usize> = AHashMap::new();
        for terms in &documents {
            let mut seen: AHashSet<&str> = AHashSet::with_capacity(terms.len());
            for term in terms {
                *term_counts.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_counts.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        if term_counts.is_empty() {
            return Err(VeracityError::invalid_input(
                "corpus contains no terms to build a vocabulary from",
            ));
        }

        // Most frequent first, ties in lexicographic order.
        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.config.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term.to_string()).collect();
        terms.sort();

        let n_documents = corpus.len();
        let document_frequency: Vec<usize> = terms
            .iter()
            .map(|term| doc_counts.get(term.as_str()).copied().unwrap_or(0))
            .collect();
        let idf = document_frequency
            .iter()
            .map(|&df| self.inverse_document_frequency(n_documents, df))
            .collect();
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        let fitted = FittedVocabulary {
            vocabulary,
            terms,
            document_frequency,
            idf,
            n_documents,
        };

        let vectors = documents
            .iter()
            .map(|terms| self.weigh(&fitted, terms))
            .collect();

        debug!(
            "Fitted TF-IDF vocabulary: {} terms from {} documents",
            fitted.len(),
            n_documents
        );
        self.fitted = Some(fitted);

        Ok(vectors)
    }

    /// Map a text onto the fitted vocabulary.
    pub fn transform(&self, text: &str) -> Result<FeatureVector> {
        let fitted = self.fitted.as_ref().ok_or_else(|| {
            VeracityError::not_ready("vectorizer must be fitted before transform")
        })?;
        Ok(self.weigh(fitted, &self.extract_terms(text)))
    }

    /// Map several texts onto the fitted vocabulary.
    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<FeatureVector>> {
        texts.iter().map(|text| self.transform(text.as_ref())).collect()
    }

    /// Split a normalized text into the n-gram terms used as features.
    pub fn extract_terms(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = self.tokenizer.tokenize(text).map(|t| t.text).collect();
        let (min_n, max_n) = self.config.ngram_range;

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    fn inverse_document_frequency(&self, n_documents: usize, df: usize) -> f64 {
        let (n, df) = (n_documents as f64, df as f64);
        if self.config.smooth_idf {
            ((n + 1.0) / (df + 1.0)).ln() + 1.0
        } else {
            (n / df).ln() + 1.0
        }
    }

    fn weigh(&self, fitted: &FittedVocabulary, terms: &[String]) -> FeatureVector {
        let mut vector = FeatureVector::zeros(fitted.len());
        let values = vector.values_mut();

        for term in terms {
            if let Some(idx) = fitted.index_of(term) {
                values[idx] += 1.0;
            }
        }

        for (idx, value) in values.iter_mut().enumerate() {
            if *value > 0.0 {
                let tf = if self.config.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * fitted.idf[idx];
            }
        }

        let norm = match self.config.norm {
            Norm::L2 => values.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::L1 => values.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 && norm != 1.0 {
            for value in values.iter_mut() {
                *value /= norm;
            }
        }

        vector
    }
}
