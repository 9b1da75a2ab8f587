//! Review text normalization.
//!
//! [`TextNormalizer`] turns raw review text into a cleaned token string:
//!
//! 1. lowercase the text;
//! 2. treat every character outside `a-z` as a separator;
//! 3. drop stop words and tokens shorter than `min_token_length`;
//! 4. strip suffixes with the configured [`SuffixRule`]s;
//! 5. drop tokens that became stop words or too short;
//! 6. join the survivors with single spaces.
//!
//! The lexical resources (stop words, suffix rules, length limits) are plain
//! data in [`NormalizerConfig`], so they can be loaded from a JSON file.
//!
//! # Examples
//!
//! ```
//! use veracity::analysis::normalizer::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new();
//! assert_eq!(normalizer.normalize("This IS a Test!!!"), "test");
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::length::LengthFilter;
use crate::analysis::token_filter::stem::suffix::{DEFAULT_MIN_STEM_LENGTH, default_suffix_rules};
use crate::analysis::token_filter::stem::{StemFilter, SuffixRule, SuffixStemmer};
use crate::analysis::token_filter::stop::{DEFAULT_ENGLISH_STOP_WORDS, StopFilter};
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::{Result, VeracityError};

/// Default minimum token length; shorter tokens are dropped.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

/// Lexical resources used by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Words removed from the token stream.
    pub stop_words: Vec<String>,
    /// Tokens with fewer characters than this are removed.
    pub min_token_length: usize,
    /// Suffix rules, tried in order, each at most once per token.
    pub suffix_rules: Vec<SuffixRule>,
    /// Minimum length of a stem for a suffix rule to fire.
    pub min_stem_length: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            stop_words: DEFAULT_ENGLISH_STOP_WORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            suffix_rules: default_suffix_rules(),
            min_stem_length: DEFAULT_MIN_STEM_LENGTH,
        }
    }
}

impl NormalizerConfig {
    /// Check the configuration for values the normalizer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if let Some(rule) = self.suffix_rules.iter().find(|rule| rule.suffix.is_empty()) {
            return Err(VeracityError::invalid_config(format!(
                "suffix rule with replacement {:?} has an empty suffix",
                rule.replacement
            )));
        }
        Ok(())
    }
}

/// Maps raw review text to its normalized form.
///
/// Stateless apart from its configuration; `normalize` never fails and is
/// safe to call from many threads at once.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    config: NormalizerConfig,
    analyzer: PipelineAnalyzer,
}

impl TextNormalizer {
    /// Create a normalizer with the default configuration.
    pub fn new() -> Self {
        Self::build(NormalizerConfig::default())
    }

    /// Create a normalizer from a configuration.
    pub fn with_config(config: NormalizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: NormalizerConfig) -> Self {
        let stop_filter = Arc::new(StopFilter::from_words(config.stop_words.iter().cloned()));
        let length_filter = Arc::new(LengthFilter::new(config.min_token_length));
        let stem_filter = Arc::new(StemFilter::with_stemmer(Box::new(
            SuffixStemmer::with_rules(config.suffix_rules.clone(), config.min_stem_length),
        )));

        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::default()))
            .add_filter(stop_filter.clone())
            .add_filter(length_filter.clone())
            .add_filter(stem_filter)
            .add_filter(stop_filter)
            .add_filter(length_filter)
            .with_name("review_normalizer");

        TextNormalizer { config, analyzer }
    }

    /// Get the configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize the given text. Empty input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        self.analyzer
            .analyze(&lowered)
            .map(|token| token.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalize an optional text, treating `None` as empty.
    pub fn normalize_opt(&self, text: Option<&str>) -> String {
        text.map(|t| self.normalize(t)).unwrap_or_default()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize `text` with the default configuration.
pub fn normalize(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_drops_stop_words_and_punctuation() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("This IS a Test!!!"), "test");
    }

    #[test]
    fn test_normalize_review() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("Great, AMAZING product -- I loved it! 10/10"),
            "great amaz product lov"
        );
        assert_eq!(
            normalizer.normalize("buy now fake spam free money"),
            "buy fake spam free money"
        );
    }

    #[test]
    fn test_empty_and_absent_input() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("!!! 123 ..."), "");
        assert_eq!(normalizer.normalize_opt(None), "");
        assert_eq!(normalizer.normalize_opt(Some("Tests")), "test");
    }

    #[test]
    fn test_unusual_input_yields_text() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("\0\u{7}\u{1F600} \u{FFFD}"), "");
        assert_eq!(normalizer.normalize("Ünïcödé ARE split"), "split");

        let long = "refunded ".repeat(10_000);
        let normalized = normalizer.normalize(&long);
        assert_eq!(normalized.split(' ').count(), 10_000);
        assert!(normalized.split(' ').all(|word| word == "refund"));
    }

    #[test]
    fn test_stem_turned_stop_word_is_dropped() {
        // "onces" stems to "once", which is a stop word
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("onces recommended"), "recommend");
    }

    #[test]
    fn test_custom_config() {
        let config = NormalizerConfig {
            stop_words: vec!["product".to_string()],
            min_token_length: 2,
            suffix_rules: vec![SuffixRule::replace("ies", "y")],
            min_stem_length: 2,
        };
        let normalizer = TextNormalizer::with_config(config).unwrap();

        assert_eq!(
            normalizer.normalize("The product has great reviews and stories"),
            "the has great reviews and story"
        );
    }

    #[test]
    fn test_config_rejects_empty_suffix() {
        let config = NormalizerConfig {
            suffix_rules: vec![SuffixRule::strip("")],
            ..NormalizerConfig::default()
        };
        let err = TextNormalizer::with_config(config).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_config_json_defaults() {
        let config: NormalizerConfig =
            serde_json::from_str(r#"{"min_token_length": 4}"#).unwrap();
        assert_eq!(config.min_token_length, 4);
        assert_eq!(config.suffix_rules, default_suffix_rules());
        assert_eq!(config.stop_words.len(), DEFAULT_ENGLISH_STOP_WORDS.len());
    }

    #[test]
    fn test_idempotent_on_tricky_words() {
        let normalizer = TextNormalizer::new();
        for text in [
            "things seeds needed stringed singings feeding",
            "ONCES ours hers Ringing rings",
            "café naïve Ωmega KELVIN\u{212A}s",
        ] {
            let once = normalizer.normalize(text);
            assert_eq!(normalizer.normalize(&once), once, "not idempotent for {text:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(text in "\\PC{0,80}") {
            let normalizer = TextNormalizer::new();
            let once = normalizer.normalize(&text);
            prop_assert_eq!(normalizer.normalize(&once), once);
        }

        #[test]
        fn prop_normalize_is_idempotent_on_words(text in "[a-zA-Z ,.!]{0,120}") {
            let normalizer = TextNormalizer::new();
            let once = normalizer.normalize(&text);
            prop_assert_eq!(normalizer.normalize(&once), once);
        }
    }
}
