//! Rule-driven suffix stemmer.

use ahash::AHashMap;

use super::{Stemmer, SuffixRule};

/// Default minimum length a stem must keep after a rule fires.
pub const DEFAULT_MIN_STEM_LENGTH: usize = 3;

/// The default rule list: strip `ing`, then `ed`, then `s`.
pub fn default_suffix_rules() -> Vec<SuffixRule> {
    vec![
        SuffixRule::strip("ing"),
        SuffixRule::strip("ed"),
        SuffixRule::strip("s"),
    ]
}

/// Stemmer that applies an ordered list of [`SuffixRule`]s.
///
/// Each rule is tried at most once, in list order. A rule only fires when the
/// resulting stem is shorter than the word, at least `min_stem_length`
/// characters long and left unchanged by the stemmer itself. Every result is
/// therefore a fixed point: stemming an already stemmed word is a no-op.
///
/// The fixed-point check means a word keeps its suffix when the stripped form
/// would be stemmed further, e.g. `breeding` stays whole because `breed`
/// would lose its `ed`.
#[derive(Debug, Clone)]
pub struct SuffixStemmer {
    rules: Vec<SuffixRule>,
    min_stem_length: usize,
}

impl SuffixStemmer {
    /// Create a stemmer with the default rules.
    pub fn new() -> Self {
        Self::with_rules(default_suffix_rules(), DEFAULT_MIN_STEM_LENGTH)
    }

    /// Create a stemmer with custom rules.
    pub fn with_rules(rules: Vec<SuffixRule>, min_stem_length: usize) -> Self {
        SuffixStemmer {
            rules,
            min_stem_length,
        }
    }

    /// Get the configured rules.
    pub fn rules(&self) -> &[SuffixRule] {
        &self.rules
    }

    fn stem_memoized(&self, word: &str, memo: &mut AHashMap<String, String>) -> String {
        if let Some(stem) = memo.get(word) {
            return stem.clone();
        }

        let mut current = word.to_string();
        for rule in &self.rules {
            let Some(base) = current.strip_suffix(rule.suffix.as_str()) else {
                continue;
            };
            let candidate = format!("{base}{}", rule.replacement);

            if candidate.len() < current.len()
                && candidate.chars().count() >= self.min_stem_length
                && self.stem_memoized(&candidate, memo) == candidate
            {
                current = candidate;
            }
        }

        memo.insert(word.to_string(), current.clone());
        current
    }
}

impl Default for SuffixStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        self.stem_memoized(word, &mut AHashMap::new())
    }

    fn name(&self) -> &'static str {
        "suffix"
    }
}
