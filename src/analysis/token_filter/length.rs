//! Length filter implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;

/// A filter that removes tokens shorter than a minimum length.
///
/// Length is measured in characters.
#[derive(Clone, Debug)]
pub struct LengthFilter {
    min_length: usize,
}

impl LengthFilter {
    /// Create a new length filter keeping tokens of at least `min_length` characters.
    pub fn new(min_length: usize) -> Self {
        LengthFilter { min_length }
    }

    /// Get the minimum token length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Check whether a word is long enough to be kept.
    pub fn accepts(&self, word: &str) -> bool {
        word.chars().count() >= self.min_length
    }
}

impl Filter for LengthFilter {
    fn filter(&self, tokens: TokenStream) -> TokenStream {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| self.accepts(&token.text))
            .collect();

        Box::new(filtered_tokens.into_iter())
    }

    fn name(&self) -> &'static str {
        "length"
    }
}
