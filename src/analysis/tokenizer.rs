//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of the analysis pipeline: they split input
//! text into tokens that filters then rewrite or drop.
//!
//! # Available Tokenizers
//!
//! - [`regex::RegexTokenizer`] - Extracts regex matches (letters-only by default)
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace runs
//!
//! # Examples
//!
//! ```
//! use veracity::analysis::tokenizer::Tokenizer;
//! use veracity::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("great amaz love").collect();
//! assert_eq!(tokens.len(), 3);
//! ```

use crate::analysis::token::TokenStream;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> TokenStream;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod whitespace;

pub use self::regex::RegexTokenizer;
pub use whitespace::WhitespaceTokenizer;
