//! Token filter implementations for token transformation.
//!
//! Filters transform token streams produced by tokenizers. The review
//! normalizer chains them as stop words → length → stemming → stop words →
//! length.
//!
//! # Available Filters
//!
//! - [`stop::StopFilter`] - Removes stop words
//! - [`length::LengthFilter`] - Removes tokens shorter than a minimum length
//! - [`stem::StemFilter`] - Reduces words to their stem form
//!
//! # Examples
//!
//! ```
//! use veracity::analysis::token_filter::Filter;
//! use veracity::analysis::token_filter::length::LengthFilter;
//! use veracity::analysis::token::Token;
//!
//! let filter = LengthFilter::new(3);
//! let tokens = vec![Token::new("ok", 0), Token::new("great", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .collect();
//!
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].text, "great");
//! ```

use crate::analysis::token::TokenStream;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> TokenStream;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod length;
pub mod stem;
pub mod stop;

pub use length::LengthFilter;
pub use stem::{StemFilter, Stemmer, SuffixRule, SuffixStemmer};
pub use stop::StopFilter;
