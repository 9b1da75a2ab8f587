//! Text analysis for review normalization.
//!
//! Tokenizers split text into tokens, filters rewrite or drop them, analyzers
//! chain the two, and [`normalizer::TextNormalizer`] assembles the review
//! cleaning pipeline from a [`normalizer::NormalizerConfig`].

pub mod analyzer;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
