//! Error types for the built-in tokenizer.

use thiserror::Error;

/// Failures reported by [`SyntaxTokenizer::try_tokenize`].
///
/// [`SyntaxTokenizer::try_tokenize`]: crate::SyntaxTokenizer::try_tokenize
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("no grammar registered for language `{0}`")]
    UnknownLanguage(String),

    #[error("template nesting exceeds {limit} levels at byte {offset}")]
    NestingTooDeep { limit: usize, offset: usize },
}
