//! Easel Syntax - the built-in code-block tokenizer.
//!
//! Code blocks are colored from a token tree produced by a
//! [`Tokenizer`](easel_core::syntax::Tokenizer). This crate provides
//! [`SyntaxTokenizer`], a small lexer for a handful of common languages. It
//! recognizes keywords, literals, comments and interpolated strings; it is not
//! a full highlighter.
//!
//! # Example
//!
//! ```
//! use easel_core::syntax::Tokenizer;
//! use easel_syntax::SyntaxTokenizer;
//!
//! let tokens = SyntaxTokenizer::new().tokenize("let x = 1;", "rust");
//! assert!(!tokens.is_empty());
//! ```

pub mod error;
pub mod grammar;
pub mod lexer;

pub use error::TokenizeError;
pub use grammar::Grammar;

use log::{debug, trace};

use easel_core::syntax::{PlainTokenizer, TokenNode, Tokenizer};

/// Tokenizer backed by the built-in [`Grammar`] tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxTokenizer;

impl SyntaxTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenizes `source` with the grammar named `language`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::UnknownLanguage`] when no grammar matches, or
    /// [`TokenizeError::NestingTooDeep`] for pathological interpolations.
    pub fn try_tokenize(&self, source: &str, language: &str) -> Result<Vec<TokenNode>, TokenizeError> {
        let grammar = Grammar::for_language(language)
            .ok_or_else(|| TokenizeError::UnknownLanguage(language.to_string()))?;
        let nodes = lexer::tokenize(source, grammar)?;
        trace!(language = grammar.name, nodes = nodes.len(); "Tokenized source");
        Ok(nodes)
    }
}

impl Tokenizer for SyntaxTokenizer {
    fn tokenize(&self, source: &str, language: &str) -> Vec<TokenNode> {
        match self.try_tokenize(source, language) {
            Ok(nodes) => nodes,
            Err(err) => {
                debug!(language = language, err:err; "Falling back to plain text");
                PlainTokenizer.tokenize(source, language)
            }
        }
    }
}
