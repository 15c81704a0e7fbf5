//! The token shape shared by every scanner.
//!
//! Each language defines its own `TokenKind`; literal payloads (numbers,
//! strings) live inside the kind. [`Token`] pairs a kind with the exact
//! source text and [`Span`] it was scanned from.

use jiki_types::Span;
use std::fmt;

/// A single token produced by a scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    /// What kind of token this is.
    pub kind: K,
    /// The source text of the token.
    pub lexeme: String,
    /// Source location.
    pub span: Span,
}

impl<K> Token<K> {
    /// Create a new token.
    pub fn new(kind: K, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

impl<K: fmt::Display> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.lexeme, self.span)
    }
}

/// Token kinds every parser needs to recognise generically.
pub trait TokenKindExt: Clone + PartialEq + fmt::Debug {
    /// The end-of-input marker.
    fn eof() -> Self;
    fn is_eof(&self) -> bool;
}
