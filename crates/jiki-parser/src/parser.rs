//! Core parser infrastructure: token cursor, error construction, helpers.
//!
//! [`Parser`] is generic over a language's token kind; each front-end adds
//! its grammar in its own module with an `impl Parser<'_, TokenKind>` block.

use jiki_lexer::token::{Token, TokenKindExt};
use jiki_types::{LanguageFeatures, Span, SyntaxError, SyntaxErrorType};

/// Deepest combined nesting of statements and sub-expressions a program
/// may reach. Every bracket pair costs about two levels.
pub const MAX_NESTING_DEPTH: u32 = 200;

/// A recursive-descent parser over one token stream.
///
/// The first grammar violation is returned as a [`SyntaxError`]; there is
/// no recovery.
pub struct Parser<'f, K: TokenKindExt> {
    /// The token stream, always terminated by an end-of-input token.
    tokens: Vec<Token<K>>,
    /// Current index into `tokens`.
    pos: usize,
    /// Returned by lookahead past the end.
    eof: Token<K>,
    /// Per-run configuration (node allow-list, semicolon rules).
    pub(crate) features: &'f LanguageFeatures,
    /// Nesting depth of blocks; function declarations are only valid at 0.
    pub(crate) block_depth: u32,
    /// Current recursion depth of the grammar functions.
    nesting: u32,
}

impl<'f, K: TokenKindExt> Parser<'f, K> {
    /// Create a parser, appending an end-of-input token if missing.
    pub fn new(mut tokens: Vec<Token<K>>, features: &'f LanguageFeatures) -> Self {
        let eof_span = tokens.last().map(|t| t.span).unwrap_or_default();
        let eof = Token::new(K::eof(), "", eof_span);
        if !tokens.last().is_some_and(|t| t.kind.is_eof()) {
            tokens.push(eof.clone());
        }
        Self {
            tokens,
            pos: 0,
            eof,
            features,
            block_depth: 0,
            nesting: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token<K> {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &K {
        &self.peek().kind
    }

    /// Look ahead by `n` tokens from the current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &K {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&self.eof.kind)
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token<K> {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// The most recently consumed token.
    pub(crate) fn previous(&self) -> &Token<K> {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens.get(i).unwrap_or(&self.eof),
            None => &self.eof,
        }
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.previous().span
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek_kind().is_eof()
    }

    /// Check if the current token matches `kind` exactly.
    pub(crate) fn check(&self, kind: &K) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &K) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail with `error_type` at the current token.
    pub(crate) fn expect(&mut self, kind: &K, error_type: SyntaxErrorType) -> Result<Token<K>, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(error_type))
        }
    }

    /// Save the cursor position for backtracking.
    pub(crate) fn checkpoint(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    /// Run one level of recursive grammar, refusing to go past
    /// [`MAX_NESTING_DEPTH`].
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(self
                .error_at_current(SyntaxErrorType::NestingTooDeep)
                .with("max", MAX_NESTING_DEPTH.to_string()));
        }
        self.nesting += 1;
        let result = grow_stack(|| parse(self));
        self.nesting -= 1;
        result
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build an error at the current token.
    pub(crate) fn error_at_current(&self, error_type: SyntaxErrorType) -> SyntaxError {
        SyntaxError::new(error_type, self.current_span())
    }

    /// Build an error at the current token naming its lexeme.
    pub(crate) fn unexpected_token(&self, error_type: SyntaxErrorType) -> SyntaxError {
        self.error_at_current(error_type)
            .with("lexeme", self.peek().lexeme.clone())
    }

    /// Reject a node kind missing from `allowedNodes`.
    pub(crate) fn check_node_allowed(
        &self,
        node_type: &str,
        friendly_name: &str,
        span: Span,
    ) -> Result<(), SyntaxError> {
        if self.features.is_node_allowed(node_type) {
            return Ok(());
        }
        tracing::debug!(target: "jiki::parser", node_type, "node not allowed");
        Err(SyntaxError::new(SyntaxErrorType::NodeNotAllowed, span)
            .with("nodeType", node_type)
            .with("friendlyName", friendly_name))
    }
}

/// Move onto a fresh stack segment when little of the current one is left.
#[cfg(not(target_arch = "wasm32"))]
fn grow_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(64 * 1024, 1024 * 1024, f)
}

#[cfg(target_arch = "wasm32")]
fn grow_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
