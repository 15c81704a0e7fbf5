//! JikiScript scanner.
//!
//! - `//` line comments
//! - Newlines are significant and collapse into a single [`TokenKind::Eol`]
//! - Double-quoted strings only
//! - Strict number literals: no leading zero, no trailing `.`, one `.` at most

use jiki_types::{SyntaxError, SyntaxErrorType};
use std::fmt;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKindExt};

pub type JikiToken = Token<TokenKind>;

/// Every token kind in JikiScript.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──
    Number(f64),
    String(String),
    Identifier(String),
    True,
    False,

    // ── Keywords ──
    Set,
    To,
    Change,
    Log,
    Function,
    With,
    Do,
    End,
    Return,
    If,
    Else,
    Repeat,
    Times,
    RepeatForever,
    For,
    Each,
    In,
    Indexed,
    By,
    Break,
    Continue,
    Next,
    And,
    Or,
    Not,
    Is,
    Equals,

    // ── Punctuation & operators ──
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // ── Structure ──
    Eol,
    Eof,
}

/// Keyword spellings, used both for scanning and for miscapitalization hints.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("set", TokenKind::Set),
    ("to", TokenKind::To),
    ("change", TokenKind::Change),
    ("log", TokenKind::Log),
    ("function", TokenKind::Function),
    ("with", TokenKind::With),
    ("do", TokenKind::Do),
    ("end", TokenKind::End),
    ("return", TokenKind::Return),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("repeat", TokenKind::Repeat),
    ("times", TokenKind::Times),
    ("repeat_forever", TokenKind::RepeatForever),
    ("for", TokenKind::For),
    ("each", TokenKind::Each),
    ("in", TokenKind::In),
    ("indexed", TokenKind::Indexed),
    ("by", TokenKind::By),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("next", TokenKind::Next),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
    ("is", TokenKind::Is),
    ("equals", TokenKind::Equals),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
];

impl TokenKind {
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == ident)
            .map(|(_, kind)| kind.clone())
    }

    pub fn is_keyword(&self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| kind == self)
    }
}

impl TokenKindExt for TokenKind {
    fn eof() -> Self {
        TokenKind::Eof
    }

    fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((word, _)) = KEYWORDS.iter().find(|(_, kind)| kind == self) {
            return f.write_str(word);
        }
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::LeftParen => f.write_str("("),
            TokenKind::RightParen => f.write_str(")"),
            TokenKind::LeftBracket => f.write_str("["),
            TokenKind::RightBracket => f.write_str("]"),
            TokenKind::LeftBrace => f.write_str("{"),
            TokenKind::RightBrace => f.write_str("}"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Bang => f.write_str("!"),
            TokenKind::BangEqual => f.write_str("!="),
            TokenKind::Equal => f.write_str("="),
            TokenKind::EqualEqual => f.write_str("=="),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::GreaterEqual => f.write_str(">="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::LessEqual => f.write_str("<="),
            TokenKind::Eol => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of file"),
            _ => write!(f, "{self:?}"),
        }
    }
}

/// Scan JikiScript source into tokens ending with [`TokenKind::Eof`].
pub fn scan(source: &str) -> Result<Vec<JikiToken>, SyntaxError> {
    let tokens = Scanner::new(source).scan()?;
    tracing::debug!(target: "jiki::lexer", language = "jikiscript", tokens = tokens.len(), "scanned");
    Ok(tokens)
}

struct Scanner<'src> {
    cursor: Cursor<'src>,
    tokens: Vec<JikiToken>,
}

impl<'src> Scanner<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
        }
    }

    fn scan(mut self) -> Result<Vec<JikiToken>, SyntaxError> {
        loop {
            self.skip_whitespace_and_comments();
            let start = self.cursor.mark();
            let Some(ch) = self.cursor.peek() else { break };

            if ch == b'\n' {
                self.cursor.advance();
                self.push_eol(start);
                continue;
            }
            if ch.is_ascii_digit() {
                self.scan_number()?;
                continue;
            }
            if ch.is_ascii_alphabetic() || ch == b'_' {
                self.scan_identifier();
                continue;
            }
            if ch == b'"' {
                self.scan_string()?;
                continue;
            }
            self.scan_symbol()?;
        }

        let end = self.cursor.mark();
        if !matches!(self.tokens.last().map(|t| &t.kind), Some(TokenKind::Eol) | None) {
            self.tokens
                .push(Token::new(TokenKind::Eol, "", self.cursor.span_from(end)));
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, "", self.cursor.here()));
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, start: crate::cursor::Mark) {
        let lexeme = self.cursor.slice_from(start).to_string();
        let span = self.cursor.span_from(start);
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    /// Consecutive newlines (and leading ones) collapse into nothing.
    fn push_eol(&mut self, start: crate::cursor::Mark) {
        if matches!(self.tokens.last().map(|t| &t.kind), Some(TokenKind::Eol) | None) {
            return;
        }
        self.push(TokenKind::Eol, start);
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(b' ' | b'\t' | b'\r') => {
                    self.cursor.advance();
                }
                Some(b'/') if self.cursor.peek_at(1) == Some(b'/') => {
                    self.cursor.eat_while(|b| b != b'\n');
                }
                _ => break,
            }
        }
    }

    fn scan_number(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        let leading_zero = self.cursor.peek() == Some(b'0');
        self.cursor.eat_while(|b| b.is_ascii_digit());
        let int_len = self.cursor.slice_from(start).len();

        if leading_zero && int_len > 1 {
            return Err(SyntaxError::new(
                SyntaxErrorType::MalformedNumberStartingWithZero,
                self.cursor.span_from(start),
            ));
        }

        if self.cursor.peek() == Some(b'.') {
            if !self.cursor.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                self.cursor.advance();
                return Err(SyntaxError::new(
                    SyntaxErrorType::MalformedNumberEndingWithDecimalPoint,
                    self.cursor.span_from(start),
                ));
            }
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit());
            if self.cursor.peek() == Some(b'.') {
                self.cursor.advance();
                self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'.');
                return Err(SyntaxError::new(
                    SyntaxErrorType::MalformedNumberWithMultipleDecimalPoints,
                    self.cursor.span_from(start),
                ));
            }
        }

        if self.cursor.peek().is_some_and(|b| b.is_ascii_alphabetic() || b == b'_') {
            self.cursor.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
            return Err(SyntaxError::new(
                SyntaxErrorType::MalformedNumberContainingAlphabetCharacters,
                self.cursor.span_from(start),
            ));
        }

        let text = self.cursor.slice_from(start);
        let value = text.parse::<f64>().unwrap_or(0.0);
        self.push(TokenKind::Number(value), start);
        Ok(())
    }

    fn scan_identifier(&mut self) {
        let start = self.cursor.mark();
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let text = self.cursor.slice_from(start);
        let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        self.push(kind, start);
    }

    fn scan_string(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        self.cursor.advance();
        match self.cursor.read_quoted(b'"') {
            Some(value) => {
                self.push(TokenKind::String(value), start);
                Ok(())
            }
            None => Err(SyntaxError::new(
                SyntaxErrorType::MissingDoubleQuoteToTerminateStringLiteral,
                self.cursor.span_from(start),
            )),
        }
    }

    fn scan_symbol(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        let Some(ch) = self.cursor.peek_char() else {
            return Ok(());
        };
        self.cursor.advance_char();
        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' if self.cursor.eat(b'=') => TokenKind::BangEqual,
            '!' => TokenKind::Bang,
            '=' if self.cursor.eat(b'=') => TokenKind::EqualEqual,
            '=' => TokenKind::Equal,
            '>' if self.cursor.eat(b'=') => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            '<' if self.cursor.eat(b'=') => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            other => {
                return Err(self.cursor.unknown_character(
                    SyntaxErrorType::UnknownCharacterInSource,
                    other,
                    self.cursor.span_from(start),
                ))
            }
        };
        self.push(kind, start);
        Ok(())
    }
}
