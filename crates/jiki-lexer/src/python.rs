//! Restricted Python scanner.
//!
//! Features:
//! - `#` comments
//! - Indentation in steps of four spaces, producing one [`TokenKind::Indent`]
//!   or [`TokenKind::Dedent`] per step; tabs and other widths are errors
//! - Logical lines end with [`TokenKind::Newline`]; newlines inside
//!   brackets are ignored; blank lines produce nothing
//! - Single/double-quoted strings and f-strings (`f"..{expr}.."`)

use jiki_types::{SyntaxError, SyntaxErrorType};
use std::fmt;

use crate::cursor::{Cursor, Mark};
use crate::token::{Token, TokenKindExt};

pub type PyToken = Token<TokenKind>;

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Rejected with `PermanentlyExcludedToken`.
pub const EXCLUDED_WORDS: &[&str] = &[
    "global", "nonlocal", "lambda", "del", "yield", "async", "await",
];

/// Rejected with `UnimplementedToken`.
pub const UNIMPLEMENTED_WORDS: &[&str] = &[
    "class", "import", "from", "as", "try", "except", "finally", "raise", "with", "assert", "is",
];

/// A piece of an f-string.
#[derive(Debug, Clone, PartialEq)]
pub enum FStringChunk {
    Text(String),
    /// Tokens of one `{...}` replacement field, ending with `Eof`.
    Interpolation(Vec<PyToken>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──
    Number(f64),
    String(String),
    FString(Vec<FStringChunk>),
    Identifier(String),
    True,
    False,
    None,

    // ── Keywords ──
    Def,
    Return,
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Not,
    And,
    Or,
    Break,
    Continue,
    Pass,

    // ── Punctuation ──
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Colon,

    // ── Operators ──
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,

    // ── Layout ──
    Newline,
    Indent,
    Dedent,
    Eof,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("def", TokenKind::Def),
    ("return", TokenKind::Return),
    ("if", TokenKind::If),
    ("elif", TokenKind::Elif),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("for", TokenKind::For),
    ("in", TokenKind::In),
    ("not", TokenKind::Not),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("pass", TokenKind::Pass),
    ("True", TokenKind::True),
    ("False", TokenKind::False),
    ("None", TokenKind::None),
];

impl TokenKind {
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == ident)
            .map(|(_, kind)| kind.clone())
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
        let text = match self {
            TokenKind::Number(n) => return write!(f, "{n}"),
            TokenKind::String(s) => return write!(f, "'{s}'"),
            TokenKind::FString(_) => "f-string",
            TokenKind::Identifier(name) => return f.write_str(name),
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::SlashSlash => "//",
            TokenKind::Percent => "%",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Eof => "end of file",
            _ => return write!(f, "{self:?}"),
        };
        f.write_str(text)
    }
}

/// Scan Python source into tokens ending with [`TokenKind::Eof`].
pub fn scan(source: &str) -> Result<Vec<PyToken>, SyntaxError> {
    let mut cursor = Cursor::new(source);
    let tokens = Scanner::new(&mut cursor).scan_until(None)?;
    tracing::debug!(target: "jiki::lexer", language = "python", tokens = tokens.len(), "scanned");
    Ok(tokens)
}

struct Scanner<'c, 'src> {
    cursor: &'c mut Cursor<'src>,
    tokens: Vec<PyToken>,
    /// Current indentation in levels (not spaces).
    indent_level: usize,
    /// Open bracket depth; newlines inside brackets are ignored.
    depth: u32,
    at_line_start: bool,
}

impl<'c, 'src> Scanner<'c, 'src> {
    fn new(cursor: &'c mut Cursor<'src>) -> Self {
        Self {
            cursor,
            tokens: Vec::new(),
            indent_level: 0,
            depth: 0,
            at_line_start: true,
        }
    }

    /// Scan to end of input, or, inside an f-string replacement field,
    /// to the `}` that closes it.
    fn scan_until(mut self, field_open: Option<Mark>) -> Result<Vec<PyToken>, SyntaxError> {
        let in_field = field_open.is_some();
        loop {
            if self.at_line_start && !in_field {
                self.at_line_start = false;
                if self.handle_indentation()? {
                    continue;
                }
            }
            self.skip_inline_whitespace_and_comments();

            let start = self.cursor.mark();
            let Some(ch) = self.cursor.peek() else {
                if let Some(open) = field_open {
                    return Err(SyntaxError::new(
                        SyntaxErrorType::MissingRightBraceInFString,
                        self.cursor.span_from(open),
                    ));
                }
                break;
            };

            match ch {
                b'\n' => {
                    if let Some(open) = field_open {
                        return Err(SyntaxError::new(
                            SyntaxErrorType::MissingRightBraceInFString,
                            self.cursor.span_from(open),
                        ));
                    }
                    self.cursor.advance();
                    if self.depth == 0 {
                        self.push_newline(start);
                        self.at_line_start = true;
                    }
                }
                b'0'..=b'9' => self.scan_number()?,
                b'f' | b'F' if matches!(self.cursor.peek_at(1), Some(b'"' | b'\'')) => {
                    self.scan_fstring()?
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier()?,
                b'"' | b'\'' => self.scan_string(ch)?,
                b'}' if in_field && self.depth == 0 => {
                    self.cursor.advance();
                    break;
                }
                _ => self.scan_symbol()?,
            }
        }

        if !in_field {
            let here = self.cursor.mark();
            self.push_newline(here);
            for _ in 0..self.indent_level {
                self.tokens
                    .push(Token::new(TokenKind::Dedent, "", self.cursor.here()));
            }
            self.indent_level = 0;
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, "", self.cursor.here()));
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, start: Mark) {
        let lexeme = self.cursor.slice_from(start).to_string();
        let span = self.cursor.span_from(start);
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn push_newline(&mut self, start: Mark) {
        let needed = matches!(
            self.tokens.last().map(|t| &t.kind),
            Some(kind) if !matches!(kind, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
        );
        if needed {
            self.push(TokenKind::Newline, start);
        }
    }

    /// Measure the indentation of a new line. Returns `true` when the line
    /// is blank or comment-only and was skipped entirely.
    fn handle_indentation(&mut self) -> Result<bool, SyntaxError> {
        let start = self.cursor.mark();
        let mut spaces = 0usize;
        loop {
            match self.cursor.peek() {
                Some(b' ') => {
                    spaces += 1;
                    self.cursor.advance();
                }
                Some(b'\t') => {
                    self.cursor.advance();
                    return Err(SyntaxError::new(
                        SyntaxErrorType::IndentationError,
                        self.cursor.span_from(start),
                    )
                    .with("details", "tabs are not allowed"));
                }
                _ => break,
            }
        }

        match self.cursor.peek() {
            None => return Ok(true),
            Some(b'#') => {
                self.cursor.eat_while(|b| b != b'\n');
                self.cursor.eat(b'\n');
                self.at_line_start = true;
                return Ok(true);
            }
            Some(b'\r') if self.cursor.peek_at(1) == Some(b'\n') => {
                self.cursor.advance();
                self.cursor.advance();
                self.at_line_start = true;
                return Ok(true);
            }
            Some(b'\n') => {
                self.cursor.advance();
                self.at_line_start = true;
                return Ok(true);
            }
            Some(_) => {}
        }

        if spaces % INDENT_WIDTH != 0 {
            return Err(SyntaxError::new(
                SyntaxErrorType::IndentationError,
                self.cursor.span_from(start),
            )
            .with("details", format!("{spaces} spaces is not a multiple of {INDENT_WIDTH}")));
        }

        let level = spaces / INDENT_WIDTH;
        let kind = if level > self.indent_level {
            TokenKind::Indent
        } else {
            TokenKind::Dedent
        };
        for _ in 0..level.abs_diff(self.indent_level) {
            self.tokens
                .push(Token::new(kind.clone(), "", self.cursor.here()));
        }
        self.indent_level = level;
        Ok(false)
    }

    fn skip_inline_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(b' ' | b'\t' | b'\r') => {
                    self.cursor.advance();
                }
                Some(b'\\') if self.cursor.peek_at(1) == Some(b'\n') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(b'#') => self.cursor.eat_while(|b| b != b'\n'),
                _ => return,
            }
        }
    }

    fn scan_number(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
        if self.cursor.peek() == Some(b'.') && self.cursor.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
        }
        if matches!(self.cursor.peek(), Some(b'e' | b'E')) {
            let signed = matches!(self.cursor.peek_at(1), Some(b'+' | b'-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.cursor.peek_at(digit_at).is_some_and(|b| b.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
            }
        }
        let trailing_letters = self.cursor.peek().is_some_and(|b| b.is_ascii_alphabetic());
        if trailing_letters {
            self.cursor.eat_while(|b| b.is_ascii_alphanumeric());
        }
        let text: String = self.cursor.slice_from(start).chars().filter(|c| *c != '_').collect();
        match text.parse::<f64>() {
            Ok(value) if !trailing_letters => {
                self.push(TokenKind::Number(value), start);
                Ok(())
            }
            _ => Err(SyntaxError::new(SyntaxErrorType::UnknownCharacter, self.cursor.span_from(start))
                .with("character", self.cursor.slice_from(start))),
        }
    }

    fn scan_identifier(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let text = self.cursor.slice_from(start);
        let span = self.cursor.span_from(start);

        if EXCLUDED_WORDS.contains(&text) {
            return Err(SyntaxError::new(SyntaxErrorType::PermanentlyExcludedToken, span)
                .with("lexeme", text));
        }
        if UNIMPLEMENTED_WORDS.contains(&text) {
            return Err(SyntaxError::new(SyntaxErrorType::UnimplementedToken, span)
                .with("lexeme", text));
        }
        let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        self.push(kind, start);
        Ok(())
    }

    fn scan_string(&mut self, quote: u8) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        self.cursor.advance();
        match self.cursor.read_quoted(quote) {
            Some(value) => {
                self.push(TokenKind::String(value), start);
                Ok(())
            }
            None => Err(SyntaxError::new(
                SyntaxErrorType::UnterminatedString,
                self.cursor.span_from(start),
            )),
        }
    }

    fn scan_fstring(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        self.cursor.advance();
        let Some(quote) = self.cursor.advance() else {
            return Ok(());
        };
        let mut chunks = Vec::new();
        let mut text = String::new();
        loop {
            match (self.cursor.peek(), self.cursor.peek_at(1)) {
                (None | Some(b'\n'), _) => {
                    return Err(SyntaxError::new(
                        SyntaxErrorType::UnterminatedString,
                        self.cursor.span_from(start),
                    ))
                }
                (Some(b), _) if b == quote => {
                    self.cursor.advance();
                    break;
                }
                (Some(b'{'), Some(b'{')) | (Some(b'}'), Some(b'}')) => {
                    if let Some(b) = self.cursor.advance() {
                        text.push(b as char);
                    }
                    self.cursor.advance();
                }
                (Some(b'{'), _) => {
                    let open = self.cursor.mark();
                    self.cursor.advance();
                    if !text.is_empty() {
                        chunks.push(FStringChunk::Text(std::mem::take(&mut text)));
                    }
                    let inner = Scanner::new(&mut *self.cursor).scan_until(Some(open))?;
                    chunks.push(FStringChunk::Interpolation(inner));
                }
                (Some(b'\\'), _) => {
                    self.cursor.advance();
                    if let Some(c) = self.cursor.advance_char() {
                        text.push(crate::cursor::unescape(c));
                    }
                }
                _ => {
                    if let Some(c) = self.cursor.advance_char() {
                        text.push(c);
                    }
                }
            }
        }
        if !text.is_empty() {
            chunks.push(FStringChunk::Text(text));
        }
        self.push(TokenKind::FString(chunks), start);
        Ok(())
    }

    fn scan_symbol(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        let Some(ch) = self.cursor.advance_char() else {
            return Ok(());
        };
        let kind = match ch {
            '(' => {
                self.depth += 1;
                TokenKind::LeftParen
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RightParen
            }
            '[' => {
                self.depth += 1;
                TokenKind::LeftBracket
            }
            ']' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RightBracket
            }
            '{' => {
                self.depth += 1;
                TokenKind::LeftBrace
            }
            '}' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RightBrace
            }
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '+' if self.cursor.eat(b'=') => TokenKind::PlusEqual,
            '+' => TokenKind::Plus,
            '-' if self.cursor.eat(b'=') => TokenKind::MinusEqual,
            '-' => TokenKind::Minus,
            '*' if self.cursor.eat(b'*') => TokenKind::StarStar,
            '*' if self.cursor.eat(b'=') => TokenKind::StarEqual,
            '*' => TokenKind::Star,
            '/' if self.cursor.eat(b'/') => TokenKind::SlashSlash,
            '/' if self.cursor.eat(b'=') => TokenKind::SlashEqual,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' if self.cursor.eat(b'=') => TokenKind::EqualEqual,
            '=' => TokenKind::Equal,
            '!' if self.cursor.eat(b'=') => TokenKind::BangEqual,
            '<' if self.cursor.eat(b'=') => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            '>' if self.cursor.eat(b'=') => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            ';' => {
                return Err(SyntaxError::new(
                    SyntaxErrorType::PermanentlyExcludedToken,
                    self.cursor.span_from(start),
                )
                .with("lexeme", ";"))
            }
            other => {
                return Err(self.cursor.unknown_character(
                    SyntaxErrorType::UnknownCharacter,
                    other,
                    self.cursor.span_from(start),
                ))
            }
        };
        self.push(kind, start);
        Ok(())
    }
}
