//! Restricted JavaScript scanner.
//!
//! Features:
//! - `//` and `/* */` comments
//! - Single/double-quoted strings with escapes
//! - Template literals; each `${...}` is scanned into its own token list
//! - Decimal, hex (`0x`), binary (`0b`), octal (`0o`) and exponent numbers
//! - Newlines become [`TokenKind::Eol`] for optional semicolons
//! - Permanently excluded and not-yet-implemented lexemes fail before parsing

use jiki_types::{SyntaxError, SyntaxErrorType};
use std::fmt;

use crate::cursor::{Cursor, Mark};
use crate::token::{Token, TokenKindExt};

pub type JsToken = Token<TokenKind>;

/// Lexemes beginners never need; rejected with `PermanentlyExcludedToken`.
pub const EXCLUDED_WORDS: &[&str] = &["var", "with", "void", "delete", "yield", "debugger"];

/// Lexemes not supported yet; rejected with `UnimplementedToken`.
pub const UNIMPLEMENTED_WORDS: &[&str] = &[
    "switch",
    "case",
    "default",
    "try",
    "catch",
    "finally",
    "throw",
    "import",
    "export",
    "typeof",
    "instanceof",
    "super",
    "extends",
    "do",
];

/// A piece of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChunk {
    Text(String),
    /// Tokens of one `${...}` interpolation, ending with `Eof`.
    Interpolation(Vec<JsToken>),
}

/// Every token kind in the restricted JavaScript dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──
    Number(f64),
    String(String),
    Template(Vec<TemplateChunk>),
    Identifier(String),
    True,
    False,
    Null,
    Undefined,

    // ── Keywords ──
    Let,
    Const,
    Function,
    Return,
    If,
    Else,
    While,
    For,
    Of,
    In,
    Repeat,
    Break,
    Continue,
    Class,
    New,
    This,

    // ── Punctuation ──
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Semicolon,
    Colon,

    // ── Operators ──
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    Equal,
    EqualEqual,
    EqualEqualEqual,
    Bang,
    BangEqual,
    BangEqualEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AmpAmp,
    PipePipe,

    // ── Structure ──
    Eol,
    Eof,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("let", TokenKind::Let),
    ("const", TokenKind::Const),
    ("function", TokenKind::Function),
    ("return", TokenKind::Return),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("for", TokenKind::For),
    ("of", TokenKind::Of),
    ("in", TokenKind::In),
    ("repeat", TokenKind::Repeat),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("class", TokenKind::Class),
    ("new", TokenKind::New),
    ("this", TokenKind::This),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("null", TokenKind::Null),
    ("undefined", TokenKind::Undefined),
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
            TokenKind::String(s) => return write!(f, "\"{s}\""),
            TokenKind::Template(_) => "template literal",
            TokenKind::Identifier(name) => return f.write_str(name),
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::PercentEqual => "%=",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::EqualEqualEqual => "===",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::BangEqualEqual => "!==",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Eol => "end of line",
            TokenKind::Eof => "end of file",
            _ => return write!(f, "{self:?}"),
        };
        f.write_str(text)
    }
}

/// Scan JavaScript source into tokens ending with [`TokenKind::Eof`].
pub fn scan(source: &str) -> Result<Vec<JsToken>, SyntaxError> {
    let mut cursor = Cursor::new(source);
    let tokens = Scanner::new(&mut cursor).scan_until(None)?;
    tracing::debug!(target: "jiki::lexer", language = "javascript", tokens = tokens.len(), "scanned");
    Ok(tokens)
}

struct Scanner<'c, 'src> {
    cursor: &'c mut Cursor<'src>,
    tokens: Vec<JsToken>,
    /// Open `{` count inside a template interpolation.
    brace_depth: u32,
}

impl<'c, 'src> Scanner<'c, 'src> {
    fn new(cursor: &'c mut Cursor<'src>) -> Self {
        Self {
            cursor,
            tokens: Vec::new(),
            brace_depth: 0,
        }
    }

    /// Scan to end of input, or, inside a template interpolation, to the
    /// `}` that closes it (`interpolation_start` is the `${` position).
    fn scan_until(mut self, interpolation_start: Option<Mark>) -> Result<Vec<JsToken>, SyntaxError> {
        loop {
            self.skip_whitespace_and_comments()?;
            let start = self.cursor.mark();
            let Some(ch) = self.cursor.peek() else {
                if let Some(open) = interpolation_start {
                    return Err(SyntaxError::new(
                        SyntaxErrorType::MissingRightBraceInTemplateLiteral,
                        self.cursor.span_from(open),
                    ));
                }
                break;
            };

            match ch {
                b'\n' => {
                    self.cursor.advance();
                    if !matches!(self.tokens.last().map(|t| &t.kind), Some(TokenKind::Eol) | None) {
                        self.push(TokenKind::Eol, start);
                    }
                }
                b'0'..=b'9' => self.scan_number()?,
                b'.' if self.cursor.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                    self.scan_number()?
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => self.scan_identifier()?,
                b'"' | b'\'' => self.scan_string(ch)?,
                b'`' => self.scan_template()?,
                b'}' if interpolation_start.is_some() && self.brace_depth == 0 => {
                    self.cursor.advance();
                    break;
                }
                _ => self.scan_symbol()?,
            }
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

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        loop {
            match (self.cursor.peek(), self.cursor.peek_at(1)) {
                (Some(b' ' | b'\t' | b'\r'), _) => {
                    self.cursor.advance();
                }
                (Some(b'/'), Some(b'/')) => self.cursor.eat_while(|b| b != b'\n'),
                (Some(b'/'), Some(b'*')) => {
                    let start = self.cursor.mark();
                    self.cursor.advance();
                    self.cursor.advance();
                    loop {
                        match (self.cursor.peek(), self.cursor.peek_at(1)) {
                            (None, _) => {
                                return Err(SyntaxError::new(
                                    SyntaxErrorType::UnterminatedBlockComment,
                                    self.cursor.span_from(start),
                                ))
                            }
                            (Some(b'*'), Some(b'/')) => {
                                self.cursor.advance();
                                self.cursor.advance();
                                break;
                            }
                            _ => {
                                self.cursor.advance();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_number(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        let radix = match (self.cursor.peek(), self.cursor.peek_at(1)) {
            (Some(b'0'), Some(b'x' | b'X')) => Some(16),
            (Some(b'0'), Some(b'b' | b'B')) => Some(2),
            (Some(b'0'), Some(b'o' | b'O')) => Some(8),
            _ => None,
        };

        let value = if let Some(radix) = radix {
            self.cursor.advance();
            self.cursor.advance();
            let digits_start = self.cursor.mark();
            self.cursor.eat_while(|b| b.is_ascii_hexdigit());
            let digits = self.cursor.slice_from(digits_start);
            i64::from_str_radix(digits, radix).map(|n| n as f64).ok()
        } else {
            self.cursor.eat_while(|b| b.is_ascii_digit());
            if self.cursor.peek() == Some(b'.')
                && self.cursor.peek_at(1).is_some_and(|b| b.is_ascii_digit())
            {
                self.cursor.advance();
                self.cursor.eat_while(|b| b.is_ascii_digit());
            }
            if matches!(self.cursor.peek(), Some(b'e' | b'E')) {
                let signed = matches!(self.cursor.peek_at(1), Some(b'+' | b'-'));
                let digit_at = if signed { 2 } else { 1 };
                if self.cursor.peek_at(digit_at).is_some_and(|b| b.is_ascii_digit()) {
                    for _ in 0..digit_at {
                        self.cursor.advance();
                    }
                    self.cursor.eat_while(|b| b.is_ascii_digit());
                }
            }
            self.cursor.slice_from(start).parse::<f64>().ok()
        };

        let trailing_letters = self
            .cursor
            .peek()
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_');
        if trailing_letters {
            self.cursor.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        }
        match value {
            Some(n) if !trailing_letters => {
                self.push(TokenKind::Number(n), start);
                Ok(())
            }
            _ => {
                let text = self.cursor.slice_from(start).to_string();
                Err(SyntaxError::new(SyntaxErrorType::UnknownCharacter, self.cursor.span_from(start))
                    .with("character", text))
            }
        }
    }

    fn scan_identifier(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$');
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
                SyntaxErrorType::MissingDoubleQuoteToTerminateString,
                self.cursor.span_from(start),
            )),
        }
    }

    fn scan_template(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        self.cursor.advance();
        let mut chunks = Vec::new();
        let mut text = String::new();
        loop {
            match (self.cursor.peek(), self.cursor.peek_at(1)) {
                (None, _) => {
                    return Err(SyntaxError::new(
                        SyntaxErrorType::MissingBacktickToTerminateTemplateLiteral,
                        self.cursor.span_from(start),
                    ))
                }
                (Some(b'`'), _) => {
                    self.cursor.advance();
                    break;
                }
                (Some(b'$'), Some(b'{')) => {
                    let open = self.cursor.mark();
                    self.cursor.advance();
                    self.cursor.advance();
                    if !text.is_empty() {
                        chunks.push(TemplateChunk::Text(std::mem::take(&mut text)));
                    }
                    let inner = Scanner::new(&mut *self.cursor).scan_until(Some(open))?;
                    chunks.push(TemplateChunk::Interpolation(inner));
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
            chunks.push(TemplateChunk::Text(text));
        }
        self.push(TokenKind::Template(chunks), start);
        Ok(())
    }

    fn excluded(&self, start: Mark) -> SyntaxError {
        SyntaxError::new(SyntaxErrorType::PermanentlyExcludedToken, self.cursor.span_from(start))
            .with("lexeme", self.cursor.slice_from(start))
    }

    fn unimplemented(&self, start: Mark) -> SyntaxError {
        SyntaxError::new(SyntaxErrorType::UnimplementedToken, self.cursor.span_from(start))
            .with("lexeme", self.cursor.slice_from(start))
    }

    fn scan_symbol(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor.mark();
        let Some(ch) = self.cursor.advance_char() else {
            return Ok(());
        };
        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => {
                self.brace_depth += 1;
                TokenKind::LeftBrace
            }
            '}' => {
                self.brace_depth = self.brace_depth.saturating_sub(1);
                TokenKind::RightBrace
            }
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '+' if self.cursor.eat(b'+') => TokenKind::PlusPlus,
            '+' if self.cursor.eat(b'=') => TokenKind::PlusEqual,
            '+' => TokenKind::Plus,
            '-' if self.cursor.eat(b'-') => TokenKind::MinusMinus,
            '-' if self.cursor.eat(b'=') => TokenKind::MinusEqual,
            '-' => TokenKind::Minus,
            '*' if self.cursor.eat(b'*') => TokenKind::StarStar,
            '*' if self.cursor.eat(b'=') => TokenKind::StarEqual,
            '*' => TokenKind::Star,
            '/' if self.cursor.eat(b'=') => TokenKind::SlashEqual,
            '/' => TokenKind::Slash,
            '%' if self.cursor.eat(b'=') => TokenKind::PercentEqual,
            '%' => TokenKind::Percent,
            '=' if self.cursor.eat(b'>') => return Err(self.unimplemented(start)),
            '=' if self.cursor.eat(b'=') => {
                if self.cursor.eat(b'=') {
                    TokenKind::EqualEqualEqual
                } else {
                    TokenKind::EqualEqual
                }
            }
            '=' => TokenKind::Equal,
            '!' if self.cursor.eat(b'=') => {
                if self.cursor.eat(b'=') {
                    TokenKind::BangEqualEqual
                } else {
                    TokenKind::BangEqual
                }
            }
            '!' => TokenKind::Bang,
            '<' if self.cursor.eat(b'<') => return Err(self.excluded(start)),
            '<' if self.cursor.eat(b'=') => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            '>' if self.cursor.eat(b'>') => return Err(self.excluded(start)),
            '>' if self.cursor.eat(b'=') => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            '&' if self.cursor.eat(b'&') => TokenKind::AmpAmp,
            '|' if self.cursor.eat(b'|') => TokenKind::PipePipe,
            '&' | '|' | '^' => {
                self.cursor.eat(b'=');
                return Err(self.excluded(start));
            }
            '~' => return Err(self.excluded(start)),
            '?' => return Err(self.unimplemented(start)),
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
