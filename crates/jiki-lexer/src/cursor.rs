//! Byte-level source cursor with line/column tracking.

use jiki_types::{Span, SyntaxError, SyntaxErrorType};

/// A saved cursor position, used to build spans and slice lexemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub pos: usize,
    pub line: u32,
    pub col: u32,
}

/// Walks the source one byte at a time.
///
/// Columns count characters, not bytes: UTF-8 continuation bytes do not
/// advance the column.
pub struct Cursor<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    // ── Character-level helpers ──────────────────────────────────────

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// The full character at the cursor, for error reporting.
    pub fn peek_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|s| s.chars().next())
    }

    pub fn advance(&mut self) -> Option<u8> {
        let ch = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if ch & 0xC0 != 0x80 {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume one full character (all of its UTF-8 bytes).
    pub fn advance_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        for _ in 0..ch.len_utf8() {
            self.advance();
        }
        Some(ch)
    }

    /// Advance if the next byte is `expected`.
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Consume bytes while `pred` holds.
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Read a quoted string body; the opening quote is already consumed.
    ///
    /// Returns `None` if a newline or the end of input comes before the
    /// closing `quote`.
    pub fn read_quoted(&mut self, quote: u8) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => return None,
                Some(b) if b == quote => {
                    self.advance();
                    return Some(value);
                }
                Some(b'\\') => {
                    self.advance();
                    match self.advance_char() {
                        Some('\n') | None => return None,
                        Some(c) => value.push(unescape(c)),
                    }
                }
                Some(_) => {
                    if let Some(c) = self.advance_char() {
                        value.push(c);
                    }
                }
            }
        }
    }

    // ── Positions ────────────────────────────────────────────────────

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Span from `start` to the current position (end column inclusive).
    pub fn span_from(&self, start: Mark) -> Span {
        let (end_line, end_col) = if self.pos > start.pos && self.col > 1 {
            (self.line, self.col - 1)
        } else {
            (self.line, self.col)
        };
        Span::new(start.line, start.col, end_line, end_col, start.pos, self.pos)
    }

    /// Zero-width span at the current position.
    pub fn here(&self) -> Span {
        Span::point(self.line, self.col, self.pos)
    }

    /// Source text from `start` to the current position.
    pub fn slice_from(&self, start: Mark) -> &'src str {
        self.source.get(start.pos..self.pos).unwrap_or("")
    }

    // ── Errors ───────────────────────────────────────────────────────

    /// Error naming the offending character.
    pub fn unknown_character(&self, error_type: SyntaxErrorType, ch: char, span: Span) -> SyntaxError {
        SyntaxError::new(error_type, span).with("character", ch.to_string())
    }
}

/// Resolve a backslash escape. Unknown escapes keep the escaped character.
pub fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}
