//! Character cursor for traversing source text.
//!
//! The cursor owns the position state while the lexer scans: current byte
//! offset plus 1-based line and column. Columns count characters; only
//! `\n` starts a new line.

/// A cursor over source text.
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the character at the cursor, or `'\0'` at end of input.
    #[inline]
    pub fn current_char(&self) -> char {
        self.peek(0)
    }

    /// Returns the character `offset` characters ahead, or `'\0'` past the
    /// end of input.
    pub fn peek(&self, offset: usize) -> char {
        self.source[self.position..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    /// Consumes and returns the current character, updating line/column
    /// tracking. Returns `'\0'` at end of input.
    pub fn advance(&mut self) -> char {
        match self.source[self.position..].chars().next() {
            Some(c) => {
                self.position += c.len_utf8();
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
                c
            }
            None => '\0',
        }
    }

    /// Consumes the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}
