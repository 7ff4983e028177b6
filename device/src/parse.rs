//! Cursor over compact text descriptors.
//!
//! Both the device description (`{128,{16,32},65536,gpu}`) and the FFT descriptor (`srfi5`) are
//! tiny hand-written grammars. They share this cursor so that malformed input is reported the
//! same way: the descriptor, a message and a caret under the offending character.

use std::fmt;

/// Malformed descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub desc: String,
    pub message: String,
    /// Byte offset of the offending character, `None` when the error concerns the whole input.
    pub position: Option<usize>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "==> {} is malformed: {}", self.desc, self.message)?;
        if let Some(position) = self.position {
            // "==> " shifts the descriptor by four columns.
            write!(f, "\n{}^", " ".repeat(4 + position))?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Forward-only cursor with optional blank skipping.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    desc: &'a str,
    pos: usize,
    skip_blanks: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(desc: &'a str) -> Self {
        Self { desc, pos: 0, skip_blanks: false }
    }

    /// Cursor that ignores spaces and tabs in front of every token.
    pub fn skipping_blanks(desc: &'a str) -> Self {
        Self { desc, pos: 0, skip_blanks: true }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn skip(&mut self) {
        if self.skip_blanks {
            let rest = &self.desc[self.pos..];
            self.pos += rest.len() - rest.trim_start_matches([' ', '\t']).len();
        }
    }

    pub fn peek(&mut self) -> Option<char> {
        self.skip();
        self.desc[self.pos..].chars().next()
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.eat(c) { Ok(()) } else { Err(self.error(format!("expected '{c}'"))) }
    }

    /// Unsigned decimal number.
    pub fn number(&mut self) -> Result<usize, ParseError> {
        self.skip();
        let desc = self.desc;
        let rest = &desc[self.pos..];
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(self.error("expected number"));
        }
        let value = rest[..digits].parse().map_err(|_| self.error("number out of range"))?;
        self.pos += digits;
        Ok(value)
    }

    /// Run of ASCII letters, possibly empty.
    pub fn word(&mut self) -> &'a str {
        self.skip();
        let desc = self.desc;
        let rest = &desc[self.pos..];
        let len = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()).len();
        self.pos += len;
        &rest[..len]
    }

    /// Error pointing at the current position.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError { desc: self.desc.to_string(), message: message.into(), position: Some(self.pos) }
    }

    /// Error pointing at an explicit position, e.g. the start of a rejected word.
    pub fn error_at(&self, position: usize, message: impl Into<String>) -> ParseError {
        ParseError { desc: self.desc.to_string(), message: message.into(), position: Some(position) }
    }

    /// Error about the input as a whole.
    pub fn error_without_position(&self, message: impl Into<String>) -> ParseError {
        ParseError { desc: self.desc.to_string(), message: message.into(), position: None }
    }
}
