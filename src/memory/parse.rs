//! Program images are plain text, one byte per line, written in binary:
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! Everything after a `#` is a comment. Lines which don't hold an 8 bit
//! binary literal are skipped.

use std::borrow::Cow;
use std::error;
use std::{fmt, str::Lines};

use super::{Byte, Memory, MEMORY_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidAddress { address: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidAddress { address } => {
                write!(f, "memory has no address `0x{:x}`", address)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Option<Cow<'static, str>>,
    line_nr: usize,
}

impl ParseError {
    fn new<C, S>(kind: ParseErrorKind, context: C, line_nr: usize) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: context.into().map(|inner| inner.into()),
            line_nr,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn line_nr(&self) -> usize {
        self.line_nr
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(
                f,
                "error [ln: {}]: {} - {}",
                self.line_nr, self.kind, context
            )
        } else {
            write!(f, "error [ln: {}]: {}", self.line_nr, self.kind)
        }
    }
}

impl error::Error for ParseError {}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Parses the code part of a line as a byte literal in base 2.
fn parse_byte(code: &str) -> Option<Byte> {
    let code = code.trim();
    let digits = code.strip_prefix("0b").unwrap_or(code);

    if digits.is_empty() {
        return None;
    }

    Byte::from_str_radix(digits, 2).ok()
}

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    line_nr: usize,
    address: usize,
    memory: Memory,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for `data` which will populate `memory` from
    /// address 0 onwards.
    pub fn new(data: &'a str, memory: Memory) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
            address: 0,
            memory,
        }
    }

    /// Consumes `self` and parses all lines into memory.
    ///
    /// # Errors
    ///
    /// Fails on the first byte that would land past the end of memory.
    pub fn parse(mut self) -> Result<Memory> {
        while let Some(res) = self.parse_next_line() {
            if let Err(err) = res {
                log::error!("{}", err);
                return Err(err);
            }
        }

        log::debug!("Loaded {} bytes", self.address);

        Ok(self.memory)
    }

    /// Parses the next line. Returns `None` once all lines are consumed.
    fn parse_next_line(&mut self) -> Option<Result<()>> {
        let line = self.lines.next()?;
        self.line_nr += 1;

        let code = line.split('#').next().unwrap_or_default();

        match parse_byte(code) {
            Some(byte) => Some(self.write_byte(byte)),
            None => {
                if !code.trim().is_empty() {
                    log::debug!("[{}] Skipping line `{}`", self.line_nr, line.trim());
                }
                Some(Ok(()))
            }
        }
    }

    /// Writes `byte` at the current address and moves to the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if the current address is outside of memory.
    fn write_byte(&mut self, byte: Byte) -> Result<()> {
        if self.address >= MEMORY_SIZE {
            return Err(ParseError::new(
                ParseErrorKind::InvalidAddress {
                    address: self.address,
                },
                "program does not fit into memory",
                self.line_nr,
            ));
        }

        self.memory.write_byte(self.address as Byte, byte);
        self.address += 1;

        Ok(())
    }
}
