// Decomp64 - A hybrid BASIC/6502 decompiler for Commodore 64 PRG files
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! BASIC detokenizer.
//!
//! Walks a tokenized BASIC V2 program line by line:
//!
//! ```text
//! ReadNextLinePointer -> ReadLineNumber -> ReadTokenStream -> ReadNextLinePointer ...
//! ```
//!
//! A next-line pointer of `$0000` ends the program. Lines are read in
//! file order; the pointer value itself is not followed, so relocated
//! programs list the same as programs saved from their usual address.

use std::fmt;

use super::petscii;
use super::tokens;

/// One detokenized BASIC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLine {
    /// The BASIC line number.
    pub line_number: u16,
    /// Offset of the line's next-line pointer within the payload.
    pub byte_offset: usize,
    /// C64 address of the line's next-line pointer.
    pub address: u16,
    /// Token stream bytes (without pointer, line number and terminator).
    pub raw_tokens: Vec<u8>,
    /// Listing text of the statements (without the line number).
    pub text: String,
    /// Total bytes this line occupies in the payload.
    pub byte_len: usize,
    /// The payload ended before the line's `$00` terminator.
    pub truncated: bool,
}

impl fmt::Display for BasicLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.line_number, self.text)
    }
}

/// A line produced by the detokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetokenizedLine {
    /// A line ended by its `$00` terminator.
    Complete(BasicLine),
    /// The payload ended inside this line.
    Truncated(BasicLine),
}

impl DetokenizedLine {
    /// Borrow the line.
    pub fn line(&self) -> &BasicLine {
        match self {
            DetokenizedLine::Complete(line) | DetokenizedLine::Truncated(line) => line,
        }
    }

    /// Take the line.
    pub fn into_line(self) -> BasicLine {
        match self {
            DetokenizedLine::Complete(line) | DetokenizedLine::Truncated(line) => line,
        }
    }

    /// Whether the payload ended inside this line.
    pub fn is_truncated(&self) -> bool {
        matches!(self, DetokenizedLine::Truncated(_))
    }
}

/// How the BASIC program text ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramEnd {
    /// A `$0000` next-line pointer was found.
    EndMarker,
    /// The payload ended between lines without an end marker.
    MissingEndMarker,
    /// The payload ended inside a line.
    TruncatedLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadNextLinePointer,
    Terminal(ProgramEnd),
}

/// Lazy, finite, non-restartable line iterator over a BASIC program.
pub struct Detokenizer<'a> {
    bytes: &'a [u8],
    load_address: u16,
    position: usize,
    state: State,
}

impl<'a> Detokenizer<'a> {
    /// Create a detokenizer for a payload loaded at `load_address`.
    pub fn new(bytes: &'a [u8], load_address: u16) -> Self {
        Self {
            bytes,
            load_address,
            position: 0,
            state: State::ReadNextLinePointer,
        }
    }

    /// Offset just past the consumed program text (including the end
    /// marker when present).
    pub fn end_offset(&self) -> usize {
        self.position
    }

    /// How the program ended, once the iterator is exhausted.
    pub fn program_end(&self) -> Option<ProgramEnd> {
        match self.state {
            State::Terminal(end) => Some(end),
            State::ReadNextLinePointer => None,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn read_word(&mut self) -> u16 {
        let word = u16::from_le_bytes([self.bytes[self.position], self.bytes[self.position + 1]]);
        self.position += 2;
        word
    }

    fn truncated_header(&mut self, start: usize) -> DetokenizedLine {
        // Pointer read, line number incomplete
        let line_number = self.bytes.get(start + 2).copied().map(u16::from).unwrap_or(0);
        self.position = self.bytes.len();
        self.state = State::Terminal(ProgramEnd::TruncatedLine);
        DetokenizedLine::Truncated(BasicLine {
            line_number,
            byte_offset: start,
            address: self.load_address.wrapping_add(start as u16),
            raw_tokens: Vec::new(),
            text: String::new(),
            byte_len: self.bytes.len() - start,
            truncated: true,
        })
    }
}

impl Iterator for Detokenizer<'_> {
    type Item = DetokenizedLine;

    fn next(&mut self) -> Option<DetokenizedLine> {
        if self.state != State::ReadNextLinePointer {
            return None;
        }

        let start = self.position;

        // ReadNextLinePointer
        if self.remaining() < 2 {
            self.position = self.bytes.len();
            self.state = State::Terminal(ProgramEnd::MissingEndMarker);
            return None;
        }
        if self.read_word() == 0x0000 {
            self.state = State::Terminal(ProgramEnd::EndMarker);
            return None;
        }

        // ReadLineNumber
        if self.remaining() < 2 {
            return Some(self.truncated_header(start));
        }
        let line_number = self.read_word();

        // ReadTokenStream
        let tokens_start = self.position;
        let terminator = self.bytes[tokens_start..].iter().position(|&b| b == 0x00);
        let tokens_end = terminator.map_or(self.bytes.len(), |i| tokens_start + i);
        let raw_tokens = self.bytes[tokens_start..tokens_end].to_vec();
        let text = render_tokens(&raw_tokens);

        let line = BasicLine {
            line_number,
            byte_offset: start,
            address: self.load_address.wrapping_add(start as u16),
            raw_tokens,
            text,
            byte_len: 0,
            truncated: terminator.is_none(),
        };

        match terminator {
            Some(_) => {
                self.position = tokens_end + 1;
                Some(DetokenizedLine::Complete(BasicLine {
                    byte_len: self.position - start,
                    ..line
                }))
            }
            None => {
                self.position = self.bytes.len();
                self.state = State::Terminal(ProgramEnd::TruncatedLine);
                Some(DetokenizedLine::Truncated(BasicLine {
                    byte_len: self.position - start,
                    ..line
                }))
            }
        }
    }
}

/// Render a token stream as listing text.
///
/// Bytes `>= $80` outside string literals are keywords; inside quotes
/// they are PETSCII characters, as the C64 `LIST` command shows them.
pub fn render_tokens(raw_tokens: &[u8]) -> String {
    let mut text = String::new();
    let mut in_quotes = false;

    for &byte in raw_tokens {
        if byte == petscii::QUOTE {
            in_quotes = !in_quotes;
            text.push('"');
        } else if in_quotes || byte < tokens::FIRST_TOKEN {
            petscii::push_char(&mut text, byte);
        } else {
            match tokens::keyword(byte) {
                Some(keyword) => text.push_str(keyword),
                None => text.push_str(&tokens::placeholder(byte)),
            }
        }
    }

    text
}

/// An eagerly detokenized BASIC program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Lines in file order.
    pub lines: Vec<BasicLine>,
    /// Offset just past the program text.
    pub end_offset: usize,
    /// How the program text ended.
    pub end: ProgramEnd,
}

/// Detokenize a whole payload.
pub fn detokenize(bytes: &[u8], load_address: u16) -> Listing {
    let mut detokenizer = Detokenizer::new(bytes, load_address);
    let lines: Vec<BasicLine> = detokenizer
        .by_ref()
        .map(DetokenizedLine::into_line)
        .collect();

    Listing {
        lines,
        end_offset: detokenizer.end_offset(),
        end: detokenizer
            .program_end()
            .unwrap_or(ProgramEnd::MissingEndMarker),
    }
}
