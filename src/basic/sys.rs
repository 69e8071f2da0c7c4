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

//! SYS call extraction.
//!
//! Finds `SYS <address>` statements in detokenized BASIC text. Matching
//! is case-insensitive and allows the space between keyword and number
//! to be omitted (`SYS2061` is how most machine-code loaders are saved).

use super::detokenizer::BasicLine;

/// A `SYS` statement found in a BASIC line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SysCallSite {
    /// Line number of the BASIC line containing the call.
    pub source_line: u16,
    /// Decimal address passed to `SYS`.
    pub target_address: u16,
}

/// Extract every SYS call from a listing, in line order and left to right
/// within a line.
pub fn extract_sys_calls(lines: &[BasicLine]) -> Vec<SysCallSite> {
    lines
        .iter()
        .flat_map(|line| scan_text(line.line_number, &line.text))
        .collect()
}

/// Scan one line of text for SYS calls.
pub fn scan_text(line_number: u16, text: &str) -> Vec<SysCallSite> {
    let mut scanner = SysScanner::new(text.as_bytes());
    let mut sites = Vec::new();

    while let Some(target_address) = scanner.next_target() {
        sites.push(SysCallSite {
            source_line: line_number,
            target_address,
        });
    }

    sites
}

/// Byte cursor over listing text.
struct SysScanner<'a> {
    text: &'a [u8],
    position: usize,
}

impl<'a> SysScanner<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self { text, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.position).copied()
    }

    fn at_keyword(&self) -> bool {
        self.text
            .get(self.position..self.position + 3)
            .is_some_and(|word| word.eq_ignore_ascii_case(b"SYS"))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.position += 1;
        }
    }

    fn read_digits(&mut self) -> &'a [u8] {
        let start = self.position;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.position += 1;
        }
        &self.text[start..self.position]
    }

    /// Advance to the next `SYS <digits>` and return its address.
    ///
    /// Numbers that do not fit in 16 bits are skipped.
    fn next_target(&mut self) -> Option<u16> {
        while self.position < self.text.len() {
            if !self.at_keyword() {
                self.position += 1;
                continue;
            }

            self.position += 3;
            self.skip_whitespace();
            let digits = self.read_digits();
            if digits.is_empty() {
                continue;
            }

            let value = std::str::from_utf8(digits)
                .ok()
                .and_then(|s| s.parse::<u32>().ok());
            if let Some(address) = value.and_then(|v| u16::try_from(v).ok()) {
                return Some(address);
            }
        }
        None
    }
}
