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

//! Fuzz target for the BASIC detokenizer and SYS scanner.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_detokenize

#![no_main]

use arbitrary::Arbitrary;
use decomp64::basic::{detokenize, extract_sys_calls};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    load_address: u16,
    text: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let listing = detokenize(&input.text, input.load_address);
    assert!(listing.end_offset <= input.text.len());

    // Scanning rendered lines must not panic on any line text
    let _ = extract_sys_calls(&listing.lines);
});
