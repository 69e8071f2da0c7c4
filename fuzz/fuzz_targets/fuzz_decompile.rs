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

//! Fuzz target for the whole decompiler.
//!
//! Every byte string of two or more bytes is a valid PRG image, so
//! decompiling and rendering it in every dialect must never panic.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_decompile
//!
//! Run for a specific duration:
//!   cargo +nightly fuzz run fuzz_decompile -- -max_total_time=60

#![no_main]

use decomp64::emit::{render, Dialect, EmitOptions};
use decomp64::symbols::NoSymbols;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(decompilation) = decomp64::decompile(data) else {
        assert!(data.len() < 2);
        return;
    };

    for name in Dialect::NAMES {
        if let Ok(dialect) = name.parse::<Dialect>() {
            let options = EmitOptions {
                dialect,
                show_bytes: true,
                ..EmitOptions::default()
            };
            let _ = render(&decompilation, &NoSymbols, &options);
        }
    }
});
