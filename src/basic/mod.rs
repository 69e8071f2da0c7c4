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

//! Commodore BASIC V2 support.
//!
//! - [`tokens`] - keyword token table
//! - [`petscii`] - character rendering
//! - [`detokenizer`] - tokenized program to listing text
//! - [`sys`] - `SYS` call extraction

pub mod detokenizer;
pub mod petscii;
pub mod sys;
pub mod tokens;

pub use detokenizer::{
    detokenize, render_tokens, BasicLine, DetokenizedLine, Detokenizer, Listing, ProgramEnd,
};
pub use sys::{extract_sys_calls, scan_text, SysCallSite};
