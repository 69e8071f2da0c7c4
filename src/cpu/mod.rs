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

//! 6502/6510 instruction set knowledge.
//!
//! - [`addressing`] - addressing modes and operand lengths
//! - [`opcodes`] - the 256-entry opcode table
//! - [`mos6510`] - named opcodes and C64 ROM/I-O addresses

pub mod addressing;
pub mod mos6510;
pub mod opcodes;

pub use addressing::AddressingMode;
pub use opcodes::{lookup, OpcodeInfo, OPCODE_TABLE};
