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

//! 6502 disassembly.
//!
//! - [`decoder`] - instruction decoding
//! - [`region`] - machine-code region location

pub mod decoder;
pub mod region;

pub use decoder::{decode, Decoded, Decoder, Instruction, Operand};
pub use region::{
    locate_region_end, MachineRegion, RegionBoundary, RegionEnd, RegionLocator, DEFAULT_MAX_SCAN,
};
