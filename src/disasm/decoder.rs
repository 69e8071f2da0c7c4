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

//! Instruction decoder.
//!
//! Turns a byte buffer into a gapless sequence of [`Decoded`] items.
//! Every opcode byte has a table entry, so decoding never fails: `JAM`
//! opcodes and an instruction cut off by the end of the buffer become
//! one-byte [`Decoded::RawData`] items instead.

use crate::cpu::{lookup, AddressingMode};

/// An instruction operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// One operand byte (immediate, zero page, indirect, relative).
    Byte(u8),
    /// Two operand bytes, little-endian (absolute, indirect jump).
    Word(u16),
}

impl Operand {
    /// The operand as a 16-bit value.
    pub fn value(&self) -> u16 {
        match *self {
            Operand::Byte(b) => u16::from(b),
            Operand::Word(w) => w,
        }
    }
}

/// A decoded 6502 instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the opcode byte.
    pub address: u16,
    /// The opcode byte.
    pub opcode: u8,
    /// Instruction mnemonic.
    pub mnemonic: &'static str,
    /// Addressing mode.
    pub mode: AddressingMode,
    /// Operand, if the mode has one.
    pub operand: Option<Operand>,
    /// Length in bytes (1-3).
    pub length: u8,
    /// Part of the documented instruction set.
    pub legal: bool,
    /// Behaves the same on every NMOS revision.
    pub stable: bool,
}

impl Instruction {
    /// The instruction's bytes as they appear in memory.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode];
        match self.operand {
            Some(Operand::Byte(b)) => bytes.push(b),
            Some(Operand::Word(w)) => bytes.extend_from_slice(&w.to_le_bytes()),
            None => {}
        }
        bytes
    }

    /// Destination of a relative branch.
    pub fn branch_target(&self) -> Option<u16> {
        match (self.mode, self.operand) {
            (AddressingMode::Relative, Some(Operand::Byte(offset))) => Some(
                self.address
                    .wrapping_add(2)
                    .wrapping_add(offset as i8 as i16 as u16),
            ),
            _ => None,
        }
    }

    /// The memory address named by the operand, or the branch destination.
    ///
    /// `None` for implied, accumulator and immediate operands.
    pub fn target_address(&self) -> Option<u16> {
        if self.mode == AddressingMode::Relative {
            return self.branch_target();
        }
        if !self.mode.addresses_memory() {
            return None;
        }
        self.operand.map(|operand| operand.value())
    }

    /// Address of the next instruction.
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(u16::from(self.length))
    }
}

/// One item of decoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A decoded instruction.
    Op(Instruction),
    /// A byte that is not decoded as an instruction.
    RawData {
        /// Address of the byte.
        address: u16,
        /// The byte value.
        byte: u8,
    },
}

impl Decoded {
    /// Address of the first byte.
    pub fn address(&self) -> u16 {
        match self {
            Decoded::Op(instr) => instr.address,
            Decoded::RawData { address, .. } => *address,
        }
    }

    /// Number of bytes covered.
    pub fn length(&self) -> usize {
        match self {
            Decoded::Op(instr) => usize::from(instr.length),
            Decoded::RawData { .. } => 1,
        }
    }

    /// The covered bytes.
    pub fn bytes(&self) -> Vec<u8> {
        match self {
            Decoded::Op(instr) => instr.bytes(),
            Decoded::RawData { byte, .. } => vec![*byte],
        }
    }

    /// The instruction, if this item is one.
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            Decoded::Op(instr) => Some(instr),
            Decoded::RawData { .. } => None,
        }
    }
}

/// Lazy instruction decoder over a byte buffer.
///
/// Restartable only by creating a new decoder over the same buffer.
pub struct Decoder<'a> {
    bytes: &'a [u8],
    base_address: u16,
    cursor: usize,
    truncated: bool,
}

impl<'a> Decoder<'a> {
    /// Create a decoder for `bytes` located at `base_address`.
    pub fn new(bytes: &'a [u8], base_address: u16) -> Self {
        Self {
            bytes,
            base_address,
            cursor: 0,
            truncated: false,
        }
    }

    fn raw(&mut self) -> Decoded {
        let item = Decoded::RawData {
            address: self.base_address.wrapping_add(self.cursor as u16),
            byte: self.bytes[self.cursor],
        };
        self.cursor += 1;
        item
    }
}

impl Iterator for Decoder<'_> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        if self.cursor >= self.bytes.len() {
            return None;
        }

        // Once an instruction ran past the end, the tail is data
        if self.truncated {
            return Some(self.raw());
        }

        let opcode = self.bytes[self.cursor];
        let info = lookup(opcode);
        if info.is_jam() {
            return Some(self.raw());
        }

        let length = usize::from(info.length());
        if self.cursor + length > self.bytes.len() {
            self.truncated = true;
            return Some(self.raw());
        }

        let operand = match info.mode.operand_len() {
            0 => None,
            1 => Some(Operand::Byte(self.bytes[self.cursor + 1])),
            _ => Some(Operand::Word(u16::from_le_bytes([
                self.bytes[self.cursor + 1],
                self.bytes[self.cursor + 2],
            ]))),
        };

        let instr = Instruction {
            address: self.base_address.wrapping_add(self.cursor as u16),
            opcode,
            mnemonic: info.mnemonic,
            mode: info.mode,
            operand,
            length: info.length(),
            legal: info.legal,
            stable: info.stable,
        };
        self.cursor += length;
        Some(Decoded::Op(instr))
    }
}

/// Decode a whole buffer.
pub fn decode(bytes: &[u8], base_address: u16) -> Vec<Decoded> {
    Decoder::new(bytes, base_address).collect()
}
