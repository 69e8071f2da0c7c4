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

//! 6502 addressing modes.

/// The operand-encoding scheme of a 6502 instruction.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand (`RTS`, `CLC`).
    Implied,
    /// Operates on the accumulator (`ASL A`).
    Accumulator,
    /// 8-bit constant (`LDA #$10`).
    Immediate,
    /// Zero page address (`LDA $80`).
    ZeroPage,
    /// Zero page indexed by X (`LDA $80,X`).
    ZeroPageX,
    /// Zero page indexed by Y (`LDX $80,Y`).
    ZeroPageY,
    /// Full 16-bit address (`JMP $1234`).
    Absolute,
    /// Absolute indexed by X (`LDA $1234,X`).
    AbsoluteX,
    /// Absolute indexed by Y (`LDA $1234,Y`).
    AbsoluteY,
    /// Indirect jump through a pointer (`JMP ($0314)`).
    Indirect,
    /// Indexed indirect (`LDA ($40,X)`).
    IndirectX,
    /// Indirect indexed (`LDA ($40),Y`).
    IndirectY,
    /// Signed 8-bit branch offset (`BNE label`).
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// Whether the operand names a memory location (as opposed to a constant,
    /// a register, or a branch displacement).
    pub fn addresses_memory(self) -> bool {
        !matches!(
            self,
            AddressingMode::Implied
                | AddressingMode::Accumulator
                | AddressingMode::Immediate
                | AddressingMode::Relative
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_lengths() {
        assert_eq!(AddressingMode::Implied.operand_len(), 0);
        assert_eq!(AddressingMode::Accumulator.operand_len(), 0);
        assert_eq!(AddressingMode::Immediate.operand_len(), 1);
        assert_eq!(AddressingMode::Relative.operand_len(), 1);
        assert_eq!(AddressingMode::IndirectY.operand_len(), 1);
        assert_eq!(AddressingMode::Absolute.operand_len(), 2);
        assert_eq!(AddressingMode::Indirect.operand_len(), 2);
    }

    #[test]
    fn test_addresses_memory() {
        assert!(AddressingMode::ZeroPage.addresses_memory());
        assert!(AddressingMode::AbsoluteX.addresses_memory());
        assert!(!AddressingMode::Immediate.addresses_memory());
        assert!(!AddressingMode::Relative.addresses_memory());
    }
}
