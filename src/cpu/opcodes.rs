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

//! The 256-entry 6502 opcode table.
//!
//! Every byte value has an entry. The 151 documented NMOS opcodes are
//! marked `legal`; the undocumented ones carry the names commonly used by
//! assemblers (`SLO`, `RLA`, `LAX`, ...). The `JAM` opcodes halt the CPU
//! and have no meaningful operand, so they decode as single bytes.

use super::addressing::AddressingMode;
use super::addressing::AddressingMode::*;

/// Static information about one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Instruction mnemonic (e.g. "LDA", "SLO", "JAM").
    pub mnemonic: &'static str,
    /// Addressing mode of the operand.
    pub mode: AddressingMode,
    /// Part of the documented instruction set.
    pub legal: bool,
    /// Behaves the same on every NMOS 6510 revision.
    pub stable: bool,
}

impl OpcodeInfo {
    /// Total instruction length in bytes (opcode plus operand).
    pub const fn length(&self) -> u8 {
        1 + self.mode.operand_len()
    }

    /// Whether this opcode locks up the CPU.
    pub fn is_jam(&self) -> bool {
        self.mnemonic == "JAM"
    }
}

const fn op(mnemonic: &'static str, mode: AddressingMode) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        legal: true,
        stable: true,
    }
}

const fn ill(mnemonic: &'static str, mode: AddressingMode) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        legal: false,
        stable: true,
    }
}

const fn unstable(mnemonic: &'static str, mode: AddressingMode) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        legal: false,
        stable: false,
    }
}

const JAM: OpcodeInfo = ill("JAM", Implied);

/// Opcode metadata indexed by opcode byte.
pub static OPCODE_TABLE: [OpcodeInfo; 256] = build_table();

const fn build_table() -> [OpcodeInfo; 256] {
    let mut table = [JAM; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_opcode(i as u8);
        i += 1;
    }
    table
}

/// Look up the metadata for an opcode byte.
pub fn lookup(opcode: u8) -> &'static OpcodeInfo {
    &OPCODE_TABLE[opcode as usize]
}

const fn decode_opcode(opcode: u8) -> OpcodeInfo {
    match opcode {
        0x00 => op("BRK", Implied),
        0x01 => op("ORA", IndirectX),
        0x03 => ill("SLO", IndirectX),
        0x04 => ill("NOP", ZeroPage),
        0x05 => op("ORA", ZeroPage),
        0x06 => op("ASL", ZeroPage),
        0x07 => ill("SLO", ZeroPage),
        0x08 => op("PHP", Implied),
        0x09 => op("ORA", Immediate),
        0x0A => op("ASL", Accumulator),
        0x0B => ill("ANC", Immediate),
        0x0C => ill("NOP", Absolute),
        0x0D => op("ORA", Absolute),
        0x0E => op("ASL", Absolute),
        0x0F => ill("SLO", Absolute),
        0x10 => op("BPL", Relative),
        0x11 => op("ORA", IndirectY),
        0x13 => ill("SLO", IndirectY),
        0x14 => ill("NOP", ZeroPageX),
        0x15 => op("ORA", ZeroPageX),
        0x16 => op("ASL", ZeroPageX),
        0x17 => ill("SLO", ZeroPageX),
        0x18 => op("CLC", Implied),
        0x19 => op("ORA", AbsoluteY),
        0x1A => ill("NOP", Implied),
        0x1B => ill("SLO", AbsoluteY),
        0x1C => ill("NOP", AbsoluteX),
        0x1D => op("ORA", AbsoluteX),
        0x1E => op("ASL", AbsoluteX),
        0x1F => ill("SLO", AbsoluteX),
        0x20 => op("JSR", Absolute),
        0x21 => op("AND", IndirectX),
        0x23 => ill("RLA", IndirectX),
        0x24 => op("BIT", ZeroPage),
        0x25 => op("AND", ZeroPage),
        0x26 => op("ROL", ZeroPage),
        0x27 => ill("RLA", ZeroPage),
        0x28 => op("PLP", Implied),
        0x29 => op("AND", Immediate),
        0x2A => op("ROL", Accumulator),
        0x2B => ill("ANC", Immediate),
        0x2C => op("BIT", Absolute),
        0x2D => op("AND", Absolute),
        0x2E => op("ROL", Absolute),
        0x2F => ill("RLA", Absolute),
        0x30 => op("BMI", Relative),
        0x31 => op("AND", IndirectY),
        0x33 => ill("RLA", IndirectY),
        0x34 => ill("NOP", ZeroPageX),
        0x35 => op("AND", ZeroPageX),
        0x36 => op("ROL", ZeroPageX),
        0x37 => ill("RLA", ZeroPageX),
        0x38 => op("SEC", Implied),
        0x39 => op("AND", AbsoluteY),
        0x3A => ill("NOP", Implied),
        0x3B => ill("RLA", AbsoluteY),
        0x3C => ill("NOP", AbsoluteX),
        0x3D => op("AND", AbsoluteX),
        0x3E => op("ROL", AbsoluteX),
        0x3F => ill("RLA", AbsoluteX),
        0x40 => op("RTI", Implied),
        0x41 => op("EOR", IndirectX),
        0x43 => ill("SRE", IndirectX),
        0x44 => ill("NOP", ZeroPage),
        0x45 => op("EOR", ZeroPage),
        0x46 => op("LSR", ZeroPage),
        0x47 => ill("SRE", ZeroPage),
        0x48 => op("PHA", Implied),
        0x49 => op("EOR", Immediate),
        0x4A => op("LSR", Accumulator),
        0x4B => ill("ASR", Immediate),
        0x4C => op("JMP", Absolute),
        0x4D => op("EOR", Absolute),
        0x4E => op("LSR", Absolute),
        0x4F => ill("SRE", Absolute),
        0x50 => op("BVC", Relative),
        0x51 => op("EOR", IndirectY),
        0x53 => ill("SRE", IndirectY),
        0x54 => ill("NOP", ZeroPageX),
        0x55 => op("EOR", ZeroPageX),
        0x56 => op("LSR", ZeroPageX),
        0x57 => ill("SRE", ZeroPageX),
        0x58 => op("CLI", Implied),
        0x59 => op("EOR", AbsoluteY),
        0x5A => ill("NOP", Implied),
        0x5B => ill("SRE", AbsoluteY),
        0x5C => ill("NOP", AbsoluteX),
        0x5D => op("EOR", AbsoluteX),
        0x5E => op("LSR", AbsoluteX),
        0x5F => ill("SRE", AbsoluteX),
        0x60 => op("RTS", Implied),
        0x61 => op("ADC", IndirectX),
        0x63 => ill("RRA", IndirectX),
        0x64 => ill("NOP", ZeroPage),
        0x65 => op("ADC", ZeroPage),
        0x66 => op("ROR", ZeroPage),
        0x67 => ill("RRA", ZeroPage),
        0x68 => op("PLA", Implied),
        0x69 => op("ADC", Immediate),
        0x6A => op("ROR", Accumulator),
        0x6B => ill("ARR", Immediate),
        0x6C => op("JMP", Indirect),
        0x6D => op("ADC", Absolute),
        0x6E => op("ROR", Absolute),
        0x6F => ill("RRA", Absolute),
        0x70 => op("BVS", Relative),
        0x71 => op("ADC", IndirectY),
        0x73 => ill("RRA", IndirectY),
        0x74 => ill("NOP", ZeroPageX),
        0x75 => op("ADC", ZeroPageX),
        0x76 => op("ROR", ZeroPageX),
        0x77 => ill("RRA", ZeroPageX),
        0x78 => op("SEI", Implied),
        0x79 => op("ADC", AbsoluteY),
        0x7A => ill("NOP", Implied),
        0x7B => ill("RRA", AbsoluteY),
        0x7C => ill("NOP", AbsoluteX),
        0x7D => op("ADC", AbsoluteX),
        0x7E => op("ROR", AbsoluteX),
        0x7F => ill("RRA", AbsoluteX),
        0x80 => ill("NOP", Immediate),
        0x81 => op("STA", IndirectX),
        0x82 => ill("NOP", Immediate),
        0x83 => ill("SAX", IndirectX),
        0x84 => op("STY", ZeroPage),
        0x85 => op("STA", ZeroPage),
        0x86 => op("STX", ZeroPage),
        0x87 => ill("SAX", ZeroPage),
        0x88 => op("DEY", Implied),
        0x89 => ill("NOP", Immediate),
        0x8A => op("TXA", Implied),
        0x8B => unstable("XAA", Immediate),
        0x8C => op("STY", Absolute),
        0x8D => op("STA", Absolute),
        0x8E => op("STX", Absolute),
        0x8F => ill("SAX", Absolute),
        0x90 => op("BCC", Relative),
        0x91 => op("STA", IndirectY),
        0x93 => unstable("SHA", IndirectY),
        0x94 => op("STY", ZeroPageX),
        0x95 => op("STA", ZeroPageX),
        0x96 => op("STX", ZeroPageY),
        0x97 => ill("SAX", ZeroPageY),
        0x98 => op("TYA", Implied),
        0x99 => op("STA", AbsoluteY),
        0x9A => op("TXS", Implied),
        0x9B => unstable("TAS", AbsoluteY),
        0x9C => unstable("SHY", AbsoluteX),
        0x9D => op("STA", AbsoluteX),
        0x9E => unstable("SHX", AbsoluteY),
        0x9F => unstable("SHA", AbsoluteY),
        0xA0 => op("LDY", Immediate),
        0xA1 => op("LDA", IndirectX),
        0xA2 => op("LDX", Immediate),
        0xA3 => ill("LAX", IndirectX),
        0xA4 => op("LDY", ZeroPage),
        0xA5 => op("LDA", ZeroPage),
        0xA6 => op("LDX", ZeroPage),
        0xA7 => ill("LAX", ZeroPage),
        0xA8 => op("TAY", Implied),
        0xA9 => op("LDA", Immediate),
        0xAA => op("TAX", Implied),
        0xAB => unstable("LAX", Immediate),
        0xAC => op("LDY", Absolute),
        0xAD => op("LDA", Absolute),
        0xAE => op("LDX", Absolute),
        0xAF => ill("LAX", Absolute),
        0xB0 => op("BCS", Relative),
        0xB1 => op("LDA", IndirectY),
        0xB3 => ill("LAX", IndirectY),
        0xB4 => op("LDY", ZeroPageX),
        0xB5 => op("LDA", ZeroPageX),
        0xB6 => op("LDX", ZeroPageY),
        0xB7 => ill("LAX", ZeroPageY),
        0xB8 => op("CLV", Implied),
        0xB9 => op("LDA", AbsoluteY),
        0xBA => op("TSX", Implied),
        0xBB => unstable("LAS", AbsoluteY),
        0xBC => op("LDY", AbsoluteX),
        0xBD => op("LDA", AbsoluteX),
        0xBE => op("LDX", AbsoluteY),
        0xBF => ill("LAX", AbsoluteY),
        0xC0 => op("CPY", Immediate),
        0xC1 => op("CMP", IndirectX),
        0xC2 => ill("NOP", Immediate),
        0xC3 => ill("DCP", IndirectX),
        0xC4 => op("CPY", ZeroPage),
        0xC5 => op("CMP", ZeroPage),
        0xC6 => op("DEC", ZeroPage),
        0xC7 => ill("DCP", ZeroPage),
        0xC8 => op("INY", Implied),
        0xC9 => op("CMP", Immediate),
        0xCA => op("DEX", Implied),
        0xCB => ill("SBX", Immediate),
        0xCC => op("CPY", Absolute),
        0xCD => op("CMP", Absolute),
        0xCE => op("DEC", Absolute),
        0xCF => ill("DCP", Absolute),
        0xD0 => op("BNE", Relative),
        0xD1 => op("CMP", IndirectY),
        0xD3 => ill("DCP", IndirectY),
        0xD4 => ill("NOP", ZeroPageX),
        0xD5 => op("CMP", ZeroPageX),
        0xD6 => op("DEC", ZeroPageX),
        0xD7 => ill("DCP", ZeroPageX),
        0xD8 => op("CLD", Implied),
        0xD9 => op("CMP", AbsoluteY),
        0xDA => ill("NOP", Implied),
        0xDB => ill("DCP", AbsoluteY),
        0xDC => ill("NOP", AbsoluteX),
        0xDD => op("CMP", AbsoluteX),
        0xDE => op("DEC", AbsoluteX),
        0xDF => ill("DCP", AbsoluteX),
        0xE0 => op("CPX", Immediate),
        0xE1 => op("SBC", IndirectX),
        0xE2 => ill("NOP", Immediate),
        0xE3 => ill("ISC", IndirectX),
        0xE4 => op("CPX", ZeroPage),
        0xE5 => op("SBC", ZeroPage),
        0xE6 => op("INC", ZeroPage),
        0xE7 => ill("ISC", ZeroPage),
        0xE8 => op("INX", Implied),
        0xE9 => op("SBC", Immediate),
        0xEA => op("NOP", Implied),
        0xEB => ill("SBC", Immediate),
        0xEC => op("CPX", Absolute),
        0xED => op("SBC", Absolute),
        0xEE => op("INC", Absolute),
        0xEF => ill("ISC", Absolute),
        0xF0 => op("BEQ", Relative),
        0xF1 => op("SBC", IndirectY),
        0xF3 => ill("ISC", IndirectY),
        0xF4 => ill("NOP", ZeroPageX),
        0xF5 => op("SBC", ZeroPageX),
        0xF6 => op("INC", ZeroPageX),
        0xF7 => ill("ISC", ZeroPageX),
        0xF8 => op("SED", Implied),
        0xF9 => op("SBC", AbsoluteY),
        0xFA => ill("NOP", Implied),
        0xFB => ill("ISC", AbsoluteY),
        0xFC => ill("NOP", AbsoluteX),
        0xFD => op("SBC", AbsoluteX),
        0xFE => op("INC", AbsoluteX),
        0xFF => ill("ISC", AbsoluteX),
        // 0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2
        _ => JAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_count() {
        let legal = OPCODE_TABLE.iter().filter(|info| info.legal).count();
        assert_eq!(legal, 151);
    }

    #[test]
    fn test_jam_opcodes() {
        let jams: Vec<usize> = OPCODE_TABLE
            .iter()
            .enumerate()
            .filter(|(_, info)| info.is_jam())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(
            jams,
            vec![0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2]
        );
        assert!(jams.iter().all(|&i| OPCODE_TABLE[i].length() == 1));
    }

    #[test]
    fn test_lookup_lda_immediate() {
        let info = lookup(0xA9);
        assert_eq!(info.mnemonic, "LDA");
        assert_eq!(info.mode, AddressingMode::Immediate);
        assert_eq!(info.length(), 2);
        assert!(info.legal);
    }

    #[test]
    fn test_lookup_anc() {
        let info = lookup(0x0B);
        assert_eq!(info.mnemonic, "ANC");
        assert_eq!(info.length(), 2);
        assert!(!info.legal);
        assert!(info.stable);
    }

    #[test]
    fn test_unstable_opcodes() {
        for opcode in [0x8B, 0x93, 0x9B, 0x9C, 0x9E, 0x9F, 0xAB, 0xBB] {
            assert!(!lookup(opcode).stable, "${:02X} should be unstable", opcode);
        }
    }

    #[test]
    fn test_lengths_in_range() {
        for info in OPCODE_TABLE.iter() {
            assert!((1..=3).contains(&info.length()));
        }
    }
}
