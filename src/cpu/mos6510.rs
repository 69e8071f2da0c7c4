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

//! MOS 6510 opcodes and C64 addresses the decompiler relies on.
//!
//! Only the opcodes that drive heuristics and control-flow rendering are
//! named here; the full decoding lives in [`super::opcodes`].

/// Opcodes with special meaning to the region locator and the emitters.
pub mod opcodes {
    pub const BRK: u8 = 0x00;
    pub const JSR: u8 = 0x20;
    pub const RTI: u8 = 0x40;
    pub const JMP_ABS: u8 = 0x4C;
    pub const RTS: u8 = 0x60;
    pub const JMP_IND: u8 = 0x6C;
}

/// C64 BASIC ROM entry points and layout.
pub mod basic {
    /// Default start of BASIC program text.
    pub const PROGRAM_START: u16 = 0x0801;

    /// BASIC cold start.
    pub const COLD_START: u16 = 0xA000;

    /// BASIC warm start ("READY." prompt, main loop).
    pub const WARM_START: u16 = 0xA474;

    /// Main input loop.
    pub const MAIN: u16 = 0xA480;

    /// Relink BASIC lines.
    pub const LINKPRG: u16 = 0xA533;

    /// Print a zero-terminated string at A/Y.
    pub const STROUT: u16 = 0xAB1E;

    /// Convert FAC to 16-bit integer in $14/$15.
    pub const GETADR: u16 = 0xB7F7;

    /// Print the unsigned integer in A/X.
    pub const LINPRT: u16 = 0xBDCD;
}

/// C64 KERNAL ROM routine addresses.
pub mod kernal {
    /// Initialize screen editor and VIC-II.
    pub const CINT: u16 = 0xFF81;

    /// Initialize I/O devices.
    pub const IOINIT: u16 = 0xFF84;

    /// Set file parameters.
    pub const SETLFS: u16 = 0xFFBA;

    /// Set file name.
    pub const SETNAM: u16 = 0xFFBD;

    /// Read/set system status.
    pub const READST: u16 = 0xFFB7;

    /// Open a logical file.
    pub const OPEN: u16 = 0xFFC0;

    /// Close a logical file.
    pub const CLOSE: u16 = 0xFFC3;

    /// Set input channel.
    pub const CHKIN: u16 = 0xFFC6;

    /// Set output channel.
    pub const CHKOUT: u16 = 0xFFC9;

    /// Restore default I/O.
    pub const CLRCHN: u16 = 0xFFCC;

    /// Input a character from the current input channel.
    pub const CHRIN: u16 = 0xFFCF;

    /// Output a character to the current output device.
    /// Input: A = character (PETSCII)
    pub const CHROUT: u16 = 0xFFD2;

    /// Load RAM from a device.
    pub const LOAD: u16 = 0xFFD5;

    /// Save RAM to a device.
    pub const SAVE: u16 = 0xFFD8;

    /// Check the STOP key.
    pub const STOP: u16 = 0xFFE1;

    /// Get a character from the keyboard buffer.
    /// Output: A = character (0 if none available)
    pub const GETIN: u16 = 0xFFE4;

    /// Close all files.
    pub const CLALL: u16 = 0xFFE7;

    /// Set or get cursor position.
    pub const PLOT: u16 = 0xFFF0;

    /// Clear the screen.
    pub const CLRSCR: u16 = 0xE544;

    /// Hardware reset entry.
    pub const RESET: u16 = 0xFCE2;

    /// Default IRQ handler tail (restore registers, RTI).
    pub const IRQ_EXIT: u16 = 0xEA31;
}

/// C64 memory locations and I/O registers.
pub mod c64 {
    /// 6510 data direction register.
    pub const CPU_DDR: u16 = 0x0000;

    /// 6510 I/O port (memory configuration).
    pub const CPU_PORT: u16 = 0x0001;

    /// Current cursor column (0-39).
    pub const CURSOR_COL: u16 = 0x00D3;

    /// Current cursor row (0-24).
    pub const CURSOR_ROW: u16 = 0x00D6;

    /// Number of characters in keyboard buffer.
    pub const KEYBOARD_BUFFER_LEN: u16 = 0x00C6;

    /// Keyboard buffer.
    pub const KEYBOARD_BUFFER: u16 = 0x0277;

    /// IRQ vector in RAM.
    pub const IRQ_VECTOR: u16 = 0x0314;

    /// Screen memory start.
    pub const SCREEN_RAM: u16 = 0x0400;

    /// Sprite 0 X position.
    pub const SPRITE0_X: u16 = 0xD000;

    /// VIC-II control register 1.
    pub const VIC_CONTROL1: u16 = 0xD011;

    /// Raster line register.
    pub const RASTER: u16 = 0xD012;

    /// Sprite enable register.
    pub const SPRITE_ENABLE: u16 = 0xD015;

    /// VIC-II memory setup register.
    pub const VIC_MEMORY: u16 = 0xD018;

    /// VIC-II interrupt status register.
    pub const VIC_IRQ_STATUS: u16 = 0xD019;

    /// VIC-II interrupt enable register.
    pub const VIC_IRQ_ENABLE: u16 = 0xD01A;

    /// Border color register.
    pub const BORDER_COLOR: u16 = 0xD020;

    /// Background color register.
    pub const BACKGROUND_COLOR: u16 = 0xD021;

    /// SID voice 1 frequency low byte.
    pub const SID_FREQ1_LO: u16 = 0xD400;

    /// SID volume and filter mode.
    pub const SID_VOLUME: u16 = 0xD418;

    /// Color memory start.
    pub const COLOR_RAM: u16 = 0xD800;

    /// CIA 1 port A (keyboard columns, joystick 2).
    pub const CIA1_PRA: u16 = 0xDC00;

    /// CIA 1 port B (keyboard rows, joystick 1).
    pub const CIA1_PRB: u16 = 0xDC01;

    /// CIA 1 interrupt control register.
    pub const CIA1_ICR: u16 = 0xDC0D;

    /// CIA 2 port A (VIC bank, serial bus).
    pub const CIA2_PRA: u16 = 0xDD00;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_flow_opcodes() {
        assert_eq!(opcodes::JMP_ABS, 0x4C);
        assert_eq!(opcodes::JSR, 0x20);
        assert_eq!(opcodes::RTS, 0x60);
        assert_eq!(opcodes::RTI, 0x40);
    }

    #[test]
    fn test_basic_addresses() {
        assert_eq!(basic::PROGRAM_START, 0x0801);
        assert_eq!(basic::WARM_START, 0xA474);
    }

    #[test]
    fn test_kernal_vectors_in_rom() {
        for address in [kernal::CHROUT, kernal::GETIN, kernal::PLOT, kernal::CHRIN] {
            assert!(address >= 0xE000);
        }
    }
}
