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

//! Built-in C64 symbols.
//!
//! A small set of well-known locations, used as a fallback layer when
//! `--builtin-symbols` is given. Database entries always win.

use super::{SymbolCategory, SymbolEntry, UnifiedSymbolTable};
use crate::cpu::mos6510::{basic, c64, kernal};

const BUILTIN: &[(u16, &str, &str)] = &[
    // 6510 port and zero page
    (c64::CPU_DDR, "CPU_DDR", "6510 data direction register"),
    (c64::CPU_PORT, "CPU_PORT", "6510 I/O port, memory configuration"),
    (c64::KEYBOARD_BUFFER_LEN, "NDX", "Keys in keyboard buffer"),
    (c64::CURSOR_COL, "PNTR", "Cursor column"),
    (c64::CURSOR_ROW, "TBLX", "Cursor row"),
    (c64::KEYBOARD_BUFFER, "KEYD", "Keyboard buffer"),
    (c64::IRQ_VECTOR, "CINV", "IRQ vector"),
    (c64::SCREEN_RAM, "SCREEN", "Default screen memory"),
    // BASIC ROM
    (basic::COLD_START, "BASIC_COLD", "BASIC cold start"),
    (basic::WARM_START, "READY", "Print READY and enter the main loop"),
    (basic::MAIN, "MAIN", "BASIC main input loop"),
    (basic::LINKPRG, "LINKPRG", "Relink BASIC program lines"),
    (basic::STROUT, "STROUT", "Print string at A/Y"),
    (basic::GETADR, "GETADR", "Convert FAC to 16-bit address"),
    (basic::LINPRT, "LINPRT", "Print unsigned integer in A/X"),
    // I/O
    (c64::SPRITE0_X, "SP0X", "Sprite 0 X position"),
    (c64::VIC_CONTROL1, "SCROLY", "VIC-II control register 1"),
    (c64::RASTER, "RASTER", "Raster line"),
    (c64::SPRITE_ENABLE, "SPENA", "Sprite enable"),
    (c64::VIC_MEMORY, "VMCSB", "VIC-II memory setup"),
    (c64::VIC_IRQ_STATUS, "VICIRQ", "VIC-II interrupt status"),
    (c64::VIC_IRQ_ENABLE, "IRQMSK", "VIC-II interrupt enable"),
    (c64::BORDER_COLOR, "EXTCOL", "Border color"),
    (c64::BACKGROUND_COLOR, "BGCOL0", "Background color 0"),
    (c64::SID_FREQ1_LO, "FRELO1", "SID voice 1 frequency low"),
    (c64::SID_VOLUME, "SIGVOL", "SID volume and filter mode"),
    (c64::COLOR_RAM, "COLOR_RAM", "Color memory"),
    (c64::CIA1_PRA, "CIAPRA", "CIA 1 port A"),
    (c64::CIA1_PRB, "CIAPRB", "CIA 1 port B"),
    (c64::CIA1_ICR, "CIAICR", "CIA 1 interrupt control"),
    (c64::CIA2_PRA, "CI2PRA", "CIA 2 port A"),
    // KERNAL
    (kernal::CLRSCR, "CLRSCR", "Clear screen"),
    (kernal::IRQ_EXIT, "IRQ_EXIT", "Restore registers and return from IRQ"),
    (kernal::RESET, "RESET", "Hardware reset"),
    (kernal::CINT, "CINT", "Initialize screen editor"),
    (kernal::IOINIT, "IOINIT", "Initialize I/O devices"),
    (kernal::READST, "READST", "Read I/O status"),
    (kernal::SETLFS, "SETLFS", "Set file parameters"),
    (kernal::SETNAM, "SETNAM", "Set file name"),
    (kernal::OPEN, "OPEN", "Open logical file"),
    (kernal::CLOSE, "CLOSE", "Close logical file"),
    (kernal::CHKIN, "CHKIN", "Set input channel"),
    (kernal::CHKOUT, "CHKOUT", "Set output channel"),
    (kernal::CLRCHN, "CLRCHN", "Restore default I/O"),
    (kernal::CHRIN, "CHRIN", "Input character"),
    (kernal::CHROUT, "CHROUT", "Output character"),
    (kernal::LOAD, "LOAD", "Load from device"),
    (kernal::SAVE, "SAVE", "Save to device"),
    (kernal::STOP, "STOP", "Check STOP key"),
    (kernal::GETIN, "GETIN", "Get character from keyboard buffer"),
    (kernal::CLALL, "CLALL", "Close all files"),
    (kernal::PLOT, "PLOT", "Set or get cursor position"),
];

/// The built-in symbol set.
pub fn builtin_table() -> UnifiedSymbolTable {
    BUILTIN
        .iter()
        .map(|&(address, name, description)| {
            SymbolEntry::new(address, name, SymbolCategory::for_address(address))
                .with_description(description)
        })
        .collect()
}
