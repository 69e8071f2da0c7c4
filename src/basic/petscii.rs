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

//! PETSCII rendering for BASIC listings.
//!
//! Printable characters pass through as text. Everything else is written
//! in braces: control codes by name (`{CLR}`), other bytes by value
//! (`{$A6}`).

pub const WHITE: u8 = 0x05;
pub const RETURN: u8 = 0x0D;
pub const LOWERCASE: u8 = 0x0E;
pub const CURSOR_DOWN: u8 = 0x11;
pub const REVERSE_ON: u8 = 0x12;
pub const HOME: u8 = 0x13;
pub const DELETE: u8 = 0x14;
pub const RED: u8 = 0x1C;
pub const CURSOR_RIGHT: u8 = 0x1D;
pub const GREEN: u8 = 0x1E;
pub const BLUE: u8 = 0x1F;
pub const SPACE: u8 = 0x20;
pub const QUOTE: u8 = 0x22;
pub const ORANGE: u8 = 0x81;
pub const UPPERCASE: u8 = 0x8E;
pub const BLACK: u8 = 0x90;
pub const CURSOR_UP: u8 = 0x91;
pub const REVERSE_OFF: u8 = 0x92;
pub const CLEAR_SCREEN: u8 = 0x93;
pub const INSERT: u8 = 0x94;
pub const CURSOR_LEFT: u8 = 0x9D;
pub const SHIFT_SPACE: u8 = 0xA0;

/// Brace name of a PETSCII control code.
pub fn control_name(byte: u8) -> Option<&'static str> {
    let name = match byte {
        WHITE => "WHT",
        RETURN => "RETURN",
        LOWERCASE => "LOWER",
        CURSOR_DOWN => "DOWN",
        REVERSE_ON => "RVS ON",
        HOME => "HOME",
        DELETE => "DEL",
        RED => "RED",
        CURSOR_RIGHT => "RIGHT",
        GREEN => "GRN",
        BLUE => "BLU",
        ORANGE => "ORANGE",
        0x85 => "F1",
        0x86 => "F3",
        0x87 => "F5",
        0x88 => "F7",
        0x89 => "F2",
        0x8A => "F4",
        0x8B => "F6",
        0x8C => "F8",
        0x8D => "SHIFT RETURN",
        UPPERCASE => "UPPER",
        BLACK => "BLK",
        CURSOR_UP => "UP",
        REVERSE_OFF => "RVS OFF",
        CLEAR_SCREEN => "CLR",
        INSERT => "INST",
        0x95 => "BROWN",
        0x96 => "LT RED",
        0x97 => "GRAY1",
        0x98 => "GRAY2",
        0x99 => "LT GREEN",
        0x9A => "LT BLUE",
        0x9B => "GRAY3",
        0x9C => "PUR",
        CURSOR_LEFT => "LEFT",
        0x9E => "YEL",
        0x9F => "CYN",
        SHIFT_SPACE => "SHIFT SPACE",
        _ => return None,
    };
    Some(name)
}

/// Printable character for a byte in the $20-$5F range.
pub fn printable(byte: u8) -> Option<char> {
    match byte {
        0x5C => Some('£'),
        0x5E => Some('↑'),
        0x5F => Some('←'),
        SPACE..=0x5F => Some(byte as char),
        _ => None,
    }
}

/// Append the listing text for one non-token byte.
pub fn push_char(out: &mut String, byte: u8) {
    if let Some(c) = printable(byte) {
        out.push(c);
    } else if let Some(name) = control_name(byte) {
        out.push('{');
        out.push_str(name);
        out.push('}');
    } else {
        out.push_str(&format!("{{${:02X}}}", byte));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bytes: &[u8]) -> String {
        let mut out = String::new();
        for &byte in bytes {
            push_char(&mut out, byte);
        }
        out
    }

    #[test]
    fn test_printable_passthrough() {
        assert_eq!(render(b"HELLO, WORLD 123"), "HELLO, WORLD 123");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(render(&[0x5C, 0x5E, 0x5F]), "£↑←");
    }

    #[test]
    fn test_control_codes() {
        assert_eq!(render(&[CLEAR_SCREEN, HOME, CURSOR_DOWN]), "{CLR}{HOME}{DOWN}");
    }

    #[test]
    fn test_unnamed_bytes() {
        assert_eq!(render(&[0x01, 0xA6]), "{$01}{$A6}");
    }
}
