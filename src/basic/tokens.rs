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

//! Commodore BASIC V2 token table.

/// First byte value that is treated as a token.
pub const FIRST_TOKEN: u8 = 0x80;

/// The `REM` token.
pub const REM: u8 = 0x8F;

/// The `SYS` token.
pub const SYS: u8 = 0x9E;

/// Keyword text for a token byte, or `None` for bytes BASIC V2 never
/// produces.
pub fn keyword(token: u8) -> Option<&'static str> {
    let text = match token {
        0x80 => "END",
        0x81 => "FOR",
        0x82 => "NEXT",
        0x83 => "DATA",
        0x84 => "INPUT#",
        0x85 => "INPUT",
        0x86 => "DIM",
        0x87 => "READ",
        0x88 => "LET",
        0x89 => "GOTO",
        0x8A => "RUN",
        0x8B => "IF",
        0x8C => "RESTORE",
        0x8D => "GOSUB",
        0x8E => "RETURN",
        0x8F => "REM",
        0x90 => "STOP",
        0x91 => "ON",
        0x92 => "WAIT",
        0x93 => "LOAD",
        0x94 => "SAVE",
        0x95 => "VERIFY",
        0x96 => "DEF",
        0x97 => "POKE",
        0x98 => "PRINT#",
        0x99 => "PRINT",
        0x9A => "CONT",
        0x9B => "LIST",
        0x9C => "CLR",
        0x9D => "CMD",
        0x9E => "SYS",
        0x9F => "OPEN",
        0xA0 => "CLOSE",
        0xA1 => "GET",
        0xA2 => "NEW",
        0xA3 => "TAB(",
        0xA4 => "TO",
        0xA5 => "FN",
        0xA6 => "SPC(",
        0xA7 => "THEN",
        0xA8 => "NOT",
        0xA9 => "STEP",
        0xAA => "+",
        0xAB => "-",
        0xAC => "*",
        0xAD => "/",
        0xAE => "^",
        0xAF => "AND",
        0xB0 => "OR",
        0xB1 => ">",
        0xB2 => "=",
        0xB3 => "<",
        0xB4 => "SGN",
        0xB5 => "INT",
        0xB6 => "ABS",
        0xB7 => "USR",
        0xB8 => "FRE",
        0xB9 => "POS",
        0xBA => "SQR",
        0xBB => "RND",
        0xBC => "LOG",
        0xBD => "EXP",
        0xBE => "COS",
        0xBF => "SIN",
        0xC0 => "TAN",
        0xC1 => "ATN",
        0xC2 => "PEEK",
        0xC3 => "LEN",
        0xC4 => "STR$",
        0xC5 => "VAL",
        0xC6 => "ASC",
        0xC7 => "CHR$",
        0xC8 => "LEFT$",
        0xC9 => "RIGHT$",
        0xCA => "MID$",
        0xCB => "GO",
        0xFF => "π",
        _ => return None,
    };
    Some(text)
}

/// Placeholder text for a token byte without a keyword.
pub fn placeholder(token: u8) -> String {
    format!("TOKEN_{:02X}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_keywords() {
        assert_eq!(keyword(0x99), Some("PRINT"));
        assert_eq!(keyword(SYS), Some("SYS"));
        assert_eq!(keyword(REM), Some("REM"));
        assert_eq!(keyword(0x89), Some("GOTO"));
        assert_eq!(keyword(0xCB), Some("GO"));
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(keyword(0xCC), None);
        assert_eq!(keyword(0xFE), None);
        assert_eq!(placeholder(0xCC), "TOKEN_CC");
    }

    #[test]
    fn test_every_token_below_cc_is_known() {
        for token in FIRST_TOKEN..=0xCB {
            assert!(keyword(token).is_some(), "token ${:02X}", token);
        }
    }
}
