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

//! Snapshot tests for emitted output.
//!
//! These tests use the `insta` crate to pin the exact text each dialect
//! writes for small programs.

use decomp64::emit::{AsmVariant, Dialect, EmitOptions};
use decomp64::symbols::NoSymbols;
use decomp64::{decompile, render};

/// `10 SYS2064`, end marker, three filler bytes, `INC $D020 / RTS`.
const HYBRID: [u8; 21] = [
    0x01, 0x08, 0x0B, 0x08, 0x0A, 0x00, 0x9E, 0x32, 0x30, 0x36, 0x34, 0x00, 0x00, 0x00, 0xEA,
    0xEA, 0xEA, 0xEE, 0x20, 0xD0, 0x60,
];

/// `LDA #$01 / STA $D020 / LDA #$0E / STA $D021 / RTS` at $0800.
const MACHINE: [u8; 13] = [
    0x00, 0x08, 0xA9, 0x01, 0x8D, 0x20, 0xD0, 0xA9, 0x0E, 0x8D, 0x21, 0xD0, 0x60,
];

fn bare(dialect: Dialect) -> EmitOptions {
    EmitOptions {
        dialect,
        show_addresses: false,
        header: false,
        ..EmitOptions::default()
    }
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_acme_hybrid_snapshot() {
    let decompilation = decompile(&HYBRID).unwrap();
    let options = EmitOptions {
        dialect: Dialect::Assembly(AsmVariant::Acme),
        ..EmitOptions::default()
    };
    insta::assert_snapshot!(render(&decompilation, &NoSymbols, &options), @r###"
    ; decompiled by decomp64
    ; load address: $0801, 19 bytes
    ; classification: hybrid BASIC/machine code

    * = $0801

    ; 10 SYS2064
            !byte $0B,$08,$0A,$00,$9E,$32,$30,$36,$34,$00 ; $0801
    ; end of BASIC program
            !byte $00,$00           ; $080B

    ; data $080D-$080F
            !byte $EA,$EA,$EA       ; $080D

    ; ---- machine code $0810-$0813, SYS 2064 in line 10 ----
    L0810
            INC $D020               ; $0810
            RTS                     ; $0813
    ; ---- end of machine code, ends at RTS ----
    "###);
}

#[test]
fn test_acme_machine_snapshot() {
    let decompilation = decompile(&MACHINE).unwrap();
    let text = render(&decompilation, &NoSymbols, &bare(Dialect::Assembly(AsmVariant::Acme)));
    insta::assert_snapshot!(text, @r###"
    * = $0800

    ; ---- machine code $0800-$080A ----
    L0800
            LDA #$01
            STA $D020
            LDA #$0E
            STA $D021
            RTS
    ; ---- end of machine code ----
    "###);
}

// ============================================================================
// High-level dialects
// ============================================================================

#[test]
fn test_pdsx_hybrid_snapshot() {
    let decompilation = decompile(&HYBRID).unwrap();
    let text = render(&decompilation, &NoSymbols, &bare(Dialect::PdsxBasicLike));
    insta::assert_snapshot!(text, @r###"
    10 SYS2064
    REM end of BASIC program

    2061 DATA 234,234,234

    REM ---- machine code $0810-$0813, SYS 2064 in line 10 ----
    2064 POKE 53280,(PEEK(53280)+1) AND 255
    2067 RETURN
    REM ---- end of machine code, ends at RTS ----
    "###);
}

#[test]
fn test_pseudocode_hybrid_snapshot() {
    let decompilation = decompile(&HYBRID).unwrap();
    let text = render(&decompilation, &NoSymbols, &bare(Dialect::Pseudocode));
    insta::assert_snapshot!(text, @r###"
    basic 10 SYS2064
    end basic

    data $080D: EA EA EA

    // machine code $0810-$0813, SYS 2064 in line 10
    routine L0810
        [$D020] ← [$D020] + 1
        return
    end routine  // ends at RTS
    "###);
}

#[test]
fn test_qbasic_machine_snapshot() {
    let decompilation = decompile(&MACHINE).unwrap();
    let text = render(&decompilation, &NoSymbols, &bare(Dialect::QBasicLike));
    insta::assert_snapshot!(text, @r###"
    DEFINT A-Z
    DIM SHARED A, X, Y, P, S, T
    DIM SHARED C, Z, N, V, I, D
    S = &HFF

    ' ---- machine code $0800-$080A ----
    L0800:
        A = &H01
        POKE &HD020, A
        A = &H0E
        POKE &HD021, A
        RETURN
    ' ---- end of machine code ----
    "###);
}
