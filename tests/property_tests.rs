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

//! Property-based tests for the decompiler.
//!
//! These tests verify invariants that should hold for all inputs,
//! using proptest for random input generation.

use decomp64::basic::{scan_text, SysCallSite};
use decomp64::classifier::ClassificationResult;
use decomp64::disasm::{decode, Decoded};
use decomp64::emit::{layout, AsmVariant, Dialect, EmitOptions, Segment};
use decomp64::symbols::{NoSymbols, SymbolCategory, SymbolEntry, UnifiedSymbolTable};
use decomp64::{decompile, render};
use proptest::prelude::*;

/// Tokenized BASIC lines as a PRG at $0801.
fn basic_prg(lines: &[(u16, Vec<u8>)]) -> Vec<u8> {
    let mut prg = vec![0x01, 0x08];
    let mut address: u16 = 0x0801;
    for (number, text) in lines {
        let next = address + 4 + text.len() as u16 + 1;
        prg.extend_from_slice(&next.to_le_bytes());
        prg.extend_from_slice(&number.to_le_bytes());
        prg.extend_from_slice(text);
        prg.push(0x00);
        address = next;
    }
    prg.extend_from_slice(&[0x00, 0x00]);
    prg
}

/// A token byte other than `SYS`, a digit, or a space.
fn non_sys_byte() -> impl Strategy<Value = u8> {
    prop_oneof![
        (0x80u8..=0xCB).prop_filter("not SYS", |b| *b != 0x9E),
        (b'0'..=b'9'),
        Just(b' '),
    ]
}

fn basic_line(body: impl Strategy<Value = Vec<u8>>) -> impl Strategy<Value = (u16, Vec<u8>)> {
    (0u16..64000, body)
}

fn category() -> impl Strategy<Value = SymbolCategory> {
    prop::sample::select(SymbolCategory::ALL.to_vec())
}

// ============================================================================
// Decoder
// ============================================================================

proptest! {
    /// Property: decoding covers every byte exactly once, in order.
    #[test]
    fn prop_decoder_has_no_gaps(bytes in prop::collection::vec(any::<u8>(), 0..512), base in any::<u16>()) {
        let decoded = decode(&bytes, base);
        let mut expected = base;
        for item in &decoded {
            prop_assert_eq!(item.address(), expected);
            expected = expected.wrapping_add(item.length() as u16);
        }
        let total: usize = decoded.iter().map(Decoded::length).sum();
        prop_assert_eq!(total, bytes.len());
    }

    /// Property: a load address other than $0801 means machine code,
    /// decoded from the first to the last byte.
    #[test]
    fn prop_non_basic_load_is_pure_machine(
        load in any::<u16>().prop_filter("not BASIC", |a| *a != 0x0801),
        payload in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut prg = load.to_le_bytes().to_vec();
        prg.extend_from_slice(&payload);
        let decompilation = decompile(&prg).unwrap();

        let ClassificationResult::PureMachine(region) = &decompilation.classification else {
            return Err(TestCaseError::fail("expected machine code"));
        };
        let total: usize = region.instructions.iter().map(Decoded::length).sum();
        prop_assert_eq!(total, payload.len());
    }
}

// ============================================================================
// Classifier
// ============================================================================

proptest! {
    /// Property: BASIC at $0801 without SYS is pure BASIC.
    #[test]
    fn prop_no_sys_is_pure_basic(
        lines in prop::collection::vec(basic_line(prop::collection::vec(non_sys_byte(), 0..40)), 1..10)
    ) {
        let decompilation = decompile(&basic_prg(&lines)).unwrap();
        prop_assert!(matches!(decompilation.classification, ClassificationResult::PureBasic(_)));
        prop_assert_eq!(decompilation.classification.basic_lines().len(), lines.len());
    }

    /// Property: segments cover the payload exactly, whatever the bytes.
    #[test]
    fn prop_layout_covers_payload(prg in prop::collection::vec(any::<u8>(), 2..600)) {
        let decompilation = decompile(&prg).unwrap();
        let segments = layout(&decompilation);

        let mut offset = 0;
        for segment in segments.iter().filter(|s| !matches!(s, Segment::Embedded(_))) {
            prop_assert_eq!(segment.offset(), offset);
            offset += segment.len();
        }
        prop_assert_eq!(offset, prg.len() - 2);
    }

    /// Property: rendering never panics, in any dialect.
    #[test]
    fn prop_render_total(
        prg in prop::collection::vec(any::<u8>(), 2..400),
        dialect in prop::sample::select(Dialect::NAMES.to_vec()),
    ) {
        let decompilation = decompile(&prg).unwrap();
        let options = EmitOptions {
            dialect: dialect.parse().unwrap(),
            ..EmitOptions::default()
        };
        let text = render(&decompilation, &NoSymbols, &options);
        prop_assert!(!text.is_empty());
    }
}

// ============================================================================
// SYS round trip
// ============================================================================

proptest! {
    /// Property: every generated SYS target reads back from the assembly
    /// comments, with its line number, in program order.
    #[test]
    fn prop_sys_targets_survive_rendering(
        lines in prop::collection::vec(
            (0u16..64000, any::<u16>(), prop::collection::vec(non_sys_byte(), 0..8)),
            1..6,
        )
    ) {
        let expected: Vec<SysCallSite> = lines
            .iter()
            .map(|&(number, target, _)| SysCallSite {
                source_line: number,
                target_address: target,
            })
            .collect();
        let lines: Vec<(u16, Vec<u8>)> = lines
            .into_iter()
            .map(|(number, target, tail)| {
                let mut text = vec![0x9E];
                text.extend_from_slice(target.to_string().as_bytes());
                text.push(b':');
                text.extend(tail);
                (number, text)
            })
            .collect();
        let decompilation = decompile(&basic_prg(&lines)).unwrap();
        let options = EmitOptions {
            dialect: Dialect::Assembly(AsmVariant::Acme),
            ..EmitOptions::default()
        };
        let text = render(&decompilation, &NoSymbols, &options);

        let mut from_text = Vec::new();
        for line in decompilation.classification.basic_lines() {
            let comment = format!("; {}", line);
            let rendered = text.lines().find(|l| *l == comment.trim_end());
            prop_assert!(rendered.is_some(), "missing comment for line {}", line.line_number);
            if let Some(rendered) = rendered {
                let (number, body) = rendered
                    .trim_start_matches("; ")
                    .split_once(' ')
                    .unwrap_or(("", ""));
                let number: u16 = number.parse().map_err(|_| TestCaseError::fail("line number"))?;
                from_text.extend(scan_text(number, body));
            }
        }

        prop_assert_eq!(from_text, expected);
    }
}

// ============================================================================
// Symbols
// ============================================================================

proptest! {
    /// Property: lookups are deterministic and the most specific category wins.
    #[test]
    fn prop_symbol_precedence(
        entries in prop::collection::vec((0u16..16, category()), 0..40)
    ) {
        let table: UnifiedSymbolTable = entries
            .iter()
            .map(|&(address, category)| SymbolEntry::new(address, format!("S{}", address), category))
            .collect();

        for address in 0u16..16 {
            let first = table.resolve(address).cloned();
            let second = table.resolve(address).cloned();
            prop_assert_eq!(&first, &second);

            let best = entries
                .iter()
                .filter(|(a, _)| *a == address)
                .map(|(_, category)| category.precedence())
                .max();
            prop_assert_eq!(first.map(|entry| entry.category.precedence()), best);
        }
    }
}
