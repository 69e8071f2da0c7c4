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

//! Multi-target emitter.
//!
//! Renders a [`Decompilation`] as text in one of several dialects. The
//! payload is walked in address order (see [`layout`]); each dialect
//! writer turns BASIC lines, machine regions and leftover data into its
//! own syntax.
//!
//! - [`assembly`] - ACME, KickAssembler, ca65 and 64tass source
//! - [`c`] - C with a flat `mem[]` array
//! - [`qbasic`] - structured BASIC with labels
//! - [`pdsx`] - line-numbered BASIC
//! - [`pseudocode`] - free-form pseudocode
//!
//! Writing never fails. Illegal opcodes and undecoded bytes are kept as
//! raw bytes with a comment.

pub mod assembly;
pub mod c;
pub mod layout;
pub mod lower;
pub mod pdsx;
pub mod pseudocode;
pub mod qbasic;

pub use layout::{layout, Segment};
pub use lower::{lower, Statement};

use crate::basic::BasicLine;
use crate::classifier::Decompilation;
use crate::cpu::{lookup, AddressingMode};
use crate::disasm::{Decoded, Instruction, MachineRegion, RegionBoundary};
use crate::error::DecompileWarning;
use crate::symbols::{SymbolEntry, SymbolSource};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Assembler syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsmVariant {
    Acme,
    KickAssembler,
    Ca65,
    Tass64,
}

/// Output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Assembly(AsmVariant),
    C,
    QBasicLike,
    PdsxBasicLike,
    Pseudocode,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Assembly(AsmVariant::Acme)
    }
}

impl Dialect {
    /// Names accepted by [`Dialect::from_str`].
    pub const NAMES: [&'static str; 9] = [
        "asm", "acme", "kickass", "ca65", "64tass", "c", "qbasic", "pdsx", "pseudo",
    ];

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Assembly(AsmVariant::Acme) => "acme",
            Dialect::Assembly(AsmVariant::KickAssembler) => "kickass",
            Dialect::Assembly(AsmVariant::Ca65) => "ca65",
            Dialect::Assembly(AsmVariant::Tass64) => "64tass",
            Dialect::C => "c",
            Dialect::QBasicLike => "qbasic",
            Dialect::PdsxBasicLike => "pdsx",
            Dialect::Pseudocode => "pseudo",
        }
    }

    /// Usual file extension for output in this dialect.
    pub fn extension(&self) -> &'static str {
        match self {
            Dialect::Assembly(AsmVariant::Ca65) => "s",
            Dialect::Assembly(_) => "asm",
            Dialect::C => "c",
            Dialect::QBasicLike => "bas",
            Dialect::PdsxBasicLike => "pdsx",
            Dialect::Pseudocode => "txt",
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asm" | "acme" => Ok(Dialect::Assembly(AsmVariant::Acme)),
            "kickass" | "kickassembler" => Ok(Dialect::Assembly(AsmVariant::KickAssembler)),
            "ca65" => Ok(Dialect::Assembly(AsmVariant::Ca65)),
            "64tass" | "tass" => Ok(Dialect::Assembly(AsmVariant::Tass64)),
            "c" => Ok(Dialect::C),
            "qbasic" => Ok(Dialect::QBasicLike),
            "pdsx" => Ok(Dialect::PdsxBasicLike),
            "pseudo" | "pseudocode" => Ok(Dialect::Pseudocode),
            other => Err(format!(
                "unknown dialect '{}', expected one of: {}",
                other,
                Dialect::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Emitter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Output dialect.
    pub dialect: Dialect,
    /// Annotate each instruction with its address.
    pub show_addresses: bool,
    /// Annotate each instruction with its bytes.
    pub show_bytes: bool,
    /// Start with a descriptive header.
    pub header: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            show_addresses: true,
            show_bytes: false,
            header: true,
        }
    }
}

/// Render a decompilation.
pub fn render(
    decompilation: &Decompilation,
    symbols: &dyn SymbolSource,
    options: &EmitOptions,
) -> String {
    let ctx = EmitContext::new(decompilation, symbols, options);
    match options.dialect {
        Dialect::Assembly(variant) => drive(&mut assembly::AssemblyWriter::new(variant), &ctx),
        Dialect::C => drive(&mut c::CWriter::new(), &ctx),
        Dialect::QBasicLike => drive(&mut qbasic::QBasicWriter::new(), &ctx),
        Dialect::PdsxBasicLike => drive(&mut pdsx::PdsxWriter::new(), &ctx),
        Dialect::Pseudocode => drive(&mut pseudocode::PseudocodeWriter::new(), &ctx),
    }
}

/// Output text under construction.
#[derive(Debug, Default)]
pub(crate) struct Output {
    text: String,
}

impl Output {
    pub(crate) fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref().trim_end());
        self.text.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with("\n\n") {
            self.text.push('\n');
        }
    }

    fn finish(mut self) -> String {
        while self.text.ends_with("\n\n") {
            self.text.pop();
        }
        self.text
    }
}

/// One output dialect.
pub(crate) trait DialectWriter {
    /// Header, constants and prelude.
    fn prologue(&mut self, ctx: &EmitContext<'_>, out: &mut Output);

    /// One tokenized BASIC line.
    fn basic_line(&mut self, ctx: &EmitContext<'_>, out: &mut Output, line: &BasicLine);

    /// The end-of-program marker.
    fn basic_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]);

    /// Start of a machine region.
    fn region_start(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion);

    /// One decoded item inside a region.
    fn item(&mut self, ctx: &EmitContext<'_>, out: &mut Output, item: &Decoded);

    /// End of a machine region.
    fn region_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion);

    /// Bytes outside BASIC and machine regions.
    fn data(&mut self, ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]);

    /// Anything after the last segment.
    fn epilogue(&mut self, _ctx: &EmitContext<'_>, _out: &mut Output) {}
}

fn drive(writer: &mut dyn DialectWriter, ctx: &EmitContext<'_>) -> String {
    let mut out = Output::default();
    let image = &ctx.decompilation.image;

    writer.prologue(ctx, &mut out);
    for segment in layout(ctx.decompilation) {
        match segment {
            Segment::BasicLine(line) => writer.basic_line(ctx, &mut out, line),
            Segment::BasicEnd { offset, bytes } => {
                writer.basic_end(ctx, &mut out, image.address_of(offset), bytes)
            }
            Segment::Region(region) | Segment::Embedded(region) => {
                writer.region_start(ctx, &mut out, region);
                for item in &region.instructions {
                    writer.item(ctx, &mut out, item);
                }
                writer.region_end(ctx, &mut out, region);
            }
            Segment::Data { offset, bytes } => {
                writer.data(ctx, &mut out, image.address_of(offset), bytes)
            }
        }
    }
    writer.epilogue(ctx, &mut out);

    out.finish()
}

/// Identifiers the emitted code uses for itself.
const RESERVED: &[&str] = &[
    "A", "X", "Y", "C", "Z", "N", "V", "I", "D", "P", "S", "T", "SP", "MEM", "WORD", "PUSH",
    "PULL", "CALL", "JUMP", "CMP", "BIT", "ADC", "SBC", "ASL", "LSR", "ROL", "ROR", "AND", "OR",
    "XOR", "NOT", "MOD", "IF", "THEN", "ELSE", "FOR", "TO", "NEXT", "GOTO", "GOSUB", "RETURN",
    "END", "STOP", "REM", "DATA", "READ", "PRINT", "INPUT", "GET", "LET", "DIM", "POKE", "PEEK",
    "OPEN", "CLOSE", "LOAD", "SAVE", "RUN", "LIST", "NEW", "CLR", "CLS", "CONST", "SCREEN",
    "WAIT", "ON", "SYS", "INT", "CHAR", "VOID", "DO", "WHILE", "BREAK", "CONTINUE", "SWITCH",
    "CASE", "DEFAULT", "STATIC", "EXTERN", "MAIN",
];

fn is_reserved(name: &str) -> bool {
    RESERVED.iter().any(|word| word.eq_ignore_ascii_case(name))
}

/// Turn a symbol name into an identifier usable in every dialect.
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if ident.is_empty() {
        ident.push_str("SYM");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Label name for an address.
pub fn label_name(address: u16) -> String {
    format!("L{:04X}", address)
}

/// Whether an instruction transfers control to its operand.
pub(crate) fn is_control_transfer(instr: &Instruction) -> bool {
    (matches!(instr.mnemonic, "JSR" | "JMP") && instr.mode == AddressingMode::Absolute)
        || instr.mode == AddressingMode::Relative
}

/// Operand text in conventional 6502 syntax.
///
/// `name` replaces the numeric address when given.
pub(crate) fn operand_text(instr: &Instruction, name: Option<&str>, accumulator: &str) -> String {
    let target = instr.target_address().unwrap_or(0);
    let address = match name {
        Some(name) => name.to_string(),
        None => match instr.mode {
            AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => format!("${:02X}", target),
            _ => format!("${:04X}", target),
        },
    };

    match instr.mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => accumulator.to_string(),
        AddressingMode::Immediate => format!("#${:02X}", instr.operand.map(|o| o.value()).unwrap_or(0)),
        AddressingMode::ZeroPage | AddressingMode::Absolute | AddressingMode::Relative => address,
        AddressingMode::ZeroPageX | AddressingMode::AbsoluteX => format!("{},X", address),
        AddressingMode::ZeroPageY | AddressingMode::AbsoluteY => format!("{},Y", address),
        AddressingMode::Indirect => format!("({})", address),
        AddressingMode::IndirectX => format!("({},X)", address),
        AddressingMode::IndirectY => format!("({}),Y", address),
    }
}

/// Instruction text with numeric operands, e.g. `ANC #$01`.
pub(crate) fn instruction_text(instr: &Instruction) -> String {
    let operand = operand_text(instr, None, "A");
    if operand.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operand)
    }
}

/// Space-separated hex bytes.
pub(crate) fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pad `code` and append a comment.
pub(crate) fn with_comment(code: &str, comment: Option<String>, prefix: &str, suffix: &str) -> String {
    match comment {
        Some(comment) if !comment.is_empty() => {
            format!("{:<31} {} {}{}", code, prefix, comment, suffix)
        }
        _ => code.to_string(),
    }
}

/// Everything writers need to know about the program being written.
pub(crate) struct EmitContext<'a> {
    pub decompilation: &'a Decompilation,
    pub options: &'a EmitOptions,
    symbols: &'a dyn SymbolSource,
    labels: BTreeSet<u16>,
    names: BTreeMap<u16, String>,
}

impl<'a> EmitContext<'a> {
    fn new(
        decompilation: &'a Decompilation,
        symbols: &'a dyn SymbolSource,
        options: &'a EmitOptions,
    ) -> Self {
        let regions = decompilation.classification.regions();

        let starts: HashSet<u16> = regions
            .iter()
            .flat_map(|region| region.instructions.iter().map(Decoded::address))
            .collect();

        let mut labels: BTreeSet<u16> = regions
            .iter()
            .filter(|region| !region.is_empty())
            .map(|region| region.start_address)
            .collect();
        let mut referenced = BTreeSet::new();

        for instr in regions
            .iter()
            .flat_map(|region| region.instructions.iter())
            .filter_map(Decoded::instruction)
        {
            let Some(target) = instr.target_address() else {
                continue;
            };
            if is_control_transfer(instr) && starts.contains(&target) {
                labels.insert(target);
            } else {
                referenced.insert(target);
            }
        }

        let mut taken: HashSet<String> = labels.iter().map(|&a| label_name(a)).collect();
        let mut names = BTreeMap::new();
        for address in referenced {
            if labels.contains(&address) {
                continue;
            }
            let Some(entry) = symbols.resolve(address) else {
                continue;
            };

            let mut ident = sanitize_identifier(&entry.name);
            if is_reserved(&ident) || taken.contains(&ident) {
                ident = format!("{}_{:04X}", ident, address);
            }
            taken.insert(ident.clone());
            names.insert(address, ident);
        }

        Self {
            decompilation,
            options,
            symbols,
            labels,
            names,
        }
    }

    /// Label at an address, if one was assigned.
    pub fn label(&self, address: u16) -> Option<String> {
        self.labels.contains(&address).then(|| label_name(address))
    }

    /// Symbol identifier for an operand address.
    pub fn name(&self, address: u16) -> Option<&str> {
        self.names.get(&address).map(String::as_str)
    }

    /// Label, then symbol, for an operand address.
    pub fn operand_name(&self, address: u16) -> Option<String> {
        self.label(address)
            .or_else(|| self.name(address).map(str::to_string))
    }

    /// Symbols used by the program, in address order.
    pub fn used_symbols(&self) -> Vec<(&str, &SymbolEntry)> {
        self.names
            .iter()
            .filter_map(|(&address, ident)| {
                self.symbols
                    .resolve(address)
                    .map(|entry| (ident.as_str(), entry))
            })
            .collect()
    }

    /// Region whose first byte is at `address`.
    pub fn region_at(&self, address: u16) -> Option<&'a MachineRegion> {
        self.decompilation
            .classification
            .regions()
            .iter()
            .find(|region| !region.is_empty() && region.start_address == address)
    }

    /// Header comment lines.
    pub fn header_lines(&self) -> Vec<String> {
        if !self.options.header {
            return Vec::new();
        }
        let image = &self.decompilation.image;
        vec![
            "decompiled by decomp64".to_string(),
            format!(
                "load address: ${:04X}, {} bytes",
                image.load_address,
                image.payload.len()
            ),
            format!("classification: {}", self.decompilation.classification.kind()),
        ]
    }

    /// Warning comment lines.
    pub fn warning_lines(&self) -> Vec<String> {
        self.decompilation
            .warnings
            .iter()
            .map(warning_text)
            .collect()
    }

    /// Title for a region, e.g. `machine code $0810-$0815, SYS 2064 in line 10`.
    pub fn region_title(&self, region: &MachineRegion) -> String {
        let last = region.end_address.wrapping_sub(1);
        let mut title = format!("machine code ${:04X}-${:04X}", region.start_address, last);
        if let Some(origin) = region.origin {
            title.push_str(&format!(
                ", SYS {} in line {}",
                origin.target_address, origin.source_line
            ));
        }
        title
    }

    /// The boundary note when it needs attention before the region starts.
    pub fn region_warning(&self, region: &MachineRegion) -> Option<String> {
        if region.boundary.is_uncertain() || self.decompilation.in_basic_text(region) {
            self.region_boundary_note(region)
        } else {
            None
        }
    }

    /// How a region ends, for a closing comment.
    pub fn region_boundary_note(&self, region: &MachineRegion) -> Option<String> {
        if region.origin.is_none() {
            return None;
        }
        let note = match region.boundary {
            RegionBoundary::Rts => "ends at RTS".to_string(),
            RegionBoundary::WarmStartJump => "ends at JMP to BASIC warm start".to_string(),
            RegionBoundary::NextEntry => "ends at next SYS entry point".to_string(),
            RegionBoundary::ScanLimit => {
                "WARNING: boundary uncertain, scan limit reached".to_string()
            }
            RegionBoundary::EndOfBuffer => {
                "WARNING: boundary uncertain, no RTS before end of program".to_string()
            }
            RegionBoundary::BasicEnd => {
                "WARNING: boundary uncertain, no RTS before end of BASIC text".to_string()
            }
        };
        if self.decompilation.in_basic_text(region) {
            return Some(format!("{}, overlaps BASIC text", note));
        }
        Some(note)
    }

    /// Address and byte annotations for an item, plus an optional note.
    pub fn annotation(&self, item: &Decoded, note: Option<&str>) -> Option<String> {
        let mut parts = Vec::new();
        if self.options.show_addresses {
            parts.push(format!("${:04X}", item.address()));
        }
        if self.options.show_bytes {
            parts.push(hex_dump(&item.bytes()));
        }
        if let Some(note) = note {
            parts.push(note.to_string());
        }
        (!parts.is_empty()).then(|| parts.join("  "))
    }
}

/// Position of a high-level writer inside the payload.
#[derive(Debug, Default)]
pub(crate) struct RegionCursor {
    current: Option<(u16, usize)>,
    /// Flag state for branch rendering.
    pub tracker: lower::FlagTracker,
}

impl RegionCursor {
    pub(crate) fn enter(&mut self, region: &MachineRegion) {
        self.current = Some((region.start_address, region.len()));
        self.tracker.reset();
    }

    pub(crate) fn leave(&mut self) {
        self.current = None;
        self.tracker.reset();
    }

    /// Whether `address` lies in the region being written.
    pub(crate) fn contains(&self, address: u16) -> bool {
        self.current.is_some_and(|(start, len)| {
            usize::from(address.wrapping_sub(start)) < len
        })
    }

    /// Lower an item and keep the flag state current.
    ///
    /// Returns `None` for raw data. Labels reset the flag state since
    /// control can arrive from elsewhere. Branches leave the state as it
    /// is, so `tracker.test` still describes them after this call.
    pub(crate) fn step(&mut self, ctx: &EmitContext<'_>, item: &Decoded) -> Option<Statement> {
        if ctx.label(item.address()).is_some() {
            self.tracker.reset();
        }
        let Some(instr) = item.instruction() else {
            self.tracker.reset();
            return None;
        };

        let statement = lower(instr);
        self.tracker.observe(&statement);
        Some(statement)
    }
}

/// Comment text for an illegal instruction or raw byte.
pub(crate) fn opaque_note(item: &Decoded) -> String {
    match item {
        Decoded::Op(instr) if !instr.stable => {
            format!("{} (illegal, unstable)", instruction_text(instr))
        }
        Decoded::Op(instr) => format!("{} (illegal)", instruction_text(instr)),
        Decoded::RawData { byte, .. } if lookup(*byte).is_jam() => "JAM".to_string(),
        Decoded::RawData { .. } => "data".to_string(),
    }
}

fn warning_text(warning: &DecompileWarning) -> String {
    format!("WARNING {}", warning)
}
