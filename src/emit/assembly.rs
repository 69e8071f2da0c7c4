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

//! Assembly source output.
//!
//! The output assembles back to the original bytes: BASIC lines, data and
//! illegal opcodes are written as byte directives, everything else as
//! instructions. Operands use labels and symbol names where known.
//!
//! Code decoded from inside the BASIC text is already emitted as BASIC
//! bytes, so it is listed in comments and its labels become constants.

use super::{
    is_control_transfer, opaque_note, operand_text, with_comment, AsmVariant,
    DialectWriter, EmitContext, Output,
};
use crate::basic::BasicLine;
use crate::cpu::AddressingMode;
use crate::disasm::{Decoded, Instruction, MachineRegion};

const INDENT: &str = "        ";
const BYTES_PER_ROW: usize = 16;

impl AsmVariant {
    /// Line comment prefix.
    pub fn comment_prefix(self) -> &'static str {
        match self {
            AsmVariant::KickAssembler => "//",
            AsmVariant::Acme | AsmVariant::Ca65 | AsmVariant::Tass64 => ";",
        }
    }

    /// Byte data directive.
    pub fn byte_directive(self) -> &'static str {
        match self {
            AsmVariant::Acme => "!byte",
            AsmVariant::KickAssembler | AsmVariant::Ca65 | AsmVariant::Tass64 => ".byte",
        }
    }

    /// Origin directive for an address.
    pub fn origin(self, address: u16) -> String {
        match self {
            AsmVariant::Ca65 => format!(".org ${:04X}", address),
            AsmVariant::Acme | AsmVariant::KickAssembler | AsmVariant::Tass64 => {
                format!("* = ${:04X}", address)
            }
        }
    }

    /// Constant definition.
    pub fn constant(self, name: &str, value: &str) -> String {
        match self {
            AsmVariant::KickAssembler => format!(".const {} = {}", name, value),
            AsmVariant::Acme | AsmVariant::Ca65 | AsmVariant::Tass64 => {
                format!("{} = {}", name, value)
            }
        }
    }

    /// Label definition line.
    pub fn label(self, name: &str) -> String {
        match self {
            AsmVariant::KickAssembler | AsmVariant::Ca65 => format!("{}:", name),
            AsmVariant::Acme | AsmVariant::Tass64 => name.to_string(),
        }
    }

    /// Force the 16-bit form of an absolute-mode instruction whose operand
    /// would also fit the zero page.
    fn absolute_width(self, mnemonic: &str, operand: String) -> (String, String) {
        match self {
            AsmVariant::Acme => (format!("{}+2", mnemonic), operand),
            AsmVariant::KickAssembler => (format!("{}.abs", mnemonic), operand),
            AsmVariant::Ca65 => (mnemonic.to_string(), format!("a:{}", operand)),
            AsmVariant::Tass64 => (mnemonic.to_string(), format!("@w {}", operand)),
        }
    }

    /// Operand written for accumulator mode.
    fn accumulator(self) -> &'static str {
        match self {
            AsmVariant::Ca65 | AsmVariant::Tass64 => "A",
            AsmVariant::Acme | AsmVariant::KickAssembler => "",
        }
    }
}

/// Assembly writer for one assembler syntax.
pub struct AssemblyWriter {
    variant: AsmVariant,
    /// Inside a region that overlaps the BASIC text.
    embedded: bool,
}

/// An absolute operand an assembler would shorten to zero page.
fn zero_page_sized(instr: &Instruction) -> bool {
    matches!(
        instr.mode,
        AddressingMode::Absolute | AddressingMode::AbsoluteX | AddressingMode::AbsoluteY
    ) && !matches!(instr.mnemonic, "JMP" | "JSR")
        && instr.target_address().is_some_and(|target| target < 0x100)
}

impl AssemblyWriter {
    /// Create a writer.
    pub fn new(variant: AsmVariant) -> Self {
        Self {
            variant,
            embedded: false,
        }
    }

    /// A code line, commented out inside embedded regions.
    fn code_line(&self, out: &mut Output, code: &str, annotation: Option<String>) {
        if self.embedded {
            out.line(self.annotated(&self.comment(code.trim_start()), annotation));
        } else {
            out.line(self.annotated(code, annotation));
        }
    }

    fn comment(&self, text: &str) -> String {
        format!("{} {}", self.variant.comment_prefix(), text)
    }

    fn directive(&self, bytes: &[u8]) -> String {
        let values: Vec<String> = bytes.iter().map(|b| format!("${:02X}", b)).collect();
        format!("{}{} {}", INDENT, self.variant.byte_directive(), values.join(","))
    }

    fn annotated(&self, code: &str, comment: Option<String>) -> String {
        with_comment(code, comment, self.variant.comment_prefix(), "")
    }

    /// Byte rows, each annotated with its address.
    fn rows(&self, ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]) {
        for (index, row) in bytes.chunks(BYTES_PER_ROW).enumerate() {
            let row_address = address.wrapping_add((index * BYTES_PER_ROW) as u16);
            let comment = ctx
                .options
                .show_addresses
                .then(|| format!("${:04X}", row_address));
            out.line(self.annotated(&self.directive(row), comment));
        }
    }
}

impl DialectWriter for AssemblyWriter {
    fn prologue(&mut self, ctx: &EmitContext<'_>, out: &mut Output) {
        for line in ctx.header_lines().iter().chain(ctx.warning_lines().iter()) {
            out.line(self.comment(line));
        }
        out.blank();

        let symbols = ctx.used_symbols();
        for (ident, entry) in &symbols {
            let value = if entry.address < 0x100 {
                format!("${:02X}", entry.address)
            } else {
                format!("${:04X}", entry.address)
            };
            out.line(self.annotated(
                &self.variant.constant(ident, &value),
                entry.description.clone(),
            ));
        }
        if !symbols.is_empty() {
            out.blank();
        }

        out.line(self.variant.origin(ctx.decompilation.image.load_address));
        out.blank();
    }

    fn basic_line(&mut self, ctx: &EmitContext<'_>, out: &mut Output, line: &BasicLine) {
        let mut text = line.to_string();
        if line.truncated {
            text.push_str("  (truncated)");
        }
        out.line(self.comment(&text));

        let payload = &ctx.decompilation.image.payload;
        let bytes = &payload[line.byte_offset..line.byte_offset + line.byte_len];
        self.rows(ctx, out, line.address, bytes);
    }

    fn basic_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]) {
        out.line(self.comment("end of BASIC program"));
        self.rows(ctx, out, address, bytes);
    }

    fn region_start(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.embedded = ctx.decompilation.in_basic_text(region);
        out.blank();
        out.line(self.comment(&format!("---- {} ----", ctx.region_title(region))));
        if let Some(note) = ctx.region_warning(region) {
            out.line(self.comment(&note));
        }
    }

    fn item(&mut self, ctx: &EmitContext<'_>, out: &mut Output, item: &Decoded) {
        if let Some(label) = ctx.label(item.address()) {
            if self.embedded {
                let value = format!("${:04X}", item.address());
                out.line(self.variant.constant(&label, &value));
            } else {
                out.line(self.variant.label(&label));
            }
        }

        let instr = match item {
            Decoded::Op(instr) if instr.legal => instr,
            _ => {
                let note = opaque_note(item);
                self.code_line(
                    out,
                    &self.directive(&item.bytes()),
                    ctx.annotation(item, Some(&note)),
                );
                return;
            }
        };

        let name = instr.target_address().and_then(|target| {
            if is_control_transfer(instr) {
                ctx.operand_name(target)
            } else {
                ctx.name(target).map(str::to_string)
            }
        });
        let operand = operand_text(instr, name.as_deref(), self.variant.accumulator());
        let (mnemonic, operand) = if zero_page_sized(instr) {
            self.variant.absolute_width(instr.mnemonic, operand)
        } else {
            (instr.mnemonic.to_string(), operand)
        };
        let code = if operand.is_empty() {
            format!("{}{}", INDENT, mnemonic)
        } else {
            format!("{}{} {}", INDENT, mnemonic, operand)
        };
        self.code_line(out, &code, ctx.annotation(item, None));
    }

    fn region_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.embedded = false;
        let text = match ctx.region_boundary_note(region) {
            Some(note) => format!("---- end of machine code, {} ----", note),
            None => "---- end of machine code ----".to_string(),
        };
        out.line(self.comment(&text));
        out.blank();
    }

    fn data(&mut self, ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]) {
        out.blank();
        let last = address.wrapping_add(bytes.len() as u16).wrapping_sub(1);
        out.line(self.comment(&format!("data ${:04X}-${:04X}", address, last)));
        self.rows(ctx, out, address, bytes);
        out.blank();
    }
}
