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

//! QBasic-style output.
//!
//! Structured BASIC with labels instead of line numbers. Memory goes
//! through `PEEK`/`POKE`, calls outside the decoded code through
//! `CALL ABSOLUTE`. Flags are ordinary variables holding 0 or 1.

use super::lower::{
    AluOp, BranchTest, Flag, Location, Memory, Register, Relation, ShiftOp, Source,
};
use super::{
    hex_dump, opaque_note, with_comment, DialectWriter, EmitContext, Output, RegionCursor,
    Statement,
};
use crate::basic::BasicLine;
use crate::disasm::{Decoded, MachineRegion};

const INDENT: &str = "    ";
const BYTES_PER_ROW: usize = 8;

const PRELUDE: &[&str] = &[
    "DEFINT A-Z",
    "DIM SHARED A, X, Y, P, S, T",
    "DIM SHARED C, Z, N, V, I, D",
    "S = &HFF",
];

fn comment(text: &str) -> String {
    format!("' {}", text)
}

fn hex(value: u16) -> String {
    if value < 0x100 {
        format!("&H{:02X}", value)
    } else {
        format!("&H{:04X}", value)
    }
}

fn register(register: Register) -> &'static str {
    match register {
        Register::A => "A",
        Register::X => "X",
        Register::Y => "Y",
        Register::Sp => "S",
        Register::Status => "P",
    }
}

fn flag(flag: Flag) -> &'static str {
    match flag {
        Flag::Carry => "C",
        Flag::Zero => "Z",
        Flag::Interrupt => "I",
        Flag::Decimal => "D",
        Flag::Overflow => "V",
        Flag::Negative => "N",
    }
}

/// QBasic writer.
#[derive(Debug, Default)]
pub struct QBasicWriter {
    cursor: RegionCursor,
}

impl QBasicWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self::default()
    }

    fn number(&self, ctx: &EmitContext<'_>, address: u16) -> String {
        ctx.name(address)
            .map(str::to_string)
            .unwrap_or_else(|| hex(address))
    }

    /// Effective address expression of a memory operand.
    fn address(&self, ctx: &EmitContext<'_>, memory: Memory) -> String {
        match memory {
            Memory::Direct {
                address,
                index: None,
                ..
            } => self.number(ctx, address),
            Memory::Direct {
                address,
                index: Some(index),
                zero_page: true,
            } => format!("({} + {}) AND &HFF", self.number(ctx, address), register(index)),
            Memory::Direct {
                address,
                index: Some(index),
                zero_page: false,
            } => format!("{} + {}", self.number(ctx, address), register(index)),
            Memory::IndexedIndirect { pointer } => {
                let base = self.number(ctx, u16::from(pointer));
                format!(
                    "PEEK(({0} + X) AND &HFF) + 256 * PEEK(({0} + X + 1) AND &HFF)",
                    base
                )
            }
            Memory::IndirectIndexed { pointer } => {
                let low = self.number(ctx, u16::from(pointer));
                let high = hex(u16::from(pointer.wrapping_add(1)));
                format!("PEEK({}) + 256 * PEEK({}) + Y", low, high)
            }
        }
    }

    fn read(&self, ctx: &EmitContext<'_>, location: Location) -> String {
        match location {
            Location::Register(reg) => register(reg).to_string(),
            Location::Memory(memory) => format!("PEEK({})", self.address(ctx, memory)),
        }
    }

    fn write(&self, ctx: &EmitContext<'_>, location: Location, value: &str) -> String {
        match location {
            Location::Register(reg) => format!("{} = {}", register(reg), value),
            Location::Memory(memory) => format!("POKE {}, {}", self.address(ctx, memory), value),
        }
    }

    fn source(&self, ctx: &EmitContext<'_>, source: Source) -> String {
        match source {
            Source::Immediate(value) => hex(u16::from(value)),
            Source::Memory(memory) => self.read(ctx, Location::Memory(memory)),
        }
    }

    fn condition(&self, ctx: &EmitContext<'_>, test: BranchTest) -> String {
        let relate = |lhs: String, rhs: String, relation: Relation| match relation {
            Relation::Equal => format!("{} = {}", lhs, rhs),
            Relation::NotEqual => format!("{} <> {}", lhs, rhs),
            Relation::Less => format!("{} < {}", lhs, rhs),
            Relation::GreaterOrEqual => format!("{} >= {}", lhs, rhs),
            Relation::Negative => format!("{} >= &H80", lhs),
            Relation::NonNegative => format!("{} < &H80", lhs),
        };

        match test {
            BranchTest::Compare {
                register: reg,
                source,
                relation,
            } => relate(register(reg).to_string(), self.source(ctx, source), relation),
            BranchTest::Value { subject, relation } => {
                relate(self.read(ctx, subject), "0".to_string(), relation)
            }
            BranchTest::Flag { flag: f, set } => format!("{} = {}", flag(f), u8::from(set)),
        }
    }

    /// Transfer to `target` without coming back.
    fn goto(&self, ctx: &EmitContext<'_>, target: u16) -> String {
        match ctx.label(target) {
            Some(label) => format!("GOTO {}", label),
            None => format!("CALL ABSOLUTE({}): RETURN", self.number(ctx, target)),
        }
    }

    fn statement(&self, ctx: &EmitContext<'_>, statement: Statement) -> String {
        match statement {
            Statement::Load {
                register: reg,
                source,
            } => format!("{} = {}", register(reg), self.source(ctx, source)),
            Statement::Store {
                register: reg,
                memory,
            } => self.write(ctx, Location::Memory(memory), register(reg)),
            Statement::Transfer { from, to } => format!("{} = {}", register(to), register(from)),
            Statement::Alu { op, source } => {
                let value = self.source(ctx, source);
                match op {
                    AluOp::And => format!("A = A AND {}", value),
                    AluOp::Or => format!("A = A OR {}", value),
                    AluOp::Xor => format!("A = A XOR {}", value),
                    AluOp::AddWithCarry => {
                        format!("T = A + {} + C: C = -(T > &HFF): A = T AND &HFF", value)
                    }
                    AluOp::SubtractWithBorrow => {
                        format!("T = A - {} - 1 + C: C = -(T >= 0): A = T AND &HFF", value)
                    }
                }
            }
            Statement::Compare {
                register: reg,
                source,
            } => {
                let value = self.source(ctx, source);
                let reg = register(reg);
                format!("C = -({0} >= {1}): Z = -({0} = {1})", reg, value)
            }
            Statement::BitTest { memory } => format!(
                "T = {}: Z = -((A AND T) = 0): N = -(T >= &H80): V = (T \\ &H40) AND 1",
                self.read(ctx, Location::Memory(memory))
            ),
            Statement::Shift { op, target } => {
                let value = self.read(ctx, target);
                match op {
                    ShiftOp::ShiftLeft => format!(
                        "T = {} * 2: C = -(T > &HFF): {}",
                        value,
                        self.write(ctx, target, "T AND &HFF")
                    ),
                    ShiftOp::ShiftRight => format!(
                        "C = {0} AND 1: {1}",
                        value,
                        self.write(ctx, target, &format!("{} \\ 2", value))
                    ),
                    ShiftOp::RotateLeft => format!(
                        "T = {} * 2 + C: C = -(T > &HFF): {}",
                        value,
                        self.write(ctx, target, "T AND &HFF")
                    ),
                    ShiftOp::RotateRight => format!(
                        "T = {} + 256 * C: C = T AND 1: {}",
                        value,
                        self.write(ctx, target, "T \\ 2")
                    ),
                }
            }
            Statement::Increment(target) => {
                let value = format!("({} + 1) AND &HFF", self.read(ctx, target));
                self.write(ctx, target, &value)
            }
            Statement::Decrement(target) => {
                let value = format!("({} + &HFF) AND &HFF", self.read(ctx, target));
                self.write(ctx, target, &value)
            }
            Statement::SetFlag(f) => format!("{} = 1", flag(f)),
            Statement::ClearFlag(f) => format!("{} = 0", flag(f)),
            Statement::Push(reg) => format!("POKE &H100 + S, {}: S = S - 1", register(reg)),
            Statement::Pull(reg) => format!("S = S + 1: {} = PEEK(&H100 + S)", register(reg)),
            Statement::Jump(target) => self.goto(ctx, target),
            Statement::JumpIndirect(pointer) => format!(
                "CALL ABSOLUTE(PEEK({}) + 256 * PEEK({})): RETURN",
                self.number(ctx, pointer),
                hex(pointer.wrapping_add(1))
            ),
            Statement::Call(target) => match ctx.label(target) {
                Some(label) => format!("GOSUB {}", label),
                None => format!("CALL ABSOLUTE({})", self.number(ctx, target)),
            },
            Statement::Return => "RETURN".to_string(),
            Statement::ReturnFromInterrupt => format!("RETURN {}", comment("RTI")),
            Statement::Branch { condition, target } => {
                let test = self.cursor.tracker.test(condition);
                format!(
                    "IF {} THEN {}",
                    self.condition(ctx, test),
                    self.goto(ctx, target)
                )
            }
            Statement::Break => "STOP".to_string(),
            Statement::Nop => comment("NOP"),
            Statement::Opaque => String::new(),
        }
    }
}

impl DialectWriter for QBasicWriter {
    fn prologue(&mut self, ctx: &EmitContext<'_>, out: &mut Output) {
        for line in ctx.header_lines().iter().chain(ctx.warning_lines().iter()) {
            out.line(comment(line));
        }
        out.blank();
        for line in PRELUDE {
            out.line(line);
        }
        out.blank();

        let symbols = ctx.used_symbols();
        for (ident, entry) in &symbols {
            let constant = format!("CONST {} = {}", ident, hex(entry.address));
            out.line(with_comment(&constant, entry.description.clone(), "'", ""));
        }
        if !symbols.is_empty() {
            out.blank();
        }
    }

    fn basic_line(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, line: &BasicLine) {
        let mut text = line.to_string();
        if line.truncated {
            text.push_str("  (truncated)");
        }
        out.line(comment(&text));
    }

    fn basic_end(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, _address: u16, _bytes: &[u8]) {
        out.line(comment("end of BASIC program"));
    }

    fn region_start(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.cursor.enter(region);
        out.blank();
        out.line(comment(&format!("---- {} ----", ctx.region_title(region))));
        if let Some(note) = ctx.region_warning(region) {
            out.line(comment(&note));
        }
    }

    fn item(&mut self, ctx: &EmitContext<'_>, out: &mut Output, item: &Decoded) {
        if let Some(label) = ctx.label(item.address()) {
            out.line(format!("{}:", label));
        }

        let code = match self.cursor.step(ctx, item) {
            Some(statement) if statement != Statement::Opaque => self.statement(ctx, statement),
            _ => comment(&format!("{}: {}", opaque_note(item), hex_dump(&item.bytes()))),
        };
        let code = format!("{}{}", INDENT, code);
        out.line(with_comment(&code, ctx.annotation(item, None), "'", ""));
    }

    fn region_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.cursor.leave();
        let text = match ctx.region_boundary_note(region) {
            Some(note) => format!("---- end of machine code, {} ----", note),
            None => "---- end of machine code ----".to_string(),
        };
        out.line(comment(&text));
        out.blank();
    }

    fn data(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]) {
        out.blank();
        out.line(format!("D{:04X}:", address));
        for row in bytes.chunks(BYTES_PER_ROW) {
            let values: Vec<String> = row.iter().map(|&b| hex(u16::from(b))).collect();
            out.line(format!("{}DATA {}", INDENT, values.join(", ")));
        }
        out.blank();
    }
}

#[cfg(test)]
mod tests {
    use crate::classifier::{classify, DecompileOptions};
    use crate::emit::{render, Dialect, EmitOptions};
    use crate::image::ProgramImage;
    use crate::symbols::{builtin_table, NoSymbols, SymbolSource};

    fn qbasic_text(load: u16, payload: Vec<u8>, symbols: &dyn SymbolSource) -> String {
        let decompilation = classify(ProgramImage::new(load, payload), &DecompileOptions::default());
        let options = EmitOptions {
            dialect: Dialect::QBasicLike,
            show_addresses: false,
            header: false,
            ..EmitOptions::default()
        };
        render(&decompilation, symbols, &options)
    }

    #[test]
    fn test_peek_poke_and_constants() {
        // LDA #$01 / STA $D020 / RTS
        let text = qbasic_text(0xC000, vec![0xA9, 0x01, 0x8D, 0x20, 0xD0, 0x60], &builtin_table());
        assert!(text.contains("CONST EXTCOL = &HD020"));
        assert!(text.contains("LC000:\n    A = &H01\n"));
        assert!(text.contains("    POKE EXTCOL, A\n"));
        assert!(text.contains("    RETURN\n"));
    }

    #[test]
    fn test_loop_and_call() {
        // LDX #$08 / loop: JSR $FFD2 / DEX / BNE loop / RTS
        let payload = vec![0xA2, 0x08, 0x20, 0xD2, 0xFF, 0xCA, 0xD0, 0xFA, 0x60];
        let text = qbasic_text(0xC000, payload, &NoSymbols);
        assert!(text.contains("LC002:\n    CALL ABSOLUTE(&HFFD2)\n"));
        assert!(text.contains("    X = (X + &HFF) AND &HFF\n"));
        assert!(text.contains("    IF X <> 0 THEN GOTO LC002\n"));
    }

    #[test]
    fn test_internal_subroutine() {
        // JSR sub / RTS / sub: INC $D020 / RTS
        let payload = vec![0x20, 0x04, 0xC0, 0x60, 0xEE, 0x20, 0xD0, 0x60];
        let text = qbasic_text(0xC000, payload, &NoSymbols);
        assert!(text.contains("    GOSUB LC004\n"));
        assert!(text.contains("LC004:\n    POKE &HD020, (PEEK(&HD020) + 1) AND &HFF\n"));
    }

    #[test]
    fn test_data_statements() {
        let payload = vec![0x09, 0x08, 0x0A, 0x00, 0x99, 0x00, 0x00, 0x00, 0x01, 0xFF];
        let text = qbasic_text(0x0801, payload, &NoSymbols);
        assert!(text.contains("' 10 PRINT\n"));
        assert!(text.contains("D0809:\n    DATA &H01, &HFF\n"));
    }
}
