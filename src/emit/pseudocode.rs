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

//! Pseudocode output.
//!
//! Free-form and meant for reading, not compiling. Each machine region is
//! a `routine` block, memory is written as `[address]`, and branches read
//! as `if A ≠ $0E goto L0812`.

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
const BYTES_PER_ROW: usize = 16;

fn comment(text: &str) -> String {
    format!("// {}", text)
}

fn register(register: Register) -> &'static str {
    match register {
        Register::A => "A",
        Register::X => "X",
        Register::Y => "Y",
        Register::Sp => "SP",
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

/// Pseudocode writer.
#[derive(Debug, Default)]
pub struct PseudocodeWriter {
    cursor: RegionCursor,
}

impl PseudocodeWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self::default()
    }

    fn number(&self, ctx: &EmitContext<'_>, address: u16, zero_page: bool) -> String {
        match ctx.operand_name(address) {
            Some(name) => name,
            None if zero_page => format!("${:02X}", address),
            None => format!("${:04X}", address),
        }
    }

    fn memory(&self, ctx: &EmitContext<'_>, memory: Memory) -> String {
        match memory {
            Memory::Direct {
                address,
                index: None,
                zero_page,
            } => format!("[{}]", self.number(ctx, address, zero_page)),
            Memory::Direct {
                address,
                index: Some(index),
                zero_page,
            } => format!(
                "[{} + {}]",
                self.number(ctx, address, zero_page),
                register(index)
            ),
            Memory::IndexedIndirect { pointer } => format!(
                "[word[{} + X]]",
                self.number(ctx, u16::from(pointer), true)
            ),
            Memory::IndirectIndexed { pointer } => format!(
                "[word[{}] + Y]",
                self.number(ctx, u16::from(pointer), true)
            ),
        }
    }

    fn source(&self, ctx: &EmitContext<'_>, source: Source) -> String {
        match source {
            Source::Immediate(value) => format!("${:02X}", value),
            Source::Memory(memory) => self.memory(ctx, memory),
        }
    }

    fn location(&self, ctx: &EmitContext<'_>, location: Location) -> String {
        match location {
            Location::Register(reg) => register(reg).to_string(),
            Location::Memory(memory) => self.memory(ctx, memory),
        }
    }

    fn condition(&self, ctx: &EmitContext<'_>, test: BranchTest) -> String {
        let relate = |lhs: String, rhs: String, relation: Relation| match relation {
            Relation::Equal => format!("{} = {}", lhs, rhs),
            Relation::NotEqual => format!("{} ≠ {}", lhs, rhs),
            Relation::Less => format!("{} < {}", lhs, rhs),
            Relation::GreaterOrEqual => format!("{} ≥ {}", lhs, rhs),
            Relation::Negative => format!("{} is negative", lhs),
            Relation::NonNegative => format!("{} is positive", lhs),
        };

        match test {
            BranchTest::Compare {
                register: reg,
                source,
                relation,
            } => relate(register(reg).to_string(), self.source(ctx, source), relation),
            BranchTest::Value { subject, relation } => {
                relate(self.location(ctx, subject), "0".to_string(), relation)
            }
            BranchTest::Flag { flag: f, set } => format!("{} = {}", flag(f), u8::from(set)),
        }
    }

    fn statement(&self, ctx: &EmitContext<'_>, statement: Statement) -> String {
        match statement {
            Statement::Load {
                register: reg,
                source,
            } => format!("{} ← {}", register(reg), self.source(ctx, source)),
            Statement::Store {
                register: reg,
                memory,
            } => format!("{} ← {}", self.memory(ctx, memory), register(reg)),
            Statement::Transfer { from, to } => format!("{} ← {}", register(to), register(from)),
            Statement::Alu { op, source } => {
                let value = self.source(ctx, source);
                match op {
                    AluOp::And => format!("A ← A and {}", value),
                    AluOp::Or => format!("A ← A or {}", value),
                    AluOp::Xor => format!("A ← A xor {}", value),
                    AluOp::AddWithCarry => format!("A ← A + {} + C", value),
                    AluOp::SubtractWithBorrow => format!("A ← A - {} - borrow", value),
                }
            }
            Statement::Compare {
                register: reg,
                source,
            } => format!("compare {} with {}", register(reg), self.source(ctx, source)),
            Statement::BitTest { memory } => format!("test bits of {}", self.memory(ctx, memory)),
            Statement::Shift { op, target } => {
                let target = self.location(ctx, target);
                match op {
                    ShiftOp::ShiftLeft => format!("{0} ← {0} << 1", target),
                    ShiftOp::ShiftRight => format!("{0} ← {0} >> 1", target),
                    ShiftOp::RotateLeft => format!("rotate {} left through C", target),
                    ShiftOp::RotateRight => format!("rotate {} right through C", target),
                }
            }
            Statement::Increment(target) => {
                let target = self.location(ctx, target);
                format!("{0} ← {0} + 1", target)
            }
            Statement::Decrement(target) => {
                let target = self.location(ctx, target);
                format!("{0} ← {0} - 1", target)
            }
            Statement::SetFlag(f) => format!("{} ← 1", flag(f)),
            Statement::ClearFlag(f) => format!("{} ← 0", flag(f)),
            Statement::Push(reg) => format!("push {}", register(reg)),
            Statement::Pull(reg) => format!("pull {}", register(reg)),
            Statement::Jump(target) => format!("goto {}", self.number(ctx, target, false)),
            Statement::JumpIndirect(pointer) => {
                format!("goto word[{}]", self.number(ctx, pointer, false))
            }
            Statement::Call(target) => format!("call {}", self.number(ctx, target, false)),
            Statement::Return => "return".to_string(),
            Statement::ReturnFromInterrupt => "return from interrupt".to_string(),
            Statement::Branch { condition, target } => {
                let test = self.cursor.tracker.test(condition);
                format!(
                    "if {} goto {}",
                    self.condition(ctx, test),
                    self.number(ctx, target, false)
                )
            }
            Statement::Break => "break".to_string(),
            Statement::Nop => "nop".to_string(),
            Statement::Opaque => String::new(),
        }
    }
}

impl DialectWriter for PseudocodeWriter {
    fn prologue(&mut self, ctx: &EmitContext<'_>, out: &mut Output) {
        for line in ctx.header_lines().iter().chain(ctx.warning_lines().iter()) {
            out.line(comment(line));
        }
        out.blank();

        let symbols = ctx.used_symbols();
        if !symbols.is_empty() {
            out.line(comment("symbols:"));
            for (ident, entry) in &symbols {
                let mut text = format!("  {} = ${:04X}", ident, entry.address);
                if let Some(description) = &entry.description {
                    text.push_str(&format!("  ({})", description));
                }
                out.line(comment(&text));
            }
            out.blank();
        }
    }

    fn basic_line(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, line: &BasicLine) {
        let mut text = format!("basic {}", line);
        if line.truncated {
            text.push_str("  // truncated");
        }
        out.line(text);
    }

    fn basic_end(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, _address: u16, _bytes: &[u8]) {
        out.line("end basic");
    }

    fn region_start(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.cursor.enter(region);
        out.blank();
        out.line(comment(&ctx.region_title(region)));
        if let Some(note) = ctx.region_warning(region) {
            out.line(comment(&note));
        }
        out.line(format!("routine {}", self.number(ctx, region.start_address, false)));
    }

    fn item(&mut self, ctx: &EmitContext<'_>, out: &mut Output, item: &Decoded) {
        // The routine line already names the region start.
        if let Some(label) = ctx.label(item.address()) {
            if ctx.region_at(item.address()).is_none() {
                out.line(format!("{}:", label));
            }
        }

        let code = match self.cursor.step(ctx, item) {
            Some(statement) if statement != Statement::Opaque => self.statement(ctx, statement),
            _ => comment(&format!("{}: {}", opaque_note(item), hex_dump(&item.bytes()))),
        };
        let code = format!("{}{}", INDENT, code);
        out.line(with_comment(&code, ctx.annotation(item, None), "//", ""));
    }

    fn region_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.cursor.leave();
        match ctx.region_boundary_note(region) {
            Some(note) => out.line(format!("end routine  {}", comment(&note))),
            None => out.line("end routine"),
        }
        out.blank();
    }

    fn data(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]) {
        out.blank();
        for (index, row) in bytes.chunks(BYTES_PER_ROW).enumerate() {
            let row_address = address.wrapping_add((index * BYTES_PER_ROW) as u16);
            out.line(format!("data ${:04X}: {}", row_address, hex_dump(row)));
        }
        out.blank();
    }
}
