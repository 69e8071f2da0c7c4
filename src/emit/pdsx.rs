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

//! Line-numbered BASIC output.
//!
//! Classic C64-style BASIC where every machine instruction becomes one
//! numbered line, and its line number is the instruction address in
//! decimal. Branch targets are therefore plain line numbers and the
//! original BASIC lines can be kept verbatim. Numbers are decimal
//! throughout. Resolved symbols are assigned once in the prologue and
//! used by name in `PEEK`, `POKE` and `SYS` operands.
//!
//! Header and section comments are unnumbered `REM` lines. A machine line
//! whose number is already taken by a BASIC line gets a `REM` saying so.

use super::lower::{
    AluOp, BranchTest, Flag, Location, Memory, Register, Relation, ShiftOp, Source,
};
use super::{
    hex_dump, opaque_note, DialectWriter, EmitContext, Output, RegionCursor, Statement,
};
use crate::basic::BasicLine;
use crate::disasm::{Decoded, MachineRegion};
use std::collections::BTreeSet;

const BYTES_PER_ROW: usize = 8;

fn rem(text: &str) -> String {
    format!("REM {}", text)
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

/// PDSX-style BASIC writer.
#[derive(Debug, Default)]
pub struct PdsxWriter {
    cursor: RegionCursor,
    /// Line numbers of the BASIC listing.
    basic_numbers: BTreeSet<u16>,
}

impl PdsxWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol name of an address, or the address in decimal.
    fn number(&self, ctx: &EmitContext<'_>, address: u16) -> String {
        ctx.name(address)
            .map(str::to_string)
            .unwrap_or_else(|| address.to_string())
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
            } => format!("({}+{}) AND 255", self.number(ctx, address), register(index)),
            Memory::Direct {
                address,
                index: Some(index),
                zero_page: false,
            } => format!("{}+{}", self.number(ctx, address), register(index)),
            Memory::IndexedIndirect { pointer } => format!(
                "PEEK(({0}+X) AND 255)+256*PEEK(({0}+X+1) AND 255)",
                self.number(ctx, u16::from(pointer))
            ),
            Memory::IndirectIndexed { pointer } => format!(
                "PEEK({})+256*PEEK({})+Y",
                self.number(ctx, u16::from(pointer)),
                pointer.wrapping_add(1)
            ),
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
            Location::Register(reg) => format!("{}={}", register(reg), value),
            Location::Memory(memory) => format!("POKE {},{}", self.address(ctx, memory), value),
        }
    }

    fn source(&self, ctx: &EmitContext<'_>, source: Source) -> String {
        match source {
            Source::Immediate(value) => value.to_string(),
            Source::Memory(memory) => self.read(ctx, Location::Memory(memory)),
        }
    }

    fn condition(&self, ctx: &EmitContext<'_>, test: BranchTest) -> String {
        let relate = |lhs: String, rhs: String, relation: Relation| match relation {
            Relation::Equal => format!("{}={}", lhs, rhs),
            Relation::NotEqual => format!("{}<>{}", lhs, rhs),
            Relation::Less => format!("{}<{}", lhs, rhs),
            Relation::GreaterOrEqual => format!("{}>={}", lhs, rhs),
            Relation::Negative => format!("{}>127", lhs),
            Relation::NonNegative => format!("{}<128", lhs),
        };

        match test {
            BranchTest::Compare {
                register: reg,
                source: value,
                relation,
            } => relate(register(reg).to_string(), self.source(ctx, value), relation),
            BranchTest::Value { subject, relation } => {
                relate(self.read(ctx, subject), "0".to_string(), relation)
            }
            BranchTest::Flag { flag: f, set } => format!("{}={}", flag(f), u8::from(set)),
        }
    }

    fn statement(&self, ctx: &EmitContext<'_>, statement: Statement) -> String {
        let labeled = |target: u16| ctx.label(target).is_some();

        match statement {
            Statement::Load {
                register: reg,
                source: value,
            } => format!("{}={}", register(reg), self.source(ctx, value)),
            Statement::Store {
                register: reg,
                memory,
            } => self.write(ctx, Location::Memory(memory), register(reg)),
            Statement::Transfer { from, to } => format!("{}={}", register(to), register(from)),
            Statement::Alu { op, source: value } => {
                let value = self.source(ctx, value);
                match op {
                    AluOp::And => format!("A=A AND {}", value),
                    AluOp::Or => format!("A=A OR {}", value),
                    AluOp::Xor => format!("A=(A OR {0})-(A AND {0})", value),
                    AluOp::AddWithCarry => format!("T=A+{}+C:C=-(T>255):A=T AND 255", value),
                    AluOp::SubtractWithBorrow => {
                        format!("T=A-{}-1+C:C=-(T>=0):A=T AND 255", value)
                    }
                }
            }
            Statement::Compare {
                register: reg,
                source: value,
            } => format!(
                "C=-({0}>={1}):Z=-({0}={1})",
                register(reg),
                self.source(ctx, value)
            ),
            Statement::BitTest { memory } => format!(
                "T={}:Z=-((A AND T)=0):N=-(T>127):V=-((T AND 64)>0)",
                self.read(ctx, Location::Memory(memory))
            ),
            Statement::Shift { op, target } => {
                let value = self.read(ctx, target);
                let write = |value: &str| self.write(ctx, target, value);
                match op {
                    ShiftOp::ShiftLeft => {
                        format!("T={}*2:C=-(T>255):{}", value, write("T AND 255"))
                    }
                    ShiftOp::ShiftRight => format!(
                        "C={0} AND 1:{1}",
                        value,
                        write(&format!("INT({}/2)", value))
                    ),
                    ShiftOp::RotateLeft => {
                        format!("T={}*2+C:C=-(T>255):{}", value, write("T AND 255"))
                    }
                    ShiftOp::RotateRight => format!(
                        "T={}+256*C:C=T AND 1:{}",
                        value,
                        write("INT(T/2)")
                    ),
                }
            }
            Statement::Increment(target) => self.write(
                ctx,
                target,
                &format!("({}+1) AND 255", self.read(ctx, target)),
            ),
            Statement::Decrement(target) => self.write(
                ctx,
                target,
                &format!("({}+255) AND 255", self.read(ctx, target)),
            ),
            Statement::SetFlag(f) => format!("{}=1", flag(f)),
            Statement::ClearFlag(f) => format!("{}=0", flag(f)),
            Statement::Push(reg) => format!("POKE 256+S,{}:S=S-1", register(reg)),
            Statement::Pull(reg) => format!("S=S+1:{}=PEEK(256+S)", register(reg)),
            Statement::Jump(target) if labeled(target) => format!("GOTO {}", target),
            Statement::Jump(target) => format!("SYS {}:RETURN", self.number(ctx, target)),
            Statement::JumpIndirect(pointer) => format!(
                "SYS PEEK({})+256*PEEK({}):RETURN",
                self.number(ctx, pointer),
                pointer.wrapping_add(1)
            ),
            Statement::Call(target) if labeled(target) => format!("GOSUB {}", target),
            Statement::Call(target) => format!("SYS {}", self.number(ctx, target)),
            Statement::Return => "RETURN".to_string(),
            Statement::ReturnFromInterrupt => format!("RETURN:{}", rem("RTI")),
            Statement::Branch { condition: cond, target } => {
                let test = self.condition(ctx, self.cursor.tracker.test(cond));
                if labeled(target) {
                    format!("IF {} THEN {}", test, target)
                } else {
                    format!("IF {} THEN SYS {}:RETURN", test, self.number(ctx, target))
                }
            }
            Statement::Break => "STOP".to_string(),
            Statement::Nop => rem("NOP"),
            Statement::Opaque => String::new(),
        }
    }

    /// A numbered line with an optional trailing `REM`.
    fn numbered(out: &mut Output, number: u16, code: &str, note: Option<String>) {
        match note {
            Some(note) if code.starts_with("REM") => {
                out.line(format!("{} {}  {}", number, code, note))
            }
            Some(note) => out.line(format!("{} {}:{}", number, code, rem(&note))),
            None => out.line(format!("{} {}", number, code)),
        }
    }
}

impl DialectWriter for PdsxWriter {
    fn prologue(&mut self, ctx: &EmitContext<'_>, out: &mut Output) {
        for line in ctx.header_lines().iter().chain(ctx.warning_lines().iter()) {
            out.line(rem(line));
        }
        out.blank();

        let symbols = ctx.used_symbols();
        for (ident, entry) in &symbols {
            let assignment = format!("{}={}", ident, entry.address);
            match &entry.description {
                Some(description) => out.line(format!("{}:{}", assignment, rem(description))),
                None => out.line(assignment),
            }
        }
        if !symbols.is_empty() {
            out.blank();
        }

        self.basic_numbers = ctx
            .decompilation
            .classification
            .basic_lines()
            .iter()
            .map(|line| line.line_number)
            .collect();
    }

    fn basic_line(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, line: &BasicLine) {
        if line.truncated {
            out.line(format!("{}:{}", line, rem("truncated")));
        } else {
            out.line(line.to_string());
        }
    }

    fn basic_end(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, _address: u16, _bytes: &[u8]) {
        out.line(rem("end of BASIC program"));
    }

    fn region_start(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.cursor.enter(region);
        out.blank();
        out.line(rem(&format!("---- {} ----", ctx.region_title(region))));
        if let Some(note) = ctx.region_warning(region) {
            out.line(rem(&note));
        }
    }

    fn item(&mut self, ctx: &EmitContext<'_>, out: &mut Output, item: &Decoded) {
        let number = item.address();
        let clash = self
            .basic_numbers
            .contains(&number)
            .then_some("line number also used by BASIC");

        let code = match self.cursor.step(ctx, item) {
            Some(statement) if statement != Statement::Opaque => self.statement(ctx, statement),
            _ => rem(&format!("{}: {}", opaque_note(item), hex_dump(&item.bytes()))),
        };
        Self::numbered(out, number, &code, ctx.annotation(item, clash));
    }

    fn region_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.cursor.leave();
        let text = match ctx.region_boundary_note(region) {
            Some(note) => format!("---- end of machine code, {} ----", note),
            None => "---- end of machine code ----".to_string(),
        };
        out.line(rem(&text));
        out.blank();
    }

    fn data(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]) {
        out.blank();
        for (index, row) in bytes.chunks(BYTES_PER_ROW).enumerate() {
            let number = address.wrapping_add((index * BYTES_PER_ROW) as u16);
            let values: Vec<String> = row.iter().map(u8::to_string).collect();
            out.line(format!("{} DATA {}", number, values.join(",")));
        }
        out.blank();
    }
}
