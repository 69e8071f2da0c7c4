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

//! C output.
//!
//! Each machine region becomes a `void sub_XXXX(void)` function working
//! on a flat `mem[]` array and the CPU registers as globals. Branches
//! inside a region become `goto`, calls to other regions become direct
//! calls. Anything that leaves the decoded code goes through the
//! `call()`/`jump()` hooks declared in the prelude.

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
const BYTES_PER_ROW: usize = 12;

const PRELUDE: &[&str] = &[
    "#include <stdint.h>",
    "",
    "uint8_t mem[0x10000];",
    "uint8_t A, X, Y, P, SP = 0xFF;",
    "uint8_t C, Z, N, V, I, D;",
    "unsigned T;",
    "",
    "#define WORD(a)   (mem[a] | mem[(uint16_t)((a) + 1)] << 8)",
    "#define ZPWORD(a) (mem[(uint8_t)(a)] | mem[(uint8_t)((a) + 1)] << 8)",
    "#define PUSH(v)   (mem[0x100 + SP--] = (v))",
    "#define PULL()    (mem[0x100 + ++SP])",
    "#define CMP(r, v) (T = (r) - (v), C = (r) >= (v), Z = (r) == (v), N = (T & 0x80) != 0)",
    "#define BIT(v)    (T = (v), Z = (A & T) == 0, N = (T & 0x80) != 0, V = (T & 0x40) != 0)",
    "#define ADC(v)    (T = A + (v) + C, C = T > 0xFF, A = (uint8_t)T)",
    "#define SBC(v)    (T = A - (v) - !C, C = T < 0x100, A = (uint8_t)T)",
    "#define ASL(v)    (T = (v) << 1, C = T > 0xFF, (uint8_t)T)",
    "#define LSR(v)    (C = (v) & 1, (uint8_t)((v) >> 1))",
    "#define ROL(v)    (T = (v) << 1 | C, C = T > 0xFF, (uint8_t)T)",
    "#define ROR(v)    (T = (v) | C << 8, C = T & 1, (uint8_t)(T >> 1))",
    "",
    "extern void call(uint16_t address);",
    "extern void jump(uint16_t address);",
    "extern void brk(void);",
];

fn comment(text: &str) -> String {
    format!("/* {} */", text.replace("*/", "* /"))
}

fn hex(value: u16) -> String {
    if value < 0x100 {
        format!("0x{:02X}", value)
    } else {
        format!("0x{:04X}", value)
    }
}

fn function_name(address: u16) -> String {
    format!("sub_{:04X}", address)
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

/// C writer.
#[derive(Debug, Default)]
pub struct CWriter {
    cursor: RegionCursor,
}

impl CWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self::default()
    }

    fn address(&self, ctx: &EmitContext<'_>, address: u16, zero_page: bool) -> String {
        match ctx.name(address) {
            Some(name) => name.to_string(),
            None if zero_page => format!("0x{:02X}", address),
            None => format!("0x{:04X}", address),
        }
    }

    fn memory(&self, ctx: &EmitContext<'_>, memory: Memory) -> String {
        match memory {
            Memory::Direct {
                address,
                index: None,
                zero_page,
            } => format!("mem[{}]", self.address(ctx, address, zero_page)),
            Memory::Direct {
                address,
                index: Some(index),
                zero_page: true,
            } => format!(
                "mem[(uint8_t)({} + {})]",
                self.address(ctx, address, true),
                register(index)
            ),
            Memory::Direct {
                address,
                index: Some(index),
                zero_page: false,
            } => format!(
                "mem[(uint16_t)({} + {})]",
                self.address(ctx, address, false),
                register(index)
            ),
            Memory::IndexedIndirect { pointer } => format!(
                "mem[ZPWORD({} + X)]",
                self.address(ctx, u16::from(pointer), true)
            ),
            Memory::IndirectIndexed { pointer } => format!(
                "mem[(uint16_t)(ZPWORD({}) + Y)]",
                self.address(ctx, u16::from(pointer), true)
            ),
        }
    }

    fn source(&self, ctx: &EmitContext<'_>, source: Source) -> String {
        match source {
            Source::Immediate(value) => format!("0x{:02X}", value),
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
            Relation::Equal => format!("{} == {}", lhs, rhs),
            Relation::NotEqual => format!("{} != {}", lhs, rhs),
            Relation::Less => format!("{} < {}", lhs, rhs),
            Relation::GreaterOrEqual => format!("{} >= {}", lhs, rhs),
            Relation::Negative => format!("{} & 0x80", lhs),
            Relation::NonNegative => format!("!({} & 0x80)", lhs),
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
            BranchTest::Flag { flag: f, set: true } => flag(f).to_string(),
            BranchTest::Flag { flag: f, set: false } => format!("!{}", flag(f)),
        }
    }

    /// Code that transfers control to `target` for good.
    fn leave_to(&self, ctx: &EmitContext<'_>, target: u16) -> String {
        if self.cursor.contains(target) {
            if let Some(label) = ctx.label(target) {
                return format!("goto {};", label);
            }
        }
        if ctx.region_at(target).is_some() {
            return format!("{}(); return;", function_name(target));
        }
        let name = ctx
            .name(target)
            .map(str::to_string)
            .unwrap_or_else(|| hex(target));
        format!("jump({}); return;", name)
    }

    fn statement(&self, ctx: &EmitContext<'_>, statement: Statement) -> String {
        match statement {
            Statement::Load {
                register: reg,
                source,
            } => format!("{} = {};", register(reg), self.source(ctx, source)),
            Statement::Store {
                register: reg,
                memory,
            } => format!("{} = {};", self.memory(ctx, memory), register(reg)),
            Statement::Transfer { from, to } => format!("{} = {};", register(to), register(from)),
            Statement::Alu { op, source } => {
                let value = self.source(ctx, source);
                match op {
                    AluOp::And => format!("A &= {};", value),
                    AluOp::Or => format!("A |= {};", value),
                    AluOp::Xor => format!("A ^= {};", value),
                    AluOp::AddWithCarry => format!("ADC({});", value),
                    AluOp::SubtractWithBorrow => format!("SBC({});", value),
                }
            }
            Statement::Compare {
                register: reg,
                source,
            } => format!("CMP({}, {});", register(reg), self.source(ctx, source)),
            Statement::BitTest { memory } => format!("BIT({});", self.memory(ctx, memory)),
            Statement::Shift { op, target } => {
                let target = self.location(ctx, target);
                let macro_name = match op {
                    ShiftOp::ShiftLeft => "ASL",
                    ShiftOp::ShiftRight => "LSR",
                    ShiftOp::RotateLeft => "ROL",
                    ShiftOp::RotateRight => "ROR",
                };
                format!("{} = {}({});", target, macro_name, target)
            }
            Statement::Increment(target) => format!("{}++;", self.location(ctx, target)),
            Statement::Decrement(target) => format!("{}--;", self.location(ctx, target)),
            Statement::SetFlag(f) => format!("{} = 1;", flag(f)),
            Statement::ClearFlag(f) => format!("{} = 0;", flag(f)),
            Statement::Push(reg) => format!("PUSH({});", register(reg)),
            Statement::Pull(reg) => format!("{} = PULL();", register(reg)),
            Statement::Jump(target) => self.leave_to(ctx, target),
            Statement::JumpIndirect(pointer) => {
                format!("jump(WORD({})); return;", self.address(ctx, pointer, false))
            }
            Statement::Call(target) => match ctx.region_at(target) {
                Some(_) => format!("{}();", function_name(target)),
                None => format!(
                    "call({});",
                    ctx.name(target)
                        .map(str::to_string)
                        .unwrap_or_else(|| hex(target))
                ),
            },
            Statement::Return => "return;".to_string(),
            Statement::ReturnFromInterrupt => format!("return; {}", comment("RTI")),
            Statement::Branch { condition, target } => {
                let test = self.cursor.tracker.test(condition);
                let cond = self.condition(ctx, test);
                let action = self.leave_to(ctx, target);
                if action.starts_with("goto") {
                    format!("if ({}) {}", cond, action)
                } else {
                    format!("if ({}) {{ {} }}", cond, action)
                }
            }
            Statement::Break => "brk();".to_string(),
            Statement::Nop => comment("NOP"),
            Statement::Opaque => String::new(),
        }
    }

    fn array(&self, out: &mut Output, address: u16, bytes: &[u8]) {
        out.line(format!(
            "static const uint8_t data_{:04X}[{}] = {{",
            address,
            bytes.len()
        ));
        for row in bytes.chunks(BYTES_PER_ROW) {
            let values: Vec<String> = row.iter().map(|b| format!("0x{:02X}", b)).collect();
            out.line(format!("{}{},", INDENT, values.join(", ")));
        }
        out.line("};");
    }
}

impl DialectWriter for CWriter {
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
            let define = format!("#define {} {}", ident, hex(entry.address));
            let description = entry.description.as_deref().map(|d| d.replace("*/", "* /"));
            out.line(with_comment(&define, description, "/*", " */"));
        }
        if !symbols.is_empty() {
            out.blank();
        }

        let regions: Vec<&MachineRegion> = ctx
            .decompilation
            .classification
            .regions()
            .iter()
            .filter(|region| !region.is_empty())
            .collect();
        for region in &regions {
            out.line(format!("void {}(void);", function_name(region.start_address)));
        }
        if !regions.is_empty() {
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
        out.line(comment(&ctx.region_title(region)));
        if let Some(note) = ctx.region_warning(region) {
            out.line(comment(&note));
        }
        out.line(format!("void {}(void)", function_name(region.start_address)));
        out.line("{");
    }

    fn item(&mut self, ctx: &EmitContext<'_>, out: &mut Output, item: &Decoded) {
        let statement = self.cursor.step(ctx, item);
        let opaque = !matches!(statement, Some(statement) if statement != Statement::Opaque);

        // A label must be followed by a statement.
        if let Some(label) = ctx.label(item.address()) {
            if opaque {
                out.line(format!("{}: ;", label));
            } else {
                out.line(format!("{}:", label));
            }
        }

        let code = match statement {
            Some(statement) if statement != Statement::Opaque => self.statement(ctx, statement),
            _ => {
                let note = format!("{}: {}", opaque_note(item), hex_dump(&item.bytes()));
                let annotation = ctx.annotation(item, None);
                let code = format!("{}{}", INDENT, comment(&note));
                out.line(with_comment(&code, annotation, "/*", " */"));
                return;
            }
        };
        let code = format!("{}{}", INDENT, code);
        out.line(with_comment(&code, ctx.annotation(item, None), "/*", " */"));
    }

    fn region_end(&mut self, ctx: &EmitContext<'_>, out: &mut Output, region: &MachineRegion) {
        self.cursor.leave();
        out.line("}");
        if let Some(note) = ctx.region_boundary_note(region) {
            out.line(comment(&format!("end of {}, {}", function_name(region.start_address), note)));
        }
        out.blank();
    }

    fn data(&mut self, _ctx: &EmitContext<'_>, out: &mut Output, address: u16, bytes: &[u8]) {
        out.blank();
        self.array(out, address, bytes);
        out.blank();
    }
}

#[cfg(test)]
mod tests {
    use crate::classifier::{classify, DecompileOptions};
    use crate::emit::{render, Dialect, EmitOptions};
    use crate::image::ProgramImage;
    use crate::symbols::{NoSymbols, SymbolCategory, SymbolEntry, SymbolSource, UnifiedSymbolTable};

    fn c_text(load: u16, payload: Vec<u8>, symbols: &dyn SymbolSource) -> String {
        let decompilation = classify(ProgramImage::new(load, payload), &DecompileOptions::default());
        let options = EmitOptions {
            dialect: Dialect::C,
            show_addresses: false,
            header: false,
            ..EmitOptions::default()
        };
        render(&decompilation, symbols, &options)
    }

    #[test]
    fn test_function_per_region() {
        let table: UnifiedSymbolTable = vec![
            SymbolEntry::new(0xD020, "EXTCOL", SymbolCategory::IoRegister)
                .with_description("Border color"),
        ]
        .into_iter()
        .collect();
        let text = c_text(0xC000, vec![0xA9, 0x01, 0x8D, 0x20, 0xD0, 0x60], &table);

        assert!(text.contains("#include <stdint.h>"));
        assert!(text.contains("#define EXTCOL 0xD020"));
        assert!(text.contains("/* Border color */"));
        assert!(text.contains("void sub_C000(void);"));
        assert!(text.contains("void sub_C000(void)\n{\n"));
        assert!(text.contains("    A = 0x01;\n"));
        assert!(text.contains("    mem[EXTCOL] = A;\n"));
        assert!(text.contains("    return;\n}"));
    }

    #[test]
    fn test_loop_becomes_goto() {
        // LDX #$08 / DEX / BNE / RTS
        let text = c_text(0xC000, vec![0xA2, 0x08, 0xCA, 0xD0, 0xFD, 0x60], &NoSymbols);
        assert!(text.contains("LC002:\n    X--;\n"));
        assert!(text.contains("    if (X != 0) goto LC002;\n"));
    }

    #[test]
    fn test_compare_branch() {
        // CMP #$0E / BCC +1 / RTS / RTS
        let text = c_text(0xC000, vec![0xC9, 0x0E, 0x90, 0x01, 0x60, 0x60], &NoSymbols);
        assert!(text.contains("    CMP(A, 0x0E);\n"));
        assert!(text.contains("    if (A < 0x0E) goto LC005;\n"));
    }

    #[test]
    fn test_external_call_and_jump() {
        // JSR $FFD2 / JMP $A474
        let text = c_text(0xC000, vec![0x20, 0xD2, 0xFF, 0x4C, 0x74, 0xA4], &NoSymbols);
        assert!(text.contains("    call(0xFFD2);\n"));
        assert!(text.contains("    jump(0xA474); return;\n"));
    }

    #[test]
    fn test_indexed_memory() {
        // LDA ($FB),Y / STA $0400,X / INC $02,X
        let text = c_text(0xC000, vec![0xB1, 0xFB, 0x9D, 0x00, 0x04, 0xF6, 0x02], &NoSymbols);
        assert!(text.contains("    A = mem[(uint16_t)(ZPWORD(0xFB) + Y)];\n"));
        assert!(text.contains("    mem[(uint16_t)(0x0400 + X)] = A;\n"));
        assert!(text.contains("    mem[(uint8_t)(0x02 + X)]++;\n"));
    }

    #[test]
    fn test_illegal_opcode_comment() {
        let text = c_text(0xC000, vec![0x0B, 0x01, 0x60], &NoSymbols);
        assert!(text.contains("    /* ANC #$01 (illegal): 0B 01 */\n"));
    }

    #[test]
    fn test_basic_and_data() {
        // 10 PRINT, end marker, then three data bytes
        let payload = vec![0x09, 0x08, 0x0A, 0x00, 0x99, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03];
        let text = c_text(0x0801, payload, &NoSymbols);
        assert!(text.contains("/* 10 PRINT */"));
        assert!(text.contains("/* end of BASIC program */"));
        assert!(text.contains("static const uint8_t data_0809[3] = {\n    0x01, 0x02, 0x03,\n};"));
    }

    #[test]
    fn test_label_before_opaque_bytes_has_statement() {
        // BEQ $C002 / ANC #$01 / RTS
        let text = c_text(0xC000, vec![0xF0, 0x00, 0x0B, 0x01, 0x60], &NoSymbols);
        assert!(text.contains("LC002: ;\n"), "{}", text);
        assert!(text.contains("/* ANC #$01 (illegal): 0B 01 */"));
        assert!(!text.contains("LC002:\n"));
    }
}
