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

//! Instruction lowering.
//!
//! Maps each decoded instruction to a dialect-neutral [`Statement`]. The
//! high-level dialects render statements instead of mnemonics.
//!
//! [`FlagTracker`] follows which value last set the processor flags so a
//! branch can be written as `if (X != 0)` or `if (A < 0x0E)` instead of a
//! raw flag test.

use crate::cpu::mos6510::opcodes;
use crate::cpu::AddressingMode;
use crate::disasm::Instruction;

/// A CPU register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    X,
    Y,
    /// Stack pointer.
    Sp,
    /// Processor status.
    Status,
}

/// A processor flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Carry,
    Zero,
    Interrupt,
    Decimal,
    Overflow,
    Negative,
}

/// A memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memory {
    /// `addr`, `addr,X` or `addr,Y`.
    Direct {
        address: u16,
        index: Option<Register>,
        zero_page: bool,
    },
    /// `(zp,X)`
    IndexedIndirect { pointer: u8 },
    /// `(zp),Y`
    IndirectIndexed { pointer: u8 },
}

impl Memory {
    /// The address written in the operand.
    pub fn base(&self) -> u16 {
        match *self {
            Memory::Direct { address, .. } => address,
            Memory::IndexedIndirect { pointer } | Memory::IndirectIndexed { pointer } => {
                u16::from(pointer)
            }
        }
    }

    /// Whether the effective address depends on `register`.
    pub fn indexed_by(&self, register: Register) -> bool {
        match *self {
            Memory::Direct { index, .. } => index == Some(register),
            Memory::IndexedIndirect { .. } => register == Register::X,
            Memory::IndirectIndexed { .. } => register == Register::Y,
        }
    }

    /// Whether a write to `other` can change the value read here.
    ///
    /// Only two plain `addr` operands are known to be disjoint.
    pub fn may_alias(&self, other: &Memory) -> bool {
        match (*self, *other) {
            (
                Memory::Direct {
                    address: a,
                    index: None,
                    ..
                },
                Memory::Direct {
                    address: b,
                    index: None,
                    ..
                },
            ) => a == b,
            _ => true,
        }
    }

    fn affected_by(&self, written: Location) -> bool {
        match written {
            Location::Register(register) => self.indexed_by(register),
            Location::Memory(memory) => self.may_alias(&memory),
        }
    }
}

/// Something that can be read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Register(Register),
    Memory(Memory),
}

impl Location {
    fn affected_by(&self, written: Location) -> bool {
        match *self {
            Location::Register(register) => written == Location::Register(register),
            Location::Memory(memory) => memory.affected_by(written),
        }
    }
}

/// A read-only operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Immediate(u8),
    Memory(Memory),
}

impl Source {
    fn affected_by(&self, written: Location) -> bool {
        match *self {
            Source::Immediate(_) => false,
            Source::Memory(memory) => memory.affected_by(written),
        }
    }
}

/// Accumulator arithmetic and logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    And,
    Or,
    Xor,
    AddWithCarry,
    SubtractWithBorrow,
}

/// Shifts and rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
}

/// Branch conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    CarryClear,
    CarrySet,
    Equal,
    NotEqual,
    Minus,
    Plus,
    OverflowClear,
    OverflowSet,
}

impl Condition {
    /// The flag tested and the value that takes the branch.
    pub fn flag_test(self) -> (Flag, bool) {
        match self {
            Condition::CarryClear => (Flag::Carry, false),
            Condition::CarrySet => (Flag::Carry, true),
            Condition::Equal => (Flag::Zero, true),
            Condition::NotEqual => (Flag::Zero, false),
            Condition::Minus => (Flag::Negative, true),
            Condition::Plus => (Flag::Negative, false),
            Condition::OverflowClear => (Flag::Overflow, false),
            Condition::OverflowSet => (Flag::Overflow, true),
        }
    }
}

/// A dialect-neutral statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    Load { register: Register, source: Source },
    Store { register: Register, memory: Memory },
    Transfer { from: Register, to: Register },
    Alu { op: AluOp, source: Source },
    Compare { register: Register, source: Source },
    BitTest { memory: Memory },
    Shift { op: ShiftOp, target: Location },
    Increment(Location),
    Decrement(Location),
    SetFlag(Flag),
    ClearFlag(Flag),
    Push(Register),
    Pull(Register),
    Jump(u16),
    /// `JMP (pointer)`
    JumpIndirect(u16),
    Call(u16),
    Return,
    ReturnFromInterrupt,
    Branch { condition: Condition, target: u16 },
    Break,
    Nop,
    /// Illegal opcode; rendered as a comment plus bytes.
    Opaque,
}

impl Statement {
    /// The register or memory operand this statement overwrites.
    pub fn written(&self) -> Option<Location> {
        match *self {
            Statement::Load { register, .. }
            | Statement::Transfer { to: register, .. }
            | Statement::Pull(register) => Some(Location::Register(register)),
            Statement::Store { memory, .. } => Some(Location::Memory(memory)),
            Statement::Alu { .. } => Some(Location::Register(Register::A)),
            Statement::Shift { target, .. }
            | Statement::Increment(target)
            | Statement::Decrement(target) => Some(target),
            _ => None,
        }
    }
}

fn operand_value(instr: &Instruction) -> u16 {
    instr.operand.map(|operand| operand.value()).unwrap_or(0)
}

fn memory(instr: &Instruction) -> Memory {
    let value = operand_value(instr);
    let direct = |index, zero_page| Memory::Direct {
        address: value,
        index,
        zero_page,
    };

    match instr.mode {
        AddressingMode::ZeroPage => direct(None, true),
        AddressingMode::ZeroPageX => direct(Some(Register::X), true),
        AddressingMode::ZeroPageY => direct(Some(Register::Y), true),
        AddressingMode::AbsoluteX => direct(Some(Register::X), false),
        AddressingMode::AbsoluteY => direct(Some(Register::Y), false),
        AddressingMode::IndirectX => Memory::IndexedIndirect {
            pointer: value as u8,
        },
        AddressingMode::IndirectY => Memory::IndirectIndexed {
            pointer: value as u8,
        },
        _ => direct(None, false),
    }
}

fn source(instr: &Instruction) -> Source {
    match instr.mode {
        AddressingMode::Immediate => Source::Immediate(operand_value(instr) as u8),
        _ => Source::Memory(memory(instr)),
    }
}

fn location(instr: &Instruction) -> Location {
    match instr.mode {
        AddressingMode::Accumulator => Location::Register(Register::A),
        _ => Location::Memory(memory(instr)),
    }
}

/// Lower one instruction.
pub fn lower(instr: &Instruction) -> Statement {
    use Register::{Sp, Status, A, X, Y};

    if !instr.legal {
        return Statement::Opaque;
    }

    let branch = |condition| Statement::Branch {
        condition,
        target: instr.branch_target().unwrap_or_else(|| instr.next_address()),
    };

    match instr.opcode {
        opcodes::JMP_ABS => return Statement::Jump(operand_value(instr)),
        opcodes::JMP_IND => return Statement::JumpIndirect(operand_value(instr)),
        opcodes::JSR => return Statement::Call(operand_value(instr)),
        opcodes::RTS => return Statement::Return,
        opcodes::RTI => return Statement::ReturnFromInterrupt,
        opcodes::BRK => return Statement::Break,
        _ => {}
    }

    match instr.mnemonic {
        "LDA" => Statement::Load { register: A, source: source(instr) },
        "LDX" => Statement::Load { register: X, source: source(instr) },
        "LDY" => Statement::Load { register: Y, source: source(instr) },
        "STA" => Statement::Store { register: A, memory: memory(instr) },
        "STX" => Statement::Store { register: X, memory: memory(instr) },
        "STY" => Statement::Store { register: Y, memory: memory(instr) },
        "TAX" => Statement::Transfer { from: A, to: X },
        "TAY" => Statement::Transfer { from: A, to: Y },
        "TXA" => Statement::Transfer { from: X, to: A },
        "TYA" => Statement::Transfer { from: Y, to: A },
        "TSX" => Statement::Transfer { from: Sp, to: X },
        "TXS" => Statement::Transfer { from: X, to: Sp },
        "AND" => Statement::Alu { op: AluOp::And, source: source(instr) },
        "ORA" => Statement::Alu { op: AluOp::Or, source: source(instr) },
        "EOR" => Statement::Alu { op: AluOp::Xor, source: source(instr) },
        "ADC" => Statement::Alu { op: AluOp::AddWithCarry, source: source(instr) },
        "SBC" => Statement::Alu { op: AluOp::SubtractWithBorrow, source: source(instr) },
        "CMP" => Statement::Compare { register: A, source: source(instr) },
        "CPX" => Statement::Compare { register: X, source: source(instr) },
        "CPY" => Statement::Compare { register: Y, source: source(instr) },
        "BIT" => Statement::BitTest { memory: memory(instr) },
        "ASL" => Statement::Shift { op: ShiftOp::ShiftLeft, target: location(instr) },
        "LSR" => Statement::Shift { op: ShiftOp::ShiftRight, target: location(instr) },
        "ROL" => Statement::Shift { op: ShiftOp::RotateLeft, target: location(instr) },
        "ROR" => Statement::Shift { op: ShiftOp::RotateRight, target: location(instr) },
        "INC" => Statement::Increment(location(instr)),
        "DEC" => Statement::Decrement(location(instr)),
        "INX" => Statement::Increment(Location::Register(X)),
        "INY" => Statement::Increment(Location::Register(Y)),
        "DEX" => Statement::Decrement(Location::Register(X)),
        "DEY" => Statement::Decrement(Location::Register(Y)),
        "SEC" => Statement::SetFlag(Flag::Carry),
        "CLC" => Statement::ClearFlag(Flag::Carry),
        "SEI" => Statement::SetFlag(Flag::Interrupt),
        "CLI" => Statement::ClearFlag(Flag::Interrupt),
        "SED" => Statement::SetFlag(Flag::Decimal),
        "CLD" => Statement::ClearFlag(Flag::Decimal),
        "CLV" => Statement::ClearFlag(Flag::Overflow),
        "PHA" => Statement::Push(A),
        "PHP" => Statement::Push(Status),
        "PLA" => Statement::Pull(A),
        "PLP" => Statement::Pull(Status),
        "NOP" => Statement::Nop,
        "BCC" => branch(Condition::CarryClear),
        "BCS" => branch(Condition::CarrySet),
        "BEQ" => branch(Condition::Equal),
        "BNE" => branch(Condition::NotEqual),
        "BMI" => branch(Condition::Minus),
        "BPL" => branch(Condition::Plus),
        "BVC" => branch(Condition::OverflowClear),
        "BVS" => branch(Condition::OverflowSet),
        _ => Statement::Opaque,
    }
}

/// How a branch condition reads in terms of program values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchTest {
    /// `register <relation> source`, after a compare.
    Compare {
        register: Register,
        source: Source,
        relation: Relation,
    },
    /// `subject <relation> 0`, after an instruction that set Z and N from it.
    Value { subject: Location, relation: Relation },
    /// A plain flag test.
    Flag { flag: Flag, set: bool },
}

/// Comparison relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    NotEqual,
    Less,
    GreaterOrEqual,
    /// Bit 7 set.
    Negative,
    /// Bit 7 clear.
    NonNegative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagSubject {
    Value(Location),
    Compare(Register, Source),
}

impl FlagSubject {
    fn affected_by(&self, written: Location) -> bool {
        match *self {
            FlagSubject::Value(location) => location.affected_by(written),
            FlagSubject::Compare(register, source) => {
                written == Location::Register(register) || source.affected_by(written)
            }
        }
    }
}

/// Tracks what the Z, N and C flags currently describe.
#[derive(Debug, Clone, Default)]
pub struct FlagTracker {
    zn: Option<FlagSubject>,
    carry: Option<(Register, Source)>,
}

impl FlagTracker {
    /// Forget everything, e.g. at a branch target.
    pub fn reset(&mut self) {
        self.zn = None;
        self.carry = None;
    }

    /// Drop whatever no longer describes current values once `written`
    /// has changed.
    fn invalidate(&mut self, written: Location) {
        if self.zn.is_some_and(|subject| subject.affected_by(written)) {
            self.zn = None;
        }
        let carry_stale = self.carry.is_some_and(|(register, source)| {
            FlagSubject::Compare(register, source).affected_by(written)
        });
        if carry_stale {
            self.carry = None;
        }
    }

    /// Update after a statement executes.
    pub fn observe(&mut self, statement: &Statement) {
        if let Some(written) = statement.written() {
            self.invalidate(written);
        }

        match *statement {
            Statement::Load { register, .. } => {
                self.zn = Some(FlagSubject::Value(Location::Register(register)));
            }
            Statement::Transfer { to, .. } => {
                if to != Register::Sp {
                    self.zn = Some(FlagSubject::Value(Location::Register(to)));
                }
            }
            Statement::Alu { op, .. } => {
                self.zn = Some(FlagSubject::Value(Location::Register(Register::A)));
                if matches!(op, AluOp::AddWithCarry | AluOp::SubtractWithBorrow) {
                    self.carry = None;
                }
            }
            Statement::Compare { register, source } => {
                self.zn = Some(FlagSubject::Compare(register, source));
                self.carry = Some((register, source));
            }
            Statement::Shift { target, .. } => {
                self.zn = Some(FlagSubject::Value(target));
                self.carry = None;
            }
            Statement::Increment(target) | Statement::Decrement(target) => {
                self.zn = Some(FlagSubject::Value(target));
            }
            Statement::Pull(Register::Status) => self.reset(),
            Statement::Pull(register) => {
                self.zn = Some(FlagSubject::Value(Location::Register(register)));
            }
            Statement::SetFlag(Flag::Carry) | Statement::ClearFlag(Flag::Carry) => {
                self.carry = None;
            }
            Statement::BitTest { .. } => self.zn = None,
            Statement::Jump(_)
            | Statement::JumpIndirect(_)
            | Statement::Call(_)
            | Statement::Return
            | Statement::ReturnFromInterrupt
            | Statement::Break
            | Statement::Opaque => self.reset(),
            Statement::SetFlag(_)
            | Statement::ClearFlag(_)
            | Statement::Store { .. }
            | Statement::Push(_)
            | Statement::Branch { .. }
            | Statement::Nop => {}
        }
    }

    /// Describe a branch condition given the tracked state.
    pub fn test(&self, condition: Condition) -> BranchTest {
        let (flag, set) = condition.flag_test();

        match (flag, self.zn, self.carry) {
            (Flag::Zero, Some(FlagSubject::Compare(register, source)), _) => BranchTest::Compare {
                register,
                source,
                relation: if set { Relation::Equal } else { Relation::NotEqual },
            },
            (Flag::Zero, Some(FlagSubject::Value(subject)), _) => BranchTest::Value {
                subject,
                relation: if set { Relation::Equal } else { Relation::NotEqual },
            },
            (Flag::Negative, Some(FlagSubject::Value(subject)), _) => BranchTest::Value {
                subject,
                relation: if set { Relation::Negative } else { Relation::NonNegative },
            },
            (Flag::Carry, _, Some((register, source))) => BranchTest::Compare {
                register,
                source,
                relation: if set { Relation::GreaterOrEqual } else { Relation::Less },
            },
            _ => BranchTest::Flag { flag, set },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disasm::decode;

    fn lowered(bytes: &[u8]) -> Vec<Statement> {
        decode(bytes, 0xC000)
            .iter()
            .filter_map(|item| item.instruction())
            .map(lower)
            .collect()
    }

    #[test]
    fn test_load_store() {
        let statements = lowered(&[0xA9, 0x01, 0x8D, 0x20, 0xD0]);
        assert_eq!(
            statements[0],
            Statement::Load {
                register: Register::A,
                source: Source::Immediate(0x01)
            }
        );
        assert_eq!(
            statements[1],
            Statement::Store {
                register: Register::A,
                memory: Memory::Direct {
                    address: 0xD020,
                    index: None,
                    zero_page: false
                }
            }
        );
    }

    #[test]
    fn test_indirect_modes() {
        let statements = lowered(&[0xB1, 0xFB, 0x81, 0x02]);
        assert_eq!(
            statements[0],
            Statement::Load {
                register: Register::A,
                source: Source::Memory(Memory::IndirectIndexed { pointer: 0xFB })
            }
        );
        assert_eq!(
            statements[1],
            Statement::Store {
                register: Register::A,
                memory: Memory::IndexedIndirect { pointer: 0x02 }
            }
        );
    }

    #[test]
    fn test_control_flow() {
        let statements = lowered(&[0x20, 0xD2, 0xFF, 0x4C, 0x74, 0xA4, 0x6C, 0x14, 0x03, 0x60]);
        assert_eq!(statements[0], Statement::Call(0xFFD2));
        assert_eq!(statements[1], Statement::Jump(0xA474));
        assert_eq!(statements[2], Statement::JumpIndirect(0x0314));
        assert_eq!(statements[3], Statement::Return);

        let statements = lowered(&[0x40, 0x00, 0xEA]);
        assert_eq!(statements[0], Statement::ReturnFromInterrupt);
        assert_eq!(statements[1], Statement::Break);
    }

    #[test]
    fn test_branch_target() {
        // BNE back to $C000
        let statements = lowered(&[0xD0, 0xFE]);
        assert_eq!(
            statements[0],
            Statement::Branch {
                condition: Condition::NotEqual,
                target: 0xC000
            }
        );
    }

    #[test]
    fn test_illegal_is_opaque() {
        assert_eq!(lowered(&[0x0B, 0x01]), vec![Statement::Opaque]);
        // Undocumented NOP forms too
        assert_eq!(lowered(&[0x04, 0x01]), vec![Statement::Opaque]);
    }

    #[test]
    fn test_tracker_after_decrement() {
        let mut tracker = FlagTracker::default();
        tracker.observe(&Statement::Decrement(Location::Register(Register::X)));
        assert_eq!(
            tracker.test(Condition::NotEqual),
            BranchTest::Value {
                subject: Location::Register(Register::X),
                relation: Relation::NotEqual
            }
        );
    }

    #[test]
    fn test_tracker_after_compare() {
        let mut tracker = FlagTracker::default();
        let compare = Statement::Compare {
            register: Register::A,
            source: Source::Immediate(0x0E),
        };
        tracker.observe(&compare);
        assert_eq!(
            tracker.test(Condition::CarryClear),
            BranchTest::Compare {
                register: Register::A,
                source: Source::Immediate(0x0E),
                relation: Relation::Less
            }
        );

        // CLC invalidates the carry but keeps Z
        tracker.observe(&Statement::ClearFlag(Flag::Carry));
        assert_eq!(
            tracker.test(Condition::CarrySet),
            BranchTest::Flag {
                flag: Flag::Carry,
                set: true
            }
        );
        assert!(matches!(
            tracker.test(Condition::Equal),
            BranchTest::Compare {
                relation: Relation::Equal,
                ..
            }
        ));
    }

    #[test]
    fn test_tracker_reset() {
        let mut tracker = FlagTracker::default();
        tracker.observe(&Statement::Load {
            register: Register::A,
            source: Source::Immediate(0),
        });
        tracker.reset();
        assert_eq!(
            tracker.test(Condition::Equal),
            BranchTest::Flag {
                flag: Flag::Zero,
                set: true
            }
        );
    }

    #[test]
    fn test_store_invalidates_memory_subject() {
        let counter = Memory::Direct {
            address: 0xFB,
            index: None,
            zero_page: true,
        };
        let mut tracker = FlagTracker::default();
        tracker.observe(&Statement::Increment(Location::Memory(counter)));
        tracker.observe(&Statement::Store {
            register: Register::A,
            memory: counter,
        });
        assert!(matches!(
            tracker.test(Condition::NotEqual),
            BranchTest::Flag { .. }
        ));
    }

    fn zero_page(address: u16) -> Memory {
        Memory::Direct {
            address,
            index: None,
            zero_page: true,
        }
    }

    fn compare_x_with_5() -> FlagTracker {
        let mut tracker = FlagTracker::default();
        tracker.observe(&Statement::Compare {
            register: Register::X,
            source: Source::Immediate(0x05),
        });
        tracker
    }

    #[test]
    fn test_compare_forgotten_when_register_changes() {
        let changes = [
            Statement::Increment(Location::Register(Register::X)),
            Statement::Decrement(Location::Register(Register::X)),
            Statement::Load {
                register: Register::X,
                source: Source::Immediate(0),
            },
            Statement::Transfer {
                from: Register::A,
                to: Register::X,
            },
            Statement::Pull(Register::X),
        ];

        for change in changes {
            let mut tracker = compare_x_with_5();
            tracker.observe(&change);
            assert_eq!(
                tracker.test(Condition::CarryClear),
                BranchTest::Flag {
                    flag: Flag::Carry,
                    set: false
                },
                "after {:?}",
                change
            );
            assert!(
                !matches!(tracker.test(Condition::Equal), BranchTest::Compare { .. }),
                "after {:?}",
                change
            );
        }
    }

    #[test]
    fn test_compare_kept_when_other_register_changes() {
        let mut tracker = compare_x_with_5();
        tracker.observe(&Statement::Increment(Location::Register(Register::Y)));
        assert!(matches!(
            tracker.test(Condition::CarryClear),
            BranchTest::Compare {
                register: Register::X,
                relation: Relation::Less,
                ..
            }
        ));
    }

    #[test]
    fn test_compare_forgotten_when_operand_is_stored() {
        let mut tracker = FlagTracker::default();
        tracker.observe(&Statement::Compare {
            register: Register::A,
            source: Source::Memory(zero_page(0xFB)),
        });
        tracker.observe(&Statement::Store {
            register: Register::A,
            memory: zero_page(0xFB),
        });
        assert_eq!(
            tracker.test(Condition::Equal),
            BranchTest::Flag {
                flag: Flag::Zero,
                set: true
            }
        );
        assert_eq!(
            tracker.test(Condition::CarrySet),
            BranchTest::Flag {
                flag: Flag::Carry,
                set: true
            }
        );
    }

    #[test]
    fn test_compare_kept_when_other_memory_is_stored() {
        let mut tracker = FlagTracker::default();
        tracker.observe(&Statement::Compare {
            register: Register::A,
            source: Source::Memory(zero_page(0xFB)),
        });
        tracker.observe(&Statement::Store {
            register: Register::A,
            memory: zero_page(0xFC),
        });
        assert!(matches!(
            tracker.test(Condition::Equal),
            BranchTest::Compare { .. }
        ));
    }

    #[test]
    fn test_indexed_subject_forgotten_when_index_changes() {
        let table = Memory::Direct {
            address: 0x0400,
            index: Some(Register::X),
            zero_page: false,
        };
        let mut tracker = FlagTracker::default();
        tracker.observe(&Statement::Compare {
            register: Register::A,
            source: Source::Memory(table),
        });
        tracker.observe(&Statement::Increment(Location::Register(Register::X)));
        assert!(matches!(tracker.test(Condition::CarrySet), BranchTest::Flag { .. }));
    }
}
