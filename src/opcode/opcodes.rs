/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt::{self, Display, Formatter};

use self::OpCode::*;

/// One of the seven 8-bit registers of the 8080.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An 8-bit operand location: a register, or `M`, the memory byte addressed by `HL`.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Location {
    Reg(Register),
    M,
}

impl Location {
    /// Decodes the 3-bit `DDD`/`SSS` field of an opcode (only the low 3 bits of `bits` are used).
    pub fn from_bits(bits: u8) -> Location {
        match bits & 0x07 {
            0 => Location::Reg(Register::B),
            1 => Location::Reg(Register::C),
            2 => Location::Reg(Register::D),
            3 => Location::Reg(Register::E),
            4 => Location::Reg(Register::H),
            5 => Location::Reg(Register::L),
            6 => Location::M,
            _ => Location::Reg(Register::A),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Location::Reg(reg) => write!(f, "{}", reg),
            Location::M => write!(f, "M"),
        }
    }
}

/// Register pairs, named after their high register. `SP` stands in for the pair slot of
/// `LXI`, `INX`, `DCX` and `DAD`; `PUSH`/`POP` use the `PushPsw`/`PopPsw` opcodes instead.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Reg16 {
    B,
    D,
    H,
    SP,
}

impl Reg16 {
    /// Decodes the 2-bit `RP` field (only the low 2 bits of `bits` are used).
    pub fn from_bits(bits: u8) -> Reg16 {
        match bits & 0x03 {
            0 => Reg16::B,
            1 => Reg16::D,
            2 => Reg16::H,
            _ => Reg16::SP,
        }
    }
}

impl Display for Reg16 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The eight accumulator operations sharing the `10 OOO SSS` and `11 OOO 110` encodings.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    pub fn from_bits(bits: u8) -> AluOp {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            _ => AluOp::Cmp,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Adc => "ADC",
            AluOp::Sub => "SUB",
            AluOp::Sbb => "SBB",
            AluOp::Ana => "ANA",
            AluOp::Xra => "XRA",
            AluOp::Ora => "ORA",
            AluOp::Cmp => "CMP",
        }
    }

    pub fn immediate_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADI",
            AluOp::Adc => "ACI",
            AluOp::Sub => "SUI",
            AluOp::Sbb => "SBI",
            AluOp::Ana => "ANI",
            AluOp::Xra => "XRI",
            AluOp::Ora => "ORI",
            AluOp::Cmp => "CPI",
        }
    }
}

/// Flag tests of the conditional jump, call and return instructions.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    pub fn from_bits(bits: u8) -> Condition {
        match bits & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }

    fn jump_mnemonic(self) -> &'static str {
        match self {
            Condition::NotZero => "JNZ",
            Condition::Zero => "JZ",
            Condition::NoCarry => "JNC",
            Condition::Carry => "JC",
            Condition::ParityOdd => "JPO",
            Condition::ParityEven => "JPE",
            Condition::Plus => "JP",
            Condition::Minus => "JM",
        }
    }

    fn call_mnemonic(self) -> &'static str {
        match self {
            Condition::NotZero => "CNZ",
            Condition::Zero => "CZ",
            Condition::NoCarry => "CNC",
            Condition::Carry => "CC",
            Condition::ParityOdd => "CPO",
            Condition::ParityEven => "CPE",
            Condition::Plus => "CP",
            Condition::Minus => "CM",
        }
    }

    fn return_mnemonic(self) -> &'static str {
        match self {
            Condition::NotZero => "RNZ",
            Condition::Zero => "RZ",
            Condition::NoCarry => "RNC",
            Condition::Carry => "RC",
            Condition::ParityOdd => "RPO",
            Condition::ParityEven => "RPE",
            Condition::Plus => "RP",
            Condition::Minus => "RM",
        }
    }
}

/// Raw data following an opcode byte.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Operand {
    None,
    Byte(u8),
    /// Little-endian word assembled from the two bytes after the opcode.
    Word(u16),
}

/// How many data bytes follow an opcode.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum OperandClass {
    None,
    Byte,
    Word,
}

impl OperandClass {
    /// Number of data bytes, not counting the opcode itself.
    pub fn data_len(self) -> usize {
        match self {
            OperandClass::None => 0,
            OperandClass::Byte => 1,
            OperandClass::Word => 2,
        }
    }
}

/// A decoded instruction, with its data when it has some.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum OpCode {
    Nop,

    // Data transfer
    Mov(Location, Location),
    Mvi(Location, u8),
    Lxi(Reg16, u16),
    Lda(u16),
    Sta(u16),
    Lhld(u16),
    Shld(u16),
    Ldax(Reg16),
    Stax(Reg16),
    Xchg,

    // Arithmetic and logical
    Alu(AluOp, Location),
    AluImm(AluOp, u8),
    Inr(Location),
    Dcr(Location),
    Inx(Reg16),
    Dcx(Reg16),
    Dad(Reg16),
    Daa,
    Rlc,
    Rrc,
    Ral,
    Rar,
    Cma,
    Cmc,
    Stc,

    // Branch
    Jmp(u16),
    Jcc(Condition, u16),
    Call(u16),
    Ccc(Condition, u16),
    Ret,
    Rcc(Condition),
    Rst(u8),
    Pchl,

    // Stack, I/O, and machine control
    Push(Reg16),
    PushPsw,
    Pop(Reg16),
    PopPsw,
    Xthl,
    Sphl,
    In(u8),
    Out(u8),
    Ei,
    Di,
    Hlt,
}

impl OpCode {
    /// Encoded length in bytes, opcode included.
    pub fn size(&self) -> u16 {
        1 + self.operand_class().data_len() as u16
    }

    pub fn operand_class(&self) -> OperandClass {
        match *self {
            Mvi(_, _) | AluImm(_, _) | In(_) | Out(_) => OperandClass::Byte,
            Lxi(_, _)
            | Lda(_)
            | Sta(_)
            | Lhld(_)
            | Shld(_)
            | Jmp(_)
            | Jcc(_, _)
            | Call(_)
            | Ccc(_, _) => OperandClass::Word,
            _ => OperandClass::None,
        }
    }

    /// Fills the data slot of this opcode with `operand`.
    ///
    /// Opcodes without data, and operands of the wrong class, leave `self` unchanged.
    pub fn with_operand(self, operand: Operand) -> OpCode {
        match (self, operand) {
            (Mvi(loc, _), Operand::Byte(v)) => Mvi(loc, v),
            (AluImm(op, _), Operand::Byte(v)) => AluImm(op, v),
            (In(_), Operand::Byte(port)) => In(port),
            (Out(_), Operand::Byte(port)) => Out(port),
            (Lxi(reg, _), Operand::Word(v)) => Lxi(reg, v),
            (Lda(_), Operand::Word(adr)) => Lda(adr),
            (Sta(_), Operand::Word(adr)) => Sta(adr),
            (Lhld(_), Operand::Word(adr)) => Lhld(adr),
            (Shld(_), Operand::Word(adr)) => Shld(adr),
            (Jmp(_), Operand::Word(adr)) => Jmp(adr),
            (Jcc(cond, _), Operand::Word(adr)) => Jcc(cond, adr),
            (Call(_), Operand::Word(adr)) => Call(adr),
            (Ccc(cond, _), Operand::Word(adr)) => Ccc(cond, adr),
            (op, _) => op,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match *self {
            Nop => "NOP",
            Mov(_, _) => "MOV",
            Mvi(_, _) => "MVI",
            Lxi(_, _) => "LXI",
            Lda(_) => "LDA",
            Sta(_) => "STA",
            Lhld(_) => "LHLD",
            Shld(_) => "SHLD",
            Ldax(_) => "LDAX",
            Stax(_) => "STAX",
            Xchg => "XCHG",
            Alu(op, _) => op.mnemonic(),
            AluImm(op, _) => op.immediate_mnemonic(),
            Inr(_) => "INR",
            Dcr(_) => "DCR",
            Inx(_) => "INX",
            Dcx(_) => "DCX",
            Dad(_) => "DAD",
            Daa => "DAA",
            Rlc => "RLC",
            Rrc => "RRC",
            Ral => "RAL",
            Rar => "RAR",
            Cma => "CMA",
            Cmc => "CMC",
            Stc => "STC",
            Jmp(_) => "JMP",
            Jcc(cond, _) => cond.jump_mnemonic(),
            Call(_) => "CALL",
            Ccc(cond, _) => cond.call_mnemonic(),
            Ret => "RET",
            Rcc(cond) => cond.return_mnemonic(),
            Rst(_) => "RST",
            Pchl => "PCHL",
            Push(_) | PushPsw => "PUSH",
            Pop(_) | PopPsw => "POP",
            Xthl => "XTHL",
            Sphl => "SPHL",
            In(_) => "IN",
            Out(_) => "OUT",
            Ei => "EI",
            Di => "DI",
            Hlt => "HLT",
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match *self {
            Mov(dst, src) => write!(f, "{} {},{}", mnemonic, dst, src),
            Mvi(loc, v) => write!(f, "{} {},${:02x}", mnemonic, loc, v),
            Lxi(reg, v) => write!(f, "{} {},${:04x}", mnemonic, reg, v),
            Lda(adr)
            | Sta(adr)
            | Lhld(adr)
            | Shld(adr)
            | Jmp(adr)
            | Jcc(_, adr)
            | Call(adr)
            | Ccc(_, adr) => write!(f, "{} ${:04x}", mnemonic, adr),
            Ldax(reg) | Stax(reg) | Inx(reg) | Dcx(reg) | Dad(reg) | Push(reg) | Pop(reg) => {
                write!(f, "{} {}", mnemonic, reg)
            }
            PushPsw | PopPsw => write!(f, "{} PSW", mnemonic),
            Alu(_, loc) | Inr(loc) | Dcr(loc) => write!(f, "{} {}", mnemonic, loc),
            AluImm(_, v) | In(v) | Out(v) => write!(f, "{} ${:02x}", mnemonic, v),
            Rst(n) => write!(f, "{} {}", mnemonic, n),
            _ => write!(f, "{}", mnemonic),
        }
    }
}
