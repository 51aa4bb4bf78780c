/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The opcode table: one descriptor per possible opcode byte.
//!
//! Every byte decodes to something. The twelve opcodes Intel left undocumented behave like the
//! silicon: `08 10 18 20 28 30 38` are `NOP`, `CB` is `JMP`, `D9` is `RET` and `DD ED FD` are
//! `CALL`. They are flagged with [`OpcodeInfo::documented`] set to `false`.

use std::sync::OnceLock;

use super::opcodes::{AluOp, Condition, Location, OpCode, OperandClass, Reg16};
use super::opcodes::OpCode::*;

/// Static description of an opcode byte.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OpcodeInfo {
    pub opcode: u8,
    /// The instruction with zeroed data; the decoder fills it with
    /// [`OpCode::with_operand`].
    pub template: OpCode,
    pub operand: OperandClass,
    pub documented: bool,
}

impl OpcodeInfo {
    /// Encoded length in bytes: 1, 2 or 3.
    pub fn size(&self) -> u16 {
        1 + self.operand.data_len() as u16
    }

    pub fn mnemonic(&self) -> &'static str {
        self.template.mnemonic()
    }
}

/// The 256 entry table, built on first use and shared afterwards.
pub fn table() -> &'static [OpcodeInfo; 256] {
    static TABLE: OnceLock<[OpcodeInfo; 256]> = OnceLock::new();
    TABLE.get_or_init(|| std::array::from_fn(|i| describe(i as u8)))
}

/// Returns the descriptor of `opcode`. Never fails.
pub fn lookup(opcode: u8) -> &'static OpcodeInfo {
    &table()[opcode as usize]
}

fn describe(opcode: u8) -> OpcodeInfo {
    let (template, documented) = match opcode {
        0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => (Nop, false),
        0xcb => (Jmp(0), false),
        0xd9 => (Ret, false),
        0xdd | 0xed | 0xfd => (Call(0), false),
        _ => (template(opcode), true),
    };
    OpcodeInfo {
        opcode,
        template,
        operand: template.operand_class(),
        documented,
    }
}

// Decodes the documented instruction set from its bit fields.
fn template(opcode: u8) -> OpCode {
    let dst = Location::from_bits(opcode >> 3);
    let src = Location::from_bits(opcode);
    let pair = Reg16::from_bits(opcode >> 4);

    match opcode {
        0x76 => Hlt,
        0x40..=0x7f => Mov(dst, src),
        0x80..=0xbf => Alu(AluOp::from_bits(opcode >> 3), src),

        0x00 => Nop,
        0x07 => Rlc,
        0x0f => Rrc,
        0x17 => Ral,
        0x1f => Rar,
        0x22 => Shld(0),
        0x27 => Daa,
        0x2a => Lhld(0),
        0x2f => Cma,
        0x32 => Sta(0),
        0x37 => Stc,
        0x3a => Lda(0),
        0x3f => Cmc,
        0x02 | 0x12 => Stax(pair),
        0x0a | 0x1a => Ldax(pair),
        0x00..=0x3f => match opcode & 0x0f {
            0x01 => Lxi(pair, 0),
            0x03 => Inx(pair),
            0x09 => Dad(pair),
            0x0b => Dcx(pair),
            _ => match opcode & 0x07 {
                0x04 => Inr(dst),
                0x05 => Dcr(dst),
                _ => Mvi(dst, 0),
            },
        },

        0xc3 => Jmp(0),
        0xc9 => Ret,
        0xcd => Call(0),
        0xd3 => Out(0),
        0xdb => In(0),
        0xe3 => Xthl,
        0xe9 => Pchl,
        0xeb => Xchg,
        0xf1 => PopPsw,
        0xf3 => Di,
        0xf5 => PushPsw,
        0xf9 => Sphl,
        0xfb => Ei,
        _ => match opcode & 0x07 {
            0x00 => Rcc(Condition::from_bits(opcode >> 3)),
            0x01 => Pop(pair),
            0x02 => Jcc(Condition::from_bits(opcode >> 3), 0),
            0x04 => Ccc(Condition::from_bits(opcode >> 3), 0),
            0x05 => Push(pair),
            0x06 => AluImm(AluOp::from_bits(opcode >> 3), 0),
            _ => Rst((opcode >> 3) & 0x07),
        },
    }
}
