/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

mod opcodes;
mod table;

pub use self::opcodes::{AluOp, Condition, Location, OpCode, Operand, OperandClass, Reg16, Register};
pub use self::table::{lookup, table, OpcodeInfo};

use thiserror::Error;

/// Failure to read an instruction out of a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("end of stream at offset {address:#06x}")]
    EndOfStream { address: usize },

    #[error(
        "incomplete instruction at offset {address:#06x}: opcode {opcode:#04x} \
         needs {needed} bytes, only {available} left"
    )]
    IncompleteInstruction {
        address: usize,
        opcode: u8,
        needed: usize,
        available: usize,
    },
}

/// One instruction read out of a stream by [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub info: &'static OpcodeInfo,
    pub op: OpCode,
    pub operand: Operand,
    /// Offset of the byte following the instruction.
    pub next: usize,
}

impl Decoded {
    pub fn size(&self) -> u16 {
        self.info.size()
    }
}

/// Decodes the instruction starting at `cursor` in `stream`.
///
/// The opcode byte itself never makes decoding fail: unknown opcodes have a table entry like
/// every other byte. Only a stream too short for the operand bytes does.
pub fn decode(stream: &[u8], cursor: usize) -> Result<Decoded, DecodeError> {
    let opcode = *stream
        .get(cursor)
        .ok_or(DecodeError::EndOfStream { address: cursor })?;
    let info = lookup(opcode);
    let needed = info.size() as usize;

    let data = stream
        .get(cursor + 1..cursor + needed)
        .ok_or(DecodeError::IncompleteInstruction {
            address: cursor,
            opcode,
            needed,
            available: stream.len() - cursor,
        })?;

    let operand = match *data {
        [value] => Operand::Byte(value),
        [low, high] => Operand::Word(u16::from_le_bytes([low, high])),
        _ => Operand::None,
    };

    Ok(Decoded {
        info,
        op: info.template.with_operand(operand),
        operand,
        next: cursor + needed,
    })
}

/// Reads the instruction at the start of `bytes`.
pub fn read_opcode(bytes: &[u8]) -> Result<OpCode, DecodeError> {
    decode(bytes, 0).map(|decoded| decoded.op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::OpCode::*;

    #[test]
    fn read_opcodes() {
        let bytes = [0x13, 0xf3, 0x04, 0x87];
        assert_eq!(read_opcode(&bytes[0..]), Ok(Inx(Reg16::D)));
        assert_eq!(read_opcode(&bytes[1..]), Ok(Di));
        assert_eq!(read_opcode(&bytes[2..]), Ok(Inr(Location::Reg(Register::B))));
        assert_eq!(
            read_opcode(&bytes[3..]),
            Ok(Alu(AluOp::Add, Location::Reg(Register::A)))
        );
    }

    #[test]
    fn read_complex_opcodes() {
        assert_eq!(read_opcode(&[0xd6, 0xf3]), Ok(AluImm(AluOp::Sub, 0xf3)));
        assert_eq!(
            read_opcode(&[0xd4, 0x87, 0x97]),
            Ok(Ccc(Condition::NoCarry, 0x9787))
        );
    }

    #[test]
    fn decode_reports_operand_and_next_cursor() {
        let stream = [0x00, 0x06, 0x2a, 0xc3, 0x34, 0x12];

        let nop = decode(&stream, 0).unwrap();
        assert_eq!(nop.operand, Operand::None);
        assert_eq!(nop.next, 1);

        let mvi = decode(&stream, 1).unwrap();
        assert_eq!(mvi.operand, Operand::Byte(0x2a));
        assert_eq!(mvi.size(), 2);
        assert_eq!(mvi.next, 3);

        let jmp = decode(&stream, 3).unwrap();
        assert_eq!(jmp.op, Jmp(0x1234));
        assert_eq!(jmp.operand, Operand::Word(0x1234));
        assert_eq!(jmp.next, 6);
    }

    #[test]
    fn decode_fails_on_truncated_operands() {
        assert_eq!(
            decode(&[0x00, 0xc3, 0x34], 1),
            Err(DecodeError::IncompleteInstruction {
                address: 1,
                opcode: 0xc3,
                needed: 3,
                available: 2,
            })
        );
        assert_eq!(
            read_opcode(&[0xfe]),
            Err(DecodeError::IncompleteInstruction {
                address: 0,
                opcode: 0xfe,
                needed: 2,
                available: 1,
            })
        );
    }

    #[test]
    fn decode_past_the_end() {
        assert_eq!(decode(&[0x00], 1), Err(DecodeError::EndOfStream { address: 1 }));
        assert_eq!(read_opcode(&[]), Err(DecodeError::EndOfStream { address: 0 }));
    }
}
