/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Lazy disassembly of a byte stream.

use std::fmt;
use std::iter::FusedIterator;

use log::debug;

use crate::opcode::{self, DecodeError, OpCode, OpcodeInfo};

/// One decoded instruction of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub address: u16,
    pub info: &'static OpcodeInfo,
    pub op: OpCode,
    /// The encoded instruction, opcode first.
    pub bytes: &'a [u8],
}

impl<'a> Line<'a> {
    /// Assembly text, e.g. `MVI B,$2a`.
    pub fn text(&self) -> String {
        self.op.to_string()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl<'a> fmt::Display for Line<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{:02x}", b)).collect();
        write!(f, "0x{:04x}  {:<8}  {}", self.address, hex.join(" "), self.op)
    }
}

/// An item of the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Instruction(Line<'a>),
    /// Trailing bytes too short for the instruction they start. Always the last entry.
    Incomplete {
        address: u16,
        bytes: &'a [u8],
        error: DecodeError,
    },
}

impl<'a> Entry<'a> {
    pub fn address(&self) -> u16 {
        match *self {
            Entry::Instruction(line) => line.address,
            Entry::Incomplete { address, .. } => address,
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        match *self {
            Entry::Instruction(line) => line.bytes,
            Entry::Incomplete { bytes, .. } => bytes,
        }
    }

    pub fn instruction(&self) -> Option<&Line<'a>> {
        match self {
            Entry::Instruction(line) => Some(line),
            Entry::Incomplete { .. } => None,
        }
    }
}

/// Iterator over the instructions of a stream, decoded but never executed.
///
/// ```
/// use i8080::disassembler::Disassembler;
///
/// let listing: Vec<String> = Disassembler::new(&[0x06, 0x2a, 0xc3, 0x34, 0x12])
///     .filter_map(|entry| entry.instruction().map(|line| line.text()))
///     .collect();
/// assert_eq!(listing, ["MVI B,$2a", "JMP $1234"]);
/// ```
#[derive(Debug, Clone)]
pub struct Disassembler<'a> {
    stream: &'a [u8],
    cursor: usize,
    base: u16,
    finished: bool,
}

impl<'a> Disassembler<'a> {
    pub fn new(stream: &'a [u8]) -> Disassembler<'a> {
        Disassembler {
            stream,
            cursor: 0,
            base: 0,
            finished: false,
        }
    }

    /// Reports addresses as if the stream was loaded at `base`.
    pub fn with_base(mut self, base: u16) -> Disassembler<'a> {
        self.base = base;
        self
    }

    /// Restarts the listing at `offset` in the stream.
    pub fn starting_at(mut self, offset: usize) -> Disassembler<'a> {
        self.seek(offset);
        self
    }

    pub fn seek(&mut self, offset: usize) {
        self.cursor = offset;
        self.finished = false;
    }

    /// Offset of the next instruction in the stream.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    fn address_of(&self, offset: usize) -> u16 {
        self.base.wrapping_add(offset as u16)
    }
}

impl<'a> Iterator for Disassembler<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Entry<'a>> {
        if self.finished {
            return None;
        }
        match opcode::decode(self.stream, self.cursor) {
            Ok(decoded) => {
                let line = Line {
                    address: self.address_of(self.cursor),
                    info: decoded.info,
                    op: decoded.op,
                    bytes: &self.stream[self.cursor..decoded.next],
                };
                self.cursor = decoded.next;
                Some(Entry::Instruction(line))
            }
            Err(DecodeError::EndOfStream { .. }) => {
                self.finished = true;
                None
            }
            Err(error) => {
                debug!("{}", error);
                self.finished = true;
                let bytes = &self.stream[self.cursor..];
                let address = self.address_of(self.cursor);
                self.cursor = self.stream.len();
                Some(Entry::Incomplete { address, bytes, error })
            }
        }
    }
}

impl<'a> FusedIterator for Disassembler<'a> {}
