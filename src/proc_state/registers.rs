/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::opcode::{Reg16, Register};

/// The register file. Pairs `BC`, `DE` and `HL` are views over the 8-bit registers, not
/// separate storage.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    pub fn get(&self, reg: Register) -> u8 {
        match reg {
            Register::A => self.a,
            Register::B => self.b,
            Register::C => self.c,
            Register::D => self.d,
            Register::E => self.e,
            Register::H => self.h,
            Register::L => self.l,
        }
    }

    pub fn set(&mut self, reg: Register, value: u8) {
        match reg {
            Register::A => self.a = value,
            Register::B => self.b = value,
            Register::C => self.c = value,
            Register::D => self.d = value,
            Register::E => self.e = value,
            Register::H => self.h = value,
            Register::L => self.l = value,
        }
    }

    pub fn pair(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::B => u16::from_be_bytes([self.b, self.c]),
            Reg16::D => u16::from_be_bytes([self.d, self.e]),
            Reg16::H => u16::from_be_bytes([self.h, self.l]),
            Reg16::SP => self.sp,
        }
    }

    pub fn set_pair(&mut self, reg: Reg16, value: u16) {
        let [high, low] = value.to_be_bytes();
        match reg {
            Reg16::B => {
                self.b = high;
                self.c = low;
            }
            Reg16::D => {
                self.d = high;
                self.e = low;
            }
            Reg16::H => {
                self.h = high;
                self.l = low;
            }
            Reg16::SP => self.sp = value,
        }
    }

    /// `HL`, the address behind the `M` operand.
    pub fn hl(&self) -> u16 {
        self.pair(Reg16::H)
    }
}
