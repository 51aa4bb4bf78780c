/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::opcode::Condition;

/// Condition flags. The arithmetic helpers compute an 8-bit result and update the flags the
/// way the 8080 does for the matching instruction group.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub z: bool,
    pub s: bool,
    pub p: bool,
    pub cy: bool,
    pub ac: bool,
}

impl Flags {
    /// Unpacks the low byte of `PSW`: `S Z 0 AC 0 P 1 CY`.
    pub fn from_processor_status_word(psw: u8) -> Flags {
        Flags {
            z: (psw & (1 << 6)) != 0,
            s: (psw & (1 << 7)) != 0,
            p: (psw & (1 << 2)) != 0,
            cy: (psw & 1) != 0,
            ac: (psw & (1 << 4)) != 0,
        }
    }

    pub fn to_processor_status_word(&self) -> u8 {
        (self.cy as u8)
            | 0b10
            | ((self.p as u8) << 2)
            | ((self.ac as u8) << 4)
            | ((self.z as u8) << 6)
            | ((self.s as u8) << 7)
    }

    pub fn satisfies(&self, condition: Condition) -> bool {
        match condition {
            Condition::NotZero => !self.z,
            Condition::Zero => self.z,
            Condition::NoCarry => !self.cy,
            Condition::Carry => self.cy,
            Condition::ParityOdd => !self.p,
            Condition::ParityEven => self.p,
            Condition::Plus => !self.s,
            Condition::Minus => self.s,
        }
    }

    /// `a + b + carry_in`, all five flags.
    pub fn add(&mut self, a: u8, b: u8, carry_in: bool) -> u8 {
        let sum = a as u16 + b as u16 + carry_in as u16;
        let result = sum as u8;
        self.cy = sum > 0xff;
        self.ac = (a & 0x0f) + (b & 0x0f) + carry_in as u8 > 0x0f;
        self.set_zsp(result);
        result
    }

    /// `a - b - borrow_in`, all five flags. Carry holds the borrow.
    pub fn sub(&mut self, a: u8, b: u8, borrow_in: bool) -> u8 {
        let result = self.add(a, !b, !borrow_in);
        self.cy = !self.cy;
        result
    }

    /// `value + 1`; carry untouched.
    pub fn increment(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.ac = (value & 0x0f) == 0x0f;
        self.set_zsp(result);
        result
    }

    /// `value - 1`; carry untouched.
    pub fn decrement(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.ac = (value & 0x0f) != 0;
        self.set_zsp(result);
        result
    }

    /// Result of `ANA`, `XRA` or `ORA`: carries cleared.
    pub fn logical(&mut self, result: u8) -> u8 {
        self.cy = false;
        self.ac = false;
        self.set_zsp(result);
        result
    }

    pub fn set_zsp(&mut self, result: u8) {
        self.z = result == 0;
        self.s = (result & 0x80) != 0;
        self.p = Flags::parity(result);
    }

    fn parity(value: u8) -> bool {
        value.count_ones() % 2 == 0
    }
}
