/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Instruction semantics. The program counter already points past the instruction when
//! `apply_op` runs.

use log::debug;

use super::{DataBus, Flags, Proc8080, State};
use crate::opcode::OpCode::*;
use crate::opcode::{AluOp, Location, OpCode, Reg16, Register};

impl<Bus: DataBus> Proc8080<Bus> {
    pub(crate) fn apply_op(&mut self, op: OpCode) {
        match op {
            Nop => (),

            // Data transfer
            Mov(dst, src) => {
                let value = self.read_location(src);
                self.write_location(dst, value);
            }
            Mvi(loc, value) => self.write_location(loc, value),
            Lxi(reg, value) => self.registers.set_pair(reg, value),
            Lda(addr) => self.registers.a = self.memory.read(addr),
            Sta(addr) => self.memory.write(addr, self.registers.a),
            Lhld(addr) => {
                let value = self.memory.read_word(addr);
                self.registers.set_pair(Reg16::H, value);
            }
            Shld(addr) => self.memory.write_word(addr, self.registers.hl()),
            Ldax(reg) => self.registers.a = self.memory.read(self.registers.pair(reg)),
            Stax(reg) => self.memory.write(self.registers.pair(reg), self.registers.a),
            Xchg => self.xchg(),

            // Arithmetic and logical
            Alu(alu, loc) => {
                let value = self.read_location(loc);
                self.accumulate(alu, value);
            }
            AluImm(alu, value) => self.accumulate(alu, value),
            Inr(loc) => {
                let value = self.read_location(loc);
                let result = self.flags.increment(value);
                self.write_location(loc, result);
            }
            Dcr(loc) => {
                let value = self.read_location(loc);
                let result = self.flags.decrement(value);
                self.write_location(loc, result);
            }
            Inx(reg) => {
                let value = self.registers.pair(reg).wrapping_add(1);
                self.registers.set_pair(reg, value);
            }
            Dcx(reg) => {
                let value = self.registers.pair(reg).wrapping_sub(1);
                self.registers.set_pair(reg, value);
            }
            Dad(reg) => self.add_register_pair_to_h(reg),
            Daa => self.decimal_adjust_accumulator(),
            Rlc => self.rotate_left(),
            Rrc => self.rotate_right(),
            Ral => self.rotate_left_through_carry(),
            Rar => self.rotate_right_through_carry(),
            Cma => self.registers.a = !self.registers.a,
            Cmc => self.flags.cy = !self.flags.cy,
            Stc => self.flags.cy = true,

            // Branch
            Jmp(addr) => self.registers.pc = addr,
            Jcc(cond, addr) => {
                if self.flags.satisfies(cond) {
                    self.registers.pc = addr
                }
            }
            Call(addr) => self.apply_call(addr),
            Ccc(cond, addr) => {
                if self.flags.satisfies(cond) {
                    self.apply_call(addr)
                }
            }
            Ret => self.apply_return(),
            Rcc(cond) => {
                if self.flags.satisfies(cond) {
                    self.apply_return()
                }
            }
            Rst(n) => self.apply_call(n as u16 * 8),
            Pchl => self.registers.pc = self.registers.hl(),

            // Stack, I/O, and machine control
            Push(reg) => self.push_stack(self.registers.pair(reg)),
            PushPsw => {
                let psw = u16::from_be_bytes([self.registers.a, self.flags.to_processor_status_word()]);
                self.push_stack(psw);
            }
            Pop(reg) => {
                let value = self.pop_stack();
                self.registers.set_pair(reg, value);
            }
            PopPsw => {
                let [a, psw] = self.pop_stack().to_be_bytes();
                self.registers.a = a;
                self.flags = Flags::from_processor_status_word(psw);
            }
            Xthl => self.xthl(),
            Sphl => self.registers.sp = self.registers.hl(),
            In(port) => self.registers.a = self.read_port(port),
            Out(port) => self.write_port(port),
            Ei => self.interrupts_enabled = true,
            Di => self.interrupts_enabled = false,
            Hlt => {
                debug!("halted at {:#06x}", self.registers.pc.wrapping_sub(1));
                self.state = State::Halted;
            }
        }
    }

    fn read_location(&self, loc: Location) -> u8 {
        match loc {
            Location::Reg(reg) => self.registers.get(reg),
            Location::M => self.memory.read(self.registers.hl()),
        }
    }

    fn write_location(&mut self, loc: Location, value: u8) {
        match loc {
            Location::Reg(reg) => self.registers.set(reg, value),
            Location::M => self.memory.write(self.registers.hl(), value),
        }
    }

    fn xchg(&mut self) {
        let d = self.registers.pair(Reg16::D);
        let h = self.registers.hl();

        self.registers.set_pair(Reg16::D, h);
        self.registers.set_pair(Reg16::H, d);
    }

    fn accumulate(&mut self, alu: AluOp, value: u8) {
        let a = self.registers.a;
        let carry = self.flags.cy;
        self.registers.a = match alu {
            AluOp::Add => self.flags.add(a, value, false),
            AluOp::Adc => self.flags.add(a, value, carry),
            AluOp::Sub => self.flags.sub(a, value, false),
            AluOp::Sbb => self.flags.sub(a, value, carry),
            AluOp::Ana => self.flags.logical(a & value),
            AluOp::Xra => self.flags.logical(a ^ value),
            AluOp::Ora => self.flags.logical(a | value),
            AluOp::Cmp => {
                self.flags.sub(a, value, false);
                a
            }
        };
    }

    fn add_register_pair_to_h(&mut self, reg: Reg16) {
        let h = self.registers.hl() as u32;
        let value = self.registers.pair(reg) as u32;
        let result = h + value;

        self.registers.set_pair(Reg16::H, result as u16);
        self.flags.cy = result > 0xffff
    }

    fn decimal_adjust_accumulator(&mut self) {
        let a = self.registers.a;
        let low = a & 0x0f;
        let high = a >> 4;

        let mut correction = 0;
        let mut carry = self.flags.cy;
        if self.flags.ac || low > 9 {
            correction |= 0x06;
        }
        if self.flags.cy || high > 9 || (high >= 9 && low > 9) {
            correction |= 0x60;
            carry = true;
        }

        self.registers.a = self.flags.add(a, correction, false);
        self.flags.cy = carry;
    }

    fn rotate_left(&mut self) {
        let a = self.registers.a;
        self.registers.a = a.rotate_left(1);
        self.flags.cy = (a & 0x80) != 0;
    }

    fn rotate_right(&mut self) {
        let a = self.registers.a;
        self.registers.a = a.rotate_right(1);
        self.flags.cy = (a & 0x01) != 0;
    }

    fn rotate_left_through_carry(&mut self) {
        let a = self.registers.a;
        self.registers.a = (a << 1) | self.flags.cy as u8;
        self.flags.cy = (a & 0x80) != 0;
    }

    fn rotate_right_through_carry(&mut self) {
        let a = self.registers.a;
        self.registers.a = (a >> 1) | ((self.flags.cy as u8) << 7);
        self.flags.cy = (a & 0x01) != 0;
    }

    fn apply_call(&mut self, addr: u16) {
        self.push_stack(self.registers.pc);
        self.registers.pc = addr;
    }

    fn apply_return(&mut self) {
        self.registers.pc = self.pop_stack();
    }

    fn push_stack(&mut self, value: u16) {
        let sp = self.registers.sp.wrapping_sub(2);
        self.memory.write_word(sp, value);
        self.registers.sp = sp;
    }

    fn pop_stack(&mut self) -> u16 {
        let sp = self.registers.sp;
        self.registers.sp = sp.wrapping_add(2);
        self.memory.read_word(sp)
    }

    fn xthl(&mut self) {
        let sp = self.registers.sp;
        let hl = self.registers.hl();
        let top = self.memory.read_word(sp);
        self.memory.write_word(sp, hl);
        self.registers.set_pair(Reg16::H, top);
    }

    fn read_port(&mut self, port: u8) -> u8 {
        self.data_bus.read_port(port).unwrap_or_else(|| {
            debug!("IN {:#04x}: port unavailable, reading {:#04x}", port, self.port_sentinel);
            self.port_sentinel
        })
    }

    fn write_port(&mut self, port: u8) {
        let value = self.registers.get(Register::A);
        if !self.data_bus.write_port(port, value) {
            debug!("OUT {:#04x}: port unavailable, dropping {:#04x}", port, value);
        }
    }
}
