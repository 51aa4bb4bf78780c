/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::{DataBus, Flags, Proc8080, Registers, RunSummary, State};
use crate::opcode::OpCode;

/// A simple wrapper around [`Proc8080`](struct.Proc8080.html) which allows to intercept opcodes.
///
/// This structure is useful for debugging, fixing some missing components like a call to code which
/// does not exist in the rom etc. It has the same interface as `Proc8080`.
pub struct InterceptableProc8080<Bus: DataBus, Intercept: FnMut(&mut Proc8080<Bus>, &OpCode) -> bool> {
    proc8080: Proc8080<Bus>,
    interceptor: Intercept,
}

impl<Bus, Intercept> InterceptableProc8080<Bus, Intercept>
where
    Bus: DataBus,
    Intercept: FnMut(&mut Proc8080<Bus>, &OpCode) -> bool,
{
    /// Builds an `InterceptableProc8080` by taking ownership of an exiting `Proc8080`
    ///
    /// `interceptor` runs before the processor applies an opcode, and after the program counter
    /// is increased (i.e. `proc.registers().pc` points to the next instruction). It may change
    /// the processor state and must then return:
    ///  - `true` if it handled the opcode, which is then skipped
    ///  - `false` if the processor should apply the opcode normally
    pub fn from_8080(proc8080: Proc8080<Bus>, interceptor: Intercept) -> InterceptableProc8080<Bus, Intercept> {
        InterceptableProc8080 { proc8080, interceptor }
    }

    /// Takes ownership of the wrapped `Proc8080`.
    pub fn unwrap(self) -> Proc8080<Bus> {
        self.proc8080
    }

    pub fn emulate(&mut self) -> State {
        self.proc8080.step(&mut self.interceptor);
        self.proc8080.state
    }

    pub fn run(&mut self, max_steps: Option<u64>) -> RunSummary {
        self.proc8080.run_with(max_steps, &mut self.interceptor)
    }

    pub fn state(&self) -> State {
        self.proc8080.state()
    }

    pub fn flags(&self) -> &Flags {
        self.proc8080.flags()
    }

    pub fn registers(&self) -> &Registers {
        self.proc8080.registers()
    }

    pub fn processor(&self) -> &Proc8080<Bus> {
        &self.proc8080
    }
}
