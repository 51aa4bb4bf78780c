/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

mod execute;
mod flags;
mod intercept;
mod memory;
mod registers;

use std::fmt;

use log::{debug, trace, warn};
use thiserror::Error;

use crate::config::Config;
use crate::opcode::{self, Decoded, DecodeError, OpCode};
pub use self::flags::Flags;
pub use self::intercept::InterceptableProc8080;
pub use self::memory::{LoadError, Memory, ADDRESS_SPACE};
pub use self::registers::Registers;

/// Interface used by `Proc8080` for `IN` and `OUT` instructions. This is the main way to interact
/// with the processor emulation.
///
/// The 8080 processor communicates with external devices via the instructions `IN` (the CPU reads
/// from the databus on a given port) and `OUT` (the CPU writes to a given port). Reading and
/// writing to the bus can do anything depending on the hardware (playing a sound, asking
/// specialized hardware to perform a computation, reading user keypresses...).
///
/// A port nothing answers on is not an error: `IN` then loads the processor's port sentinel
/// into `A` and `OUT` drops the value.
pub trait DataBus {
    /// Called by `Proc8080` when it applies a `IN` instruction. `None` if nothing answers on
    /// `port`.
    fn read_port(&mut self, port: u8) -> Option<u8>;

    /// Called by `Proc8080` when it applies a `OUT` instruction. `false` if nothing listens on
    /// `port`.
    fn write_port(&mut self, port: u8, value: u8) -> bool;
}

/// A data bus with nothing plugged in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoPorts;

impl DataBus for NoPorts {
    fn read_port(&mut self, _port: u8) -> Option<u8> {
        None
    }

    fn write_port(&mut self, _port: u8, _value: u8) -> bool {
        false
    }
}

/// Why a processor stopped in [`State::Faulted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error(transparent)]
    IncompleteInstruction(#[from] DecodeError),
}

/// Execution state. `Halted` and `Faulted` are terminal until [`Proc8080::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
    Faulted(Fault),
}

/// Outcome of [`Proc8080::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed by this call.
    pub steps: u64,
    pub state: State,
}

/// Structure containing the processor state (flags, registers and memory) and logic.
pub struct Proc8080<Bus: DataBus = NoPorts> {
    flags: Flags,
    registers: Registers,
    memory: Memory,
    interrupts_enabled: bool,
    state: State,
    port_sentinel: u8,
    data_bus: Bus,
}

impl Proc8080<NoPorts> {
    /// A processor without any port handler.
    pub fn without_ports(memory: Memory) -> Proc8080<NoPorts> {
        Proc8080::new(memory, NoPorts)
    }
}

impl<Bus: DataBus> Proc8080<Bus> {
    /// Builds a new `Proc8080` with the given memory `mem` and `DataBus`.
    ///
    /// The processor starts `Running` with every register, the stack pointer and the program
    /// counter at 0.
    pub fn new(mem: Memory, data_bus: Bus) -> Proc8080<Bus> {
        Proc8080 {
            flags: Default::default(),
            registers: Default::default(),
            memory: mem,
            interrupts_enabled: false,
            state: State::Running,
            port_sentinel: 0,
            data_bus,
        }
    }

    /// Builds memory as described by `config`, loads `image` at `config.load_address` and
    /// positions the program counter and stack pointer.
    pub fn from_config(config: &Config, image: &[u8], data_bus: Bus) -> Result<Proc8080<Bus>, LoadError> {
        let mut memory = Memory::new(config.memory_size);
        memory.load(image, config.load_address)?;
        debug!(
            "loaded {} bytes at {:#06x}, entry {:#06x}",
            image.len(),
            config.load_address,
            config.entry
        );

        let mut proc8080 = Proc8080::new(memory, data_bus);
        proc8080.registers.pc = config.entry;
        proc8080.registers.sp = config.stack_pointer;
        proc8080.port_sentinel = config.port_sentinel;
        Ok(proc8080)
    }

    /// Borrows the procesor flags immutably.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Borrows the procesor registers immutably.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Borrows the memory immutably.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn data_bus(&self) -> &Bus {
        &self.data_bus
    }

    pub fn data_bus_mut(&mut self) -> &mut Bus {
        &mut self.data_bus
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Whether `EI` was run more recently than `DI`.
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Value `IN` loads into `A` when no port answers.
    pub fn set_port_sentinel(&mut self, value: u8) {
        self.port_sentinel = value;
    }

    /// Clears registers and flags, sets the program counter to `entry` and resumes `Running`.
    /// Memory is kept.
    pub fn reset(&mut self, entry: u16) {
        debug!("reset, entry {:#06x}", entry);
        self.flags = Default::default();
        self.registers = Registers { pc: entry, ..Default::default() };
        self.interrupts_enabled = false;
        self.state = State::Running;
    }

    /// Decodes the instruction at the program counter without running it.
    ///
    /// Unlike data accesses, fetching does not wrap at the end of memory: an instruction cut
    /// short by the last address is an `IncompleteInstruction`.
    pub fn fetch(&self) -> Result<Decoded, DecodeError> {
        let pc = self.memory.index(self.registers.pc);
        opcode::decode(self.memory.as_slice(), pc)
    }

    /// Reads the next opcode in memory and changes state accordingly.
    ///
    /// This methods run one `step` of the processor simulation. It does nothing once the
    /// processor is halted or faulted.
    pub fn emulate(&mut self) -> State {
        self.step(|_, _| false);
        self.state
    }

    /// Runs until the processor halts or faults, or `max_steps` instructions were executed.
    pub fn run(&mut self, max_steps: Option<u64>) -> RunSummary {
        self.run_with(max_steps, |_, _| false)
    }

    // Returns whether an instruction was executed. A fetch that faults executes nothing.
    // `intercept` returning true skips the effect of the instruction.
    fn step<I>(&mut self, mut intercept: I) -> bool
    where
        I: FnMut(&mut Proc8080<Bus>, &OpCode) -> bool,
    {
        if self.state != State::Running {
            return false;
        }
        match self.fetch() {
            Ok(decoded) => {
                self.advance(&decoded);
                if !intercept(self, &decoded.op) {
                    self.apply_op(decoded.op);
                }
                true
            }
            Err(err) => {
                self.fault(err);
                false
            }
        }
    }

    fn run_with<I>(&mut self, max_steps: Option<u64>, mut intercept: I) -> RunSummary
    where
        I: FnMut(&mut Proc8080<Bus>, &OpCode) -> bool,
    {
        let mut steps = 0;
        while self.state == State::Running && max_steps.map_or(true, |max| steps < max) {
            if self.step(&mut intercept) {
                steps += 1;
            }
        }
        if self.state == State::Running {
            debug!("step budget of {} instructions spent", steps);
        }
        RunSummary { steps, state: self.state }
    }

    // The program counter moves past the instruction before its effect is applied, so
    // calls push the address of the next instruction and jumps simply overwrite it.
    fn advance(&mut self, decoded: &Decoded) {
        trace!(
            "{:04x}  {:02x}  {}",
            self.registers.pc,
            decoded.info.opcode,
            decoded.op
        );
        self.registers.pc = self.registers.pc.wrapping_add(decoded.size());
    }

    fn fault(&mut self, err: DecodeError) {
        warn!("fault at {:#06x}: {}", self.registers.pc, err);
        self.state = State::Faulted(Fault::IncompleteInstruction(err));
    }
}

impl<Bus: DataBus> fmt::Debug for Proc8080<Bus> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Proc8080")
            .field("flags", &self.flags)
            .field("registers", &self.registers)
            .field("interrupts_enabled", &self.interrupts_enabled)
            .field("state", &self.state)
            .finish()
    }
}
