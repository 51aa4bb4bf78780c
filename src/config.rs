/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::num::ParseIntError;

use crate::proc_state::ADDRESS_SPACE;

/// Settings for building a [`Proc8080`](../proc_state/struct.Proc8080.html) with
/// `Proc8080::from_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Memory capacity in bytes. Addresses wrap modulo this value.
    pub memory_size: usize,
    /// Where the program image is copied.
    pub load_address: u16,
    /// Initial program counter.
    pub entry: u16,
    /// Initial stack pointer. At 0 the first push wraps to the top of the address space.
    pub stack_pointer: u16,
    /// Value `IN` reads from a port nothing answers on.
    pub port_sentinel: u8,
    /// Instruction budget for a run; `None` runs until halt or fault.
    pub max_steps: Option<u64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            memory_size: ADDRESS_SPACE,
            load_address: 0,
            entry: 0,
            stack_pointer: 0,
            port_sentinel: 0,
            max_steps: None,
        }
    }
}

impl Config {
    pub fn with_memory_size(mut self, memory_size: usize) -> Config {
        self.memory_size = memory_size;
        self
    }

    pub fn with_load_address(mut self, load_address: u16) -> Config {
        self.load_address = load_address;
        self
    }

    pub fn with_entry(mut self, entry: u16) -> Config {
        self.entry = entry;
        self
    }

    pub fn with_stack_pointer(mut self, stack_pointer: u16) -> Config {
        self.stack_pointer = stack_pointer;
        self
    }

    pub fn with_port_sentinel(mut self, port_sentinel: u8) -> Config {
        self.port_sentinel = port_sentinel;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Config {
        self.max_steps = max_steps;
        self
    }
}

/// Parses an address written in decimal, or in hexadecimal with a `0x` or `$` prefix.
pub fn parse_address(s: &str) -> Result<u16, ParseIntError> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).or_else(|| s.strip_prefix('$')) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}
