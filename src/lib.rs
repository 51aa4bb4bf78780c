/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Intel 8080 decoder, disassembler and emulator
//!
//! This crate reads intel 8080 machine code and either runs it or renders it as assembly text.
//! Both paths share one decoder, [`opcode::decode`], backed by a 256 entry
//! [opcode table](opcode/fn.table.html). Every byte has an entry: undocumented opcodes decode
//! to the instruction the real chip runs for them, so decoding only fails when the stream ends
//! in the middle of an instruction.
//!
//! The main struct is [`Proc8080`](proc_state/struct.Proc8080.html) which emulates the state
//! of a 8080 processor (memory, flags and registers).
//!
//! [`Disassembler`](disassembler/struct.Disassembler.html) is a lazy iterator over the
//! instructions of a byte stream. Here is an example of a small disassembler built with it:
//!
//! ```no_run
//! use i8080::disassembler::{Disassembler, Entry};
//!
//! fn main() {
//!     let file_path: Option<String> = std::env::args().nth(1);
//!     let Some(path) = file_path else {
//!         eprintln!("usage: disassembler <file>");
//!         std::process::exit(1);
//!     };
//!     let program = std::fs::read(path).expect("file not found");
//!     for entry in Disassembler::new(&program) {
//!         match entry {
//!             Entry::Instruction(line) => println!("0x{:04x} - {}", line.address, line.op),
//!             Entry::Incomplete { address, .. } => println!("0x{:04x} - ???", address),
//!         }
//!     }
//! }
//! ```
//!
//! And running a program until it halts:
//!
//! ```
//! use i8080::proc_state::{Memory, Proc8080, State};
//!
//! let mut memory = Memory::default();
//! // MVI A,$2a ; INR A ; HLT
//! memory.load(&[0x3e, 0x2a, 0x3c, 0x76], 0).unwrap();
//!
//! let mut cpu = Proc8080::without_ports(memory);
//! let summary = cpu.run(Some(100));
//! assert_eq!(summary.state, State::Halted);
//! assert_eq!(cpu.registers().a, 0x2b);
//! ```
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade; every executed instruction
//! is traced at `trace` level.

pub mod config;
pub mod disassembler;
pub mod opcode;
pub mod proc_state;

pub use config::Config;
