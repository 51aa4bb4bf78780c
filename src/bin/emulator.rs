/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use i8080::config::{parse_address, Config};
use i8080::proc_state::{NoPorts, Proc8080, State, ADDRESS_SPACE};

/// Runs an intel 8080 program until it halts
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Binary image to run
    file: PathBuf,

    /// Address the image is loaded at
    #[clap(long, default_value = "0", value_parser = parse_address)]
    load: u16,

    /// Initial program counter (defaults to the load address)
    #[clap(long, value_parser = parse_address)]
    entry: Option<u16>,

    /// Initial stack pointer
    #[clap(long, default_value = "0", value_parser = parse_address)]
    sp: u16,

    /// Memory size in bytes
    #[clap(long, default_value_t = ADDRESS_SPACE)]
    memory: usize,

    /// Stop after this many instructions
    #[clap(long)]
    max_steps: Option<u64>,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("I8080_LOG", "info")
        .write_style_or("I8080_LOG", "always");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let program = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {:?}", args.file))?;

    let config = Config::default()
        .with_memory_size(args.memory)
        .with_load_address(args.load)
        .with_entry(args.entry.unwrap_or(args.load))
        .with_stack_pointer(args.sp)
        .with_max_steps(args.max_steps);

    let mut cpu = Proc8080::from_config(&config, &program, NoPorts)
        .context("failed to load program")?;

    let start = std::time::Instant::now();
    let summary = cpu.run(config.max_steps);
    info!("{} instructions in {:?}", summary.steps, start.elapsed());

    let regs = cpu.registers();
    let flags = cpu.flags();
    println!(
        "A={:02x} B={:02x} C={:02x} D={:02x} E={:02x} H={:02x} L={:02x} SP={:04x} PC={:04x}",
        regs.a, regs.b, regs.c, regs.d, regs.e, regs.h, regs.l, regs.sp, regs.pc
    );
    println!(
        "Z={} S={} P={} CY={} AC={}",
        flags.z as u8, flags.s as u8, flags.p as u8, flags.cy as u8, flags.ac as u8
    );

    match summary.state {
        State::Faulted(fault) => anyhow::bail!("processor faulted: {}", fault),
        State::Running => info!("stopped after {} instructions, still running", summary.steps),
        State::Halted => info!("halted"),
    }
    Ok(())
}
