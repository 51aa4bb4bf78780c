/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use i8080::config::parse_address;
use i8080::disassembler::{Disassembler, Entry};

/// Intel 8080 disassembler
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Binary image to disassemble
    file: PathBuf,

    /// Address of the first byte of the image (decimal, 0x or $ prefixed hex)
    #[clap(long, default_value = "0", value_parser = parse_address)]
    base: u16,

    /// Offset in the image where the listing starts
    #[clap(long, default_value_t = 0)]
    offset: usize,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("I8080_LOG", "info")
        .write_style_or("I8080_LOG", "always");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let program = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {:?}", args.file))?;
    info!("{} bytes in {:?}", program.len(), args.file);

    let mut count = 0;
    for entry in Disassembler::new(&program)
        .with_base(args.base)
        .starting_at(args.offset)
    {
        match entry {
            Entry::Instruction(line) => {
                println!("{}", line);
                count += 1;
            }
            Entry::Incomplete { address, bytes, error } => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
                println!("0x{:04x}  {:<8}  ; incomplete instruction", address, hex.join(" "));
                warn!("{}", error);
            }
        }
    }
    info!("{} instructions", count);

    Ok(())
}
