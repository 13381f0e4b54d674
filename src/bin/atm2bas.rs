/**************************************************************************
 *                                                                        *
 * Converters between Acorn Atom tape, disk and cassette-audio formats.   *
 *                                                                        *
 * Copyright (C) 2019 Simon M. Werner <simonwerner@gmail.com>             *
 *                                                                        *
 * This program is free software; you can redistribute it and/or modify   *
 * it under the terms of the GNU General Public License as published by   *
 * the Free Software Foundation, either version 3 of the License, or      *
 * (at your option) any later version.                                    *
 *                                                                        *
 * This program is distributed in the hope that it will be useful,        *
 * but WITHOUT ANY WARRANTY; without even the implied warranty of         *
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the           *
 * GNU General Public License for more details.                           *
 *                                                                        *
 * You should have received a copy of the GNU General Public License      *
 * along with this program. If not, see <http://www.gnu.org/licenses/>.   *
 *                                                                        *
 **************************************************************************/
//! `atm2bas input [out=PATH] [nocheckex] [nodumpex]`
//!
//! Dumps an ATM-wrapped BASIC program as a plain-text listing.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::atm;
use atom_tools::basic::{atm_to_bas, looks_like_basic};
use atom_tools::cliutil::resolve_input_path;
use atom_tools::error::{AtomError, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "atm2bas", about = "Dump an ATM BASIC program as text")]
struct Args {
    input: String,

    #[arg(long = "out")]
    out: Option<PathBuf>,

    /// Skip the BASIC execution-address sanity check.
    #[arg(long)]
    nocheckex: bool,

    /// Discard any bytes found trailing the BASIC program instead of
    /// appending them to the listing as a hex dump.
    #[arg(long)]
    nodumpex: bool,
}

/// Render trailing bytes the same way the original tool annotates them:
/// a `~~` marker line, then 16 hex-digit-pairs per `~~` line.
fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::from("~~ Extra bytes");
    for chunk in bytes.chunks(16) {
        out.push_str("\n~~");
        for b in chunk {
            let _ = write!(out, "{b:02X}");
        }
    }
    out.push('\n');
    out
}

fn run(args: Args) -> Result<PathBuf> {
    let input_path = resolve_input_path(&args.input, "atm");
    let bytes = fs::read(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;
    let (header, payload, _form) = atm::read(&bytes)?;

    log::debug!("exec address was {:#06x}", header.exec);
    if !args.nocheckex && !looks_like_basic(header.exec) {
        return Err(AtomError::BadExecAddress(header.exec));
    }

    let (mut text, extra) = atm_to_bas(&payload)?;
    if !args.nodumpex && !extra.is_empty() {
        text.push_str(&hex_dump(&extra));
    }

    let out_path = args.out.unwrap_or_else(|| input_path.with_extension("bas"));
    fs::write(&out_path, text)
        .map_err(|_| AtomError::OutputOpen(out_path.display().to_string()))?;
    Ok(out_path)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(out_path) => {
            println!("wrote {}", out_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("atm2bas: {e}");
            ExitCode::FAILURE
        }
    }
}
