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
//! `bin2atm input [out=PATH] load= [exec=] [name=] [pad]`
//!
//! Wraps an arbitrary raw binary blob as an ATM file.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::atm::{self, HeaderForm};
use atom_tools::cliutil::{parse_int_literal, resolve_input_path};
use atom_tools::error::{AtomError, Result};
use atom_tools::rawbin::bin_to_atm;
use clap::Parser;

#[derive(Parser)]
#[command(name = "bin2atm", about = "Wrap a raw binary blob as an ATM file")]
struct Args {
    input: String,

    #[arg(long = "out")]
    out: Option<PathBuf>,

    #[arg(long = "load")]
    load: String,
    #[arg(long = "exec")]
    exec: Option<String>,
    #[arg(long = "name")]
    name: Option<String>,

    /// Re-wrap the output to the large, sentinel-stamped header form.
    #[arg(long)]
    pad: bool,
}

fn run(args: Args) -> Result<PathBuf> {
    let input_path = resolve_input_path(&args.input, "bin");
    let bytes = fs::read(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;

    let load = parse_int_literal(&args.load)
        .map_err(|_| AtomError::InvalidArgument(format!("bad load= value {:?}", args.load)))?
        as u16;
    let exec = args
        .exec
        .as_deref()
        .map(parse_int_literal)
        .transpose()?
        .map(|v| v as u16);

    let (header, payload) = bin_to_atm(&bytes, &args.input, args.name.as_deref(), load, exec)?;

    let form = if args.pad { HeaderForm::Large } else { HeaderForm::Small };
    let out_bytes = atm::write(&header, &payload, form)?;

    let out_path = args.out.unwrap_or_else(|| input_path.with_extension("atm"));
    fs::write(&out_path, out_bytes)
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
            eprintln!("bin2atm: {e}");
            ExitCode::FAILURE
        }
    }
}
