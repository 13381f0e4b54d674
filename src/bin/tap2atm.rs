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
//! `tap2atm input [mkdir] [detailed]`
//!
//! Splits a TAP archive into its constituent ATM-shaped records, one file
//! per record.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::atm::{self, HeaderForm};
use atom_tools::cliutil::resolve_input_path;
use atom_tools::error::{AtomError, Result};
use atom_tools::nameconv::escape_control_chars;
use atom_tools::tap::split;
use clap::Parser;

#[derive(Parser)]
#[command(name = "tap2atm", about = "Split a TAP archive into ATM files")]
struct Args {
    input: String,

    /// Extract into a freshly created directory named after the input.
    #[arg(long)]
    mkdir: bool,

    /// Prefix each extracted filename with the source archive name and
    /// its index within it, instead of just the catalogue name.
    #[arg(long)]
    detailed: bool,
}

fn run(args: Args) -> Result<Vec<PathBuf>> {
    let input_path = resolve_input_path(&args.input, "tap");
    let bytes = fs::read(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;
    let records = split(&bytes)?;

    let out_dir = if args.mkdir {
        let dir = input_path.with_extension("");
        fs::create_dir_all(&dir)
            .map_err(|_| AtomError::OutputOpen(dir.display().to_string()))?;
        dir
    } else {
        input_path.parent().map(PathBuf::from).unwrap_or_default()
    };

    let mut written = Vec::new();
    for (n, record) in records.into_iter().enumerate() {
        let name = escape_control_chars(&record.header.name());
        let dest_name = if args.detailed {
            format!("{}.{n}.{name}", args.input)
        } else {
            name.clone()
        };

        let out_bytes = atm::write(&record.header, &record.payload, HeaderForm::Small)?;
        let out_path = out_dir.join(format!("{dest_name}.atm"));
        fs::write(&out_path, out_bytes)
            .map_err(|_| AtomError::OutputOpen(out_path.display().to_string()))?;
        println!("wrote {dest_name} ({} bytes)", record.payload.len());
        written.push(out_path);
    }
    Ok(written)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(written) => {
            println!("wrote {} file(s)", written.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("tap2atm: {e}");
            ExitCode::FAILURE
        }
    }
}
