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
//! `headerpad infile outfile [I|D|R]`
//!
//! Inflates, deflates, or strips the header from an ATM file, writing
//! the result to a separate output file.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::cliutil::resolve_input_path;
use atom_tools::error::{AtomError, Result};
use atom_tools::headerpad::{deflate, inflate, remove_header};
use clap::Parser;

#[derive(Parser)]
#[command(name = "headerpad", about = "Inflate, deflate, or remove an ATM header")]
struct Args {
    input: String,
    output: PathBuf,

    /// Inflate to the 512-byte large form (the default action).
    #[arg(short = 'I', long)]
    inflate: bool,

    /// Deflate to the 22-byte small form.
    #[arg(short = 'D', long)]
    deflate: bool,

    /// Remove the header entirely, writing only the payload bytes.
    #[arg(short = 'R', long)]
    remove: bool,
}

fn run(args: Args) -> Result<PathBuf> {
    let action_count = [args.inflate, args.deflate, args.remove]
        .iter()
        .filter(|&&b| b)
        .count();
    if action_count > 1 {
        return Err(AtomError::InvalidArgument(
            "make your mind up: -I, -D and -R are mutually exclusive".into(),
        ));
    }

    let input_path = resolve_input_path(&args.input, "atm");
    let bytes = fs::read(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;

    let rewritten = if args.deflate {
        deflate(&bytes)?
    } else if args.remove {
        remove_header(&bytes)?
    } else {
        inflate(&bytes)?
    };

    fs::write(&args.output, rewritten)
        .map_err(|_| AtomError::OutputOpen(args.output.display().to_string()))?;
    Ok(args.output)
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
            eprintln!("headerpad: {e}");
            ExitCode::FAILURE
        }
    }
}
