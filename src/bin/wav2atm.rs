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
//! `wav2atm input [out=PATH]`
//!
//! Decodes Kansas-City-standard cassette audio back into an `.ATM` file.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::atm::{self, HeaderForm};
use atom_tools::cliutil::resolve_input_path;
use atom_tools::codec::wav_to_atm;
use atom_tools::error::{AtomError, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "wav2atm", about = "Decode cassette-audio WAV into an ATM file")]
struct Args {
    input: String,

    #[arg(long = "out")]
    out: Option<PathBuf>,
}

fn run(args: Args) -> Result<PathBuf> {
    let input_path = resolve_input_path(&args.input, "wav");
    let file = fs::File::open(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;
    let (header, payload) = wav_to_atm(file)?;

    let out_path = args.out.unwrap_or_else(|| input_path.with_extension("atm"));
    let bytes = atm::write(&header, &payload, HeaderForm::Small)?;
    fs::write(&out_path, bytes)
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
            eprintln!("wav2atm: {e}");
            ExitCode::FAILURE
        }
    }
}
