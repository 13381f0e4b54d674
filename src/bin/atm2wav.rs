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
//! `atm2wav input [out=PATH] [unnamed] [8bit] [short]`
//!
//! Encodes an `.ATM` file as Kansas-City-standard cassette audio.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::atm;
use atom_tools::cliutil::resolve_input_path;
use atom_tools::codec::{atm_to_wav, EncodeOptions};
use atom_tools::error::{AtomError, Result};
use atom_tools::tone::BitDepth;
use clap::Parser;

#[derive(Parser)]
#[command(name = "atm2wav", about = "Encode an ATM file as cassette-audio WAV")]
struct Args {
    input: String,

    #[arg(long = "out")]
    out: Option<PathBuf>,

    /// Emit the unnamed, blockless framing instead of named tape blocks.
    #[arg(long)]
    unnamed: bool,

    /// Render 8-bit unsigned PCM instead of the default 16-bit signed.
    #[arg(long = "8bit")]
    eight_bit: bool,

    /// Use the short leader/gap timing variant.
    #[arg(long)]
    short: bool,
}

fn run(args: Args) -> Result<PathBuf> {
    let input_path = resolve_input_path(&args.input, "atm");
    let bytes = fs::read(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;
    let (header, payload, _form) = atm::read(&bytes)?;

    let out_path = args.out.unwrap_or_else(|| input_path.with_extension("wav"));
    let file = fs::File::create(&out_path)
        .map_err(|_| AtomError::OutputOpen(out_path.display().to_string()))?;

    let options = EncodeOptions {
        unnamed: args.unnamed,
        bit_depth: if args.eight_bit { BitDepth::Eight } else { BitDepth::Sixteen },
        short_timing: args.short,
    };
    atm_to_wav(file, &header, &payload, &options)?;
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
            eprintln!("atm2wav: {e}");
            ExitCode::FAILURE
        }
    }
}
