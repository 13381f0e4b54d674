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
//! `dsk2atm input [mkdir]`
//!
//! Walks a DSK disk image's directory and extracts each present entry to
//! its own `.ATM` file, with the real load address, execution address
//! and payload pulled from the catalogue's parallel info table and
//! sector pointer.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::atm::{self, AtmHeader, HeaderForm};
use atom_tools::cliutil::resolve_input_path;
use atom_tools::dsk::{entry_payload, walk};
use atom_tools::error::{AtomError, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "dsk2atm", about = "Extract DSK directory entries to ATM files")]
struct Args {
    input: String,

    /// Extract into a freshly created directory named after the input.
    #[arg(long)]
    mkdir: bool,
}

fn run(args: Args) -> Result<Vec<PathBuf>> {
    let input_path = resolve_input_path(&args.input, "dsk");
    let rawdata = fs::read(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;
    let entries = walk(&rawdata)?;

    let out_dir = if args.mkdir {
        let dir = input_path.with_extension("");
        fs::create_dir_all(&dir)
            .map_err(|_| AtomError::OutputOpen(dir.display().to_string()))?;
        dir
    } else {
        input_path.parent().map(PathBuf::from).unwrap_or_default()
    };

    let mut written = Vec::new();
    for entry in &entries {
        let payload = entry_payload(&rawdata, entry)?;
        log::debug!(
            "extracting {}: start={:#06x} exec={:#06x} sector={}",
            entry.name,
            entry.start,
            entry.exec,
            entry.sector
        );

        let header = AtmHeader::new(&entry.name, entry.start, entry.exec, payload.len() as u16);
        let bytes = atm::write(&header, payload, HeaderForm::Small)?;
        let out_path = out_dir.join(format!("{}.atm", entry.name));
        fs::write(&out_path, bytes)
            .map_err(|_| AtomError::OutputOpen(out_path.display().to_string()))?;
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
            eprintln!("dsk2atm: {e}");
            ExitCode::FAILURE
        }
    }
}
