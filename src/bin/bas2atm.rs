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
//! `bas2atm input [out=PATH] [auto] [upper] [name=] [load=] [exec=] [pad]`
//!
//! Wraps a plain-text BASIC listing as an ATM file.
//!
//! Besides auto-numbering and upper-casing, each line is first cropped
//! of any `~~`-prefixed "soft" commentary (source-only remarks that cost
//! no space once encoded), and a `^x` escape forces the following
//! character to lower case regardless of `upper` - the only way to get
//! a lower-case label into an otherwise shouty-uppercase listing.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use atom_tools::atm::{self, AtmHeader, HeaderForm};
use atom_tools::basic::bas_to_atm;
use atom_tools::cliutil::{parse_int_literal, resolve_input_path};
use atom_tools::error::{AtomError, Result};
use atom_tools::nameconv::sanitize_atom_name;
use clap::Parser;

/// Typical Atom BASIC text-area load address and its interpreter entry point.
const DEFAULT_LOAD: u16 = 0x2900;
const DEFAULT_EXEC: u16 = 0xC2B2;

#[derive(Parser)]
#[command(name = "bas2atm", about = "Wrap a BASIC listing as an ATM file")]
struct Args {
    input: String,

    #[arg(long = "out")]
    out: Option<PathBuf>,

    /// Auto-number lines (input need not carry explicit line numbers).
    #[arg(long)]
    auto: bool,

    /// Uppercase every listing line before encoding.
    #[arg(long)]
    upper: bool,

    #[arg(long = "name")]
    name: Option<String>,
    #[arg(long = "load")]
    load: Option<String>,
    #[arg(long = "exec")]
    exec: Option<String>,

    /// Re-wrap the output to the large, sentinel-stamped header form.
    #[arg(long)]
    pad: bool,
}

/// Discard anything from the first `~~` onward - a "soft" comment that
/// costs no room once tokenised.
fn strip_soft_comment(line: &str) -> &str {
    match line.find("~~") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Apply `upper`'s blanket case conversion, except a `^x` escape always
/// forces the next character to lower case (and the `^` itself is
/// dropped) - the listing's way of spelling a lower-case label.
fn decode_hats_and_case(rest: &str, upper: bool) -> String {
    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        if c == '^' {
            if let Some(next) = chars.next() {
                out.extend(next.to_lowercase());
            }
            continue;
        }
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Split a cropped, trimmed source line into its declared line number
/// and body text (used when `auto` is not set).
fn split_explicit_line_number(line: &str) -> Result<(u16, &str)> {
    let split_at = line
        .find(|c: char| c.is_whitespace())
        .ok_or_else(|| AtomError::BadLineNumber(line.to_string()))?;
    let (num_str, rest) = line.split_at(split_at);
    let num: u16 = num_str
        .parse()
        .map_err(|_| AtomError::BadLineNumber(line.to_string()))?;
    Ok((num, rest.trim_start()))
}

/// Turn raw listing text into the `"{line_num} {body}"` form
/// [`bas_to_atm`] expects, applying soft-comment cropping, auto
/// numbering (or explicit-number parsing), and case/hat processing.
fn assemble_listing(raw: &str, auto: bool, upper: bool) -> Result<String> {
    let mut out = String::new();
    let mut next_auto = 10u32;

    for raw_line in raw.lines() {
        let cropped = strip_soft_comment(raw_line).trim();
        if cropped.is_empty() {
            continue;
        }

        let (line_num, rest) = if auto {
            let n = next_auto;
            next_auto += 10;
            (n as u16, cropped)
        } else {
            split_explicit_line_number(cropped)?
        };

        let body = decode_hats_and_case(rest, upper);
        out.push_str(&format!("{line_num} {body}\n"));
    }

    Ok(out)
}

fn run(args: Args) -> Result<PathBuf> {
    let input_path = resolve_input_path(&args.input, "bas");
    let raw_text = fs::read_to_string(&input_path)
        .map_err(|_| AtomError::InputOpen(input_path.display().to_string()))?;

    let listing = assemble_listing(&raw_text, args.auto, args.upper)?;
    let payload = bas_to_atm(&listing)?;

    let name = match &args.name {
        Some(n) => n.to_uppercase(),
        None => sanitize_atom_name(&args.input),
    };
    let load = match &args.load {
        Some(s) => parse_int_literal(s)? as u16,
        None => DEFAULT_LOAD,
    };
    let exec = match &args.exec {
        Some(s) => parse_int_literal(s)? as u16,
        None => DEFAULT_EXEC,
    };

    let header = AtmHeader::new(&name, load, exec, payload.len() as u16);
    let form = if args.pad { HeaderForm::Large } else { HeaderForm::Small };
    let bytes = atm::write(&header, &payload, form)?;

    let out_path = args.out.unwrap_or_else(|| input_path.with_extension("atm"));
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
            eprintln!("bas2atm: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crops_soft_comments() {
        assert_eq!(strip_soft_comment("10 PRINT X ~~ remark"), "10 PRINT X ");
        assert_eq!(strip_soft_comment("10 PRINT X"), "10 PRINT X");
    }

    #[test]
    fn hat_escape_forces_lower_case_for_one_character_only() {
        // Only the character immediately after '^' is forced lower case;
        // later characters in the same word are cased normally.
        assert_eq!(decode_hats_and_case("goto ^label", true), "GOTO lABEL");
        assert_eq!(decode_hats_and_case("goto ^Label", false), "goto label");
    }

    #[test]
    fn assembles_explicit_and_auto_numbered_listings() {
        let explicit = assemble_listing("10 print x\n20 goto 10\n", false, false).unwrap();
        assert_eq!(explicit, "10 print x\n20 goto 10\n");

        let auto = assemble_listing("print x\ngoto ^start\n", true, true).unwrap();
        assert_eq!(auto, "10 PRINT X\n20 GOTO sTART\n");
    }

    #[test]
    fn rejects_explicit_listing_missing_a_line_number() {
        assert!(assemble_listing("print x\n", false, false).is_err());
    }
}
