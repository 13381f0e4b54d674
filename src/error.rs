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
//! Crate-wide error type for every conversion in this toolkit.
//!
//! A flat enum with manual `From` impls for the upstream error types we
//! wrap, rather than reaching for `thiserror`/`anyhow` - the taxonomy
//! here is small, closed, and named directly by the format it describes.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum AtomError {
    Io(io::Error),

    /// Could not open the named input file.
    InputOpen(String),
    /// Could not open/create the named output file.
    OutputOpen(String),

    /// ATM, WAV, TAP or DSK container did not match its expected layout.
    BadContainer(String),

    /// `atm2bas` was asked to treat a non-BASIC exec address as BASIC.
    BadExecAddress(u16),
    /// A BASIC listing line did not start with a parseable line number.
    BadLineNumber(String),

    /// Leader tone acquisition never reached 4096 matching half-cycles.
    LeaderNotFound,
    /// No cycle with period >= 1.5*A was found while hunting for a start bit.
    StartBitNotFound,
    /// A bit's follow-on cycles did not agree with its first cycle's class.
    BitTimingViolation,
    /// The four preamble bytes were not all `'*'`.
    PreambleMismatch,
    /// The transmitted checksum byte did not match the running sum.
    ChecksumMismatch { expected: u8, actual: u8 },
    /// The sample buffer ran out mid-block.
    PrematureEnd,

    /// A CLI argument was missing, malformed, or out of range.
    InvalidArgument(String),
}

impl fmt::Display for AtomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomError::Io(e) => write!(f, "I/O error: {e}"),
            AtomError::InputOpen(name) => write!(f, "invalid input file {name}"),
            AtomError::OutputOpen(name) => write!(f, "couldn't write output file: {name}"),
            AtomError::BadContainer(msg) => write!(f, "malformed container: {msg}"),
            AtomError::BadExecAddress(addr) => {
                write!(f, "exec address {addr:#06x} does not look like BASIC")
            }
            AtomError::BadLineNumber(line) => write!(f, "bad line number in {line:?}"),
            AtomError::LeaderNotFound => write!(f, "didn't find leader tone"),
            AtomError::StartBitNotFound => write!(f, "didn't find start bit"),
            AtomError::BitTimingViolation => write!(f, "bit timing violation"),
            AtomError::PreambleMismatch => write!(f, "failed reading preamble"),
            AtomError::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch: expected {expected:#04x}, got {actual:#04x}"
            ),
            AtomError::PrematureEnd => write!(f, "unexpected end of data"),
            AtomError::InvalidArgument(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AtomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtomError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AtomError {
    fn from(err: io::Error) -> AtomError {
        AtomError::Io(err)
    }
}

impl From<hound::Error> for AtomError {
    fn from(err: hound::Error) -> AtomError {
        match err {
            hound::Error::IoError(e) => AtomError::Io(e),
            other => AtomError::BadContainer(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AtomError>;
