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
//! ATM-payload-to-BASIC-listing text codec.
//!
//! The Atom stores a tokenised BASIC program as a sequence of lines, each
//! `0x0D` + big-endian line number + ASCII bytes, terminated by `0x0D
//! 0xFF`. This module only speaks that already-detokenised line contract
//! (no tokeniser/detokeniser for the Atom's internal token bytes).

use byteorder::{BigEndian, ByteOrder};

use crate::error::{AtomError, Result};

/// Execution addresses that identify a BASIC program image.
pub const BASIC_EXEC_ADDRESSES: [u16; 2] = [0xC2B2, 0xCE86];

pub fn looks_like_basic(exec: u16) -> bool {
    BASIC_EXEC_ADDRESSES.contains(&exec)
}

/// Decode an ATM payload into a line-oriented BASIC listing, one
/// `"{line_num} {text}"` line per source line, plus whatever trailing
/// bytes followed the terminator (many archived programs carry extra
/// data after the BASIC proper).
///
/// A line ends when `0x0D` is followed by a byte `> 0x7F` - the
/// canonical terminator is `0x0D 0xFF`, but the original reader treats
/// any high-bit-set byte in that position as end-of-program, so this
/// does too.
pub fn atm_to_bas(payload: &[u8]) -> Result<(String, Vec<u8>)> {
    let mut out = String::new();
    let mut pos = 0usize;

    loop {
        if pos >= payload.len() {
            return Err(AtomError::PrematureEnd);
        }
        if payload[pos] != 0x0D {
            return Err(AtomError::BadContainer("expected 0x0D line marker".into()));
        }
        pos += 1;

        if pos >= payload.len() {
            return Err(AtomError::PrematureEnd);
        }
        if payload[pos] > 0x7F {
            pos += 1;
            break;
        }

        if pos + 2 > payload.len() {
            return Err(AtomError::PrematureEnd);
        }
        let line_num = BigEndian::read_u16(&payload[pos..pos + 2]);
        pos += 2;

        let text_start = pos;
        while pos < payload.len() && payload[pos] != 0x0D {
            pos += 1;
        }
        let text = String::from_utf8_lossy(&payload[text_start..pos]);
        out.push_str(&format!("{line_num} {text}\n"));
    }

    Ok((out, payload[pos..].to_vec()))
}

/// Encode a line-oriented BASIC listing back into an ATM payload, one
/// `0x0D`-framed line per input line, terminated by `0x0D 0xFF`.
pub fn bas_to_atm(text: &str) -> Result<Vec<u8>> {
    let mut payload = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let (num_str, rest) = line
            .split_once(' ')
            .ok_or_else(|| AtomError::BadLineNumber(line.to_string()))?;
        let line_num: u16 = num_str
            .parse()
            .map_err(|_| AtomError::BadLineNumber(line.to_string()))?;

        payload.push(0x0D);
        payload.push((line_num >> 8) as u8);
        payload.push((line_num & 0xFF) as u8);
        payload.extend_from_slice(rest.as_bytes());
    }

    payload.push(0x0D);
    payload.push(0xFF);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_listing() {
        let text = "10 PRINT \"HELLO\"\n20 GOTO 10\n";
        let payload = bas_to_atm(text).unwrap();
        assert_eq!(&payload[payload.len() - 2..], &[0x0D, 0xFF]);
        let (decoded, extra) = atm_to_bas(&payload).unwrap();
        assert_eq!(decoded, text);
        assert!(extra.is_empty());
    }

    #[test]
    fn surfaces_trailing_bytes_after_the_terminator() {
        let mut payload = bas_to_atm("10 END\n").unwrap();
        payload.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let (decoded, extra) = atm_to_bas(&payload).unwrap();
        assert_eq!(decoded, "10 END\n");
        assert_eq!(extra, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn any_high_bit_byte_terminates_the_listing() {
        let payload = vec![0x0D, 0x00, 0x0A, b'A', 0x0D, 0x80];
        let (decoded, extra) = atm_to_bas(&payload).unwrap();
        assert_eq!(decoded, "10 A\n");
        assert!(extra.is_empty());
    }

    #[test]
    fn rejects_line_without_a_number() {
        assert!(bas_to_atm("PRINT \"HELLO\"\n").is_err());
    }

    #[test]
    fn checks_basic_exec_address() {
        assert!(looks_like_basic(0xC2B2));
        assert!(looks_like_basic(0xCE86));
        assert!(!looks_like_basic(0x2900));
    }

    #[test]
    fn rejects_payload_missing_line_marker() {
        let payload = vec![0x41, 0x42];
        assert!(atm_to_bas(&payload).is_err());
    }
}
