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
//! Bit demodulator and block reassembler: the decoder's back end.
//!
//! Turns the cycle stream from `analyser.rs` into bytes, then into tape
//! blocks, then into a reconstructed ATM file.

use crate::analyser::{acquire_leader, is_one_cycle, reference_a, CycleCursor};
use crate::atm::{AtmHeader, MAX_NAME_LEN};
use crate::error::{AtomError, Result};
use crate::tape::{FLAG_DO_LOAD, FLAG_NOT_FIRST, FLAG_NOT_LAST};

/// Read cycles until one with period `>= 1.5*a` is found (the first cycle
/// of a `0`-bit), then back up so the next [`read_bit`] re-reads it.
fn find_start_bit(cursor: &mut CycleCursor, a: usize) -> Result<()> {
    loop {
        let before = cursor.pos();
        let period = cursor.read_cycle()?;
        if !is_one_cycle(period, a) {
            cursor.set_pos(before);
            return Ok(());
        }
    }
}

/// Read one bit: its first cycle's class determines whether 3 more
/// (`0`-bit) or 7 more (`1`-bit) cycles of the same class must follow.
fn read_bit(cursor: &mut CycleCursor, a: usize) -> Result<bool> {
    let period = cursor.read_cycle()?;
    if !is_one_cycle(period, a) {
        for _ in 0..3 {
            let p = cursor.read_cycle()?;
            if is_one_cycle(p, a) {
                return Err(AtomError::BitTimingViolation);
            }
        }
        Ok(false)
    } else {
        for _ in 0..7 {
            let p = cursor.read_cycle()?;
            if !is_one_cycle(p, a) {
                return Err(AtomError::BitTimingViolation);
            }
        }
        Ok(true)
    }
}

/// Read one framed byte: start bit (must be `0`), 8 data bits LSB-first,
/// stop bit (must be `1`). Adds the byte to `checksum`.
fn read_byte(cursor: &mut CycleCursor, a: usize, checksum: &mut u8) -> Result<u8> {
    find_start_bit(cursor, a)?;
    if read_bit(cursor, a)? {
        return Err(AtomError::StartBitNotFound);
    }
    let mut byte = 0u8;
    for i in 0..8 {
        if read_bit(cursor, a)? {
            byte |= 1 << i;
        }
    }
    if !read_bit(cursor, a)? {
        return Err(AtomError::BitTimingViolation);
    }
    *checksum = checksum.wrapping_add(byte);
    Ok(byte)
}

/// A decoded tape block, named to match the header/payload fields the
/// reassembler fills in as it goes.
struct BlockResult {
    filename: Option<[u8; 16]>,
    start: u16,
    exec: u16,
    payload: Vec<u8>,
}

/// Decode a centred 16-bit-equivalent sample stream into an ATM file.
///
/// Implements the block reassembler: acquire leader, find start bit, read
/// the 4-byte preamble, filename, 8-byte header, payload and checksum,
/// repeating until a block with `last_block` set decodes successfully.
pub fn decode(samples: &[i32], sample_rate: u32) -> Result<(AtmHeader, Vec<u8>)> {
    let a = reference_a(sample_rate);
    let mut cursor = CycleCursor::new(samples);

    let mut result = BlockResult {
        filename: None,
        start: 0,
        exec: 0,
        payload: Vec::new(),
    };

    let mut block_num = 0u32;
    loop {
        acquire_leader(&mut cursor, a)?;
        find_start_bit(&mut cursor, a)?;

        let mut checksum = 0u8;

        for expected in b"****" {
            let got = read_byte(&mut cursor, a, &mut checksum)?;
            if got != *expected {
                return Err(AtomError::PreambleMismatch);
            }
        }

        let mut filename = [0u8; 16];
        let mut consumed = 0usize;
        loop {
            let b = read_byte(&mut cursor, a, &mut checksum)?;
            consumed += 1;
            if b == 0x0D {
                break;
            }
            if consumed > MAX_NAME_LEN {
                // 14th byte consumed without seeing the terminator: stop anyway.
                break;
            }
            filename[consumed - 1] = b;
        }

        let flags = read_byte(&mut cursor, a, &mut checksum)?;
        let _reserved = read_byte(&mut cursor, a, &mut checksum)?;
        let _block_num = read_byte(&mut cursor, a, &mut checksum)?;
        let bytes_minus_one = read_byte(&mut cursor, a, &mut checksum)?;
        let exec_hi = read_byte(&mut cursor, a, &mut checksum)?;
        let exec_lo = read_byte(&mut cursor, a, &mut checksum)?;
        let load_hi = read_byte(&mut cursor, a, &mut checksum)?;
        let load_lo = read_byte(&mut cursor, a, &mut checksum)?;

        let first_block = flags & FLAG_NOT_FIRST == 0;
        let _do_load = flags & FLAG_DO_LOAD != 0;
        let last_block = flags & FLAG_NOT_LAST == 0;

        if first_block {
            result.filename = Some(filename);
            result.exec = (u16::from(exec_hi) << 8) | u16::from(exec_lo);
            result.start = (u16::from(load_hi) << 8) | u16::from(load_lo);
            result.payload.clear();
        }

        let block_len = usize::from(bytes_minus_one) + 1;
        for _ in 0..block_len {
            let b = read_byte(&mut cursor, a, &mut checksum)?;
            result.payload.push(b);
        }

        let transmitted_checksum = {
            // The checksum byte itself is framed like any other byte but
            // must not fold into the sum it is being compared against.
            let mut dummy = checksum;
            let byte = read_byte(&mut cursor, a, &mut dummy)?;
            byte
        };
        if transmitted_checksum != checksum {
            return Err(AtomError::ChecksumMismatch {
                expected: checksum,
                actual: transmitted_checksum,
            });
        }

        log::debug!(
            "decoded block {block_num}: {block_len} bytes, checksum {checksum:#04x}, last={last_block}"
        );
        block_num += 1;

        if last_block {
            break;
        }
    }

    let filename = result.filename.ok_or(AtomError::PrematureEnd)?;
    let length = result.payload.len() as u16;
    let header = AtmHeader {
        filename,
        start: result.start,
        exec: result.exec,
        length,
    };
    Ok((header, result.payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atm::AtmHeader;
    use crate::tape::{encode_named, Timing};
    use crate::tone::{render, BitDepth, Samples};

    fn samples_from_bits(header: &AtmHeader, payload: &[u8]) -> Vec<i32> {
        let bits = encode_named(header, payload, Timing::default_long()).unwrap();
        match render(&bits, BitDepth::Sixteen) {
            Samples::Sixteen(v) => v.into_iter().map(i32::from).collect(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn decodes_single_block_round_trip() {
        let header = AtmHeader::new("HI", 0x2900, 0xC2B2, 2);
        let payload = vec![0x0D, 0xFF];
        let samples = samples_from_bits(&header, &payload);
        let (decoded_header, decoded_payload) = decode(&samples, 44100).unwrap();
        assert_eq!(decoded_header.name_bytes(), b"HI");
        assert_eq!(decoded_header.start, 0x2900);
        assert_eq!(decoded_header.exec, 0xC2B2);
        assert_eq!(decoded_payload, payload);
    }

    #[test]
    fn decodes_two_block_payload() {
        let header = AtmHeader::new("BIGFILE", 0x1900, 0x1900, 300);
        let payload: Vec<u8> = (0..300).map(|i| (i % 256) as u8).collect();
        let samples = samples_from_bits(&header, &payload);
        let (_decoded_header, decoded_payload) = decode(&samples, 44100).unwrap();
        assert_eq!(decoded_payload, payload);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let header = AtmHeader::new("HI", 0x2900, 0xC2B2, 2);
        let payload = vec![0x0D, 0xFF];
        let mut samples = samples_from_bits(&header, &payload);
        // Flip the sign of a run well inside the payload bits to corrupt
        // the checksum without disturbing leader acquisition.
        let mid = samples.len() - 200;
        for s in samples[mid..mid + 50].iter_mut() {
            *s = -*s - 1;
        }
        assert!(decode(&samples, 44100).is_err());
    }
}
