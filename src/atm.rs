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
//! The `.ATM` container: a 22-byte header (filename, load/exec address,
//! length) immediately followed by the raw payload, with an optional
//! 512-byte "large" padded form used by the AtoMMC card.

use crate::error::{AtomError, Result};

/// Size of the small-form header.
pub const HEADER_SIZE: usize = 22;
/// Size of the zero-padded block used by the large form.
pub const LARGE_BLOCK_SIZE: usize = 512;
/// Byte offset of the large-form sentinel within the header block.
pub const LARGE_SENTINEL_OFFSET: usize = 24;
/// The two sentinel bytes ('5','12b' -> 'Q','+') that mark a large header.
pub const LARGE_SENTINEL: [u8; 2] = [0x51, 0x2B];

/// Maximum number of useful characters in a filename, excluding the
/// terminator that the tape framer appends.
pub const MAX_NAME_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderForm {
    Small,
    Large,
}

/// The fixed-layout ATM header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtmHeader {
    /// 16 raw bytes, zero padded; not necessarily valid UTF-8.
    pub filename: [u8; 16],
    pub start: u16,
    pub exec: u16,
    pub length: u16,
}

impl AtmHeader {
    pub fn new(name: &str, start: u16, exec: u16, length: u16) -> AtmHeader {
        let mut filename = [0u8; 16];
        for (dst, src) in filename.iter_mut().zip(name.as_bytes().iter().take(16)) {
            *dst = *src;
        }
        AtmHeader {
            filename,
            start,
            exec,
            length,
        }
    }

    /// The filename up to the first NUL, lossily decoded as ASCII/UTF-8.
    pub fn name(&self) -> String {
        let end = self.filename.iter().position(|&b| b == 0).unwrap_or(self.filename.len());
        String::from_utf8_lossy(&self.filename[..end]).into_owned()
    }

    /// Filename bytes to emit on the wire: up to 13 bytes, stopping at
    /// the first NUL. Extra bytes after a NUL are never emitted.
    pub fn name_bytes(&self) -> &[u8] {
        let limit = MAX_NAME_LEN.min(self.filename.len());
        let end = self.filename[..limit].iter().position(|&b| b == 0).unwrap_or(limit);
        &self.filename[..end]
    }
}

/// Parse a 22-byte little-endian header out of `bytes` at offset 0.
fn read_header_fields(bytes: &[u8]) -> Result<AtmHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(AtomError::BadContainer("ATM header truncated".into()));
    }
    let mut filename = [0u8; 16];
    filename.copy_from_slice(&bytes[0..16]);
    let start = u16::from(bytes[16]) | (u16::from(bytes[17]) << 8);
    let exec = u16::from(bytes[18]) | (u16::from(bytes[19]) << 8);
    let length = u16::from(bytes[20]) | (u16::from(bytes[21]) << 8);
    Ok(AtmHeader {
        filename,
        start,
        exec,
        length,
    })
}

/// Detect whether `bytes` is the large (512-byte, sentinel-stamped) form.
fn detect_form(bytes: &[u8]) -> HeaderForm {
    if bytes.len() >= LARGE_SENTINEL_OFFSET + 2
        && bytes[LARGE_SENTINEL_OFFSET] == LARGE_SENTINEL[0]
        && bytes[LARGE_SENTINEL_OFFSET + 1] == LARGE_SENTINEL[1]
    {
        HeaderForm::Large
    } else {
        HeaderForm::Small
    }
}

/// Parse an ATM file: 22-byte header at offset 0, payload of
/// `header.length` bytes starting either at offset 22 (small) or 512
/// (large, detected via the sentinel at 24-25).
pub fn read(bytes: &[u8]) -> Result<(AtmHeader, Vec<u8>, HeaderForm)> {
    let header = read_header_fields(bytes)?;
    let form = detect_form(bytes);
    let payload_start = match form {
        HeaderForm::Small => HEADER_SIZE,
        HeaderForm::Large => LARGE_BLOCK_SIZE,
    };
    let length = header.length as usize;
    if bytes.len() < payload_start + length {
        return Err(AtomError::BadContainer("ATM payload truncated".into()));
    }
    let payload = bytes[payload_start..payload_start + length].to_vec();
    Ok((header, payload, form))
}

/// Emit an ATM file: 22 bytes (small) or 512 bytes (large, sentinel
/// stamped) followed by `payload`. No validation beyond fit-in-u16.
pub fn write(header: &AtmHeader, payload: &[u8], form: HeaderForm) -> Result<Vec<u8>> {
    if payload.len() > u16::MAX as usize {
        return Err(AtomError::InvalidArgument(format!(
            "payload of {} bytes does not fit in a u16 length field",
            payload.len()
        )));
    }

    let header_len = match form {
        HeaderForm::Small => HEADER_SIZE,
        HeaderForm::Large => LARGE_BLOCK_SIZE,
    };
    let mut out = vec![0u8; header_len + payload.len()];

    out[0..16].copy_from_slice(&header.filename);
    out[16] = (header.start & 0xFF) as u8;
    out[17] = (header.start >> 8) as u8;
    out[18] = (header.exec & 0xFF) as u8;
    out[19] = (header.exec >> 8) as u8;
    out[20] = (header.length & 0xFF) as u8;
    out[21] = (header.length >> 8) as u8;

    if form == HeaderForm::Large {
        out[LARGE_SENTINEL_OFFSET] = LARGE_SENTINEL[0];
        out[LARGE_SENTINEL_OFFSET + 1] = LARGE_SENTINEL[1];
    }

    out[header_len..].copy_from_slice(payload);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_small_header() {
        let header = AtmHeader::new("HELLO", 0x2900, 0xC2B2, 2);
        let payload = vec![0x0D, 0xFF];
        let bytes = write(&header, &payload, HeaderForm::Small).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 2);

        let (got_header, got_payload, form) = read(&bytes).unwrap();
        assert_eq!(form, HeaderForm::Small);
        assert_eq!(got_header, header);
        assert_eq!(got_payload, payload);
    }

    #[test]
    fn large_form_round_trips_to_identical_small_form() {
        let header = AtmHeader::new("BIGPROG", 0x8000, 0x8000, 3);
        let payload = vec![1, 2, 3];

        let small = write(&header, &payload, HeaderForm::Small).unwrap();
        let large = write(&header, &payload, HeaderForm::Large).unwrap();
        assert_eq!(large.len(), LARGE_BLOCK_SIZE + 3);
        assert_eq!(&large[LARGE_SENTINEL_OFFSET..LARGE_SENTINEL_OFFSET + 2], &LARGE_SENTINEL);

        let (header_from_large, payload_from_large, form) = read(&large).unwrap();
        assert_eq!(form, HeaderForm::Large);
        let rewrapped_small = write(&header_from_large, &payload_from_large, HeaderForm::Small).unwrap();
        assert_eq!(rewrapped_small, small);
    }

    #[test]
    fn name_bytes_stops_at_first_nul() {
        let header = AtmHeader::new("HI", 0, 0, 0);
        assert_eq!(header.name_bytes(), b"HI");
    }

    #[test]
    fn name_bytes_caps_at_thirteen() {
        let header = AtmHeader::new("ABCDEFGHIJKLMNOP", 0, 0, 0);
        assert_eq!(header.name_bytes().len(), MAX_NAME_LEN);
        assert_eq!(header.name_bytes(), b"ABCDEFGHIJKLM");
    }

    #[test]
    fn rejects_payload_too_large_for_u16() {
        let header = AtmHeader::new("X", 0, 0, 0);
        let payload = vec![0u8; u16::MAX as usize + 1];
        assert!(write(&header, &payload, HeaderForm::Small).is_err());
    }
}
