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
//! TAP archive splitter.
//!
//! A TAP file is a concatenation of ATM-header-shaped, length-prefixed
//! program records. This module walks that concatenation directly rather
//! than through [`crate::atm`], since a TAP record is always the 22-byte
//! small form - never the sentinel-stamped large form - and a stray
//! large-form sentinel collision inside a record's header bytes must not
//! be misread as one.

use crate::atm::{AtmHeader, HEADER_SIZE};
use crate::error::{AtomError, Result};

/// One record extracted from a TAP archive.
pub struct TapRecord {
    pub header: AtmHeader,
    pub payload: Vec<u8>,
}

fn read_small_header(bytes: &[u8]) -> Result<AtmHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(AtomError::BadContainer("TAP record header truncated".into()));
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

/// Split a TAP archive into its constituent ATM-shaped records.
pub fn split(bytes: &[u8]) -> Result<Vec<TapRecord>> {
    let mut records = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let header = read_small_header(&bytes[offset..])?;
        let payload_start = offset + HEADER_SIZE;
        let length = header.length as usize;
        if bytes.len() < payload_start + length {
            return Err(AtomError::BadContainer("TAP record payload truncated".into()));
        }
        let payload = bytes[payload_start..payload_start + length].to_vec();
        offset = payload_start + length;
        records.push(TapRecord { header, payload });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atm::{self, HeaderForm};

    #[test]
    fn splits_concatenated_records() {
        let header_a = AtmHeader::new("FIRST", 0x1900, 0x1900, 2);
        let header_b = AtmHeader::new("SECOND", 0x2000, 0x2000, 3);
        let mut bytes = atm::write(&header_a, &[1, 2], HeaderForm::Small).unwrap();
        bytes.extend(atm::write(&header_b, &[3, 4, 5], HeaderForm::Small).unwrap());

        let records = split(&bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header.name(), "FIRST");
        assert_eq!(records[0].payload, vec![1, 2]);
        assert_eq!(records[1].header.name(), "SECOND");
        assert_eq!(records[1].payload, vec![3, 4, 5]);
    }

    #[test]
    fn rejects_truncated_archive() {
        let header = AtmHeader::new("X", 0, 0, 10);
        let mut bytes = atm::write(&header, &vec![0u8; 10], HeaderForm::Small).unwrap();
        bytes.truncate(bytes.len() - 5);
        assert!(split(&bytes).is_err());
    }
}
