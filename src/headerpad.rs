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
//! ATM header-padding utility: inflate to the large header form, deflate
//! to the small form, or strip the header entirely, without touching the
//! payload bytes.
//!
//! Three mutually-exclusive modes: "I"nflate (the default, and also `-I`
//! explicitly - re-wrap to the 512-byte large form), "D"eflate (re-wrap
//! to the 22-byte small form), and "R"emove (write only the
//! `header.length` payload bytes, no header at all). Truncating a file
//! with trailing padding back to its minimal size is the same operation
//! as deflate, since re-wrapping through `atm::read`/`atm::write`
//! already drops anything past the declared length.

use crate::atm::{self, HeaderForm};
use crate::error::Result;

/// Report whether `bytes` is currently the small or large header form.
pub fn inspect(bytes: &[u8]) -> Result<HeaderForm> {
    let (_header, _payload, form) = atm::read(bytes)?;
    Ok(form)
}

/// Inflate: re-wrap to the 512-byte, sentinel-stamped large form. This is
/// the tool's default action.
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let (header, payload, _form) = atm::read(bytes)?;
    atm::write(&header, &payload, HeaderForm::Large)
}

/// Deflate: re-wrap to the 22-byte small form, discarding any trailing
/// padding.
pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let (header, payload, _form) = atm::read(bytes)?;
    atm::write(&header, &payload, HeaderForm::Small)
}

/// Remove: strip the header entirely, returning just the `header.length`
/// payload bytes.
pub fn remove_header(bytes: &[u8]) -> Result<Vec<u8>> {
    let (_header, payload, _form) = atm::read(bytes)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atm::AtmHeader;

    #[test]
    fn inspect_reports_the_current_form() {
        let header = AtmHeader::new("X", 0, 0, 2);
        let small = atm::write(&header, &[1, 2], HeaderForm::Small).unwrap();
        assert_eq!(inspect(&small).unwrap(), HeaderForm::Small);

        let large = atm::write(&header, &[1, 2], HeaderForm::Large).unwrap();
        assert_eq!(inspect(&large).unwrap(), HeaderForm::Large);
    }

    #[test]
    fn inflate_then_deflate_round_trips() {
        let header = AtmHeader::new("ROUND", 0x1900, 0x1900, 3);
        let small = atm::write(&header, &[9, 8, 7], HeaderForm::Small).unwrap();
        let large = inflate(&small).unwrap();
        assert_eq!(large.len(), atm::LARGE_BLOCK_SIZE + 3);
        let reduced = deflate(&large).unwrap();
        assert_eq!(reduced, small);
    }

    #[test]
    fn deflate_discards_trailing_padding_beyond_length() {
        let header = AtmHeader::new("PAD", 0, 0, 2);
        let mut large = atm::write(&header, &[1, 2], HeaderForm::Large).unwrap();
        large.extend_from_slice(&[0xFF; 100]); // junk past the declared payload
        let reduced = deflate(&large).unwrap();
        assert_eq!(reduced.len(), atm::HEADER_SIZE + 2);
    }

    #[test]
    fn remove_strips_the_header_down_to_the_payload() {
        let header = AtmHeader::new("BARE", 0x1900, 0x1900, 3);
        let large = atm::write(&header, &[1, 2, 3], HeaderForm::Large).unwrap();
        assert_eq!(remove_header(&large).unwrap(), vec![1, 2, 3]);
    }
}
