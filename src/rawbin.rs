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
//! Raw binary-to-ATM wrapper.
//!
//! Wraps an arbitrary byte blob as an ATM file, deriving the default name
//! from the input path via the Atom filename sanitiser.

use crate::atm::AtmHeader;
use crate::error::{AtomError, Result};
use crate::nameconv::sanitize_atom_name;

/// Wrap `bytes` as an ATM `(header, payload)`. `exec` defaults to `load`
/// when not given. `name` defaults to `source_path` run through
/// [`sanitize_atom_name`].
///
/// `load` and `exec` are kept as independent fields throughout, even
/// though they default to the same value: conflating them into a single
/// variable would make an explicit `exec` silently overwrite `load`
/// instead of standing on its own.
pub fn bin_to_atm(
    bytes: &[u8],
    source_path: &str,
    name: Option<&str>,
    load: u16,
    exec: Option<u16>,
) -> Result<(AtmHeader, Vec<u8>)> {
    if bytes.len() > u16::MAX as usize {
        return Err(AtomError::InvalidArgument(format!(
            "binary of {} bytes does not fit in a u16 length field",
            bytes.len()
        )));
    }

    let name = match name {
        Some(n) => n.to_string(),
        None => sanitize_atom_name(source_path),
    };
    let exec = exec.unwrap_or(load);

    let header = AtmHeader::new(&name, load, exec, bytes.len() as u16);
    Ok((header, bytes.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_bytes_with_derived_name_and_exec_defaulting_to_load() {
        let bytes = vec![1, 2, 3, 4];
        let (header, payload) = bin_to_atm(&bytes, "/tmp/my_game.bin", None, 0x2000, None).unwrap();
        assert_eq!(header.name(), "MYGAME");
        assert_eq!(header.start, 0x2000);
        assert_eq!(header.exec, 0x2000);
        assert_eq!(header.length, 4);
        assert_eq!(payload, bytes);
    }

    #[test]
    fn honours_explicit_name_and_exec() {
        let bytes = vec![0xAA];
        let (header, _payload) =
            bin_to_atm(&bytes, "whatever.bin", Some("CUSTOM"), 0x3000, Some(0x3010)).unwrap();
        assert_eq!(header.name(), "CUSTOM");
        assert_eq!(header.exec, 0x3010);
    }

    #[test]
    fn rejects_oversized_binary() {
        let bytes = vec![0u8; u16::MAX as usize + 1];
        assert!(bin_to_atm(&bytes, "big.bin", None, 0, None).is_err());
    }
}
