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
//! Shared CLI helpers: the integer-literal grammar and auto-extension
//! path resolution common to every binary in this toolkit.

use std::path::{Path, PathBuf};

use crate::error::{AtomError, Result};

/// Parse a CLI integer literal: decimal, leading-zero octal, `0x`-prefixed
/// hex, or `%`-prefixed binary.
pub fn parse_int_literal(text: &str) -> Result<u32> {
    let bad = || AtomError::InvalidArgument(format!("not a valid integer literal: {text:?}"));

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).map_err(|_| bad());
    }
    if let Some(bin) = text.strip_prefix('%') {
        return u32::from_str_radix(bin, 2).map_err(|_| bad());
    }
    if text.len() > 1 && text.starts_with('0') && text.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return u32::from_str_radix(&text[1..], 8).map_err(|_| bad());
    }
    text.parse::<u32>().map_err(|_| bad())
}

/// If `path` exists as given, use it verbatim; otherwise append
/// `.extension` and use that instead.
pub fn resolve_input_path(path: &str, extension: &str) -> PathBuf {
    let given = Path::new(path);
    if given.exists() {
        given.to_path_buf()
    } else {
        PathBuf::from(format!("{path}.{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal() {
        assert_eq!(parse_int_literal("1234").unwrap(), 1234);
    }

    #[test]
    fn parses_hex() {
        assert_eq!(parse_int_literal("0x2900").unwrap(), 0x2900);
        assert_eq!(parse_int_literal("0X2900").unwrap(), 0x2900);
    }

    #[test]
    fn parses_binary() {
        assert_eq!(parse_int_literal("%1010").unwrap(), 0b1010);
    }

    #[test]
    fn parses_leading_zero_octal() {
        assert_eq!(parse_int_literal("0755").unwrap(), 0o755);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_int_literal("not-a-number").is_err());
    }

    #[test]
    fn resolve_input_path_appends_extension_when_missing() {
        let resolved = resolve_input_path("/no/such/file/definitely_missing_xyz", "atm");
        assert_eq!(
            resolved,
            PathBuf::from("/no/such/file/definitely_missing_xyz.atm")
        );
    }
}
