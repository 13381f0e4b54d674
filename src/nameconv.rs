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
//! PC filename to Atom filename conversion.
//!
//! Strip any directory and extension, drop spaces and underscores,
//! uppercase, and cap at the tape block's filename field width.

use crate::atm::MAX_NAME_LEN;

/// Replace any control character (`< 0x20`) in an Atom catalogue name with
/// `-` so it's safe to use as a host filesystem filename. Atom filenames
/// may legally contain control characters that a tape or disk tool never
/// had to render to a filesystem.
pub fn escape_control_chars(name: &str) -> String {
    name.chars()
        .map(|c| if (c as u32) < 0x20 { '-' } else { c })
        .collect()
}

/// Sanitise a PC-style path/filename into an Atom-legal tape filename.
///
/// Any directory component and the last `.extension` are dropped, spaces
/// and underscores are removed, the result is uppercased and truncated to
/// [`MAX_NAME_LEN`] characters.
pub fn sanitize_atom_name(path: &str) -> String {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = match base.rfind('.') {
        Some(0) => base,
        Some(idx) => &base[..idx],
        None => base,
    };

    let mut out = String::new();
    for c in stem.chars() {
        if c == ' ' || c == '_' {
            continue;
        }
        if out.len() >= MAX_NAME_LEN {
            break;
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directory_and_extension() {
        assert_eq!(sanitize_atom_name("/home/user/games/chuckie_egg.bin"), "CHUCKIEEGG");
    }

    #[test]
    fn drops_spaces_and_underscores() {
        assert_eq!(sanitize_atom_name("my game_file.bas"), "MYGAMEFILE");
    }

    #[test]
    fn truncates_to_thirteen_chars() {
        assert_eq!(sanitize_atom_name("ABCDEFGHIJKLMNOPQRSTUVWXYZ.bin"), "ABCDEFGHIJKLM");
    }

    #[test]
    fn leading_dot_is_not_mistaken_for_extension() {
        assert_eq!(sanitize_atom_name(".profile"), "PROFILE");
    }

    #[test]
    fn escapes_control_characters_for_filesystem_use() {
        assert_eq!(escape_control_chars("GAME\x0DONE"), "GAME-ONE");
        assert_eq!(escape_control_chars("PLAIN"), "PLAIN");
    }
}
