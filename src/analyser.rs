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
//! Tone analyser: the decoder's front end.
//!
//! Classifies a centred PCM sample stream into cycle periods without any
//! filtering - just the sign of each sample and the length of each run of
//! same-signed samples.

use crate::error::{AtomError, Result};

/// A monotonically advancing index into an immutable sample slice.
pub struct CycleCursor<'a> {
    samples: &'a [i32],
    pos: usize,
}

impl<'a> CycleCursor<'a> {
    pub fn new(samples: &'a [i32]) -> CycleCursor<'a> {
        CycleCursor { samples, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.samples.len()
    }

    fn sign_at(&self, i: usize) -> i32 {
        if self.samples[i] >= 0 {
            1
        } else {
            -1
        }
    }

    /// Count consecutive same-signed samples from the current position,
    /// advancing the cursor to the first sign-changed sample (or the end
    /// of the buffer). This is a single half-cycle run.
    fn run_length(&mut self) -> Result<usize> {
        if self.at_end() {
            return Err(AtomError::PrematureEnd);
        }
        let start_sign = self.sign_at(self.pos);
        let mut len = 0usize;
        while !self.at_end() && self.sign_at(self.pos) == start_sign {
            self.pos += 1;
            len += 1;
        }
        Ok(len)
    }

    /// Read one half-cycle run (a run of a single sign) and return its
    /// length in samples. Used directly by leader acquisition, which
    /// classifies individual runs rather than whole cycles.
    pub fn read_run(&mut self) -> Result<usize> {
        self.run_length()
    }

    /// Read one full square-wave cycle (a run of one sign followed by a run
    /// of the other) and return its period in samples.
    pub fn read_cycle(&mut self) -> Result<usize> {
        let first = self.run_length()?;
        let second = self.run_length()?;
        Ok(first + second)
    }
}

/// Reference period, in samples, of a single 2400 Hz cycle at `sample_rate`.
pub fn reference_a(sample_rate: u32) -> usize {
    (sample_rate / 2400) as usize
}

/// True if `period` classifies as a `1`-bit cycle (period strictly less
/// than `1.5 * a`). Computed in integer arithmetic (`2*period < 3*a`) so
/// the exact-threshold boundary case is never subject to float rounding.
pub fn is_one_cycle(period: usize, a: usize) -> bool {
    2 * period < 3 * a
}

/// True if a single half-cycle run of length `half_cycle_len` is within 6%
/// of half the reference period `a`. Matches `wav2atm.cpp`'s
/// `countSimilarSamples` comparison exactly, including its integer
/// truncation: `diff = abs(len - a/2); match if (diff*100)/a < 6`.
pub fn matches_leader(half_cycle_len: usize, a: usize) -> bool {
    let half_a = a / 2;
    let diff = if half_cycle_len > half_a {
        half_cycle_len - half_a
    } else {
        half_a - half_cycle_len
    };
    (diff * 100) / a < 6
}

/// Matching half-cycle-run count required before leader is considered
/// acquired (the original's `findLeader` threshold).
pub const LEADER_MATCH_COUNT: u32 = 4096;

/// Read half-cycle runs until [`LEADER_MATCH_COUNT`] consecutive runs each
/// match half the reference period within tolerance. Leaves the cursor at
/// the start of the first run following the run of matches.
pub fn acquire_leader(cursor: &mut CycleCursor, a: usize) -> Result<()> {
    let start = cursor.pos();
    let mut matches = 0u32;
    loop {
        let run = cursor.read_run().map_err(|_| AtomError::LeaderNotFound)?;
        if matches_leader(run, a) {
            matches += 1;
            if matches >= LEADER_MATCH_COUNT {
                log::trace!(
                    "leader acquired at sample {}, {} half-cycles from sample {start}",
                    cursor.pos(),
                    matches
                );
                return Ok(());
            }
        } else {
            matches = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_wave(cycle_samples: usize, cycles: usize) -> Vec<i32> {
        let half = cycle_samples / 2;
        let mut samples = Vec::new();
        for _ in 0..cycles {
            samples.extend(std::iter::repeat(1).take(half));
            samples.extend(std::iter::repeat(-1).take(cycle_samples - half));
        }
        samples
    }

    #[test]
    fn reads_cycle_period() {
        let samples = square_wave(18, 3);
        let mut cursor = CycleCursor::new(&samples);
        assert_eq!(cursor.read_cycle().unwrap(), 18);
        assert_eq!(cursor.read_cycle().unwrap(), 18);
    }

    #[test]
    fn sign_of_zero_is_positive() {
        let samples = vec![0, 0, 0, -1, -1, -1];
        let mut cursor = CycleCursor::new(&samples);
        assert_eq!(cursor.read_cycle().unwrap(), 6);
    }

    #[test]
    fn classifies_one_and_zero_cycles() {
        let a = 18;
        assert!(is_one_cycle(18, a));
        assert!(!is_one_cycle(27, a)); // exactly 1.5*a -> zero bit
        assert!(!is_one_cycle(36, a));
    }

    #[test]
    fn premature_end_when_cycle_cannot_complete() {
        let samples = vec![1, 1, 1];
        let mut cursor = CycleCursor::new(&samples);
        assert!(cursor.read_cycle().is_err());
    }

    #[test]
    fn leader_acquisition_needs_4096_half_cycles() {
        let a = 18;
        // 2048 full cycles = 4096 half-cycle runs, the original's threshold.
        let samples = square_wave(18, 2048);
        let mut cursor = CycleCursor::new(&samples);
        assert!(acquire_leader(&mut cursor, a).is_ok());
        assert!(cursor.at_end());
    }

    #[test]
    fn leader_not_found_on_premature_end() {
        let a = 18;
        let samples = square_wave(18, 10);
        let mut cursor = CycleCursor::new(&samples);
        assert!(matches!(
            acquire_leader(&mut cursor, a),
            Err(AtomError::LeaderNotFound)
        ));
    }
}
