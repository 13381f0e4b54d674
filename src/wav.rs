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
//! RIFF/WAVE container I/O, backed by `hound`.
//!
//! `hound` walks chunks generically and exposes 8-bit samples already
//! centred on zero (as `i8`), so this module only has to adapt its
//! `WavReader`/`WavWriter` to the crate's sign-agnostic `i32` sample
//! representation - no bit-depth-specific offset arithmetic of our own.
//! `hound::WavWriter` writes placeholder chunk sizes up front and patches
//! them in `finalize()` once the true sample count is known, a
//! seek-back-and-patch approach common to streaming RIFF writers.

use std::io::{Read, Seek, Write};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter as HoundWriter};

use crate::error::{AtomError, Result};

/// A fully loaded mono PCM WAV: samples centred on zero regardless of the
/// source bit depth, so callers never need to special-case 8- vs 16-bit.
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub samples: Vec<i32>,
}

/// Parse a mono 8- or 16-bit PCM WAV.
pub fn read<R: Read>(r: R) -> Result<WavAudio> {
    let mut reader = WavReader::new(r)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(AtomError::BadContainer("only mono WAV is supported".into()));
    }
    if spec.sample_format != SampleFormat::Int {
        return Err(AtomError::BadContainer("only PCM WAV is supported".into()));
    }

    let samples: Vec<i32> = match spec.bits_per_sample {
        8 => reader
            .samples::<i8>()
            .map(|s| s.map(i32::from))
            .collect::<std::result::Result<_, _>>()?,
        16 => reader
            .samples::<i16>()
            .map(|s| s.map(i32::from))
            .collect::<std::result::Result<_, _>>()?,
        other => {
            return Err(AtomError::BadContainer(format!(
                "unsupported bit depth {other}"
            )))
        }
    };

    log::trace!(
        "read {} samples at {} Hz / {}-bit",
        samples.len(),
        spec.sample_rate,
        spec.bits_per_sample
    );

    Ok(WavAudio {
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        samples,
    })
}

/// Streaming mono PCM WAV writer, thin over `hound::WavWriter`.
pub struct WavWriter<W: Write + Seek> {
    inner: HoundWriter<W>,
}

impl<W: Write + Seek> WavWriter<W> {
    pub fn new(inner: W, sample_rate: u32, bits_per_sample: u16) -> Result<WavWriter<W>> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample,
            sample_format: SampleFormat::Int,
        };
        Ok(WavWriter {
            inner: HoundWriter::new(inner, spec)?,
        })
    }

    /// `sample` is the centred-on-0x80 byte [`crate::tone::render`] emits
    /// for 8-bit depth; `hound` wants the signed `i8` equivalent.
    pub fn write_sample_u8(&mut self, sample: u8) -> Result<()> {
        let centred = i16::from(sample) - 0x80;
        self.inner.write_sample(centred as i8)?;
        Ok(())
    }

    pub fn write_sample_i16(&mut self, sample: i16) -> Result<()> {
        self.inner.write_sample(sample)?;
        Ok(())
    }

    /// Patch the RIFF and data chunk sizes now that the sample count is known.
    pub fn finalize(self) -> Result<()> {
        self.inner.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_sixteen_bit_mono() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut w = WavWriter::new(&mut buf, 44100, 16).unwrap();
            for s in [0i16, 16384, -16384, 1] {
                w.write_sample_i16(s).unwrap();
            }
            w.finalize().unwrap();
        }
        buf.set_position(0);
        let audio = read(buf).unwrap();
        assert_eq!(audio.sample_rate, 44100);
        assert_eq!(audio.bits_per_sample, 16);
        assert_eq!(audio.samples, vec![0, 16384, -16384, 1]);
    }

    #[test]
    fn round_trips_eight_bit_mono_centred() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut w = WavWriter::new(&mut buf, 22050, 8).unwrap();
            for s in [0x80u8, 0xC0, 0x40] {
                w.write_sample_u8(s).unwrap();
            }
            w.finalize().unwrap();
        }
        buf.set_position(0);
        let audio = read(buf).unwrap();
        assert_eq!(audio.bits_per_sample, 8);
        assert_eq!(audio.samples, vec![0, 0x40, -0x40]);
    }

    #[test]
    fn patches_riff_and_data_sizes() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut w = WavWriter::new(&mut buf, 44100, 8).unwrap();
            for _ in 0..10 {
                w.write_sample_u8(0x80).unwrap();
            }
            w.finalize().unwrap();
        }
        let bytes = buf.into_inner();
        let riff_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(riff_size, 36 + 10);
        let data_size = u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]);
        assert_eq!(data_size, 10);
    }

    #[test]
    fn rejects_stereo() {
        let mut buf = Cursor::new(Vec::new());
        {
            let spec = WavSpec {
                channels: 2,
                sample_rate: 44100,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            };
            let mut w = HoundWriter::new(&mut buf, spec).unwrap();
            w.write_sample(0i16).unwrap();
            w.write_sample(0i16).unwrap();
            w.finalize().unwrap();
        }
        buf.set_position(0);
        assert!(read(buf).is_err());
    }
}
