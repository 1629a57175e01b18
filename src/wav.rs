// rlcap - native core for the rlcap Android player
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Decoded PCM cache files
//!
//! Tracks are transcoded into a canonical 44-byte-header WAV file before
//! playback. The `wFormatTag` field of that file carries the decoder's
//! sample format code rather than the usual WAVE format tag:
//!
//! | tag | format | playable |
//! |---|---|---|
//! | 0 | unsigned 8-bit | no |
//! | 1 | signed 16-bit | yes |
//! | 2 | signed 32-bit | yes |
//! | 3 | 32-bit float | yes |
//! | 4 | 64-bit float | no |
//!
//! Any other tag has no output format and is rejected.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};

use crate::error::{Result, RlcapError};

/// Size of the canonical header
pub const HEADER_LEN: usize = 44;

/// Sample format handed to the audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    I16,
    I32,
    F32,
}

impl SampleFormat {
    /// Map a header format tag to an output format
    ///
    /// # Errors
    /// `UnsupportedFormat` for unsigned 8-bit, 64-bit float, and unknown tags
    pub fn from_tag(tag: u16) -> Result<Self> {
        match tag {
            0 | 4 => Err(RlcapError::UnsupportedFormat(tag)),
            1 => Ok(SampleFormat::I16),
            2 => Ok(SampleFormat::I32),
            3 => Ok(SampleFormat::F32),
            other => {
                warn!("unknown sample format tag {}", other);
                Err(RlcapError::UnsupportedFormat(other))
            }
        }
    }

    /// Bytes per sample
    pub fn width(self) -> usize {
        match self {
            SampleFormat::I16 => 2,
            SampleFormat::I32 | SampleFormat::F32 => 4,
        }
    }
}

/// Canonical WAV header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    /// RIFF chunk size (file size minus 8)
    pub riff_size: u32,
    /// fmt chunk size, 16 for the canonical layout
    pub fmt_size: u32,
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Size of the PCM payload in bytes
    pub data_size: u32,
}

impl WavHeader {
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self> {
        expect_tag(bytes, 0, b"RIFF")?;
        expect_tag(bytes, 8, b"WAVE")?;
        expect_tag(bytes, 12, b"fmt ")?;
        expect_tag(bytes, 36, b"data")?;

        let header = Self {
            riff_size: u32_at(bytes, 4),
            fmt_size: u32_at(bytes, 16),
            format_tag: u16_at(bytes, 20),
            channels: u16_at(bytes, 22),
            sample_rate: u32_at(bytes, 24),
            byte_rate: u32_at(bytes, 28),
            block_align: u16_at(bytes, 32),
            bits_per_sample: u16_at(bytes, 34),
            data_size: u32_at(bytes, 40),
        };

        if header.channels == 0 {
            return Err(RlcapError::ConfigFormat("WAV header has zero channels".to_string()));
        }

        debug!("WAV header: {:?}", header);
        Ok(header)
    }

    pub fn read_from(reader: &mut impl Read) -> Result<Self> {
        let mut bytes = [0u8; HEADER_LEN];
        reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => {
                RlcapError::ConfigFormat("WAV file shorter than its header".to_string())
            }
            _ => RlcapError::Io(e),
        })?;
        Self::parse(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.riff_size.to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&self.fmt_size.to_le_bytes());
        out[20..22].copy_from_slice(&self.format_tag.to_le_bytes());
        out[22..24].copy_from_slice(&self.channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        out[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        out[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        out
    }

    pub fn sample_format(&self) -> Result<SampleFormat> {
        SampleFormat::from_tag(self.format_tag)
    }

    /// Frame rate of the payload
    ///
    /// # Errors
    /// `ConfigFormat` if `block_align` is zero or `byte_rate / block_align`
    /// disagrees with `sample_rate`
    pub fn frames_per_second(&self) -> Result<u32> {
        if self.block_align == 0 {
            return Err(RlcapError::ConfigFormat("WAV block align is zero".to_string()));
        }
        let derived = self.byte_rate / self.block_align as u32;
        if derived != self.sample_rate {
            return Err(RlcapError::ConfigFormat(format!(
                "WAV sample rate {} but byte rate implies {} frames/s",
                self.sample_rate, derived
            )));
        }
        Ok(self.sample_rate)
    }

    /// Playback length implied by the payload size
    pub fn duration(&self) -> Result<Duration> {
        let frame_bytes = self.sample_format()?.width() as u64 * self.channels as u64;
        let per_second = frame_bytes * self.sample_rate as u64;
        if per_second == 0 {
            return Ok(Duration::ZERO);
        }
        Ok(Duration::from_secs_f64(self.data_size as f64 / per_second as f64))
    }
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &[u8; 4]) -> Result<()> {
    let found = &bytes[offset..offset + 4];
    if found != tag {
        return Err(RlcapError::ConfigFormat(format!(
            "expected `{}` at offset {}, found `{}`",
            String::from_utf8_lossy(tag),
            offset,
            String::from_utf8_lossy(found)
        )));
    }
    Ok(())
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Streams PCM bursts out of a cache file
pub struct WavReader<R> {
    header: WavHeader,
    format: SampleFormat,
    reader: R,
}

impl WavReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> WavReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let header = WavHeader::read_from(&mut reader)?;
        let format = header.sample_format()?;
        Ok(Self {
            header,
            format,
            reader,
        })
    }

    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Bytes in one frame (one sample per channel)
    pub fn frame_bytes(&self) -> usize {
        self.format.width() * self.header.channels as usize
    }

    /// Fill `buf` with up to `frames` frames; returns the bytes read, 0 at
    /// end of file
    ///
    /// # Errors
    /// `InvalidInput` if the burst size in bytes overflows `usize`
    pub fn read_burst(&mut self, frames: usize, buf: &mut Vec<u8>) -> Result<usize> {
        let want = frames.checked_mul(self.frame_bytes()).ok_or_else(|| {
            RlcapError::InvalidInput(format!("burst of {} frames is too large", frames))
        })?;
        buf.resize(want, 0);

        let mut filled = 0;
        while filled < want {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        buf.truncate(filled);
        Ok(filled)
    }
}
