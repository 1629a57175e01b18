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


//! Persistent player configuration
//!
//! The config lives in a small binary file (`ncaprc`) in the app's internal
//! data directory. All access goes through [`ConfigStore`], which keeps the
//! open file and the in-memory copy behind one mutex so the UI thread and the
//! player thread see a consistent view.
//!
//! # Binary layout
//!
//! All integers little-endian.
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 1 | repeat (0/1) |
//! | 1 | 1 | shuffle (0/1) |
//! | 2 | 1 | performance mode code |
//! | 3 | 1 | master volume, 0..=100 |
//! | 4 | 4 | current track index |
//! | 8 | 4 | track path length in bytes, including the trailing NUL |
//! | 12 | 4 | track count (number of per-track volumes) |
//! | 16 | n | track path, NUL terminated |
//! | 16+n | count | per-track volumes |

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RlcapError};

/// Config file name inside the app's internal data directory
pub const CONFIG_FILE: &str = "ncaprc";

/// Music directory used until the user picks another one
pub const DEFAULT_TRACK_PATH: &str = "/sdcard/Music/NCAP-share";

/// Master volume ceiling
pub const MAX_VOLUME: u8 = 100;

/// Size of the fixed-width prefix before the track path
const FIXED_LEN: usize = 16;

/// Audio stream performance hint, stored as a single byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PerformanceMode {
    /// No preference
    #[default]
    None,
    /// Smallest buffers the device allows
    LowLatency,
    /// Larger buffers, fewer wakeups
    PowerSaving,
}

impl PerformanceMode {
    pub fn code(self) -> u8 {
        match self {
            PerformanceMode::None => 0,
            PerformanceMode::LowLatency => 1,
            PerformanceMode::PowerSaving => 2,
        }
    }

    /// Lenient mapping used when handing the mode to the audio backend:
    /// anything unknown means no preference.
    pub fn from_code(code: u8) -> Self {
        Self::try_from_code(code).unwrap_or(PerformanceMode::None)
    }

    /// Strict mapping used when decoding the config file
    pub fn try_from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(PerformanceMode::None),
            1 => Ok(PerformanceMode::LowLatency),
            2 => Ok(PerformanceMode::PowerSaving),
            other => Err(RlcapError::ConfigFormat(format!(
                "unknown performance mode code {}",
                other
            ))),
        }
    }
}

/// Player settings persisted across launches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Start over from the first track after the last one
    pub repeat: bool,

    /// Play tracks in shuffled order
    pub shuffle: bool,

    /// Audio stream performance hint
    pub performance_mode: PerformanceMode,

    /// Master volume, 0..=100
    pub volume: u8,

    /// Index of the track to play next (position in play order)
    pub current_track: u32,

    /// Directory the tracks are loaded from
    pub track_path: String,

    /// Per-track volume, one entry per loaded track
    pub track_volumes: Vec<u8>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            repeat: false,
            shuffle: false,
            performance_mode: PerformanceMode::PowerSaving,
            volume: MAX_VOLUME,
            current_track: 0,
            track_path: DEFAULT_TRACK_PATH.to_string(),
            track_volumes: Vec::new(),
        }
    }
}

impl PlayerConfig {
    /// Encode into the on-disk layout
    ///
    /// # Errors
    /// `InvalidInput` if the volume is above 100, the path contains a NUL
    /// byte, or a length does not fit in 32 bits.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.volume > MAX_VOLUME {
            return Err(RlcapError::InvalidInput(format!(
                "volume {} exceeds {}",
                self.volume, MAX_VOLUME
            )));
        }
        if self.track_path.contains('\0') {
            return Err(RlcapError::InvalidInput(
                "track path contains a NUL byte".to_string(),
            ));
        }

        let path_len = u32::try_from(self.track_path.len() + 1)
            .map_err(|_| RlcapError::InvalidInput("track path too long".to_string()))?;
        let track_count = u32::try_from(self.track_volumes.len())
            .map_err(|_| RlcapError::InvalidInput("too many tracks".to_string()))?;

        let mut out =
            Vec::with_capacity(FIXED_LEN + path_len as usize + self.track_volumes.len());
        out.push(self.repeat as u8);
        out.push(self.shuffle as u8);
        out.push(self.performance_mode.code());
        out.push(self.volume);
        out.extend_from_slice(&self.current_track.to_le_bytes());
        out.extend_from_slice(&path_len.to_le_bytes());
        out.extend_from_slice(&track_count.to_le_bytes());
        out.extend_from_slice(self.track_path.as_bytes());
        out.push(0);
        out.extend_from_slice(&self.track_volumes);

        Ok(out)
    }

    /// Decode from the on-disk layout
    ///
    /// # Errors
    /// `ConfigFormat` for truncated input or invalid field values
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FIXED_LEN {
            return Err(RlcapError::ConfigFormat(format!(
                "config is {} bytes, need at least {}",
                bytes.len(),
                FIXED_LEN
            )));
        }

        let volume = bytes[3];
        if volume > MAX_VOLUME {
            return Err(RlcapError::ConfigFormat(format!("volume {} out of range", volume)));
        }

        let performance_mode = PerformanceMode::try_from_code(bytes[2])?;
        let current_track = read_u32(bytes, 4);
        let path_len = read_u32(bytes, 8) as usize;
        let track_count = read_u32(bytes, 12) as usize;

        if path_len == 0 {
            return Err(RlcapError::ConfigFormat("track path length is zero".to_string()));
        }

        let (path_end, volumes_end) = FIXED_LEN
            .checked_add(path_len)
            .and_then(|end| Some((end, end.checked_add(track_count)?)))
            .ok_or_else(|| {
                RlcapError::ConfigFormat(format!(
                    "path length {} and track count {} overflow",
                    path_len, track_count
                ))
            })?;
        if bytes.len() < volumes_end {
            return Err(RlcapError::ConfigFormat(format!(
                "config truncated: {} bytes, header describes {}",
                bytes.len(),
                volumes_end
            )));
        }
        if bytes.len() > volumes_end {
            debug!("ignoring {} trailing config bytes", bytes.len() - volumes_end);
        }

        let (path_bytes, nul) = bytes[FIXED_LEN..path_end].split_at(path_len - 1);
        if nul.first() != Some(&0) || path_bytes.contains(&0) {
            return Err(RlcapError::ConfigFormat(
                "track path is not NUL terminated".to_string(),
            ));
        }
        let track_path = String::from_utf8(path_bytes.to_vec())
            .map_err(|e| RlcapError::ConfigFormat(format!("track path is not UTF-8: {}", e)))?;

        Ok(Self {
            repeat: bytes[0] != 0,
            shuffle: bytes[1] != 0,
            performance_mode,
            volume,
            current_track,
            track_path,
            track_volumes: bytes[path_end..volumes_end].to_vec(),
        })
    }

    /// Match the per-track volume list to `track_count`, filling new
    /// entries with `default_volume`
    pub fn resize_track_volumes(&mut self, track_count: usize, default_volume: u8) {
        self.track_volumes.resize(track_count, default_volume);
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

/// Whether [`ConfigStore::open`] found an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Created,
    Existing,
}

struct Inner {
    file: File,
    config: PlayerConfig,
}

/// Synchronized owner of the config file and its in-memory copy
pub struct ConfigStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl ConfigStore {
    /// Open `path` for read/write, creating it if missing.
    ///
    /// The in-memory config starts at the defaults either way; call
    /// [`read`](Self::read) to load an existing file.
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, OpenOutcome)> {
        let path = path.as_ref().to_path_buf();

        let (file, outcome) = match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => (file, OpenOutcome::Created),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let file = OpenOptions::new().read(true).write(true).open(&path)?;
                (file, OpenOutcome::Existing)
            }
            Err(e) => return Err(e.into()),
        };

        debug!("opened config `{}` ({:?})", path.display(), outcome);

        let store = Self {
            path,
            inner: Mutex::new(Inner {
                file,
                config: PlayerConfig::default(),
            }),
        };
        Ok((store, outcome))
    }

    /// Open the config the way the app does at start-up: a new file gets the
    /// defaults written to it, an existing one is read.
    pub fn open_or_init(path: impl AsRef<Path>) -> Result<Self> {
        let (store, outcome) = Self::open(path)?;
        match outcome {
            OpenOutcome::Created => {
                info!("creating config with defaults");
                store.write()?;
            }
            OpenOutcome::Existing => {
                info!("config exists, reading");
                store.read()?;
            }
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(RlcapError::poisoned("config"))
    }

    /// Replace the in-memory config with the file's contents
    pub fn read(&self) -> Result<()> {
        let mut inner = self.lock()?;
        let mut bytes = Vec::new();
        inner.file.seek(SeekFrom::Start(0))?;
        inner.file.read_to_end(&mut bytes)?;
        inner.config = PlayerConfig::from_bytes(&bytes)?;
        Ok(())
    }

    /// Persist the in-memory config, replacing the whole file
    pub fn write(&self) -> Result<()> {
        let mut inner = self.lock()?;
        let bytes = inner.config.to_bytes()?;
        inner.file.seek(SeekFrom::Start(0))?;
        inner.file.write_all(&bytes)?;
        inner.file.set_len(bytes.len() as u64)?;
        inner.file.flush()?;
        Ok(())
    }

    /// Read one or more fields under the lock
    pub fn get<R>(&self, f: impl FnOnce(&PlayerConfig) -> R) -> Result<R> {
        Ok(f(&self.lock()?.config))
    }

    /// Modify the in-memory config under the lock (not persisted until
    /// [`write`](Self::write))
    pub fn update<R>(&self, f: impl FnOnce(&mut PlayerConfig) -> R) -> Result<R> {
        Ok(f(&mut self.lock()?.config))
    }

    pub fn snapshot(&self) -> Result<PlayerConfig> {
        self.get(Clone::clone)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot()?)?)
    }

    /// Log every field at info level
    pub fn log_dump(&self) -> Result<()> {
        let inner = self.lock()?;
        let c = &inner.config;
        info!("repeat:\t{}", c.repeat);
        info!("shuffle:\t{}", c.shuffle);
        info!("performance_mode:\t{:?}", c.performance_mode);
        info!("volume:\t{}", c.volume);
        info!("current_track:\t{}", c.current_track);
        info!("track_path:\t{}", c.track_path);
        info!("track_volumes:\t{:?}", c.track_volumes);
        Ok(())
    }
}
