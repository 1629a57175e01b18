//! Test helpers for integration tests
//!
//! This module provides on-disk fixtures (music directories, WAV files),
//! a scripted audio sink, and small output helpers.

#![allow(dead_code)]

use rlcap::error::{Result, RlcapError};
use rlcap::playback::{PlayOutcome, PlaybackControl, TrackSink};
use rlcap::wav::WavHeader;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Create a temp directory holding one empty file per name
pub fn music_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for name in names {
        fs::write(dir.path().join(name), b"").expect("Failed to write track");
    }
    dir
}

/// Write a canonical 16-bit WAV with `payload` as PCM data
pub fn write_wav(path: &Path, channels: u16, sample_rate: u32, payload: &[u8]) {
    let header = WavHeader {
        riff_size: 36 + payload.len() as u32,
        fmt_size: 16,
        format_tag: 1,
        channels,
        sample_rate,
        byte_rate: sample_rate * channels as u32 * 2,
        block_align: channels * 2,
        bits_per_sample: 16,
        data_size: payload.len() as u32,
    };
    let mut bytes = header.to_bytes().to_vec();
    bytes.extend_from_slice(payload);
    fs::write(path, bytes).expect("Failed to write WAV");
}

/// What the scripted sink does on a given call
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Finish,
    Interrupt,
    Fail,
    /// Finish, then ask the player to close
    FinishAndClose,
}

/// Sink that records every path it is asked to play and follows a script.
/// Once the script runs out every call finishes normally.
pub struct ScriptedSink {
    pub played: Arc<Mutex<Vec<String>>>,
    script: VecDeque<Step>,
    control: Arc<PlaybackControl>,
}

impl ScriptedSink {
    pub fn new(script: Vec<Step>, control: Arc<PlaybackControl>) -> Self {
        Self {
            played: Arc::new(Mutex::new(Vec::new())),
            script: script.into(),
            control,
        }
    }
}

impl TrackSink for ScriptedSink {
    fn play(&mut self, path: &str) -> Result<PlayOutcome> {
        self.played.lock().unwrap().push(path.to_string());
        match self.script.pop_front().unwrap_or(Step::Finish) {
            Step::Finish => Ok(PlayOutcome::Finished),
            Step::Interrupt => Ok(PlayOutcome::Interrupted),
            Step::Fail => Err(RlcapError::InvalidInput(format!("cannot play {}", path))),
            Step::FinishAndClose => {
                self.control.close()?;
                Ok(PlayOutcome::Finished)
            }
        }
    }
}

/// Poll `cond` until it holds or `timeout` passes
pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

/// File names (last path component) of the recorded plays
pub fn names(played: &[String]) -> Vec<String> {
    played
        .iter()
        .map(|p| p.rsplit('/').next().unwrap_or(p).to_string())
        .collect()
}

/// Print a section header
pub fn print_header(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let played = vec!["/a/b/c.mp3".to_string(), "d.mp3".to_string()];
        assert_eq!(names(&played), vec!["c.mp3", "d.mp3"]);
    }
}
