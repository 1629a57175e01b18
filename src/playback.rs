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


//! Playback state and the player loop
//!
//! The UI thread owns the window and flips play/pause and close through
//! [`PlaybackControl`]. The player thread runs [`Player::run`], which blocks
//! on the same control while paused and hands each track to a
//! [`TrackSink`] (the platform audio output).
//!
//! # Thread model
//! - UI thread: [`ReadySignal::signal`] once the window is up, then
//!   `toggle`/`close` on user input
//! - Player thread: [`Player::run`] until closed or the sink fails

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use log::{debug, error, info, trace};

use crate::config::ConfigStore;
use crate::error::{Result, RlcapError};
use crate::order::TrackOrder;
use crate::tracks;

#[derive(Debug, Default)]
struct ControlState {
    playing: bool,
    closing: bool,
}

/// Play/pause/close state shared between the UI and the player
#[derive(Debug, Default)]
pub struct PlaybackControl {
    state: Mutex<ControlState>,
    changed: Condvar,
}

impl PlaybackControl {
    /// Starts paused and open
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ControlState>> {
        self.state.lock().map_err(RlcapError::poisoned("playback"))
    }

    fn set(&self, f: impl FnOnce(&mut ControlState)) -> Result<()> {
        let mut state = self.lock()?;
        f(&mut state);
        self.changed.notify_all();
        Ok(())
    }

    pub fn resume(&self) -> Result<()> {
        trace!("resuming audio");
        self.set(|s| s.playing = true)
    }

    pub fn pause(&self) -> Result<()> {
        trace!("pausing audio");
        self.set(|s| s.playing = false)
    }

    /// Flip play/pause; returns whether audio is now playing
    pub fn toggle(&self) -> Result<bool> {
        let mut now_playing = false;
        self.set(|s| {
            s.playing = !s.playing;
            now_playing = s.playing;
        })?;
        debug!("toggled playback, playing = {}", now_playing);
        Ok(now_playing)
    }

    pub fn is_playing(&self) -> Result<bool> {
        Ok(self.lock()?.playing)
    }

    /// Ask the player to stop; wakes any waiter
    pub fn close(&self) -> Result<()> {
        info!("window close signaled");
        self.set(|s| s.closing = true)
    }

    pub fn is_closing(&self) -> Result<bool> {
        Ok(self.lock()?.closing)
    }

    /// Block while paused. Returns `true` once playing, `false` if closing.
    pub fn wait_until_playing(&self) -> Result<bool> {
        let state = self.lock()?;
        let state = self
            .changed
            .wait_while(state, |s| !s.playing && !s.closing)
            .map_err(RlcapError::poisoned("playback"))?;
        Ok(!state.closing)
    }
}

/// One-shot gate the player waits on until the display is up
#[derive(Debug, Default)]
pub struct ReadySignal {
    ready: Mutex<bool>,
    cv: Condvar,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> Result<()> {
        let mut ready = self.ready.lock().map_err(RlcapError::poisoned("ready"))?;
        *ready = true;
        self.cv.notify_all();
        Ok(())
    }

    pub fn wait(&self) -> Result<()> {
        let ready = self.ready.lock().map_err(RlcapError::poisoned("ready"))?;
        let _ready = self
            .cv
            .wait_while(ready, |r| !*r)
            .map_err(RlcapError::poisoned("ready"))?;
        Ok(())
    }

    pub fn is_ready(&self) -> Result<bool> {
        Ok(*self.ready.lock().map_err(RlcapError::poisoned("ready"))?)
    }
}

/// How a track's playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Played to the end; advance to the next track
    Finished,
    /// Stopped early (e.g. paused mid-track); play the same index again
    Interrupted,
}

/// Platform audio output: decodes and plays one track file
pub trait TrackSink {
    fn play(&mut self, path: &str) -> Result<PlayOutcome>;
}

/// Drives the track list through a sink
pub struct Player {
    dir: String,
    tracks: Vec<String>,
    order: TrackOrder,
    config: Arc<ConfigStore>,
    control: Arc<PlaybackControl>,
    ready: Arc<ReadySignal>,
}

impl Player {
    /// # Errors
    /// `InvalidInput` if `tracks` is empty or `order` has a different length
    pub fn new(
        dir: impl Into<String>,
        tracks: Vec<String>,
        order: TrackOrder,
        config: Arc<ConfigStore>,
        control: Arc<PlaybackControl>,
        ready: Arc<ReadySignal>,
    ) -> Result<Self> {
        if tracks.is_empty() {
            return Err(RlcapError::InvalidInput("no tracks to play".to_string()));
        }
        if order.len() != tracks.len() {
            return Err(RlcapError::InvalidInput(format!(
                "play order covers {} tracks, loaded {}",
                order.len(),
                tracks.len()
            )));
        }

        Ok(Self {
            dir: dir.into(),
            tracks,
            order,
            config,
            control,
            ready,
        })
    }

    /// Full path of the track at play position `position`
    pub fn track_path(&self, position: usize) -> Option<String> {
        let track = self.order.at(position)?;
        Some(tracks::join(&self.dir, &self.tracks[track]))
    }

    /// Play until closed. A stored index past the end restarts at 0.
    ///
    /// # Errors
    /// Returns the first sink error; the loop stops there.
    pub fn run(&self, sink: &mut impl TrackSink) -> Result<()> {
        debug!("waiting for render ready");
        self.ready.wait()?;
        info!("render ready, player proceeding");

        let count = self.tracks.len();

        loop {
            if !self.control.wait_until_playing()? {
                debug!("closing while paused, stopping player");
                break;
            }

            let mut position = self.config.get(|c| c.current_track)? as usize;
            if position >= count {
                position = 0;
            }

            let path = self.track_path(position).ok_or_else(|| {
                RlcapError::InvalidInput(format!("no track at position {}", position))
            })?;
            debug!("playing position {} (`{}`)", position, path);

            let outcome = sink.play(&path).map_err(|e| {
                error!("playback of `{}` failed: {}", path, e);
                e
            })?;

            if self.control.is_closing()? {
                debug!("closing, exiting player early");
                break;
            }

            if outcome == PlayOutcome::Interrupted {
                continue;
            }

            position += 1;
            if position == count {
                position = 0;
                let repeat = self.config.get(|c| c.repeat)?;
                if !repeat {
                    self.control.pause()?;
                }
            }
            self.config.update(|c| c.current_track = position as u32)?;
        }

        Ok(())
    }
}
