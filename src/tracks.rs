//! Track directory loading and path helpers

use std::fs;
use std::path::Path;

use log::{debug, trace, warn};

use crate::error::{Result, RlcapError};

/// Decoded-PCM cache file written next to the config before playback
pub const AUDIO_CACHE_FILE: &str = "audio.wav.custom";

/// Names of the regular files in `dir`, sorted by byte order.
///
/// Subdirectories, symlinks and other special files are skipped, as are
/// names that are not valid UTF-8.
///
/// # Errors
/// `Io` if the directory cannot be read, `EmptyTrackDirectory` if it holds
/// no regular files.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let mut tracks = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();

        if !entry.file_type()?.is_file() {
            trace!("skipping `{}`: not a regular file", name.to_string_lossy());
            continue;
        }

        match name.into_string() {
            Ok(name) => {
                trace!("found track `{}`", name);
                tracks.push(name);
            }
            Err(name) => warn!("skipping non UTF-8 file name `{}`", name.to_string_lossy()),
        }
    }

    if tracks.is_empty() {
        warn!("read no files from `{}`", dir.display());
        return Err(RlcapError::EmptyTrackDirectory(dir.display().to_string()));
    }

    tracks.sort_unstable();
    debug!("loaded {} tracks from `{}`", tracks.len(), dir.display());

    Ok(tracks)
}

/// `prefix` + `/` + `file`, with exactly one separator
pub fn join(prefix: &str, file: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let file = file.trim_start_matches('/');
    format!("{}/{}", prefix, file)
}
