//! Error types for the native core
//!
//! Every fallible operation in the crate returns [`Result`]. The JNI layer is
//! the only place where an error turns into a process-level failure.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, RlcapError>;

#[derive(Debug, Error)]
pub enum RlcapError {
    /// The native library was used before its one-time initialization ran
    #[error("native library not loaded")]
    NotLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or media file has the wrong shape
    #[error("malformed data: {0}")]
    ConfigFormat(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no regular files in track directory `{0}`")]
    EmptyTrackDirectory(String),

    #[error("unsupported sample format tag {0}")]
    UnsupportedFormat(u16),

    /// A thread panicked while holding a shared lock
    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(target_os = "android")]
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),
}

impl RlcapError {
    /// Shorthand for mapping a `PoisonError` from a named lock
    pub(crate) fn poisoned<T>(name: &'static str) -> impl FnOnce(T) -> Self {
        move |_| RlcapError::LockPoisoned(name)
    }
}
