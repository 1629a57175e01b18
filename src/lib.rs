uniffi::setup_scaffolding!();

// JNI bridge for Android
#[cfg(target_os = "android")]
mod jni_bridge;

// Core modules
pub mod error;
pub mod logging;
pub mod greeter;
pub mod library;
pub mod activity;
pub mod config;
pub mod tracks;
pub mod order;
pub mod wav;
pub mod playback;
pub mod layout;

// Re-export commonly used types for convenience
pub use error::{RlcapError, Result};
pub use greeter::Greeter;
pub use library::NativeLibrary;

/// Application id, also used as the Android log tag
pub const APP_ID: &str = "com.msun.rlcap";

/// Greeting shown by the start-up activity.
///
/// Loads the library on first use, so hosts without `JNI_OnLoad`
/// (uniffi bindings, the CLI) can call it directly.
#[uniffi::export]
pub fn get_greeting() -> String {
    library::global().load().greeting().to_string()
}
