//! Logger setup
//!
//! Android builds log through `android_logger` under the application tag so
//! output shows up in logcat. Every other target uses `env_logger`, which
//! honours `RUST_LOG` and defaults to `info`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the platform logger. Safe to call more than once.
pub fn init() {
    INIT.call_once(install);
}

#[cfg(target_os = "android")]
fn install() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag(crate::APP_ID),
    );
}

#[cfg(not(target_os = "android"))]
fn install() {
    // A test harness or host binary may already own the global logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
