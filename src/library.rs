//! Process-wide, load-once library state
//!
//! The Java side loads `librlcap.so` once from a static initializer. The JVM
//! then calls `JNI_OnLoad`, which calls [`NativeLibrary::load`] on the global
//! instance. Entry points use [`NativeLibrary::get`], which fails with
//! [`RlcapError::NotLoaded`] if that step never happened.

use std::sync::OnceLock;

use log::info;

use crate::activity::GreetingSource;
use crate::error::{Result, RlcapError};
use crate::greeter::Greeter;

static LIBRARY: NativeLibrary = NativeLibrary::new();

/// The library instance shared by every entry point in this process
pub fn global() -> &'static NativeLibrary {
    &LIBRARY
}

/// One-time initialization guard around the library's state
#[derive(Debug, Default)]
pub struct NativeLibrary {
    greeter: OnceLock<Greeter>,
}

impl NativeLibrary {
    pub const fn new() -> Self {
        Self {
            greeter: OnceLock::new(),
        }
    }

    /// Initialize on first call; later calls return the same state
    pub fn load(&self) -> &Greeter {
        self.greeter.get_or_init(|| {
            info!("loading native library state");
            Greeter::new()
        })
    }

    /// Access the loaded state without initializing it
    pub fn get(&self) -> Result<&Greeter> {
        self.greeter.get().ok_or(RlcapError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.greeter.get().is_some()
    }
}

impl GreetingSource for NativeLibrary {
    fn greeting(&self) -> Result<String> {
        Ok(self.get()?.greeting().to_string())
    }
}
