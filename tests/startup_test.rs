//! Start-up flow tests
//!
//! Library load, greeting retrieval and hand-off to the display surface,
//! the way the activity drives them on device.

mod helpers;

use helpers::print_header;
use rlcap::activity::{DisplaySurface, GreetingSource, MainActivity};
use rlcap::error::{Result, RlcapError};
use rlcap::NativeLibrary;
use std::cell::Cell;

#[derive(Default)]
struct TextView {
    text: Option<String>,
    renders: usize,
}

impl DisplaySurface for TextView {
    fn show_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
        self.renders += 1;
    }
}

/// Wraps the library and counts bridge calls
struct CountingBridge<'a> {
    library: &'a NativeLibrary,
    calls: Cell<usize>,
}

impl GreetingSource for CountingBridge<'_> {
    fn greeting(&self) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.library.greeting()
    }
}

#[test]
fn test_start_renders_greeting_exactly_once() {
    print_header("Start-up end to end");

    let library = NativeLibrary::new();
    let expected = library.load().greeting().to_string();

    let bridge = CountingBridge {
        library: &library,
        calls: Cell::new(0),
    };
    let mut activity = MainActivity::new(bridge, TextView::default());
    activity.on_create().expect("on_create should succeed");

    assert_eq!(activity.surface().text.as_deref(), Some(expected.as_str()));
    assert_eq!(activity.surface().renders, 1);

    println!("✅ Rendered: {}", expected);
}

#[test]
fn test_greeting_is_non_empty_and_stable() {
    let library = NativeLibrary::new();
    library.load();

    let first = library.greeting().unwrap();
    assert!(!first.is_empty());
    for _ in 0..10 {
        assert_eq!(library.greeting().unwrap(), first);
    }
}

#[test]
fn test_unloaded_library_fails_fast() {
    let library = NativeLibrary::new();
    let mut activity = MainActivity::new(&library, TextView::default());

    let err = activity.on_create().unwrap_err();
    assert!(matches!(err, RlcapError::NotLoaded));
    assert!(activity.surface().text.is_none());

    println!("✅ Unloaded library rejected: {}", err);
}

#[test]
fn test_exported_greeting_matches_library() {
    assert_eq!(rlcap::get_greeting(), rlcap::library::global().load().greeting());
}
