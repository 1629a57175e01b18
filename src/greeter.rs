//! Greeting text handed to the start-up activity

/// Produces the display string for `MainActivity.stringFromJNI()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeter {
    text: String,
}

impl Greeter {
    pub const DEFAULT_TEXT: &'static str = "Hello from Rust";

    pub fn new() -> Self {
        Self {
            text: Self::DEFAULT_TEXT.to_string(),
        }
    }

    /// The greeting. Never empty, never changes for the life of the greeter.
    pub fn greeting(&self) -> &str {
        &self.text
    }
}

impl Default for Greeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_not_empty() {
        assert!(!Greeter::new().greeting().is_empty());
    }

    #[test]
    fn test_greeting_deterministic() {
        let greeter = Greeter::default();
        let first = greeter.greeting().to_string();
        for _ in 0..5 {
            assert_eq!(greeter.greeting(), first);
        }
        assert_eq!(Greeter::new(), greeter);
    }
}
