//! Start-up activity contract
//!
//! The platform calls `on_create` once when the activity comes up. The
//! activity asks the greeting source for its text and hands it, unmodified,
//! to the display surface. View inflation and layout binding stay on the
//! Java side; this module only fixes the order and the data flow.

use log::debug;

use crate::error::{Result, RlcapError};

/// Where the greeting comes from (the native bridge, in production)
pub trait GreetingSource {
    fn greeting(&self) -> Result<String>;
}

impl<T: GreetingSource + ?Sized> GreetingSource for &T {
    fn greeting(&self) -> Result<String> {
        (**self).greeting()
    }
}

/// Where the greeting is rendered (a `TextView`, in production)
pub trait DisplaySurface {
    fn show_text(&mut self, text: &str);
}

pub struct MainActivity<G, D> {
    source: G,
    surface: D,
    created: bool,
}

impl<G: GreetingSource, D: DisplaySurface> MainActivity<G, D> {
    pub fn new(source: G, surface: D) -> Self {
        Self {
            source,
            surface,
            created: false,
        }
    }

    /// Lifecycle callback: fetch the greeting once and render it as-is.
    ///
    /// # Errors
    /// Propagates a source failure without rendering anything. Calling this
    /// twice on the same activity is `InvalidInput`.
    pub fn on_create(&mut self) -> Result<()> {
        if self.created {
            return Err(RlcapError::InvalidInput(
                "on_create called twice".to_string(),
            ));
        }

        let text = self.source.greeting()?;
        debug!("rendering greeting `{}`", text);
        self.surface.show_text(&text);
        self.created = true;
        Ok(())
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }
}
