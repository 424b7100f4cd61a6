//! System clipboard backed by arboard
//!
//! The handle is opened on first use; a terminal without a display server
//! only fails when a link is actually copied.

use lab_core::{Clipboard, ShareError};

use crate::error::TuiError;

/// System clipboard using arboard
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Clipboard that connects lazily
    #[must_use]
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn ensure(&mut self) -> Result<&mut arboard::Clipboard, TuiError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        Ok(self.inner.insert(clipboard))
    }

    fn write(&mut self, text: &str) -> Result<(), TuiError> {
        self.ensure()?.set_text(text.to_string())?;
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ShareError> {
        self.write(text).map_err(|e| {
            tracing::warn!(error = %e, "Clipboard write failed");
            ShareError::Failed(e.to_string())
        })
    }
}
