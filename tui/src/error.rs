//! Terminal surface errors

use thiserror::Error;

/// Errors raised by the terminal surface itself
#[derive(Debug, Error)]
pub enum TuiError {
    /// Clipboard could not be opened or written
    #[error("clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// Terminal I/O failed
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
