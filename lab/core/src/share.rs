//! Sharing guide sections
//!
//! The lab offers a payload to the host's share sheet first and falls back
//! to copying the link when no sheet is available.

use thiserror::Error;

use crate::guide::GuideSection;

/// What gets shared for a guide section
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    /// Share title
    pub title: String,
    /// Share body
    pub text: String,
    /// Deep link back into the guide
    pub url: String,
}

impl SharePayload {
    /// Payload pointing at `section` under `base_url`
    #[must_use]
    pub fn for_section(section: GuideSection, base_url: &str) -> Self {
        Self {
            title: format!("Comedy technique: {}", section.title()),
            text: format!(
                "Check out this stand-up technique in Comedia Lab: {}",
                section.title()
            ),
            url: format!("{}#{}", base_url.trim_end_matches('#'), section.anchor()),
        }
    }
}

/// Share or clipboard failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// The host has no such facility
    #[error("not supported on this system")]
    Unsupported,

    /// The facility exists but refused
    #[error("{0}")]
    Failed(String),
}

/// Native share facility
pub trait ShareSheet: Send {
    /// Offer the payload to the user
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// System clipboard
pub trait Clipboard: Send {
    /// Replace the clipboard contents
    fn set_text(&mut self, text: &str) -> Result<(), ShareError>;
}

/// Host without a share sheet; terminals fall through to the clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn share(&mut self, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}

/// Host without clipboard access
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}
