//! User notices
//!
//! Short-lived alerts raised by lab operations and shown by the surface.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// How long a notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Most notices kept at once; older ones are dropped first
pub const MAX_NOTICES: usize = 5;

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

/// A user-visible alert
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NotifyLevel,
    /// Message
    pub text: String,
    /// When it was raised
    pub posted_at: Instant,
}

/// Bounded queue of notices, oldest first
#[derive(Clone, Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    /// Raise a notice now
    pub fn post(&mut self, level: NotifyLevel, text: impl Into<String>) {
        self.post_at(level, text, Instant::now());
    }

    /// Raise a notice at a given instant
    pub fn post_at(&mut self, level: NotifyLevel, text: impl Into<String>, now: Instant) {
        let text = text.into();
        tracing::debug!(?level, %text, "Notice");
        if self.queue.len() == MAX_NOTICES {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            level,
            text,
            posted_at: now,
        });
    }

    /// Drop notices older than [`NOTICE_TTL`]
    pub fn expire(&mut self, now: Instant) {
        self.queue
            .retain(|n| now.saturating_duration_since(n.posted_at) < NOTICE_TTL);
    }

    /// Visible notices, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    /// Most recent notice
    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    /// Number of visible notices
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is shown
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Dismiss everything
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_expire() {
        let start = Instant::now();
        let mut notices = Notices::default();
        notices.post_at(NotifyLevel::Info, "first", start);
        notices.post_at(NotifyLevel::Warning, "second", start + Duration::from_secs(2));

        notices.expire(start + Duration::from_secs(3));
        assert_eq!(notices.len(), 2);

        notices.expire(start + Duration::from_secs(5));
        assert_eq!(notices.len(), 1);
        assert_eq!(notices.latest().map(|n| n.text.as_str()), Some("second"));

        notices.expire(start + Duration::from_secs(7));
        assert!(notices.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut notices = Notices::default();
        for i in 0..MAX_NOTICES + 2 {
            notices.post(NotifyLevel::Info, format!("n{i}"));
        }
        assert_eq!(notices.len(), MAX_NOTICES);
        assert_eq!(notices.iter().next().map(|n| n.text.as_str()), Some("n2"));
    }
}
