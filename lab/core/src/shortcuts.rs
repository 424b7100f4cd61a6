//! Keyboard shortcuts
//!
//! Surfaces translate their native key events into a [`KeyChord`] and ask
//! [`shortcut_for`] whether it means anything to the lab. A recognised chord
//! is consumed even when its action is suppressed (for example bulk import
//! with nothing selected), so the surface never types it into a field.

use crate::lab::Panel;

/// Surface-agnostic key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Enter / Return
    Enter,
    /// Escape
    Esc,
    /// Tab
    Tab,
    /// Shift+Tab
    BackTab,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Anything else
    Other,
}

/// A key plus its modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// The key
    pub key: Key,
    /// Control held
    pub ctrl: bool,
    /// Command / Super held
    pub meta: bool,
    /// Shift held
    pub shift: bool,
    /// Auto-repeat from holding the key down
    pub repeat: bool,
}

impl KeyChord {
    /// Unmodified, non-repeating key
    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
            repeat: false,
        }
    }

    /// Same chord with Control held
    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Same chord with Command held
    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Same chord with Shift held
    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Same chord marked as auto-repeat
    #[must_use]
    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// Host platform, deciding the primary modifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// Command is primary
    MacOs,
    /// Control is primary
    Other,
}

impl Platform {
    /// Platform this binary was built for
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    /// Whether the chord holds this platform's primary modifier
    #[must_use]
    pub fn primary_held(self, chord: &KeyChord) -> bool {
        match self {
            Self::MacOs => chord.meta,
            Self::Other => chord.ctrl,
        }
    }

    /// Label for the primary modifier
    #[must_use]
    pub fn primary_label(self) -> &'static str {
        match self {
            Self::MacOs => "Cmd",
            Self::Other => "Ctrl",
        }
    }
}

/// A lab action bound to a chord
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// Switch to a panel
    SwitchPanel(Panel),
    /// Save the draft
    Save,
    /// Refine the draft
    Refine,
    /// Import selected diary entries
    BulkImport,
}

/// Whether a chord was taken by the lab
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The lab handled it; do not treat as input
    Consumed,
    /// Not a shortcut; the surface may use it
    Ignored,
}

/// Map a chord to a shortcut for the active panel
#[must_use]
pub fn shortcut_for(chord: &KeyChord, panel: Panel, platform: Platform) -> Option<Shortcut> {
    if chord.repeat {
        return None;
    }

    if let Key::Char(c) = chord.key {
        if let Some(target) = c.to_digit(10).and_then(Panel::from_number) {
            return Some(Shortcut::SwitchPanel(target));
        }

        if platform.primary_held(chord) {
            let lower = c.to_ascii_lowercase();
            match (panel, lower, chord.shift) {
                (Panel::Compose, 's', false) => return Some(Shortcut::Save),
                (Panel::Compose, 'r', false) => return Some(Shortcut::Refine),
                (Panel::Diary, 'i', true) => return Some(Shortcut::BulkImport),
                // With disambiguated keys some terminals drop the shift flag and send 'I'.
                (Panel::Diary, 'i', false) if c == 'I' => return Some(Shortcut::BulkImport),
                _ => {}
            }
        }
    }

    None
}
