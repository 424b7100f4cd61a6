//! Theme and Colors
//!
//! Comedia Lab's palette: a dark stage with a warm spotlight. The accent
//! marks whatever has focus, the spotlight marks whatever was just
//! deep-linked or copied.

use ratatui::style::{Color, Modifier, Style};

use lab_core::NotifyLevel;

// ============================================================================
// Stage Palette
// ============================================================================

/// Spotlight amber (focus, active panel)
pub const SPOTLIGHT: Color = Color::Rgb(255, 196, 87);

/// Curtain red (titles, brand)
pub const CURTAIN: Color = Color::Rgb(214, 69, 80);

/// Mic silver (borders, separators)
pub const MIC_SILVER: Color = Color::Rgb(150, 150, 160);

/// Normal text
pub const TEXT: Color = Color::Rgb(230, 230, 230);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

// ============================================================================
// Joke Parts
// ============================================================================

/// Premise label
pub const PREMISE: Color = Color::Rgb(150, 180, 255);

/// Setup label
pub const SETUP: Color = Color::Rgb(190, 160, 255);

/// Punchline label
pub const PUNCHLINE: Color = Color::Rgb(255, 150, 120);

// ============================================================================
// Notices
// ============================================================================

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning yellow
pub const WARNING_YELLOW: Color = Color::Rgb(255, 223, 128);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Info blue
pub const INFO_BLUE: Color = Color::Rgb(100, 180, 255);

/// Color for a notice level
#[must_use]
pub fn notice_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => INFO_BLUE,
        NotifyLevel::Warning => WARNING_YELLOW,
        NotifyLevel::Error => ERROR_RED,
        NotifyLevel::Success => SUCCESS_GREEN,
    }
}

/// Style for a label that may have focus
#[must_use]
pub fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(SPOTLIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MIC_SILVER)
    }
}

/// Style for a selectable row
#[must_use]
pub fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Black).bg(SPOTLIGHT)
    } else {
        Style::default().fg(TEXT)
    }
}
