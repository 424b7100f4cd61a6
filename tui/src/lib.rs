//! Comedia Lab TUI - Terminal surface for the comedy writing lab
//!
//! A full-screen terminal client over [`lab_core::Lab`]. The lab owns all
//! state and behavior; this crate translates keys, keeps focus and cursors,
//! and draws.
//!
//! # Architecture
//!
//! - **App**: Event loop and key routing
//! - **Input**: Crossterm key events to lab key chords
//! - **View**: Per-panel focus and cursors
//! - **UI**: One renderer per panel plus header, notices and status bar
//! - **Widgets**: Borderless text fields and scrollable text
//! - **Clipboard**: System clipboard for shared guide links

pub mod app;
pub mod clipboard;
pub mod error;
pub mod input;
pub mod theme;
pub mod ui;
pub mod view;
pub mod widgets;

pub use app::App;
pub use clipboard::SystemClipboard;
pub use error::TuiError;
