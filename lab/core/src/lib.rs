//! Lab Core - Headless state and logic for Comedia Lab
//!
//! Comedia Lab is a writing tool for stand-up material: draft bits as
//! premise / setup / punchline, keep a diary of raw observations, ask an AI
//! assistant for themes and rewrites, hear a draft read aloud, and browse a
//! guide of comedy techniques.
//!
//! This crate holds everything except rendering. A surface (the terminal UI
//! in this workspace) owns a [`Lab`], feeds it key chords and text edits,
//! calls [`Lab::poll`] and [`Lab::tick`] every frame, and draws from its
//! accessors.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Surface (TUI)                          │
//! │        KeyChord / text edits (up)    accessors (down)         │
//! └───────────────────────────────┬──────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┼──────────────────────────────┐
//! │                              Lab                              │
//! │  ┌──────────┐ ┌───────────┐ ┌─────────┐ ┌──────────────────┐  │
//! │  │ BitStore │ │DiaryStore │ │  Draft  │ │ Notices / timers │  │
//! │  └──────────┘ └───────────┘ └─────────┘ └──────────────────┘  │
//! │        │            │                                         │
//! │  ┌─────┴────────────┴─────┐ ┌──────────────┐ ┌─────────────┐  │
//! │  │   PersistenceWriter    │ │ComedyAssistant│ │  Narrator   │  │
//! │  │   (KeyValueStore)      │ │ (LlmBackend) │ │(SpeechEngine)│  │
//! │  └────────────────────────┘ └──────────────┘ └─────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`lab`]: The [`Lab`] controller, panels and transient panel state
//! - [`types`]: Bits, diary entries, techniques and IDs
//! - [`draft`]: The in-progress joke
//! - [`store`]: Bit store, diary store and selection
//! - [`filter`]: Library and diary search
//! - [`persistence`]: Key-value storage and the ordered writer
//! - [`assistant`]: AI gateway over Gemini or Ollama
//! - [`speech`]: Read-aloud state machine and synthesizers
//! - [`shortcuts`]: Surface-agnostic keyboard shortcuts
//! - [`guide`]: Technique guide content and deep links
//! - [`share`]: Share sheet and clipboard capabilities
//! - [`notice`]: Short-lived user notices
//! - [`config`]: TOML + environment configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assistant;
pub mod config;
pub mod draft;
pub mod error;
pub mod filter;
pub mod guide;
pub mod lab;
pub mod notice;
pub mod persistence;
pub mod share;
pub mod shortcuts;
pub mod speech;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use assistant::{
    assistant_from_config, backend_from_config, ComedyAssistant, GatewayError, GeminiBackend,
    LlmBackend, LlmRequest, LlmResponse, OllamaBackend, RefinedJoke,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, LabConfig, Provider,
};
pub use draft::{Draft, DraftField};
pub use error::ValidationError;
pub use filter::{DiaryQuery, LibraryQuery, TechniqueFilter};
pub use guide::{GuideKind, GuideSection};
pub use lab::{Lab, LabServices, Panel, RefineStatus, ShareOutcome, ThemesState};
pub use notice::{Notice, Notices, NotifyLevel};
pub use persistence::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use share::{Clipboard, ShareError, SharePayload, ShareSheet};
pub use shortcuts::{Key, KeyChord, KeyDisposition, Platform, Shortcut};
pub use speech::{
    CommandSpeechEngine, Narrator, NarratorState, NullSpeechEngine, SpeechEngine, SpeechEvent,
    SpeechEventKind,
};
pub use store::{BitStore, DiaryCommit, DiaryStore};
pub use types::{BitId, DiaryEntry, EntryId, JokeBit, JokePart, JokeParts, Technique};
