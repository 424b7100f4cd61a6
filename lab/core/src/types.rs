//! Core Data Types
//!
//! The persisted entities of the lab: joke bits, diary entries and the
//! closed set of comedic techniques a bit can be tagged with.
//!
//! Field names serialize in camelCase so stored collections keep the
//! `createdAt` shape of the original browser storage.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Build an id from a prefix, the current time and a process-wide counter
fn generate_id(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{prefix}_{}_{count}", now_millis())
}

/// Joke bit identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitId(pub String);

impl BitId {
    /// Create a bit ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh ID for a bit saved from the compose panel
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_id("bit"))
    }

    /// Generate a fresh ID for a bit imported from the diary
    #[must_use]
    pub fn generate_imported() -> Self {
        Self(generate_id("imported"))
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Diary entry identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Create an entry ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh entry ID
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_id("entry"))
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comedic technique a bit is built around
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technique {
    /// Reference back to an earlier bit
    #[serde(rename = "Callback")]
    Callback,
    /// Play on multiple meanings of a word
    #[serde(rename = "Pun")]
    Pun,
    /// Complete joke in a single line
    #[serde(rename = "One-liner")]
    OneLiner,
    /// Gap between social expectation and reality
    #[serde(rename = "Irony")]
    Irony,
    /// Lead to a logical conclusion, deliver another
    #[serde(rename = "Misdirection")]
    Misdirection,
    /// Pattern, pattern, break
    #[serde(rename = "Rule of Three")]
    RuleOfThree,
    /// Blow a detail out of proportion
    #[serde(rename = "Exaggeration")]
    Exaggeration,
    /// Greg Dean's assumption / reinterpretation method
    #[serde(rename = "Greg Dean")]
    GregDean,
    /// Leo Lins style topic mapping
    #[serde(rename = "Leo Lins")]
    LeoLins,
    /// Element that breaks the narrative flow
    #[serde(rename = "Surprise")]
    Surprise,
    /// Audience knows what the character doesn't
    #[serde(rename = "Dramatic Irony")]
    DramaticIrony,
    /// Saying the opposite to mock
    #[serde(rename = "Sarcasm")]
    Sarcasm,
}

impl Technique {
    /// Every technique, in presentation order
    pub const ALL: [Technique; 12] = [
        Technique::Callback,
        Technique::Pun,
        Technique::OneLiner,
        Technique::Irony,
        Technique::Misdirection,
        Technique::RuleOfThree,
        Technique::Exaggeration,
        Technique::GregDean,
        Technique::LeoLins,
        Technique::Surprise,
        Technique::DramaticIrony,
        Technique::Sarcasm,
    ];

    /// Stable label, also used as the persisted value
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Callback => "Callback",
            Self::Pun => "Pun",
            Self::OneLiner => "One-liner",
            Self::Irony => "Irony",
            Self::Misdirection => "Misdirection",
            Self::RuleOfThree => "Rule of Three",
            Self::Exaggeration => "Exaggeration",
            Self::GregDean => "Greg Dean",
            Self::LeoLins => "Leo Lins",
            Self::Surprise => "Surprise",
            Self::DramaticIrony => "Dramatic Irony",
            Self::Sarcasm => "Sarcasm",
        }
    }

    /// One-line description for pickers
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Callback => "Bring back something said earlier in the set",
            Self::Pun => "Exploit the double meaning of a word",
            Self::OneLiner => "Setup and punch in a single sentence",
            Self::Irony => "Contrast what should happen with what does",
            Self::Misdirection => "Lead to one conclusion, land on another",
            Self::RuleOfThree => "Pattern, pattern, break",
            Self::Exaggeration => "Inflate a detail until it bursts",
            Self::GregDean => "Connector, target assumption, reinterpretation",
            Self::LeoLins => "Map the topic, link two distant points",
            Self::Surprise => "Drop in something nobody saw coming",
            Self::DramaticIrony => "The audience knows what the character doesn't",
            Self::Sarcasm => "Say the opposite, mean the mockery",
        }
    }

    /// Next technique in presentation order (wraps)
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous technique in presentation order (wraps)
    #[must_use]
    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Technique {
    fn default() -> Self {
        Self::Misdirection
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a label names no technique
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown technique: {0}")]
pub struct UnknownTechnique(pub String);

impl FromStr for Technique {
    type Err = UnknownTechnique;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTechnique(wanted.to_string()))
    }
}

/// Which of the three joke fields is meant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JokePart {
    /// The topic or idea
    Premise,
    /// The line that builds the assumption
    Setup,
    /// The reinterpretation
    Punchline,
}

impl JokePart {
    /// All parts in reading order
    pub const ALL: [JokePart; 3] = [JokePart::Premise, JokePart::Setup, JokePart::Punchline];

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Premise => "Premise",
            Self::Setup => "Setup",
            Self::Punchline => "Punchline",
        }
    }
}

/// The three written parts of a joke
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokeParts {
    /// The topic or idea
    pub premise: String,
    /// The line that builds the assumption
    pub setup: String,
    /// The reinterpretation
    pub punchline: String,
}

impl JokeParts {
    /// Create parts from the three strings
    pub fn new(
        premise: impl Into<String>,
        setup: impl Into<String>,
        punchline: impl Into<String>,
    ) -> Self {
        Self {
            premise: premise.into(),
            setup: setup.into(),
            punchline: punchline.into(),
        }
    }

    /// Borrow one part
    #[must_use]
    pub fn get(&self, part: JokePart) -> &str {
        match part {
            JokePart::Premise => &self.premise,
            JokePart::Setup => &self.setup,
            JokePart::Punchline => &self.punchline,
        }
    }
}

/// A saved joke
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JokeBit {
    /// Unique ID
    pub id: BitId,
    /// Display title
    pub title: String,
    /// Premise, setup and punchline
    pub parts: JokeParts,
    /// Technique the bit is built on
    pub technique: Technique,
    /// Free-text labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time, ms since epoch
    pub created_at: i64,
}

/// A free-text idea in the diary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// Unique ID
    pub id: EntryId,
    /// The note itself
    pub text: String,
    /// Creation time, ms since epoch
    pub created_at: i64,
}

impl DiaryEntry {
    /// Create a new entry stamped now
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: EntryId::generate(),
            text: text.into(),
            created_at: now_millis(),
        }
    }
}
