//! Library and Diary Search
//!
//! Predicates are recomputed from the stores on every call: no index, no
//! cache. Filtering never reorders, so views keep the newest-first order of
//! the underlying store.

use crate::types::{DiaryEntry, JokeBit, Technique};

/// Technique restriction for the library
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TechniqueFilter {
    /// Any technique
    #[default]
    All,
    /// Only bits built on this technique
    Only(Technique),
}

impl TechniqueFilter {
    /// Whether a technique passes the filter
    #[must_use]
    pub fn admits(self, technique: Technique) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == technique,
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All techniques",
            Self::Only(t) => t.label(),
        }
    }

    /// Cycle forward: All, then every technique, then All again
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(Technique::ALL[0]),
            Self::Only(t) if t == Technique::ALL[Technique::ALL.len() - 1] => Self::All,
            Self::Only(t) => Self::Only(t.next()),
        }
    }

    /// Cycle backward
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::All => Self::Only(Technique::ALL[Technique::ALL.len() - 1]),
            Self::Only(t) if t == Technique::ALL[0] => Self::All,
            Self::Only(t) => Self::Only(t.previous()),
        }
    }
}

/// Library search state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    /// Free-text search term
    pub term: String,
    /// Technique restriction
    pub technique: TechniqueFilter,
}

impl LibraryQuery {
    /// Whether any restriction is active
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty() || self.technique != TechniqueFilter::All
    }

    /// Whether a bit matches the term AND the technique filter
    #[must_use]
    pub fn matches(&self, bit: &JokeBit) -> bool {
        let term = normalized(&self.term);
        let text_match = term.is_empty()
            || contains(&bit.title, &term)
            || contains(&bit.parts.premise, &term)
            || contains(&bit.parts.setup, &term)
            || contains(&bit.parts.punchline, &term)
            || contains(bit.technique.label(), &term)
            || bit.tags.iter().any(|tag| contains(tag, &term));

        text_match && self.technique.admits(bit.technique)
    }
}

/// Diary search state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiaryQuery {
    /// Free-text search term
    pub term: String,
}

impl DiaryQuery {
    /// Whether a search is active
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty()
    }

    /// Whether an entry's text contains the term
    #[must_use]
    pub fn matches(&self, entry: &DiaryEntry) -> bool {
        let term = normalized(&self.term);
        term.is_empty() || contains(&entry.text, &term)
    }
}

/// Bits passing the query, in store order
#[must_use]
pub fn filter_bits<'a>(bits: &'a [JokeBit], query: &LibraryQuery) -> Vec<&'a JokeBit> {
    bits.iter().filter(|bit| query.matches(bit)).collect()
}

/// Entries passing the query, in store order
#[must_use]
pub fn filter_entries<'a>(entries: &'a [DiaryEntry], query: &DiaryQuery) -> Vec<&'a DiaryEntry> {
    entries.iter().filter(|entry| query.matches(entry)).collect()
}

fn normalized(term: &str) -> String {
    term.trim().to_lowercase()
}

fn contains(haystack: &str, lowered_term: &str) -> bool {
    haystack.to_lowercase().contains(lowered_term)
}
