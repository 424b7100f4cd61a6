//! The in-progress joke on the compose panel
//!
//! A single [`Draft`] exists at a time. Loading a saved bit, a diary entry,
//! a theme or a suggestion into the lab overwrites it wholesale.

use crate::types::{DiaryEntry, JokeBit, JokePart, JokeParts};

/// Maximum premise characters used for a default title
pub const DEFAULT_TITLE_CHARS: usize = 30;

/// Title given to drafts sent over from the diary
pub const DIARY_DRAFT_TITLE: &str = "From a diary note";

/// Editable text fields of a draft
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// Optional explicit title
    Title,
    /// Premise text
    Premise,
    /// Setup text
    Setup,
    /// Punchline text
    Punchline,
    /// Comma-separated tags
    Tags,
}

impl From<JokePart> for DraftField {
    fn from(part: JokePart) -> Self {
        match part {
            JokePart::Premise => Self::Premise,
            JokePart::Setup => Self::Setup,
            JokePart::Punchline => Self::Punchline,
        }
    }
}

/// The joke currently being composed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    /// Explicit title; blank means "derive from premise"
    pub title: String,
    /// Premise text
    pub premise: String,
    /// Setup text
    pub setup: String,
    /// Punchline text
    pub punchline: String,
    /// Tags as typed, comma separated
    pub tags: String,
}

impl Draft {
    /// Load a saved bit for another pass
    #[must_use]
    pub fn from_bit(bit: &JokeBit) -> Self {
        Self {
            title: bit.title.clone(),
            premise: bit.parts.premise.clone(),
            setup: bit.parts.setup.clone(),
            punchline: bit.parts.punchline.clone(),
            tags: bit.tags.join(", "),
        }
    }

    /// Start a draft from a diary observation
    #[must_use]
    pub fn from_diary_entry(entry: &DiaryEntry) -> Self {
        Self {
            title: DIARY_DRAFT_TITLE.to_string(),
            premise: entry.text.clone(),
            tags: "diary".to_string(),
            ..Self::default()
        }
    }

    /// Start a draft whose premise is a generated theme
    #[must_use]
    pub fn from_theme(theme: &str) -> Self {
        Self {
            premise: theme.to_string(),
            ..Self::default()
        }
    }

    /// Start a draft from one of a theme's expanded suggestions
    ///
    /// Tags are the first two lowercase words of the theme.
    #[must_use]
    pub fn from_suggestion(theme: &str, suggestion: &JokeParts) -> Self {
        let tags = theme
            .to_lowercase()
            .split(' ')
            .take(2)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            title: theme.to_string(),
            premise: suggestion.premise.clone(),
            setup: suggestion.setup.clone(),
            punchline: suggestion.punchline.clone(),
            tags,
        }
    }

    /// Borrow a field's text
    #[must_use]
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Premise => &self.premise,
            DraftField::Setup => &self.setup,
            DraftField::Punchline => &self.punchline,
            DraftField::Tags => &self.tags,
        }
    }

    /// Mutably borrow a field's text
    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Title => &mut self.title,
            DraftField::Premise => &mut self.premise,
            DraftField::Setup => &mut self.setup,
            DraftField::Punchline => &mut self.punchline,
            DraftField::Tags => &mut self.tags,
        }
    }

    /// The three joke parts as they stand
    #[must_use]
    pub fn parts(&self) -> JokeParts {
        JokeParts::new(&self.premise, &self.setup, &self.punchline)
    }

    /// Replace premise, setup and punchline, leaving title and tags alone
    pub fn apply_parts(&mut self, parts: JokeParts) {
        self.premise = parts.premise;
        self.setup = parts.setup;
        self.punchline = parts.punchline;
    }

    /// Both fields a save needs are present
    #[must_use]
    pub fn is_saveable(&self) -> bool {
        !self.premise.trim().is_empty() && !self.punchline.trim().is_empty()
    }

    /// Title to store: explicit title, else the premise's first characters
    #[must_use]
    pub fn resolved_title(&self) -> String {
        if self.title.trim().is_empty() {
            default_title(&self.premise)
        } else {
            self.title.clone()
        }
    }

    /// Tag list parsed from the comma-separated field
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(&self.tags)
    }

    /// Words in one of the joke parts
    #[must_use]
    pub fn word_count(&self, part: JokePart) -> usize {
        count_words(self.field(part.into()))
    }
}

/// First [`DEFAULT_TITLE_CHARS`] characters of the premise plus an ellipsis
#[must_use]
pub fn default_title(premise: &str) -> String {
    let head: String = premise.chars().take(DEFAULT_TITLE_CHARS).collect();
    format!("{head}...")
}

/// Split on commas, trim each tag, drop empties
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whitespace-separated word count
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BitId, Technique};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(parse_tags(" food, tech ,, ,x"), vec!["food", "tech", "x"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_default_title_truncates_by_chars() {
        assert_eq!(default_title("short"), "short...");
        let long = "á".repeat(40);
        assert_eq!(default_title(&long), format!("{}...", "á".repeat(30)));
    }

    #[test]
    fn test_resolved_title_prefers_explicit() {
        let mut draft = Draft {
            premise: "My dentist has a waiting list".into(),
            ..Draft::default()
        };
        assert_eq!(draft.resolved_title(), "My dentist has a waiting list...");
        draft.title = "Dentist".into();
        assert_eq!(draft.resolved_title(), "Dentist");
        draft.title = "   ".into();
        assert_eq!(draft.resolved_title(), "My dentist has a waiting list...");
    }

    #[test]
    fn test_saveable_requires_premise_and_punchline() {
        let mut draft = Draft::default();
        assert!(!draft.is_saveable());
        draft.premise = "p".into();
        assert!(!draft.is_saveable());
        draft.punchline = "  ".into();
        assert!(!draft.is_saveable());
        draft.punchline = "x".into();
        assert!(draft.is_saveable());
    }

    #[test]
    fn test_from_bit_joins_tags() {
        let bit = JokeBit {
            id: BitId::new("b"),
            title: "Gym".into(),
            parts: JokeParts::new("p", "s", "x"),
            technique: Technique::Irony,
            tags: vec!["gym".into(), "health".into()],
            created_at: 1,
        };
        let draft = Draft::from_bit(&bit);
        assert_eq!(draft.tags, "gym, health");
        assert_eq!(draft.parts(), bit.parts);
    }

    #[test]
    fn test_from_suggestion_derives_tags_from_theme() {
        let draft = Draft::from_suggestion(
            "Crowded Buses At Dawn",
            &JokeParts::new("p", "s", "x"),
        );
        assert_eq!(draft.title, "Crowded Buses At Dawn");
        assert_eq!(draft.tags, "crowded,buses");
        assert_eq!(draft.punchline, "x");
    }

    #[test]
    fn test_apply_parts_leaves_title_and_tags() {
        let mut draft = Draft {
            title: "T".into(),
            premise: "X".into(),
            tags: "a, b".into(),
            ..Draft::default()
        };
        draft.apply_parts(JokeParts::new("X2", "Y", "Z"));
        assert_eq!(draft.title, "T");
        assert_eq!(draft.tags, "a, b");
        assert_eq!(draft.parts(), JokeParts::new("X2", "Y", "Z"));
    }

    #[test]
    fn test_word_count() {
        let draft = Draft {
            setup: "  one two\nthree ".into(),
            ..Draft::default()
        };
        assert_eq!(draft.word_count(JokePart::Setup), 3);
        assert_eq!(draft.word_count(JokePart::Premise), 0);
    }
}
