//! Per-panel focus and cursors
//!
//! The lab owns every piece of domain state. What stays here is purely
//! about the terminal: which field has focus and which row is under the
//! cursor in each list.

use lab_core::{DraftField, GuideSection, JokePart, ThemesState};

use crate::widgets::ScrollTextState;

/// Focus inside the compose panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeFocus {
    /// A text field
    Field(DraftField),
    /// The technique picker
    Technique,
}

impl Default for ComposeFocus {
    fn default() -> Self {
        Self::Field(DraftField::Premise)
    }
}

impl ComposeFocus {
    /// Tab order
    pub const ORDER: [ComposeFocus; 6] = [
        ComposeFocus::Field(DraftField::Title),
        ComposeFocus::Field(DraftField::Premise),
        ComposeFocus::Field(DraftField::Setup),
        ComposeFocus::Field(DraftField::Punchline),
        ComposeFocus::Field(DraftField::Tags),
        ComposeFocus::Technique,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next stop in tab order, wrapping
    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    /// Previous stop in tab order, wrapping
    #[must_use]
    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    /// Joke part under focus, if any
    #[must_use]
    pub fn part(self) -> Option<JokePart> {
        match self {
            Self::Field(DraftField::Premise) => Some(JokePart::Premise),
            Self::Field(DraftField::Setup) => Some(JokePart::Setup),
            Self::Field(DraftField::Punchline) => Some(JokePart::Punchline),
            _ => None,
        }
    }
}

/// Focus inside the library panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LibraryFocus {
    /// Search box
    #[default]
    Search,
    /// Bit list
    List,
}

/// Focus inside the themes panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemesFocus {
    /// Context box
    #[default]
    Context,
    /// Theme and suggestion list
    List,
}

/// Focus inside the diary panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiaryFocus {
    /// New entry / edit box
    #[default]
    Composer,
    /// Search box
    Search,
    /// Entry list
    List,
}

impl DiaryFocus {
    /// Next stop in tab order, wrapping
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Composer => Self::Search,
            Self::Search => Self::List,
            Self::List => Self::Composer,
        }
    }

    /// Previous stop in tab order, wrapping
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::Composer => Self::List,
            Self::Search => Self::Composer,
            Self::List => Self::Search,
        }
    }
}

/// A row of the themes list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeRow {
    /// Theme idea by index
    Theme(usize),
    /// Expanded suggestion: theme index, suggestion index
    Suggestion(usize, usize),
}

impl ThemeRow {
    /// Theme this row belongs to
    #[must_use]
    pub fn theme(self) -> usize {
        match self {
            Self::Theme(index) | Self::Suggestion(index, _) => index,
        }
    }
}

/// Themes with their suggestions nested underneath
#[must_use]
pub fn theme_rows(themes: &ThemesState) -> Vec<ThemeRow> {
    let mut rows = Vec::new();
    for index in 0..themes.themes.len() {
        rows.push(ThemeRow::Theme(index));
        if let Some(suggestions) = themes.suggestions.get(&index) {
            rows.extend((0..suggestions.len()).map(|n| ThemeRow::Suggestion(index, n)));
        }
    }
    rows
}

/// Terminal-only view state
#[derive(Debug, Default)]
pub struct ViewState {
    /// Compose focus
    pub compose: ComposeFocus,
    /// Library focus
    pub library: LibraryFocus,
    /// Row under the cursor in the library
    pub library_cursor: usize,
    /// Themes focus
    pub themes: ThemesFocus,
    /// Row under the cursor in the themes list
    pub themes_cursor: usize,
    /// Diary focus
    pub diary: DiaryFocus,
    /// Row under the cursor in the diary
    pub diary_cursor: usize,
    /// Guide section under the cursor
    pub guide_cursor: usize,
    /// Scroll position of the guide detail
    pub guide_scroll: ScrollTextState,
    /// Deep-linked section the cursor already jumped to
    pub followed_highlight: Option<GuideSection>,
}

impl ViewState {
    /// Guide section under the cursor
    #[must_use]
    pub fn guide_section(&self) -> GuideSection {
        GuideSection::ALL[self.guide_cursor.min(GuideSection::ALL.len() - 1)]
    }

    /// Keep cursors inside lists that may have shrunk
    pub fn clamp(&mut self, bits: usize, theme_rows: usize, entries: usize) {
        self.library_cursor = self.library_cursor.min(bits.saturating_sub(1));
        self.themes_cursor = self.themes_cursor.min(theme_rows.saturating_sub(1));
        self.diary_cursor = self.diary_cursor.min(entries.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::JokeParts;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compose_focus_wraps() {
        assert_eq!(ComposeFocus::Technique.next(), ComposeFocus::Field(DraftField::Title));
        assert_eq!(ComposeFocus::Field(DraftField::Title).previous(), ComposeFocus::Technique);
        assert_eq!(
            ComposeFocus::default().next(),
            ComposeFocus::Field(DraftField::Setup)
        );
    }

    #[test]
    fn test_theme_rows_nest_suggestions() {
        let mut themes = ThemesState::default();
        themes.themes = vec!["a".to_string(), "b".to_string()];
        themes
            .suggestions
            .insert(0, vec![JokeParts::new("p", "s", "l"), JokeParts::new("p", "s", "l")]);

        assert_eq!(
            theme_rows(&themes),
            vec![
                ThemeRow::Theme(0),
                ThemeRow::Suggestion(0, 0),
                ThemeRow::Suggestion(0, 1),
                ThemeRow::Theme(1),
            ]
        );
    }

    #[test]
    fn test_clamp_on_empty_lists() {
        let mut view = ViewState {
            library_cursor: 4,
            diary_cursor: 2,
            ..ViewState::default()
        };
        view.clamp(0, 0, 1);
        assert_eq!(view.library_cursor, 0);
        assert_eq!(view.diary_cursor, 0);
    }
}
