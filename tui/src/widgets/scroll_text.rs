//! ScrollText Widget
//!
//! A borderless, scrollable region of styled paragraphs.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// State for a scrollable text region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollTextState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total wrapped lines at the last render
    pub total_lines: usize,
}

impl ScrollTextState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    /// Back to the first line
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Styled paragraphs, each wrapped to the width
#[derive(Default)]
pub struct ScrollText {
    paragraphs: Vec<(String, Style)>,
}

impl ScrollText {
    /// Empty region
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph
    #[must_use]
    pub fn push(mut self, text: impl Into<String>, style: Style) -> Self {
        self.paragraphs.push((text.into(), style));
        self
    }

    /// Append an empty line
    #[must_use]
    pub fn gap(self) -> Self {
        self.push(String::new(), Style::default())
    }
}

impl StatefulWidget for ScrollText {
    type State = ScrollTextState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let wrapped: Vec<(String, Style)> = self
            .paragraphs
            .iter()
            .flat_map(|(text, style)| {
                if text.is_empty() {
                    vec![(String::new(), *style)]
                } else {
                    wrap(text, area.width as usize)
                        .into_iter()
                        .map(|cow| (cow.to_string(), *style))
                        .collect()
                }
            })
            .collect();

        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        for (i, (line, style)) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + u16::try_from(i).unwrap_or(u16::MAX);
            buf.set_stringn(area.x, y, line, area.width as usize, *style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scroll_is_clamped() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut state = ScrollTextState {
            scroll_offset: 50,
            total_lines: 0,
        };

        ScrollText::new()
            .push("alpha", Style::default())
            .gap()
            .push("beta gamma", Style::default())
            .render(area, &mut buf, &mut state);

        assert_eq!(state.total_lines, 3);
        assert_eq!(state.scroll_offset, 1);
        assert_eq!(buf[(0, 1)].symbol(), "b");
    }

    #[test]
    fn test_scroll_never_goes_negative() {
        let mut state = ScrollTextState::default();
        state.scroll(-3);
        assert_eq!(state.scroll_offset, 0);
        state.scroll(2);
        assert_eq!(state.scroll_offset, 2);
    }
}
