//! TextField Widget
//!
//! A labelled, borderless input. Text wraps to the width and the last
//! lines stay visible while typing.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use textwrap::wrap;

use crate::theme::{label_style, DIM_GRAY, TEXT, WARNING_YELLOW};

/// A labelled text input
pub struct TextField<'a> {
    label: &'a str,
    content: &'a str,
    placeholder: &'a str,
    hint: Option<&'a str>,
    focused: bool,
    style: Style,
}

impl<'a> TextField<'a> {
    /// Field showing `content` under `label`
    #[must_use]
    pub fn new(label: &'a str, content: &'a str) -> Self {
        Self {
            label,
            content,
            placeholder: "",
            hint: None,
            focused: false,
            style: Style::default().fg(TEXT),
        }
    }

    /// Text shown while empty
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Right-aligned note on the label line
    #[must_use]
    pub fn hint(mut self, hint: Option<&'a str>) -> Self {
        self.hint = hint;
        self
    }

    /// Draw the cursor and highlight the label
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Text style
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for TextField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height == 0 {
            return;
        }

        let marker = if self.focused { "> " } else { "  " };
        buf.set_stringn(
            area.x,
            area.y,
            format!("{marker}{}", self.label),
            area.width as usize,
            label_style(self.focused),
        );
        if let Some(hint) = self.hint {
            let hint_width = u16::try_from(hint.chars().count()).unwrap_or(u16::MAX);
            if hint_width + 2 < area.width {
                buf.set_string(
                    area.x + area.width - hint_width,
                    area.y,
                    hint,
                    Style::default().fg(DIM_GRAY),
                );
            }
        }

        let text_height = area.height.saturating_sub(1) as usize;
        let text_width = area.width.saturating_sub(3) as usize;
        if text_height == 0 || text_width == 0 {
            return;
        }

        let (body, style) = if self.content.is_empty() && !self.focused {
            (self.placeholder.to_string(), Style::default().fg(DIM_GRAY))
        } else if self.focused {
            (format!("{}_", self.content), self.style)
        } else {
            (self.content.to_string(), self.style)
        };

        let wrapped: Vec<String> = body
            .split('\n')
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, text_width)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect();

        let skip = wrapped.len().saturating_sub(text_height);
        for (i, line) in wrapped.iter().skip(skip).enumerate() {
            let y = area.y + 1 + u16::try_from(i).unwrap_or(u16::MAX);
            buf.set_stringn(area.x + 2, y, line, text_width, style);
        }

        if skip > 0 {
            buf.set_string(
                area.x + area.width.saturating_sub(1),
                area.y + 1,
                "^",
                Style::default().fg(WARNING_YELLOW),
            );
        }
    }
}
