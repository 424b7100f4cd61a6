//! Themes & Insights panel: AI theme ideas and their expansions

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Widget;

use lab_core::Lab;

use super::window_start;
use crate::theme::{row_style, DIM_GRAY, INFO_BLUE, MIC_SILVER, SETUP};
use crate::view::{theme_rows, ThemeRow, ThemesFocus, ViewState};
use crate::widgets::{single_line, truncate, TextField};

pub(super) fn render(lab: &Lab, view: &ViewState, area: Rect, buf: &mut Buffer) {
    let [context, status, list] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(area);

    let themes = lab.themes();
    TextField::new("Context", &themes.context)
        .placeholder("Optional: a topic, a crowd, a venue")
        .hint(Some("Enter: ideas"))
        .focused(view.themes == ThemesFocus::Context)
        .render(context, buf);

    let (status_text, status_style) = if themes.loading {
        ("Thinking up themes…", Style::default().fg(INFO_BLUE))
    } else if themes.themes.is_empty() {
        (
            "Press Enter for five theme ideas",
            Style::default().fg(DIM_GRAY),
        )
    } else {
        (
            "Enter: start a draft · e: expand into jokes · r: new ideas",
            Style::default().fg(MIC_SILVER),
        )
    };
    buf.set_stringn(
        status.x,
        status.y,
        status_text,
        status.width as usize,
        status_style,
    );

    let rows = theme_rows(themes);
    let list_focused = view.themes == ThemesFocus::List;
    let width = list.width as usize;
    let capacity = list.height as usize;
    let start = window_start(view.themes_cursor, capacity);

    for (i, row) in rows.iter().enumerate().skip(start).take(capacity) {
        let y = list.y + u16::try_from(i - start).unwrap_or(0);
        let selected = list_focused && i == view.themes_cursor;
        match *row {
            ThemeRow::Theme(index) => {
                let mut line = format!("• {}", themes.themes[index]);
                if themes.expanding.contains(&index) {
                    line.push_str("  (expanding…)");
                }
                buf.set_stringn(list.x, y, truncate(&line, width), width, row_style(selected));
            }
            ThemeRow::Suggestion(index, n) => {
                let Some(parts) = themes.suggestions.get(&index).and_then(|s| s.get(n)) else {
                    continue;
                };
                let line = format!(
                    "↳ {} / {} / {}",
                    single_line(&parts.premise),
                    single_line(&parts.setup),
                    single_line(&parts.punchline)
                );
                let style = if selected {
                    row_style(true)
                } else {
                    Style::default().fg(SETUP)
                };
                buf.set_stringn(
                    list.x + 3,
                    y,
                    truncate(&line, width.saturating_sub(3)),
                    width.saturating_sub(3),
                    style,
                );
            }
        }
    }
}
