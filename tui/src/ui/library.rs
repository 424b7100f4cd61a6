//! My Bits panel: saved jokes with search and technique filter

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use lab_core::{JokeBit, Lab};

use super::window_start;
use crate::theme::{row_style, DIM_GRAY, MIC_SILVER};
use crate::view::{LibraryFocus, ViewState};
use crate::widgets::{single_line, truncate, TextField};

/// Screen rows per bit
const ROWS_PER_BIT: usize = 2;

pub(super) fn render(lab: &Lab, view: &ViewState, area: Rect, buf: &mut Buffer) {
    let [search, summary, list] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(area);

    let query = lab.library_query();
    let filter = format!("◀ {} ▶", query.technique.label());
    TextField::new("Search", &query.term)
        .placeholder("title, text, technique or tag")
        .hint(Some(filter.as_str()))
        .focused(view.library == LibraryFocus::Search)
        .render(search, buf);

    let visible = lab.visible_bits();
    let total = lab.bits().len();
    let summary_text = if query.is_active() {
        format!("{} of {total} bits", visible.len())
    } else {
        format!("{total} bits")
    };
    buf.set_stringn(
        summary.x,
        summary.y,
        summary_text,
        summary.width as usize,
        Style::default().fg(MIC_SILVER),
    );

    if visible.is_empty() {
        let message = if total == 0 {
            "No bits yet. Write one in the Lab (1) and save it."
        } else {
            "No bits match. Esc clears the search and filter."
        };
        buf.set_stringn(
            list.x,
            list.y,
            message,
            list.width as usize,
            Style::default().fg(DIM_GRAY),
        );
        return;
    }

    let list_focused = view.library == LibraryFocus::List;
    let capacity = list.height as usize / ROWS_PER_BIT;
    let start = window_start(view.library_cursor, capacity);
    for (i, bit) in visible.iter().enumerate().skip(start).take(capacity) {
        let y = list.y + u16::try_from((i - start) * ROWS_PER_BIT).unwrap_or(0);
        render_bit(bit, list_focused && i == view.library_cursor, list.x, y, list.width, buf);
    }
}

fn render_bit(bit: &JokeBit, selected: bool, x: u16, y: u16, width: u16, buf: &mut Buffer) {
    let width = width as usize;
    let mut heading = bit.title.clone();
    heading.push_str(" · ");
    heading.push_str(bit.technique.label());
    if !bit.tags.is_empty() {
        heading.push_str(" · #");
        heading.push_str(&bit.tags.join(" #"));
    }
    buf.set_stringn(
        x,
        y,
        truncate(&heading, width),
        width,
        row_style(selected).add_modifier(Modifier::BOLD),
    );

    let body = [&bit.parts.premise, &bit.parts.setup, &bit.parts.punchline]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .map(|part| single_line(part))
        .collect::<Vec<_>>()
        .join(" / ");
    buf.set_stringn(
        x + 2,
        y + 1,
        truncate(&body, width.saturating_sub(2)),
        width.saturating_sub(2),
        Style::default().fg(DIM_GRAY),
    );
}
