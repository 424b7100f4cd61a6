//! Idea Diary panel: raw notes, selection and bulk import

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Widget;

use lab_core::Lab;

use super::window_start;
use crate::theme::{row_style, DIM_GRAY, MIC_SILVER, SPOTLIGHT};
use crate::view::{DiaryFocus, ViewState};
use crate::widgets::{single_line, truncate, TextField};

pub(super) fn render(lab: &Lab, view: &ViewState, area: Rect, buf: &mut Buffer) {
    let [composer, search, summary, list] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(area);

    let diary = lab.diary();
    let editing = diary.composer().is_editing();
    TextField::new(if editing { "Editing idea" } else { "New idea" }, &diary.composer().text)
        .placeholder("Something you noticed today")
        .hint(Some(if editing { "Enter: update · Esc: cancel" } else { "Enter: add" }))
        .focused(view.diary == DiaryFocus::Composer)
        .render(composer, buf);

    TextField::new("Search", &lab.diary_query().term)
        .focused(view.diary == DiaryFocus::Search)
        .render(search, buf);

    let selected = diary.selection().len();
    let key = lab.platform().primary_label();
    let summary_text = if selected == 0 {
        format!(
            "{} ideas · Space: select · a: all · e: edit · Enter: to the Lab",
            diary.len()
        )
    } else {
        format!("{selected} selected · {key}+Shift+I imports them as draft bits")
    };
    let summary_style = if selected == 0 {
        Style::default().fg(MIC_SILVER)
    } else {
        Style::default().fg(SPOTLIGHT)
    };
    buf.set_stringn(
        summary.x,
        summary.y,
        summary_text,
        summary.width as usize,
        summary_style,
    );

    let entries = lab.visible_entries();
    if entries.is_empty() {
        let message = if diary.is_empty() {
            "The diary is empty. Jot down anything that made you smile."
        } else {
            "No ideas match. Esc clears the search."
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

    let list_focused = view.diary == DiaryFocus::List;
    let width = list.width as usize;
    let capacity = list.height as usize;
    let start = window_start(view.diary_cursor, capacity);
    for (i, entry) in entries.iter().enumerate().skip(start).take(capacity) {
        let y = list.y + u16::try_from(i - start).unwrap_or(0);
        let check = if diary.is_selected(&entry.id) { "[x]" } else { "[ ]" };
        let mut line = format!("{check} {}", single_line(&entry.text));
        if diary.composer().editing.as_ref() == Some(&entry.id) {
            line.push_str("  (editing)");
        }
        buf.set_stringn(
            list.x,
            y,
            truncate(&line, width),
            width,
            row_style(list_focused && i == view.diary_cursor),
        );
    }
}
