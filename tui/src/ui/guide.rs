//! Technique Guide panel: section list and detail

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::StatefulWidget;

use lab_core::{GuideSection, Lab};

use crate::theme::{row_style, CURTAIN, DIM_GRAY, MIC_SILVER, SPOTLIGHT, SUCCESS_GREEN, TEXT};
use crate::view::ViewState;
use crate::widgets::{truncate, ScrollText};

/// Width of the section list
const LIST_WIDTH: u16 = 30;

pub(super) fn render(lab: &Lab, view: &mut ViewState, area: Rect, buf: &mut Buffer) {
    let [list, detail] =
        Layout::horizontal([Constraint::Length(LIST_WIDTH), Constraint::Min(1)]).areas(area);

    let highlighted = lab.highlighted_section();
    let width = list.width.saturating_sub(2) as usize;
    for (i, section) in GuideSection::ALL.iter().enumerate() {
        let y = list.y + u16::try_from(i).unwrap_or(0);
        if y >= list.y + list.height {
            break;
        }
        let mut style = row_style(i == view.guide_cursor);
        if highlighted == Some(*section) && i != view.guide_cursor {
            style = style.fg(SPOTLIGHT).add_modifier(Modifier::BOLD);
        }
        let marker = if highlighted == Some(*section) { "★ " } else { "  " };
        buf.set_stringn(
            list.x,
            y,
            truncate(&format!("{marker}{}", section.title()), width),
            width,
            style,
        );
    }

    let [body, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(detail);

    let section = view.guide_section();
    detail_text(section, highlighted == Some(section)).render(body, buf, &mut view.guide_scroll);

    let (footer_text, footer_style) = if lab.link_copied() {
        ("✓ Link copied".to_string(), Style::default().fg(SUCCESS_GREEN))
    } else {
        (
            format!("s: share · j/k: scroll · #{}", section.anchor()),
            Style::default().fg(DIM_GRAY),
        )
    };
    buf.set_stringn(
        footer.x,
        footer.y,
        footer_text,
        footer.width as usize,
        footer_style,
    );
}

fn detail_text(section: GuideSection, highlighted: bool) -> ScrollText {
    let title_color = if highlighted { SPOTLIGHT } else { CURTAIN };
    let mut text = ScrollText::new()
        .push(
            section.title(),
            Style::default().fg(title_color).add_modifier(Modifier::BOLD),
        )
        .push(section.kind().label(), Style::default().fg(MIC_SILVER))
        .gap();

    for paragraph in section.explanation() {
        text = text.push(*paragraph, Style::default().fg(TEXT)).gap();
    }

    let examples = section.examples();
    if !examples.is_empty() {
        text = text.push(
            "Examples",
            Style::default().fg(MIC_SILVER).add_modifier(Modifier::BOLD),
        );
        for example in examples {
            text = text.push(
                format!("“{}”", example.text),
                Style::default().fg(TEXT).add_modifier(Modifier::ITALIC),
            );
            if let Some(note) = example.note {
                text = text.push(format!("  {note}"), Style::default().fg(DIM_GRAY));
            }
            text = text.gap();
        }
    }
    text
}
