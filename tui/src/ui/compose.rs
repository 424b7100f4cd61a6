//! Lab panel: the draft editor

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use lab_core::{DraftField, JokePart, Lab, NarratorState, RefineStatus};

use crate::theme::{
    label_style, DIM_GRAY, ERROR_RED, INFO_BLUE, PREMISE, PUNCHLINE, SETUP, SPOTLIGHT,
    SUCCESS_GREEN,
};
use crate::view::{ComposeFocus, ViewState};
use crate::widgets::{truncate, TextField};

pub(super) fn render(lab: &Lab, view: &ViewState, area: Rect, buf: &mut Buffer) {
    let [title, premise, setup, punchline, tags, technique, refine] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(2),
    ])
    .areas(area);

    let draft = lab.draft();
    let focused = |field: DraftField| view.compose == ComposeFocus::Field(field);

    TextField::new("Title", &draft.title)
        .placeholder("Leave blank to use the start of the premise")
        .focused(focused(DraftField::Title))
        .render(title, buf);

    for (part, part_area) in [
        (JokePart::Premise, premise),
        (JokePart::Setup, setup),
        (JokePart::Punchline, punchline),
    ] {
        let hint = part_hint(lab, part);
        TextField::new(part.label(), draft.field(part.into()))
            .placeholder(placeholder(part))
            .hint(Some(hint.as_str()))
            .focused(focused(part.into()))
            .style(Style::default().fg(part_color(part)))
            .render(part_area, buf);
    }

    TextField::new("Tags", &draft.tags)
        .placeholder("comma, separated")
        .focused(focused(DraftField::Tags))
        .render(tags, buf);

    render_technique(lab, view.compose == ComposeFocus::Technique, technique, buf);
    render_refine_status(lab, refine, buf);
}

fn part_hint(lab: &Lab, part: JokePart) -> String {
    let words = lab.draft().word_count(part);
    let noun = if words == 1 { "word" } else { "words" };
    match lab.narration() {
        NarratorState::Speaking {
            part: speaking,
            progress,
            ..
        } if speaking == part => format!("♪ {progress}%  {words} {noun}"),
        _ => format!("{words} {noun}"),
    }
}

fn placeholder(part: JokePart) -> &'static str {
    match part {
        JokePart::Premise => "What's the observation?",
        JokePart::Setup => "Build the expectation",
        JokePart::Punchline => "Break it",
    }
}

fn part_color(part: JokePart) -> Color {
    match part {
        JokePart::Premise => PREMISE,
        JokePart::Setup => SETUP,
        JokePart::Punchline => PUNCHLINE,
    }
}

fn render_technique(lab: &Lab, focused: bool, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let marker = if focused { "> " } else { "  " };
    buf.set_stringn(
        area.x,
        area.y,
        format!("{marker}Technique"),
        area.width as usize,
        label_style(focused),
    );

    let technique = lab.technique();
    let value = if focused {
        format!("◀ {} ▶", technique.label())
    } else {
        technique.label().to_string()
    };
    if area.width > 16 {
        buf.set_stringn(
            area.x + 14,
            area.y,
            value,
            (area.width - 14) as usize,
            Style::default().fg(SPOTLIGHT).add_modifier(Modifier::BOLD),
        );
    }
    if area.height > 1 {
        buf.set_stringn(
            area.x + 2,
            area.y + 1,
            truncate(technique.description(), area.width.saturating_sub(2) as usize),
            area.width as usize,
            Style::default().fg(DIM_GRAY),
        );
    }
}

fn render_refine_status(lab: &Lab, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let (text, style) = match lab.refine_status() {
        RefineStatus::Idle => {
            let key = lab.platform().primary_label();
            (
                format!("{key}+R refine · {key}+S save · Ctrl+P read aloud"),
                Style::default().fg(DIM_GRAY),
            )
        }
        RefineStatus::Refining => (
            format!("Refining with {}…", lab.technique().label()),
            Style::default().fg(INFO_BLUE),
        ),
        RefineStatus::Refined { explanation } => (
            format!(
                "Refined: {}",
                explanation.as_deref().unwrap_or("premise, setup and punchline updated")
            ),
            Style::default().fg(SUCCESS_GREEN),
        ),
        RefineStatus::Failed => (
            "Refinement failed, your draft is unchanged".to_string(),
            Style::default().fg(ERROR_RED),
        ),
    };

    let width = area.width as usize;
    let wrapped = textwrap::wrap(&text, width.max(1));
    for (i, line) in wrapped.iter().take(area.height as usize).enumerate() {
        let y = area.y + u16::try_from(i).unwrap_or(0);
        buf.set_stringn(area.x, y, line, width, style);
    }
}
