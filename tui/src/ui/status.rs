//! Status bar: key hints, AI activity and read-aloud progress

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use lab_core::{Lab, NarratorState, Panel};

use crate::theme::{DIM_GRAY, INFO_BLUE, PREMISE};
use crate::widgets::truncate;

pub(super) fn render(lab: &Lab, area: Rect, buf: &mut Buffer) {
    let mut activity = Vec::new();
    if let NarratorState::Speaking { part, progress, .. } = lab.narration() {
        activity.push((
            format!("♪ Reading {} {progress}%", part.label().to_lowercase()),
            Style::default().fg(PREMISE),
        ));
    }
    if lab.in_flight() > 0 {
        activity.push((
            format!("⟳ AI working ({})", lab.in_flight()),
            Style::default().fg(INFO_BLUE),
        ));
    }

    let mut right = area.x + area.width;
    for (text, style) in activity.iter().rev() {
        let width = u16::try_from(unicode_width::UnicodeWidthStr::width(text.as_str()))
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        if width >= right.saturating_sub(area.x) {
            break;
        }
        right -= width;
        buf.set_string(right + 1, area.y, text, *style);
    }

    let hints = format!(" 1-5 panels · {} · Esc back/quit", panel_hint(lab.panel()));
    let hint_width = right.saturating_sub(area.x) as usize;
    buf.set_stringn(
        area.x,
        area.y,
        truncate(&hints, hint_width),
        hint_width,
        Style::default().fg(DIM_GRAY),
    );
}

fn panel_hint(panel: Panel) -> &'static str {
    match panel {
        Panel::Compose => "Tab fields · ←/→ technique",
        Panel::Library => "Tab search/list · ←/→ filter · Enter load · d delete",
        Panel::Themes => "Tab context/list · Enter use · e expand",
        Panel::Diary => "Tab composer/search/list · Space select · d delete",
        Panel::Guide => "↑/↓ sections · s share",
    }
}
