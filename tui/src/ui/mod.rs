//! Rendering
//!
//! Every frame is drawn from scratch out of lab accessors: a header with
//! the panel tabs, the active panel, notices stacked over the bottom of
//! the panel and a one-line status bar.

mod compose;
mod diary;
mod guide;
mod library;
mod status;
mod themes;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

use lab_core::{Lab, Panel};

use crate::theme::{notice_color, CURTAIN, DIM_GRAY, MIC_SILVER, SPOTLIGHT};
use crate::view::ViewState;
use crate::widgets::truncate;

/// Smallest area worth drawing into
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 10;

/// Notices shown at once
const VISIBLE_NOTICES: usize = 3;

/// Draw the whole screen
pub fn render(lab: &Lab, view: &mut ViewState, area: Rect, buf: &mut Buffer) {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        buf.set_stringn(
            area.x,
            area.y,
            "Terminal too small for Comedia Lab",
            area.width as usize,
            Style::default().fg(CURTAIN),
        );
        return;
    }

    let [header, body, status_bar] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(lab.panel(), header, buf);

    let panel_area = inset(body);
    match lab.panel() {
        Panel::Compose => compose::render(lab, view, panel_area, buf),
        Panel::Library => library::render(lab, view, panel_area, buf),
        Panel::Themes => themes::render(lab, view, panel_area, buf),
        Panel::Diary => diary::render(lab, view, panel_area, buf),
        Panel::Guide => guide::render(lab, view, panel_area, buf),
    }

    render_notices(lab, body, buf);
    status::render(lab, status_bar, buf);
}

fn render_header(active: Panel, area: Rect, buf: &mut Buffer) {
    let brand = " Comedia Lab ";
    buf.set_string(
        area.x,
        area.y,
        brand,
        Style::default().fg(CURTAIN).add_modifier(Modifier::BOLD),
    );

    let mut x = area.x + u16::try_from(brand.len()).unwrap_or(0) + 1;
    for panel in Panel::ALL {
        let tab = format!(" {} {} ", panel.number(), panel.label());
        let style = if panel == active {
            Style::default()
                .fg(Color::Black)
                .bg(SPOTLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MIC_SILVER)
        };
        let right = area.x + area.width;
        if x >= right {
            break;
        }
        let (next_x, _) = buf.set_stringn(x, area.y, &tab, (right - x) as usize, style);
        x = next_x + 1;
    }

    let separator = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y + 1, separator, Style::default().fg(DIM_GRAY));
}

fn render_notices(lab: &Lab, body: Rect, buf: &mut Buffer) {
    let notices: Vec<_> = lab.notices().iter().collect();
    let shown = &notices[notices.len().saturating_sub(VISIBLE_NOTICES)..];
    if shown.is_empty() {
        return;
    }

    let width = body.width.min(64);
    let x = body.x + body.width - width;
    let count = u16::try_from(shown.len()).unwrap_or(0);
    let top = body.y + body.height.saturating_sub(count);

    for (i, notice) in shown.iter().enumerate() {
        let y = top + u16::try_from(i).unwrap_or(0);
        if y >= body.y + body.height {
            break;
        }
        let line = format!(" {} ", truncate(&notice.text, width.saturating_sub(2) as usize));
        let style = Style::default()
            .fg(notice_color(notice.level))
            .bg(Color::Rgb(30, 30, 30))
            .add_modifier(Modifier::BOLD);
        let pad = (width as usize).saturating_sub(unicode_width::UnicodeWidthStr::width(
            line.as_str(),
        ));
        buf.set_stringn(
            x,
            y,
            format!("{}{line}", " ".repeat(pad)),
            width as usize,
            style,
        );
    }
}

/// Panel area with a one-column margin
fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    }
}

/// First row shown so that `cursor` stays inside a window of `capacity`
fn window_start(cursor: usize, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    cursor.saturating_sub(capacity - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_start_follows_cursor() {
        assert_eq!(window_start(0, 5), 0);
        assert_eq!(window_start(4, 5), 0);
        assert_eq!(window_start(5, 5), 1);
        assert_eq!(window_start(9, 0), 0);
    }

    #[test]
    fn test_header_marks_active_panel() {
        let area = Rect::new(0, 0, 120, 2);
        let mut buf = Buffer::empty(area);
        render_header(Panel::Diary, area, &mut buf);

        let row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(row.contains("4 Idea Diary"));
        let start = row.find("4 Idea Diary").unwrap();
        let x = u16::try_from(row[..start].chars().count()).unwrap();
        assert_eq!(buf[(x, 0)].bg, SPOTLIGHT);
    }
}
