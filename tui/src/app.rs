//! Main Application
//!
//! The App struct is a thin terminal client over the headless [`Lab`]:
//! - Event loop (keyboard, resize)
//! - Key routing: global shortcuts first, then the active panel
//! - Per-panel focus and cursors ([`ViewState`])
//! - Rendering from lab accessors

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use lab_core::{
    DraftField, GuideSection, JokePart, Key, KeyChord, KeyDisposition, Lab, NarratorState, Panel,
};

use crate::input::{chord_from_event, typed_char};
use crate::ui;
use crate::view::{
    theme_rows, ComposeFocus, DiaryFocus, LibraryFocus, ThemeRow, ThemesFocus, ViewState,
};

/// Lines moved per guide scroll step
const GUIDE_SCROLL_STEP: isize = 3;

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Headless lab state
    lab: Lab,
    /// Focus and cursors
    view: ViewState,
}

impl App {
    /// Wrap an opened lab
    #[must_use]
    pub fn new(lab: Lab) -> Self {
        Self {
            running: true,
            lab,
            view: ViewState::default(),
        }
    }

    /// The lab
    #[must_use]
    pub fn lab(&self) -> &Lab {
        &self.lab
    }

    /// The lab, mutably
    pub fn lab_mut(&mut self) -> &mut Lab {
        &mut self.lab
    }

    /// Focus and cursors
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Whether the loop should keep going
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Give the lab back for shutdown
    #[must_use]
    pub fn into_lab(self) -> Lab {
        self.lab
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Target ~10 FPS; speech progress is the fastest thing on screen
        let frame_duration = Duration::from_millis(100);

        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.update(Instant::now());
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if let Some(chord) = chord_from_event(&key) {
                                self.handle_key(chord);
                            }
                        }
                        // Resize and the rest just trigger a redraw
                        Some(Ok(_)) => {}
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick - poll the lab and render
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            self.lab.poll();
            self.update(Instant::now());
            terminal.draw(|frame| self.render(frame))?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Expire timers and keep the view consistent with the lab
    pub fn update(&mut self, now: Instant) {
        self.lab.tick(now);

        match self.lab.highlighted_section() {
            Some(section) if self.view.followed_highlight != Some(section) => {
                self.view.guide_cursor = GuideSection::ALL
                    .iter()
                    .position(|s| *s == section)
                    .unwrap_or(0);
                self.view.guide_scroll.reset();
                self.view.followed_highlight = Some(section);
            }
            Some(_) => {}
            None => self.view.followed_highlight = None,
        }

        self.clamp_cursors();
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        ui::render(&self.lab, &mut self.view, area, frame.buffer_mut());
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Route one key chord
    pub fn handle_key(&mut self, chord: KeyChord) {
        if chord.ctrl && matches!(chord.key, Key::Char('c' | 'C')) {
            self.running = false;
            return;
        }

        if self.lab.handle_key(&chord) == KeyDisposition::Consumed {
            self.clamp_cursors();
            return;
        }

        if chord.key == Key::Esc {
            if !self.handle_escape() {
                tracing::info!("Quit requested");
                self.running = false;
            }
            return;
        }

        match self.lab.panel() {
            Panel::Compose => self.compose_key(&chord),
            Panel::Library => self.library_key(&chord),
            Panel::Themes => self.themes_key(&chord),
            Panel::Diary => self.diary_key(&chord),
            Panel::Guide => self.guide_key(&chord),
        }
        self.clamp_cursors();
    }

    /// Esc peels one layer off; returns false when there is nothing left
    fn handle_escape(&mut self) -> bool {
        if matches!(self.lab.narration(), NarratorState::Speaking { .. }) {
            self.lab.stop_speaking();
            return true;
        }
        if !self.lab.notices().is_empty() {
            self.lab.dismiss_notices();
            return true;
        }

        match self.lab.panel() {
            Panel::Library if self.lab.library_query().is_active() => {
                self.lab.clear_library_filters();
                true
            }
            Panel::Diary if self.lab.diary().composer().is_editing() => {
                self.lab.cancel_edit();
                true
            }
            Panel::Diary if self.lab.diary_query().is_active() => {
                self.lab.clear_diary_search();
                true
            }
            _ => false,
        }
    }

    fn compose_key(&mut self, chord: &KeyChord) {
        if chord.ctrl && matches!(chord.key, Key::Char('p' | 'P')) {
            self.toggle_read_aloud();
            return;
        }

        match (chord.key, self.view.compose) {
            (Key::Tab | Key::Down | Key::Enter, focus) => self.view.compose = focus.next(),
            (Key::BackTab | Key::Up, focus) => self.view.compose = focus.previous(),
            (Key::Left, ComposeFocus::Technique) => {
                let technique = self.lab.technique().previous();
                self.lab.set_technique(technique);
            }
            (Key::Right, ComposeFocus::Technique) => {
                let technique = self.lab.technique().next();
                self.lab.set_technique(technique);
            }
            (Key::Backspace, ComposeFocus::Field(field)) => {
                self.lab.draft_field_mut(field).pop();
            }
            (_, ComposeFocus::Field(field)) => {
                if let Some(c) = typed_char(chord) {
                    self.lab.draft_field_mut(field).push(c);
                }
            }
            _ => {}
        }
    }

    fn toggle_read_aloud(&mut self) {
        let part = self.view.compose.part().unwrap_or(JokePart::Premise);
        match self.lab.narration() {
            NarratorState::Speaking { part: current, .. } if current == part => {
                self.lab.stop_speaking();
            }
            _ => self.lab.speak(part),
        }
    }

    fn library_key(&mut self, chord: &KeyChord) {
        match chord.key {
            Key::Tab | Key::BackTab => {
                self.view.library = match self.view.library {
                    LibraryFocus::Search => LibraryFocus::List,
                    LibraryFocus::List => LibraryFocus::Search,
                };
                return;
            }
            Key::Left => {
                let query = self.lab.library_query_mut();
                query.technique = query.technique.previous();
                return;
            }
            Key::Right => {
                let query = self.lab.library_query_mut();
                query.technique = query.technique.next();
                return;
            }
            _ => {}
        }

        match self.view.library {
            LibraryFocus::Search => match chord.key {
                Key::Down | Key::Enter => self.view.library = LibraryFocus::List,
                Key::Backspace => {
                    self.lab.library_query_mut().term.pop();
                }
                _ => {
                    if let Some(c) = typed_char(chord) {
                        self.lab.library_query_mut().term.push(c);
                        self.view.library_cursor = 0;
                    }
                }
            },
            LibraryFocus::List => {
                let selected = self
                    .lab
                    .visible_bits()
                    .get(self.view.library_cursor)
                    .map(|bit| bit.id.clone());
                match chord.key {
                    Key::Up if self.view.library_cursor == 0 => {
                        self.view.library = LibraryFocus::Search;
                    }
                    Key::Up => self.view.library_cursor -= 1,
                    Key::Down => self.view.library_cursor += 1,
                    Key::Home => self.view.library_cursor = 0,
                    Key::End => self.view.library_cursor = usize::MAX,
                    Key::Char('/') => self.view.library = LibraryFocus::Search,
                    Key::Enter => {
                        if let Some(id) = selected {
                            self.lab.load_bit_into_draft(&id);
                        }
                    }
                    Key::Delete | Key::Char('d') => {
                        if let Some(id) = selected {
                            self.lab.remove_bit(&id);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn themes_key(&mut self, chord: &KeyChord) {
        if matches!(chord.key, Key::Tab | Key::BackTab) {
            self.view.themes = match self.view.themes {
                ThemesFocus::Context => ThemesFocus::List,
                ThemesFocus::List => ThemesFocus::Context,
            };
            return;
        }

        match self.view.themes {
            ThemesFocus::Context => match chord.key {
                Key::Enter => {
                    if self.lab.request_themes() {
                        self.view.themes_cursor = 0;
                    }
                }
                Key::Down => self.view.themes = ThemesFocus::List,
                Key::Backspace => {
                    self.lab.theme_context_mut().pop();
                }
                _ => {
                    if let Some(c) = typed_char(chord) {
                        self.lab.theme_context_mut().push(c);
                    }
                }
            },
            ThemesFocus::List => {
                let row = theme_rows(self.lab.themes())
                    .get(self.view.themes_cursor)
                    .copied();
                match chord.key {
                    Key::Up if self.view.themes_cursor == 0 => {
                        self.view.themes = ThemesFocus::Context;
                    }
                    Key::Up => self.view.themes_cursor -= 1,
                    Key::Down => self.view.themes_cursor += 1,
                    Key::Char('r') => {
                        if self.lab.request_themes() {
                            self.view.themes_cursor = 0;
                        }
                    }
                    Key::Char('e') => {
                        if let Some(row) = row {
                            self.lab.expand_theme(row.theme());
                        }
                    }
                    Key::Enter => match row {
                        Some(ThemeRow::Theme(index)) => {
                            self.lab.use_theme(index);
                        }
                        Some(ThemeRow::Suggestion(index, n)) => {
                            self.lab.use_suggestion(index, n);
                        }
                        None => {}
                    },
                    _ => {}
                }
            }
        }

        if self.lab.panel() == Panel::Compose {
            self.view.compose = ComposeFocus::Field(DraftField::Premise);
        }
    }

    fn diary_key(&mut self, chord: &KeyChord) {
        match chord.key {
            Key::Tab => {
                self.view.diary = self.view.diary.next();
                return;
            }
            Key::BackTab => {
                self.view.diary = self.view.diary.previous();
                return;
            }
            _ => {}
        }

        match self.view.diary {
            DiaryFocus::Composer => match chord.key {
                Key::Enter => {
                    self.lab.add_diary_entry();
                }
                Key::Backspace => {
                    self.lab.diary_text_mut().pop();
                }
                _ => {
                    if let Some(c) = typed_char(chord) {
                        self.lab.diary_text_mut().push(c);
                    }
                }
            },
            DiaryFocus::Search => match chord.key {
                Key::Down | Key::Enter => self.view.diary = DiaryFocus::List,
                Key::Backspace => {
                    self.lab.diary_query_mut().term.pop();
                }
                _ => {
                    if let Some(c) = typed_char(chord) {
                        self.lab.diary_query_mut().term.push(c);
                        self.view.diary_cursor = 0;
                    }
                }
            },
            DiaryFocus::List => {
                let selected = self
                    .lab
                    .visible_entries()
                    .get(self.view.diary_cursor)
                    .map(|entry| entry.id.clone());
                match chord.key {
                    Key::Up if self.view.diary_cursor == 0 => {
                        self.view.diary = DiaryFocus::Search;
                    }
                    Key::Up => self.view.diary_cursor -= 1,
                    Key::Down => self.view.diary_cursor += 1,
                    Key::Char('a') => self.lab.toggle_select_all(),
                    Key::Char(' ') => {
                        if let Some(id) = selected {
                            self.lab.toggle_select(&id);
                        }
                    }
                    Key::Char('e') => {
                        if let Some(id) = selected {
                            if self.lab.begin_edit(&id) {
                                self.view.diary = DiaryFocus::Composer;
                            }
                        }
                    }
                    Key::Delete | Key::Char('d') => {
                        if let Some(id) = selected {
                            self.lab.remove_diary_entry(&id);
                        }
                    }
                    Key::Enter => {
                        if let Some(id) = selected {
                            if self.lab.send_entry_to_lab(&id) {
                                self.view.compose = ComposeFocus::Field(DraftField::Premise);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn guide_key(&mut self, chord: &KeyChord) {
        let last = GuideSection::ALL.len() - 1;
        match chord.key {
            Key::Up => {
                self.view.guide_cursor = self.view.guide_cursor.saturating_sub(1);
                self.view.guide_scroll.reset();
            }
            Key::Down => {
                self.view.guide_cursor = (self.view.guide_cursor + 1).min(last);
                self.view.guide_scroll.reset();
            }
            Key::Char('j') => self.view.guide_scroll.scroll(GUIDE_SCROLL_STEP),
            Key::Char('k') => self.view.guide_scroll.scroll(-GUIDE_SCROLL_STEP),
            Key::Char('s') | Key::Enter => {
                let section = self.view.guide_section();
                self.lab.share_guide_section(section);
            }
            _ => {}
        }
    }

    fn clamp_cursors(&mut self) {
        let bits = self.lab.visible_bits().len();
        let rows = theme_rows(self.lab.themes()).len();
        let entries = self.lab.visible_entries().len();
        self.view.clamp(bits, rows, entries);
    }
}
