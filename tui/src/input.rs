//! Terminal key translation
//!
//! Crossterm key events become [`KeyChord`]s so the lab can decide on
//! shortcuts without knowing about the terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use lab_core::{Key, KeyChord};

/// Translate a key event; releases yield `None`
#[must_use]
pub fn chord_from_event(event: &KeyEvent) -> Option<KeyChord> {
    let repeat = match event.kind {
        KeyEventKind::Press => false,
        KeyEventKind::Repeat => true,
        KeyEventKind::Release => return None,
    };

    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => Key::Other,
    };

    let mods = event.modifiers;
    Some(KeyChord {
        key,
        ctrl: mods.contains(KeyModifiers::CONTROL),
        meta: mods.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        shift: mods.contains(KeyModifiers::SHIFT),
        repeat,
    })
}

/// Whether a chord is printable text for a field
#[must_use]
pub fn typed_char(chord: &KeyChord) -> Option<char> {
    match chord.key {
        Key::Char(c) if !chord.ctrl && !chord.meta => Some(c),
        _ => None,
    }
}
