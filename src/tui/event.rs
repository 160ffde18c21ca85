use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use std::time::Duration;

use super::App;
use crate::calendar::Direction;

pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Ctrl+C quits from anywhere, the welcome overlay included.
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // ── Welcome overlay swallows the first key ────────────────────────
    if app.show_welcome {
        app.dismiss_welcome();
        return;
    }

    if code == KeyCode::Char('q') {
        app.running = false;
        return;
    }

    match code {
        KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => {
            app.navigate(Direction::Prev);
        }
        KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => {
            app.navigate(Direction::Next);
        }
        KeyCode::Left | KeyCode::Char('h') => app.move_selection(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-7),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(7),
        KeyCode::Char('t') | KeyCode::Home => app.jump_to_today(),
        _ => {}
    }
}
