use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::Direction;

/// What a key press asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Steer(Direction),
    CycleTheme,
    Quit,
    Ignore,
}

pub fn map_event(event: &Event) -> InputAction {
    match event {
        Event::Key(key) => map_key(key),
        _ => InputAction::Ignore,
    }
}

pub fn map_key(key: &KeyEvent) -> InputAction {
    if key.kind == KeyEventKind::Release {
        return InputAction::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputAction::Quit;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('w') => InputAction::Steer(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => InputAction::Steer(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => InputAction::Steer(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => InputAction::Steer(Direction::Right),
        KeyCode::Char('t') => InputAction::CycleTheme,
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        _ => InputAction::Ignore,
    }
}

/// Key named in a debug script, e.g. `left` or `theme`.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    match name.to_ascii_lowercase().as_str() {
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "theme" | "t" => Some(KeyCode::Char('t')),
        "quit" | "q" => Some(KeyCode::Char('q')),
        _ => None,
    }
}
