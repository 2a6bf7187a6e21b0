// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Player actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    TogglePause,
    SeekBackward,
    SeekForward,
    /// Jump to a percentage of the track (0-90 from the digit keys).
    SeekPercent(u8),
    Stop,
    Quit,
    None,
}

/// Convert a key event to a player action.
pub fn key_to_action(key: &KeyEvent) -> PlayerAction {
    if key.kind == KeyEventKind::Release {
        return PlayerAction::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return PlayerAction::Quit;
    }

    match key.code {
        KeyCode::Char(' ') => PlayerAction::TogglePause,
        KeyCode::Left => PlayerAction::SeekBackward,
        KeyCode::Right => PlayerAction::SeekForward,
        KeyCode::Char(c @ '0'..='9') => PlayerAction::SeekPercent((c as u8 - b'0') * 10),
        KeyCode::Char('s') => PlayerAction::Stop,
        KeyCode::Char('q') | KeyCode::Esc => PlayerAction::Quit,
        _ => PlayerAction::None,
    }
}
