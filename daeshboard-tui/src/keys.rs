//! Keybinding definitions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use daeshboard_core::NavInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveTabLeft,
    MoveTabRight,
    MoveItemUp,
    MoveItemDown,
    JumpToTab(usize),
    Activate,
    Quit,
    Refresh,
}

impl KeyAction {
    /// The navigation input this key feeds the state machine, if any.
    pub fn nav_input(self) -> Option<NavInput> {
        match self {
            KeyAction::MoveTabLeft => Some(NavInput::MoveTabLeft),
            KeyAction::MoveTabRight => Some(NavInput::MoveTabRight),
            KeyAction::MoveItemUp => Some(NavInput::MoveItemUp),
            KeyAction::MoveItemDown => Some(NavInput::MoveItemDown),
            KeyAction::JumpToTab(index) => Some(NavInput::JumpToTab(index)),
            KeyAction::Activate => Some(NavInput::Activate),
            KeyAction::Quit => Some(NavInput::Quit),
            KeyAction::Refresh => None,
        }
    }
}

pub fn map_key(event: KeyEvent) -> Option<KeyAction> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(KeyAction::Quit),
            KeyCode::Char('r') => Some(KeyAction::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(KeyAction::MoveTabLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(KeyAction::MoveTabRight),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(KeyAction::MoveItemUp),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(KeyAction::MoveItemDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(KeyAction::Activate),
        KeyCode::Char(c @ '1'..='9') => Some(KeyAction::JumpToTab(c as usize - '1' as usize)),
        _ => None,
    }
}
