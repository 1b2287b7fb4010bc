//! Event types forwarded from the input thread to the render loop.

use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
}

/// Keep only the newest key press out of everything queued since the last
/// frame. Resizes are dropped; the next draw picks up the new size.
pub fn newest_key(events: impl IntoIterator<Item = TuiEvent>) -> Option<KeyEvent> {
    events
        .into_iter()
        .filter_map(|event| match event {
            TuiEvent::Input(key) => Some(key),
            TuiEvent::Resize { .. } => None,
        })
        .last()
}
