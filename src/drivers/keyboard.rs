use crossterm::event::{Event, KeyEventKind};

/// Filters raw terminal events before they reach the app.
///
/// Key releases and auto-repeats are dropped so a single key press toggles
/// the overlay or log exactly once, on every platform.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer;

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(key) if key.kind != KeyEventKind::Press => None,
            other => Some(other),
        }
    }
}
