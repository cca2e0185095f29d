//! Short-lived confirmation message drawn at the bottom right.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::components::Component;
use crate::constants::TOAST_DURATION;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

#[derive(Debug)]
pub struct Toast {
    duration: Duration,
    current: Option<(String, Instant)>,
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(TOAST_DURATION)
    }
}

impl Toast {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    /// Show `message`, replacing whatever is currently shown.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some((message.into(), now + self.duration));
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|(msg, _)| msg.as_str())
    }

    /// Drop an expired message. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some((_, until)) if now >= *until => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

impl Component for Toast {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let Some(message) = self.message() else {
            return;
        };
        if area.width < 4 || area.height == 0 {
            return;
        }
        let text = truncate_to_width(&format!(" {message} "), usize::from(area.width - 2));
        let width = u16::try_from(text.chars().count()).unwrap_or(area.width);
        let x = area.right().saturating_sub(width + 1);
        let y = area.bottom() - 1;
        let bounds = area.intersection(frame.area());
        safe_set_string(frame.buffer_mut(), bounds, x, y, &text, theme::toast());
    }
}
