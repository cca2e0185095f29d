use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

/// One-row bar with left-aligned and right-aligned text.
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default(),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let bounds = area.intersection(frame.area());
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let width = usize::from(bounds.width);
        let buffer = frame.buffer_mut();
        let fill = " ".repeat(width);
        safe_set_string(buffer, bounds, bounds.x, bounds.y, &fill, self.style);

        let left = truncate_to_width(&self.left, width);
        let left_width = left.chars().count();
        safe_set_string(buffer, bounds, bounds.x, bounds.y, &left, self.style);

        if self.right.is_empty() {
            return;
        }
        // Right text only where it does not cover the left text.
        let room = width.saturating_sub(left_width + 1);
        if room == 0 {
            return;
        }
        let right = truncate_to_width(&self.right, room);
        let start = bounds.x + u16::try_from(width - right.chars().count()).unwrap_or(0);
        safe_set_string(buffer, bounds, start, bounds.y, &right, self.style);
    }
}
