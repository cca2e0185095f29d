//! Full-screen background view: the live focus as a plain text line plus key
//! hints. It is a second subscriber to the focus state, independent of the
//! overlay panel.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::broadcast::Subscription;
use crate::components::Component;
use crate::constants::WAITING_LABEL;
use crate::context::FocusContext;
use crate::identity::IdentityRecord;
use crate::theme;
use crate::ui::UiFrame;

const KEY_HINTS: [(&str, &str); 5] = [
    ("o", "show / hide the overlay"),
    ("l", "show / hide the log"),
    ("s", "hide the overlay and stop"),
    ("q", "quit"),
    ("drag", "move the overlay by its title bar"),
];

pub struct StatusScreen {
    state: Subscription<IdentityRecord>,
    current: IdentityRecord,
    updates: u64,
}

impl StatusScreen {
    pub fn new(context: &FocusContext) -> Self {
        let state = context.subscribe_state();
        let current = state.latest().unwrap_or_default();
        Self {
            state,
            current,
            updates: 0,
        }
    }

    pub fn current(&self) -> &IdentityRecord {
        &self.current
    }

    /// Focus changes seen since the screen was created.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// The text shown for the live focus.
    pub fn focus_line(&self) -> String {
        if self.current == IdentityRecord::unknown() {
            WAITING_LABEL.to_string()
        } else {
            self.current.to_string()
        }
    }

    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Some(next) = self.state.try_recv() {
            self.current = next;
            self.updates += 1;
            changed = true;
        }
        changed
    }
}

impl Component for StatusScreen {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let mut lines = vec![
            Line::from(Span::styled("Focus", theme::status_heading())),
            Line::from(self.focus_line()),
            Line::from(format!("{} updates", self.updates)),
            Line::default(),
            Line::from(Span::styled("Keys", theme::status_heading())),
        ];
        lines.extend(
            KEY_HINTS
                .iter()
                .map(|(key, what)| Line::from(format!("  {key:<5} {what}"))),
        );
        let widget = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
        frame.render_widget(widget, area);
    }
}
