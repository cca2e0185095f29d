//! Drawing the panel.
//!
//! The panel is painted into a scratch buffer anchored at (0, 0) and then
//! blitted at its signed position, so it can hang partly off screen.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Widget};

use super::drag::Position;
use super::layout::{PanelLayout, PanelRect};
use super::{HistoryRow, OverlayContent};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

pub const TITLE: &str = "Current Activity";
pub const CLOSE_LABEL: &str = "[x]";
pub const RECENT_TITLE: &str = "Recent";
pub const EMPTY_HISTORY: &str = "no history yet";

const SEPARATOR: &str = " · ";

pub struct PanelView<'a> {
    pub layout: PanelLayout,
    pub content: &'a OverlayContent,
    pub dragging: bool,
}

impl PanelView<'_> {
    pub fn render(&self, frame: &mut UiFrame<'_>) {
        let buffer = self.render_offscreen();
        frame.blit_from_signed(&buffer, self.layout.frame);
    }

    /// The panel as a standalone buffer whose area starts at (0, 0).
    pub fn render_offscreen(&self) -> Buffer {
        let local = PanelLayout::new(Position::default(), self.layout.frame.width);
        let area = Rect::new(0, 0, local.frame.width, local.frame.height);
        let mut buffer = Buffer::empty(area);
        Clear.render(area, &mut buffer);
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::panel_border()).bg(theme::panel_bg()))
            .style(Style::default().bg(theme::panel_bg()))
            .render(area, &mut buffer);

        self.draw_header(&local, &mut buffer, area);
        let current = &self.content.current;
        draw_line(
            &mut buffer,
            area,
            local.app_label(),
            &format!("App: {}", current.app_id()),
            theme::app_label(),
        );
        draw_line(
            &mut buffer,
            area,
            local.window_label(),
            &format!("Window: {}", current.window_id()),
            theme::window_label(),
        );
        draw_line(
            &mut buffer,
            area,
            local.recent_title(),
            RECENT_TITLE,
            theme::history_title(),
        );

        if self.content.rows.is_empty() {
            if let Some(slot) = local.history_row(0) {
                draw_line(&mut buffer, area, slot, EMPTY_HISTORY, theme::placeholder());
            }
        } else {
            for (idx, row) in self.content.rows.iter().enumerate() {
                let Some(slot) = local.history_row(idx) else {
                    break;
                };
                draw_history_row(&mut buffer, area, slot, row);
            }
        }
        buffer
    }

    fn draw_header(&self, local: &PanelLayout, buffer: &mut Buffer, area: Rect) {
        let style = if self.dragging {
            theme::panel_title_dragging()
        } else {
            theme::panel_title()
        };
        let handle = local.drag_handle();
        let Some((x, y)) = cell(handle) else {
            return;
        };
        let blank = " ".repeat(usize::from(handle.width));
        safe_set_string(buffer, area, x, y, &blank, style);
        safe_set_string(buffer, area, x + 1, y, TITLE, style);
        if let Some((cx, cy)) = cell(local.close_button()) {
            safe_set_string(buffer, area, cx, cy, CLOSE_LABEL, theme::panel_close());
        }
    }
}

fn draw_line(buffer: &mut Buffer, area: Rect, slot: PanelRect, text: &str, style: Style) {
    if let Some((x, y)) = cell(slot) {
        let text = truncate_to_width(text, usize::from(slot.width.saturating_sub(1)));
        safe_set_string(buffer, area, x + 1, y, &text, style);
    }
}

fn draw_history_row(buffer: &mut Buffer, area: Rect, slot: PanelRect, row: &HistoryRow) {
    let Some((x, y)) = cell(slot) else {
        return;
    };
    let budget = usize::from(slot.width.saturating_sub(1));
    let lead = truncate_to_width(&format!("{}. {}", row.ordinal, row.label), budget);
    let lead_width = lead.chars().count();
    safe_set_string(buffer, area, x + 1, y, &lead, theme::history_app_name());
    let rest = budget.saturating_sub(lead_width);
    if rest == 0 {
        return;
    }
    let tail = truncate_to_width(&format!("{SEPARATOR}{}", row.window_id), rest);
    let tail_x = x + 1 + u16::try_from(lead_width).unwrap_or(u16::MAX);
    safe_set_string(buffer, area, tail_x, y, &tail, theme::history_window());
}

fn cell(rect: PanelRect) -> Option<(u16, u16)> {
    Some((u16::try_from(rect.x).ok()?, u16::try_from(rect.y).ok()?))
}
