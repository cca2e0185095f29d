//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! The overlay panel has a signed origin and may hang partly off screen, so it
//! is painted into its own buffer first and then copied onto the frame with
//! [`UiFrame::blit_from_signed`], which drops every cell outside the viewport.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::overlay::PanelRect;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        let clipped = area.intersection(self.area);
        if clipped.width > 0 && clipped.height > 0 {
            widget.render(clipped, self.buffer);
        }
    }

    /// Copy `src` (whose area starts at 0,0) onto the frame at `dest`.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: PanelRect) {
        let Some(visible) = dest.visible_in(self.area) else {
            return;
        };
        for y in visible.y..visible.bottom() {
            for x in visible.x..visible.right() {
                let sx = i32::from(x) - dest.x;
                let sy = i32::from(y) - dest.y;
                let (Ok(sx), Ok(sy)) = (u16::try_from(sx), u16::try_from(sy)) else {
                    continue;
                };
                if let (Some(src_cell), Some(dst_cell)) =
                    (src.cell((sx, sy)), self.buffer.cell_mut((x, y)))
                {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    if x < bounds.x || x >= bounds.right() || y < bounds.y || y >= bounds.bottom() {
        return;
    }
    let available = bounds.right().saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

/// Cut `value` to `width` characters, marking the cut with an ellipsis.
pub fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}
