//! Panel geometry and hit testing.
//!
//! The panel is a bordered box:
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Current Activity     [x] │  header, drag handle
//! │ App: org.mozilla.firefox │
//! │ Window: Navigator        │
//! │ Recent ──────────────────│
//! │ 1. Firefox · Navigator   │  one row per history slot
//! │ ...                      │
//! └──────────────────────────┘
//! ```

use ratatui::layout::Rect;

use super::drag::Position;
use crate::history::HISTORY_CAPACITY;

pub const PANEL_MIN_WIDTH: u16 = 28;
pub const PANEL_MAX_WIDTH: u16 = 120;
pub const DEFAULT_PANEL_WIDTH: u16 = 44;

const CLOSE_LABEL_WIDTH: u16 = 3;
const HEADER_ROW: u16 = 1;
const APP_ROW: u16 = 2;
const WINDOW_ROW: u16 = 3;
const RECENT_TITLE_ROW: u16 = 4;
const FIRST_HISTORY_ROW: u16 = 5;
/// Borders, header, the two live labels and the history title.
const CHROME_ROWS: u16 = 6;

pub const PANEL_HEIGHT: u16 = CHROME_ROWS + HISTORY_CAPACITY as u16;

/// Rectangle with a signed origin and unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl PanelRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + i32::from(self.width)
            && y < self.y + i32::from(self.height)
    }

    /// Part of the rectangle that lies inside `bounds`, if any.
    pub fn visible_in(&self, bounds: Rect) -> Option<Rect> {
        let left = self.x.max(i32::from(bounds.x));
        let top = self.y.max(i32::from(bounds.y));
        let right = (self.x + i32::from(self.width)).min(i32::from(bounds.right()));
        let bottom = (self.y + i32::from(self.height)).min(i32::from(bounds.bottom()));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: u16::try_from(left).ok()?,
            y: u16::try_from(top).ok()?,
            width: u16::try_from(right - left).ok()?,
            height: u16::try_from(bottom - top).ok()?,
        })
    }

    fn row(&self, offset: u16) -> PanelRect {
        PanelRect {
            x: self.x + 1,
            y: self.y + i32::from(offset),
            width: self.width.saturating_sub(2),
            height: 1,
        }
    }
}

/// What lies under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHit {
    DragHandle,
    Close,
    AppLabel,
    WindowLabel,
    HistoryRow(usize),
    /// Inside the panel but not on an interactive part.
    Body,
    Outside,
}

/// Resolved geometry of the panel at a given origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub frame: PanelRect,
}

impl PanelLayout {
    pub fn new(origin: Position, width: u16) -> Self {
        Self {
            frame: PanelRect {
                x: origin.x,
                y: origin.y,
                width: width.clamp(PANEL_MIN_WIDTH, PANEL_MAX_WIDTH),
                height: PANEL_HEIGHT,
            },
        }
    }

    pub fn header(&self) -> PanelRect {
        self.frame.row(HEADER_ROW)
    }

    pub fn close_button(&self) -> PanelRect {
        let header = self.header();
        PanelRect {
            x: header.x + i32::from(header.width.saturating_sub(CLOSE_LABEL_WIDTH)),
            width: CLOSE_LABEL_WIDTH.min(header.width),
            ..header
        }
    }

    /// Header minus the close button.
    pub fn drag_handle(&self) -> PanelRect {
        let header = self.header();
        PanelRect {
            width: header.width.saturating_sub(CLOSE_LABEL_WIDTH),
            ..header
        }
    }

    pub fn app_label(&self) -> PanelRect {
        self.frame.row(APP_ROW)
    }

    pub fn window_label(&self) -> PanelRect {
        self.frame.row(WINDOW_ROW)
    }

    pub fn recent_title(&self) -> PanelRect {
        self.frame.row(RECENT_TITLE_ROW)
    }

    pub fn history_row(&self, index: usize) -> Option<PanelRect> {
        let index = u16::try_from(index).ok()?;
        if usize::from(index) >= HISTORY_CAPACITY {
            return None;
        }
        Some(self.frame.row(FIRST_HISTORY_ROW + index))
    }

    /// Classify a point. `rows` is the number of populated history rows;
    /// empty slots count as body.
    pub fn hit_test(&self, x: i32, y: i32, rows: usize) -> PanelHit {
        if !self.frame.contains(x, y) {
            return PanelHit::Outside;
        }
        if self.close_button().contains(x, y) {
            return PanelHit::Close;
        }
        if self.drag_handle().contains(x, y) {
            return PanelHit::DragHandle;
        }
        if self.app_label().contains(x, y) {
            return PanelHit::AppLabel;
        }
        if self.window_label().contains(x, y) {
            return PanelHit::WindowLabel;
        }
        (0..rows.min(HISTORY_CAPACITY))
            .find(|&idx| self.history_row(idx).is_some_and(|row| row.contains(x, y)))
            .map_or(PanelHit::Body, PanelHit::HistoryRow)
    }
}
