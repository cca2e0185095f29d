//! Compositing seam between the overlay controller and whatever shows the
//! panel on screen.

use ratatui::layout::Rect;
use thiserror::Error;

use super::layout::PanelLayout;
use crate::constants::MIN_VISIBLE_MARGIN;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlayHostError {
    #[error("viewport {viewport_width}x{viewport_height} cannot fit a {width}x{height} panel")]
    NoRoom {
        width: u16,
        height: u16,
        viewport_width: u16,
        viewport_height: u16,
    },
    #[error("panel at ({x}, {y}) would leave its header off screen")]
    OffScreen { x: i32, y: i32 },
    #[error("panel is not attached")]
    NotAttached,
    #[error("overlay host unavailable: {0}")]
    Unavailable(String),
}

/// Adds, moves and removes the panel. Implementations may fail at any time
/// (the host can revoke the surface); callers must keep working when they do.
pub trait OverlayHost {
    fn add_overlay(&mut self, layout: PanelLayout) -> Result<(), OverlayHostError>;
    fn update_overlay(&mut self, layout: PanelLayout) -> Result<(), OverlayHostError>;
    /// Removing a panel that is not attached is not an error.
    fn remove_overlay(&mut self) -> Result<(), OverlayHostError>;
    fn set_viewport(&mut self, _viewport: Rect) {}
}

/// Places the panel inside the terminal viewport.
#[derive(Debug, Clone, Default)]
pub struct TerminalOverlayHost {
    viewport: Rect,
    placed: Option<PanelLayout>,
}

impl TerminalOverlayHost {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            placed: None,
        }
    }

    pub fn placed(&self) -> Option<PanelLayout> {
        self.placed
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// The header must keep at least `MIN_VISIBLE_MARGIN` cells inside the
    /// viewport so the panel can always be grabbed again.
    fn check_reachable(&self, layout: &PanelLayout) -> Result<(), OverlayHostError> {
        let handle = layout.drag_handle();
        let reachable = handle
            .visible_in(self.viewport)
            .is_some_and(|r| r.width >= MIN_VISIBLE_MARGIN.min(handle.width));
        if reachable {
            Ok(())
        } else {
            Err(OverlayHostError::OffScreen {
                x: layout.frame.x,
                y: layout.frame.y,
            })
        }
    }
}

impl OverlayHost for TerminalOverlayHost {
    fn add_overlay(&mut self, layout: PanelLayout) -> Result<(), OverlayHostError> {
        let frame = layout.frame;
        if self.viewport.width < frame.width || self.viewport.height < frame.height {
            return Err(OverlayHostError::NoRoom {
                width: frame.width,
                height: frame.height,
                viewport_width: self.viewport.width,
                viewport_height: self.viewport.height,
            });
        }
        self.check_reachable(&layout)?;
        self.placed = Some(layout);
        Ok(())
    }

    fn update_overlay(&mut self, layout: PanelLayout) -> Result<(), OverlayHostError> {
        if self.placed.is_none() {
            return Err(OverlayHostError::NotAttached);
        }
        self.check_reachable(&layout)?;
        self.placed = Some(layout);
        Ok(())
    }

    fn remove_overlay(&mut self) -> Result<(), OverlayHostError> {
        self.placed = None;
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::drag::Position;
    use crate::overlay::layout::PANEL_HEIGHT;

    fn layout_at(x: i32, y: i32) -> PanelLayout {
        PanelLayout::new(Position::new(x, y), 40)
    }

    #[test]
    fn add_requires_room() {
        let mut host = TerminalOverlayHost::new(Rect::new(0, 0, 30, 10));
        let err = host.add_overlay(layout_at(0, 0)).unwrap_err();
        assert!(matches!(err, OverlayHostError::NoRoom { .. }));
        assert!(host.placed().is_none());
    }

    #[test]
    fn update_rejects_unreachable_header() {
        let mut host = TerminalOverlayHost::new(Rect::new(0, 0, 100, PANEL_HEIGHT + 5));
        host.add_overlay(layout_at(2, 2)).unwrap();
        assert!(host.update_overlay(layout_at(-10, 0)).is_ok());
        let err = host.update_overlay(layout_at(-60, 0)).unwrap_err();
        assert_eq!(err, OverlayHostError::OffScreen { x: -60, y: 0 });
        // Header row is y + 1; y = -1 puts it on row 0 which is still visible.
        assert!(host.update_overlay(layout_at(4, -1)).is_ok());
        assert!(host.update_overlay(layout_at(4, -2)).is_err());
        assert_eq!(host.placed(), Some(layout_at(4, -1)));
    }

    #[test]
    fn update_before_add_fails_and_remove_is_idempotent() {
        let mut host = TerminalOverlayHost::new(Rect::new(0, 0, 100, 40));
        assert_eq!(
            host.update_overlay(layout_at(0, 0)),
            Err(OverlayHostError::NotAttached)
        );
        assert!(host.remove_overlay().is_ok());
        assert!(host.remove_overlay().is_ok());
    }
}
