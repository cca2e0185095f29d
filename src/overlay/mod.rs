//! The floating panel: position, drag-to-move, content and show/hide.

pub mod drag;
pub mod host;
pub mod layout;
pub mod panel;

use ratatui::layout::Rect;

use crate::broadcast::Subscription;
use crate::context::FocusContext;
use crate::history::History;
use crate::identity::IdentityRecord;
use crate::labels::{AppLabelResolver, display_name};

pub use drag::{DragGesture, DragStep, PointerEvent, PointerKind, Position};
pub use host::{OverlayHost, OverlayHostError, TerminalOverlayHost};
pub use layout::{DEFAULT_PANEL_WIDTH, PanelHit, PanelLayout, PanelRect};

/// Where a freshly created panel appears.
pub const DEFAULT_POSITION: Position = Position::new(4, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    pub default_position: Position,
    pub width: u16,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            default_position: DEFAULT_POSITION,
            width: DEFAULT_PANEL_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// 1-based position in the list.
    pub ordinal: usize,
    pub label: String,
    pub window_id: String,
}

/// Everything the panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayContent {
    pub current: IdentityRecord,
    pub rows: Vec<HistoryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    Copy(String),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Not over the panel; someone else may handle it.
    Ignored,
    Consumed,
    Action(OverlayAction),
}

#[derive(Debug)]
struct Attachment {
    state: Subscription<IdentityRecord>,
    history: Subscription<History>,
}

/// Owns the panel while it is shown.
///
/// The controller only reads the focus pipeline. Showing the panel attaches
/// a state and a history subscription; hiding it drops both, leaving the
/// pipeline untouched.
pub struct OverlayController<H> {
    context: FocusContext,
    host: H,
    resolver: Box<dyn AppLabelResolver>,
    config: OverlayConfig,
    position: Position,
    drag: DragGesture,
    content: OverlayContent,
    attached: Option<Attachment>,
}

impl<H: OverlayHost> OverlayController<H> {
    pub fn new(
        context: FocusContext,
        host: H,
        resolver: Box<dyn AppLabelResolver>,
        config: OverlayConfig,
    ) -> Self {
        Self {
            context,
            host,
            resolver,
            position: config.default_position,
            config,
            drag: DragGesture::Idle,
            content: OverlayContent::default(),
            attached: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.attached.is_some()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn layout(&self) -> PanelLayout {
        PanelLayout::new(self.position, self.config.width)
    }

    pub fn content(&self) -> &OverlayContent {
        &self.content
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Create the panel at the default position. Does nothing when it is
    /// already shown. Returns whether the panel is shown afterwards.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return true;
        }
        self.drag.cancel();
        self.position = self.config.default_position;
        let layout = self.layout();
        if let Err(err) = self.host.add_overlay(layout) {
            tracing::warn!("failed to add overlay: {err}");
            return false;
        }
        self.attached = Some(Attachment {
            state: self.context.subscribe_state(),
            history: self.context.subscribe_history(),
        });
        self.pump();
        tracing::info!(x = self.position.x, y = self.position.y, "overlay shown");
        true
    }

    /// Remove the panel. Does nothing when it is not shown.
    ///
    /// A host failure is logged; the panel is considered gone either way.
    pub fn deactivate(&mut self) {
        let Some(attachment) = self.attached.take() else {
            return;
        };
        self.drag.cancel();
        if let Err(err) = self.host.remove_overlay() {
            tracing::warn!("failed to remove overlay: {err}");
        }
        drop(attachment);
        tracing::info!("overlay hidden");
    }

    /// Apply pending state and history updates. Returns whether the content
    /// changed.
    pub fn pump(&mut self) -> bool {
        let Some(attachment) = self.attached.as_ref() else {
            return false;
        };
        let mut changed = false;
        if let Some(current) = attachment.state.latest() {
            self.content.current = current;
            changed = true;
        }
        if let Some(history) = attachment.history.latest() {
            self.content.rows = history_rows(self.resolver.as_ref(), &history);
            changed = true;
        }
        changed
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        if !self.is_active() {
            return PointerOutcome::Ignored;
        }
        let layout = self.layout();
        let hit = layout.hit_test(event.x, event.y, self.content.rows.len());
        match self
            .drag
            .step(event, hit == PanelHit::DragHandle, self.position)
        {
            DragStep::Started | DragStep::Finished => return PointerOutcome::Consumed,
            DragStep::Moved(next) => {
                self.move_to(next);
                return PointerOutcome::Consumed;
            }
            DragStep::PassThrough => {}
        }
        if hit == PanelHit::Outside {
            return PointerOutcome::Ignored;
        }
        if event.kind != PointerKind::Down {
            return PointerOutcome::Consumed;
        }
        let action = match hit {
            PanelHit::Close => Some(OverlayAction::Close),
            PanelHit::AppLabel => Some(OverlayAction::Copy(
                self.content.current.app_id().to_string(),
            )),
            PanelHit::WindowLabel => Some(OverlayAction::Copy(
                self.content.current.window_id().to_string(),
            )),
            PanelHit::HistoryRow(idx) => self
                .content
                .rows
                .get(idx)
                .map(|row| OverlayAction::Copy(row.window_id.clone())),
            PanelHit::DragHandle | PanelHit::Body | PanelHit::Outside => None,
        };
        action.map_or(PointerOutcome::Consumed, PointerOutcome::Action)
    }

    /// Tell the host about a new viewport. The panel keeps its position; if
    /// the host no longer accepts it, that is logged and the panel can be
    /// dragged or toggled back into view.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.host.set_viewport(viewport);
        if !self.is_active() {
            return;
        }
        if let Err(err) = self.host.update_overlay(self.layout()) {
            tracing::warn!(
                x = self.position.x,
                y = self.position.y,
                "overlay no longer fits the viewport: {err}"
            );
        }
    }

    fn move_to(&mut self, next: Position) {
        if next == self.position {
            return;
        }
        match self
            .host
            .update_overlay(PanelLayout::new(next, self.config.width))
        {
            Ok(()) => self.position = next,
            Err(err) => tracing::debug!(x = next.x, y = next.y, "overlay move rejected: {err}"),
        }
    }
}

fn history_rows(resolver: &dyn AppLabelResolver, history: &History) -> Vec<HistoryRow> {
    history
        .iter()
        .enumerate()
        .map(|(idx, entry)| HistoryRow {
            ordinal: idx + 1,
            label: display_name(resolver, entry.app_id()),
            window_id: entry.window_id().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::StaticLabels;
    use crate::overlay::layout::PANEL_HEIGHT;

    /// Host that records calls and can be told to fail.
    #[derive(Debug, Default)]
    struct FakeHost {
        attached: bool,
        fail_add: bool,
        fail_update: bool,
        fail_remove: bool,
        removes: usize,
    }

    impl OverlayHost for FakeHost {
        fn add_overlay(&mut self, _layout: PanelLayout) -> Result<(), OverlayHostError> {
            if self.fail_add {
                return Err(OverlayHostError::Unavailable("permission revoked".into()));
            }
            self.attached = true;
            Ok(())
        }

        fn update_overlay(&mut self, _layout: PanelLayout) -> Result<(), OverlayHostError> {
            if self.fail_update {
                return Err(OverlayHostError::Unavailable("busy".into()));
            }
            Ok(())
        }

        fn remove_overlay(&mut self) -> Result<(), OverlayHostError> {
            self.removes += 1;
            if self.fail_remove {
                return Err(OverlayHostError::Unavailable("already gone".into()));
            }
            self.attached = false;
            Ok(())
        }
    }

    fn controller(context: FocusContext) -> OverlayController<FakeHost> {
        OverlayController::new(
            context,
            FakeHost::default(),
            Box::new(StaticLabels::new().with("com.a", "Alpha")),
            OverlayConfig {
                default_position: Position::new(100, 200),
                width: 40,
            },
        )
    }

    fn header_point(c: &OverlayController<FakeHost>) -> (i32, i32) {
        let handle = c.layout().drag_handle();
        (handle.x + 2, handle.y)
    }

    #[test]
    fn activation_shows_current_state_and_history() {
        let (ctx, ingestor) = FocusContext::new();
        ingestor.on_focus_changed(Some("com.a"), Some("ActA"));
        ingestor.on_focus_changed(Some("com.b"), Some("ActB"));
        let mut c = controller(ctx);
        assert!(c.activate());
        assert_eq!(c.content().current, IdentityRecord::new("com.b", "ActB"));
        assert_eq!(
            c.content().rows,
            vec![
                HistoryRow {
                    ordinal: 1,
                    label: "com.b".into(),
                    window_id: "ActB".into(),
                },
                HistoryRow {
                    ordinal: 2,
                    label: "Alpha".into(),
                    window_id: "ActA".into(),
                },
            ]
        );
    }

    #[test]
    fn pump_applies_new_events() {
        let (ctx, ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.activate();
        assert!(!c.pump());
        ingestor.on_focus_changed(Some("com.a"), Some("ActA"));
        assert!(c.pump());
        assert_eq!(c.content().current.window_id(), "ActA");
        assert_eq!(c.content().rows.len(), 1);
        // Same focus again: live value refreshes, history does not.
        ingestor.on_focus_changed(Some("com.a"), Some("ActA"));
        assert!(c.pump());
        assert_eq!(c.content().rows.len(), 1);
    }

    #[test]
    fn lifecycle_is_idempotent() {
        let (ctx, _ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.deactivate();
        assert_eq!(c.host().removes, 0);
        assert!(c.activate());
        assert!(c.activate());
        c.deactivate();
        c.deactivate();
        assert_eq!(c.host().removes, 1);
        assert!(!c.is_active());
    }

    #[test]
    fn failed_add_leaves_overlay_hidden() {
        let (ctx, ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.host_mut().fail_add = true;
        assert!(!c.activate());
        assert!(!c.is_active());
        ingestor.on_focus_changed(Some("com.a"), Some("ActA"));
        assert!(!c.pump());
        c.host_mut().fail_add = false;
        assert!(c.activate());
        assert_eq!(c.content().current.app_id(), "com.a");
    }

    #[test]
    fn failed_remove_still_detaches() {
        let (ctx, _ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.activate();
        c.host_mut().fail_remove = true;
        c.deactivate();
        assert!(!c.is_active());
    }

    #[test]
    fn drag_moves_panel_and_release_freezes_it() {
        let (ctx, _ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.activate();
        let (hx, hy) = header_point(&c);
        let down = PointerEvent::new(PointerKind::Down, hx, hy);
        assert_eq!(c.handle_pointer(down), PointerOutcome::Consumed);
        assert!(c.is_dragging());
        c.handle_pointer(PointerEvent::new(PointerKind::Move, hx + 20, hy + 10));
        assert_eq!(c.position(), Position::new(120, 210));
        c.handle_pointer(PointerEvent::new(PointerKind::Up, hx + 20, hy + 10));
        assert!(!c.is_dragging());
        c.handle_pointer(PointerEvent::new(PointerKind::Move, hx + 50, hy + 50));
        assert_eq!(c.position(), Position::new(120, 210));
    }

    #[test]
    fn rejected_move_keeps_previous_position() {
        let (ctx, _ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.activate();
        let (hx, hy) = header_point(&c);
        c.handle_pointer(PointerEvent::new(PointerKind::Down, hx, hy));
        c.host_mut().fail_update = true;
        c.handle_pointer(PointerEvent::new(PointerKind::Move, hx + 5, hy));
        assert_eq!(c.position(), Position::new(100, 200));
        c.host_mut().fail_update = false;
        c.handle_pointer(PointerEvent::new(PointerKind::Move, hx + 6, hy));
        assert_eq!(c.position(), Position::new(106, 200));
    }

    #[test]
    fn resize_never_moves_the_panel() {
        let (ctx, _ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.activate();
        let (hx, hy) = header_point(&c);
        c.handle_pointer(PointerEvent::new(PointerKind::Down, hx, hy));
        c.handle_pointer(PointerEvent::new(PointerKind::Move, hx + 54, hy + 42));
        c.handle_pointer(PointerEvent::new(PointerKind::Up, hx + 54, hy + 42));
        assert_eq!(c.position(), Position::new(154, 242));

        c.host_mut().fail_update = true;
        c.set_viewport(Rect::new(0, 0, 80, 24));
        assert_eq!(c.position(), Position::new(154, 242));
        assert!(!c.is_dragging());
        assert!(c.is_active());

        c.host_mut().fail_update = false;
        c.set_viewport(Rect::new(0, 0, 200, 60));
        assert_eq!(c.position(), Position::new(154, 242));
    }

    #[test]
    fn reactivation_resets_position() {
        let (ctx, _ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        c.activate();
        let (hx, hy) = header_point(&c);
        c.handle_pointer(PointerEvent::new(PointerKind::Down, hx, hy));
        c.handle_pointer(PointerEvent::new(PointerKind::Move, hx + 3, hy + 3));
        c.deactivate();
        assert!(!c.is_dragging());
        c.activate();
        assert_eq!(c.position(), Position::new(100, 200));
    }

    #[test]
    fn clicks_on_content_produce_actions() {
        let (ctx, ingestor) = FocusContext::new();
        ingestor.on_focus_changed(Some("com.a"), Some("ActA"));
        ingestor.on_focus_changed(Some("com.b"), Some("ActB"));
        let mut c = controller(ctx);
        c.activate();
        let layout = c.layout();
        let click = |rect: PanelRect| PointerEvent::new(PointerKind::Down, rect.x + 1, rect.y);

        assert_eq!(
            c.handle_pointer(click(layout.app_label())),
            PointerOutcome::Action(OverlayAction::Copy("com.b".into()))
        );
        assert_eq!(
            c.handle_pointer(click(layout.window_label())),
            PointerOutcome::Action(OverlayAction::Copy("ActB".into()))
        );
        let second_row = layout.history_row(1).unwrap();
        assert_eq!(
            c.handle_pointer(click(second_row)),
            PointerOutcome::Action(OverlayAction::Copy("ActA".into()))
        );
        assert_eq!(
            c.handle_pointer(click(layout.close_button())),
            PointerOutcome::Action(OverlayAction::Close)
        );
        assert!(!c.is_dragging());
    }

    #[test]
    fn pointer_outside_panel_is_ignored() {
        let (ctx, _ingestor) = FocusContext::new();
        let mut c = controller(ctx);
        let outside = PointerEvent::new(PointerKind::Down, 0, 0);
        assert_eq!(c.handle_pointer(outside), PointerOutcome::Ignored);
        c.activate();
        assert_eq!(c.handle_pointer(outside), PointerOutcome::Ignored);
        let below = PointerEvent::new(PointerKind::Down, 101, 200 + i32::from(PANEL_HEIGHT));
        assert_eq!(c.handle_pointer(below), PointerOutcome::Ignored);
    }
}
