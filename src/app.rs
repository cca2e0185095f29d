//! The running application: routes terminal input, pulls focus updates on
//! every tick and composes the screen.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::clipboard::{ClipboardError, CopyOutcome, copy_identifier};
use crate::components::{Component, LogHandle, LogPane, StatusBar, StatusScreen, Toast};
use crate::context::FocusContext;
use crate::event_loop::ControlFlow;
use crate::labels::AppLabelResolver;
use crate::overlay::panel::PanelView;
use crate::overlay::{
    OverlayAction, OverlayConfig, OverlayController, OverlayHost, PointerEvent, PointerOutcome,
};
use crate::state::AppState;
use crate::theme;
use crate::ui::UiFrame;

pub const COPIED_MESSAGE: &str = "Copied to clipboard";
pub const COPY_FAILED_MESSAGE: &str = "Clipboard unavailable";

type CopyFn = Box<dyn FnMut(&str) -> Result<CopyOutcome, ClipboardError>>;

pub struct App<H> {
    overlay: OverlayController<H>,
    status: StatusScreen,
    status_bar: StatusBar,
    toast: Toast,
    log_pane: LogPane,
    state: AppState,
    viewport: Rect,
    copy: CopyFn,
    dirty: bool,
}

impl<H: OverlayHost> App<H> {
    pub fn new(
        context: FocusContext,
        host: H,
        resolver: Box<dyn AppLabelResolver>,
        overlay: OverlayConfig,
        log: LogHandle,
        viewport: Rect,
    ) -> Self {
        let status = StatusScreen::new(&context);
        let mut status_bar = StatusBar::new();
        status_bar.set_style(theme::status_bar());
        let mut overlay = OverlayController::new(context, host, resolver, overlay);
        overlay.set_viewport(viewport);
        Self {
            overlay,
            status,
            status_bar,
            toast: Toast::default(),
            log_pane: LogPane::new(log),
            state: AppState::new(),
            viewport,
            copy: Box::new(copy_identifier),
            dirty: true,
        }
    }

    /// Replace the clipboard backend.
    pub fn with_copier<F>(mut self, copy: F) -> Self
    where
        F: FnMut(&str) -> Result<CopyOutcome, ClipboardError> + 'static,
    {
        self.copy = Box::new(copy);
        self
    }

    pub fn overlay(&self) -> &OverlayController<H> {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayController<H> {
        &mut self.overlay
    }

    pub fn status(&self) -> &StatusScreen {
        &self.status
    }

    pub fn toast_message(&self) -> Option<&str> {
        self.toast.message()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn show_overlay(&mut self) {
        self.overlay.activate();
        self.dirty = true;
    }

    pub fn hide_overlay(&mut self) {
        self.overlay.deactivate();
        self.dirty = true;
    }

    pub fn toggle_overlay(&mut self) {
        if self.overlay.is_active() {
            self.hide_overlay();
        } else {
            self.show_overlay();
        }
    }

    /// Pick up focus updates and expire the toast. Returns whether the screen
    /// needs to be redrawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        let overlay = self.overlay.pump();
        let status = self.status.pump();
        let toast = self.toast.tick(now);
        let redraw = self.dirty || overlay || status || toast;
        self.dirty = false;
        redraw
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        self.dirty = true;
        match event {
            Event::Key(key) => return self.handle_key(key, event),
            Event::Resize(width, height) => {
                self.viewport = Rect::new(0, 0, *width, *height);
                self.overlay.set_viewport(self.viewport);
                return ControlFlow::Continue;
            }
            _ => {}
        }
        if let Some(pointer) = PointerEvent::from_terminal(event) {
            match self.overlay.handle_pointer(pointer) {
                PointerOutcome::Action(action) => {
                    self.apply(action, now);
                    return ControlFlow::Continue;
                }
                PointerOutcome::Consumed => return ControlFlow::Continue,
                PointerOutcome::Ignored => {}
            }
        }
        if self.state.log_visible()
            && let Event::Mouse(mouse) = event
            && matches!(
                mouse.kind,
                MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
            )
        {
            self.log_pane.handle_event(event);
        }
        ControlFlow::Continue
    }

    fn handle_key(&mut self, key: &KeyEvent, event: &Event) -> ControlFlow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ControlFlow::Quit;
        }
        match key.code {
            KeyCode::Char('q') => ControlFlow::Quit,
            KeyCode::Char('s') => {
                self.hide_overlay();
                tracing::info!("stop requested");
                ControlFlow::Quit
            }
            KeyCode::Char('o') => {
                self.toggle_overlay();
                ControlFlow::Continue
            }
            KeyCode::Char('l') => {
                self.state.toggle_log_visible();
                ControlFlow::Continue
            }
            KeyCode::Char('m') => {
                self.state.toggle_mouse_capture();
                ControlFlow::Continue
            }
            _ => {
                if self.state.log_visible() {
                    self.log_pane.handle_event(event);
                }
                ControlFlow::Continue
            }
        }
    }

    fn apply(&mut self, action: OverlayAction, now: Instant) {
        match action {
            OverlayAction::Close => self.hide_overlay(),
            OverlayAction::Copy(text) => match (self.copy)(&text) {
                Ok(CopyOutcome::Copied(_)) => self.toast.show(COPIED_MESSAGE, now),
                Ok(CopyOutcome::Skipped) => tracing::debug!("nothing to copy"),
                Err(err) => {
                    tracing::warn!("copy failed: {err}");
                    self.toast.show(COPY_FAILED_MESSAGE, now);
                }
            },
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let [body, bar] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .areas(area);

        if self.state.log_visible() {
            let [top, bottom] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body);
            self.status.render(frame, top);
            self.log_pane.render(frame, bottom);
        } else {
            self.status.render(frame, body);
        }

        if self.overlay.is_active() {
            PanelView {
                layout: self.overlay.layout(),
                content: self.overlay.content(),
                dragging: self.overlay.is_dragging(),
            }
            .render(frame);
        }

        self.toast.render(frame, body);

        self.status_bar.set_left(format!(" {}", self.status.focus_line()));
        let overlay = if self.overlay.is_active() {
            "shown"
        } else {
            "hidden"
        };
        self.status_bar
            .set_right(format!("overlay {overlay} · o l m s q "));
        self.status_bar.render(frame, bar);
    }
}
