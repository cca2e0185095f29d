//! Entry point that turns host focus notifications into pipeline state.

use std::fmt;
use std::sync::Arc;

use crate::broadcast::StateBroadcaster;
use crate::history::HistoryCache;
use crate::identity::IdentityRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEventKind {
    /// A window or activity came to the foreground.
    WindowStateChanged,
    WindowContentChanged,
    ViewFocused,
    Other(String),
}

impl HostEventKind {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "window_state_changed" | "focus" => HostEventKind::WindowStateChanged,
            "window_content_changed" => HostEventKind::WindowContentChanged,
            "view_focused" => HostEventKind::ViewFocused,
            other => HostEventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HostEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HostEventKind::WindowStateChanged => "window_state_changed",
            HostEventKind::WindowContentChanged => "window_content_changed",
            HostEventKind::ViewFocused => "view_focused",
            HostEventKind::Other(name) => name.as_str(),
        };
        write!(f, "{s}")
    }
}

/// Raw notification as reported by the host, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub kind: HostEventKind,
    pub app_id: Option<String>,
    pub window_id: Option<String>,
}

impl HostEvent {
    pub fn focus(app_id: impl Into<String>, window_id: impl Into<String>) -> Self {
        Self {
            kind: HostEventKind::WindowStateChanged,
            app_id: Some(app_id.into()),
            window_id: Some(window_id.into()),
        }
    }
}

/// Sole writer of the focus state and the history.
///
/// Not `Clone`: whoever owns the ingestor owns the write path, which keeps
/// ingestion strictly sequential.
#[derive(Debug)]
pub struct EventIngestor {
    state: StateBroadcaster<IdentityRecord>,
    history: Arc<HistoryCache>,
}

impl EventIngestor {
    pub(crate) fn new(state: StateBroadcaster<IdentityRecord>, history: Arc<HistoryCache>) -> Self {
        Self { state, history }
    }

    /// Publish the new focus identity and append it to the history.
    ///
    /// The live value is always republished; only the history applies
    /// duplicate suppression.
    pub fn on_focus_changed(
        &self,
        app_id: Option<&str>,
        window_id: Option<&str>,
    ) -> IdentityRecord {
        let record = IdentityRecord::from_raw(app_id, window_id);
        self.state.publish(record.clone());
        let added = self.history.record(&record);
        tracing::trace!(
            app_id = record.app_id(),
            window_id = record.window_id(),
            history_changed = added,
            "focus changed"
        );
        record
    }

    /// Ingest a raw host event. Only window-state changes move focus.
    pub fn handle(&self, event: &HostEvent) -> Option<IdentityRecord> {
        if event.kind != HostEventKind::WindowStateChanged {
            tracing::trace!(kind = %event.kind, "ignoring host event");
            return None;
        }
        Some(self.on_focus_changed(event.app_id.as_deref(), event.window_id.as_deref()))
    }
}
