use std::sync::Arc;

use crate::broadcast::{StateBroadcaster, Subscription};
use crate::history::{History, HistoryCache};
use crate::identity::IdentityRecord;
use crate::ingest::EventIngestor;

/// Read side of the focus pipeline.
///
/// The broadcaster and the history cache are created together and only
/// mutated through the [`EventIngestor`] returned by [`FocusContext::new`].
/// Everything holding a `FocusContext` can subscribe and take snapshots but
/// cannot publish.
#[derive(Debug, Clone)]
pub struct FocusContext {
    state: StateBroadcaster<IdentityRecord>,
    history: Arc<HistoryCache>,
}

impl FocusContext {
    pub fn new() -> (Self, EventIngestor) {
        let state = StateBroadcaster::new(IdentityRecord::unknown());
        let history = Arc::new(HistoryCache::new());
        let ingestor = EventIngestor::new(state.clone(), Arc::clone(&history));
        (Self { state, history }, ingestor)
    }

    pub fn current(&self) -> IdentityRecord {
        self.state.current()
    }

    pub fn subscribe_state(&self) -> Subscription<IdentityRecord> {
        self.state.subscribe()
    }

    pub fn history_snapshot(&self) -> History {
        self.history.snapshot()
    }

    pub fn subscribe_history(&self) -> Subscription<History> {
        self.history.subscribe()
    }
}
