//! Bounded recent-focus history with adjacent-duplicate suppression.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::broadcast::{StateBroadcaster, Subscription};
use crate::identity::IdentityRecord;

/// Number of entries kept in the history.
pub const HISTORY_CAPACITY: usize = 10;

/// Immutable history snapshot, most recent entry first.
pub type History = Arc<[IdentityRecord]>;

/// Fixed-capacity sequence with explicit insert-front / evict-tail.
#[derive(Debug)]
struct RecentEntries {
    items: VecDeque<IdentityRecord>,
    capacity: usize,
}

impl RecentEntries {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    fn head(&self) -> Option<&IdentityRecord> {
        self.items.front()
    }

    fn insert_front(&mut self, identity: IdentityRecord) {
        self.items.push_front(identity);
        while self.items.len() > self.capacity {
            self.items.pop_back();
        }
    }

    fn to_history(&self) -> History {
        self.items.iter().cloned().collect()
    }
}

/// Recent distinct focus records.
///
/// Only the ingestion path calls [`HistoryCache::record`]; readers use
/// [`HistoryCache::snapshot`] or [`HistoryCache::subscribe`].
#[derive(Debug)]
pub struct HistoryCache {
    entries: Mutex<RecentEntries>,
    changes: StateBroadcaster<History>,
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(RecentEntries::new(HISTORY_CAPACITY)),
            changes: StateBroadcaster::new(History::from(Vec::new())),
        }
    }

    /// Insert `identity` at the front unless it has no window id or equals
    /// the current head. Returns whether the history changed; listeners are
    /// only notified when it did.
    pub fn record(&self, identity: &IdentityRecord) -> bool {
        if !identity.has_window() {
            return false;
        }
        let snapshot = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if entries.head() == Some(identity) {
                return false;
            }
            entries.insert_front(identity.clone());
            entries.to_history()
        };
        self.changes.publish(snapshot);
        true
    }

    pub fn snapshot(&self) -> History {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .to_history()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// History-changed notifications. The current snapshot is delivered
    /// first.
    pub fn subscribe(&self) -> Subscription<History> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(app: &str, window: &str) -> IdentityRecord {
        IdentityRecord::new(app, window)
    }

    #[test]
    fn adjacent_duplicates_are_suppressed() {
        let cache = HistoryCache::new();
        assert!(cache.record(&rec("com.a", "ActA")));
        assert!(!cache.record(&rec("com.a", "ActA")));
        assert!(cache.record(&rec("com.b", "ActB")));
        assert_eq!(
            cache.snapshot().to_vec(),
            vec![rec("com.b", "ActB"), rec("com.a", "ActA")]
        );
    }

    #[test]
    fn non_adjacent_repeats_are_kept() {
        let cache = HistoryCache::new();
        cache.record(&rec("com.a", "ActA"));
        cache.record(&rec("com.b", "ActB"));
        assert!(cache.record(&rec("com.a", "ActA")));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.snapshot()[0], rec("com.a", "ActA"));
    }

    #[test]
    fn oldest_entries_are_evicted_first() {
        let cache = HistoryCache::new();
        for i in 0..(HISTORY_CAPACITY + 3) {
            cache.record(&rec("com.app", &format!("Win{i}")));
            assert!(cache.len() <= HISTORY_CAPACITY);
        }
        let snap = cache.snapshot();
        assert_eq!(snap.len(), HISTORY_CAPACITY);
        assert_eq!(snap[0].window_id(), format!("Win{}", HISTORY_CAPACITY + 2));
        assert_eq!(snap[HISTORY_CAPACITY - 1].window_id(), "Win3");
    }

    #[test]
    fn unknown_windows_are_ignored() {
        let cache = HistoryCache::new();
        assert!(!cache.record(&rec("com.a", "")));
        assert!(!cache.record(&rec("com.a", "Unknown")));
        assert!(!cache.record(&IdentityRecord::unknown()));
        assert!(cache.is_empty());
    }

    #[test]
    fn listeners_are_notified_only_on_change() {
        let cache = HistoryCache::new();
        let sub = cache.subscribe();
        assert_eq!(sub.try_recv().map(|h| h.len()), Some(0));
        cache.record(&rec("com.a", "ActA"));
        assert_eq!(sub.try_recv().map(|h| h.len()), Some(1));
        cache.record(&rec("com.a", "ActA"));
        cache.record(&rec("com.a", ""));
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn snapshot_is_detached_from_later_inserts() {
        let cache = HistoryCache::new();
        cache.record(&rec("com.a", "ActA"));
        let before = cache.snapshot();
        cache.record(&rec("com.b", "ActB"));
        assert_eq!(before.len(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_keeps_one_entry() {
        let mut entries = RecentEntries::new(0);
        assert_eq!(entries.capacity, 1);
        entries.insert_front(rec("com.a", "A"));
        entries.insert_front(rec("com.b", "B"));
        assert_eq!(entries.to_history().as_ref(), &[rec("com.b", "B")]);
    }
}
