//! Latest-value broadcast primitive.
//!
//! A [`StateBroadcaster`] keeps the most recent value and offers every publish
//! to each subscriber through a capacity-1 channel. When a subscriber has not
//! drained its slot yet, the stale value is replaced, so slow readers skip
//! intermediate values but always end up with the newest one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Slot<T> {
    id: SubscriptionId,
    tx: Sender<T>,
    // Second handle on the slot's queue, used to evict a stale value.
    evict: Receiver<T>,
}

impl<T> Slot<T> {
    fn offer(&self, mut value: T) {
        loop {
            match self.tx.try_send(value) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    let _ = self.evict.try_recv();
                    value = rejected;
                }
                // Both receivers are owned by us or the subscriber; this
                // only happens while a subscription is being torn down.
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    fn discard_pending(&self) {
        while self.evict.try_recv().is_ok() {}
    }
}

#[derive(Debug)]
struct Shared<T> {
    current: T,
    next_id: u64,
    slots: Vec<Slot<T>>,
}

impl<T> Shared<T> {
    fn remove(&mut self, id: SubscriptionId) -> bool {
        let Some(index) = self.slots.iter().position(|slot| slot.id == id) else {
            return false;
        };
        let slot = self.slots.swap_remove(index);
        slot.discard_pending();
        true
    }
}

fn lock<T>(shared: &Mutex<Shared<T>>) -> MutexGuard<'_, Shared<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the current value and republishes every update to all subscribers.
///
/// Cloning yields another handle on the same broadcaster.
#[derive(Debug)]
pub struct StateBroadcaster<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for StateBroadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Default> Default for StateBroadcaster<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> StateBroadcaster<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                current: initial,
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    /// Replace the current value and offer it to every subscriber.
    ///
    /// There is no equality check: publishing the same value twice notifies
    /// twice.
    pub fn publish(&self, value: T) {
        let mut shared = lock(&self.shared);
        for slot in &shared.slots {
            slot.offer(value.clone());
        }
        shared.current = value;
    }

    pub fn current(&self) -> T {
        lock(&self.shared).current.clone()
    }

    /// Register a subscriber. The current value is queued before this
    /// returns, ahead of any later publish.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = bounded(1);
        let mut shared = lock(&self.shared);
        let id = SubscriptionId(shared.next_id);
        shared.next_id += 1;
        let slot = Slot {
            id,
            tx,
            evict: rx.clone(),
        };
        slot.offer(shared.current.clone());
        shared.slots.push(slot);
        Subscription {
            id,
            rx,
            owner: Arc::downgrade(&self.shared),
        }
    }

    /// Detach a subscriber. Unknown or already removed ids are ignored.
    ///
    /// Anything still queued for the subscriber is dropped, so nothing is
    /// delivered to it once this returns.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.shared).remove(id);
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared).slots.len()
    }
}

/// Receiving end of a [`StateBroadcaster`] registration.
///
/// Dropping the subscription detaches it.
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: Receiver<T>,
    owner: Weak<Mutex<Shared<T>>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take the pending value, if one was delivered since the last read.
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next delivery.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => Some(value),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drain everything pending and keep only the newest value.
    pub fn latest(&self) -> Option<T> {
        let mut newest = None;
        while let Ok(value) = self.rx.try_recv() {
            newest = Some(value);
        }
        newest
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.owner.upgrade() {
            lock(&shared).remove(self.id);
        }
    }
}
