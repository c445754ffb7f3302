//! Listener bookkeeping shared by routing engine implementations

use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;

use crate::ports::{ListenerId, RouteEvent, RouteEventKind, RouteListener};

/// Listeners bound per event kind
///
/// Listeners run outside the lock, so a listener may bind or unbind others.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<RouteEventKind, Vec<(ListenerId, RouteListener)>>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        let counts: BTreeMap<_, _> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &counts)
            .finish_non_exhaustive()
    }
}

impl ListenerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a listener
    pub fn add(&self, kind: RouteEventKind, listener: RouteListener) -> ListenerId {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.listeners
            .lock()
            .entry(kind)
            .or_default()
            .push((id, listener));
        id
    }

    /// Unbind a listener; false if it was not bound for `kind`
    pub fn remove(&self, kind: RouteEventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(bound) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = bound.len();
        bound.retain(|(bound_id, _)| *bound_id != id);
        before != bound.len()
    }

    /// Number of listeners bound for `kind`
    pub fn count(&self, kind: RouteEventKind) -> usize {
        self.listeners.lock().get(&kind).map_or(0, Vec::len)
    }

    /// Unbind everything
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    /// Deliver an event to the listeners of its kind; returns how many ran
    ///
    /// A listener unbound while the event is being delivered is skipped.
    pub fn emit(&self, event: &RouteEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<(ListenerId, RouteListener)> = self
            .listeners
            .lock()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        let mut ran = 0;
        for (id, listener) in &targets {
            if !self.is_bound(kind, *id) {
                continue;
            }
            listener(event);
            ran += 1;
        }
        ran
    }

    fn is_bound(&self, kind: RouteEventKind, id: ListenerId) -> bool {
        self.listeners
            .lock()
            .get(&kind)
            .is_some_and(|bound| bound.iter().any(|(bound_id, _)| *bound_id == id))
    }
}
