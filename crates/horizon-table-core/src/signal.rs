//! Signal/slot system for Horizon Table.
//!
//! A small, type-safe signal used to carry notifications that originate from
//! inside rendered cells (custom cell actions) back to the director that owns
//! the row. Unlike a process-wide notification center, every signal is an
//! ordinary value: whoever should hear an emission must hold the signal and
//! connect to it explicitly.
//!
//! [`Signal::connect`] hands back a [`ConnectionId`] for manual disconnection;
//! [`Signal::connect_scoped`] hands back a [`ConnectionGuard`] that disconnects
//! on drop.
//!
//! # Delivery
//!
//! Slots are always invoked directly, on the emitting thread, in connection
//! order. The connection list is snapshotted before slots run and no lock is
//! held while a slot executes, so a slot may connect, disconnect, or emit again.
//!
//! ```
//! use horizon_table_core::Signal;
//!
//! let favorited = Signal::<String>::new();
//! let id = favorited.connect(|key| assert_eq!(key, "favorite"));
//!
//! assert_eq!(favorited.emit("favorite".to_string()), 1);
//! favorited.disconnect(id);
//! assert_eq!(favorited.emit("favorite".to_string()), 0);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Key of one connected slot; pass it to [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of slots invoked with `&Args` on every [`emit`](Signal::emit).
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    /// An empty, unblocked signal.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Appends `slot`; it runs after every slot connected before it.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connections.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Removes one slot. `false` when `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.connections.lock().remove(id).is_some();
        tracing::trace!(target: targets::SIGNAL, ?id, removed, "slot disconnected");
        removed
    }

    /// Removes every slot.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// While blocked, [`emit`](Signal::emit) reaches no slot.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Returns `true` while emissions are suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// If the signal is blocked, this does nothing. Returns the number of slots
    /// that were invoked.
    #[tracing::instrument(skip_all, target = "horizon_table_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return 0;
        }

        // Snapshot so slots can re-enter the signal.
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in &slots {
            slot(&args);
        }
        slots.len()
    }

    /// Connect a slot that is disconnected automatically when the returned guard is dropped.
    ///
    /// The guard holds only a weak reference to the signal, so dropping the
    /// signal first is fine; the guard then has nothing to disconnect.
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: Arc::downgrade(self),
            id,
        }
    }
}

/// Owns one connection made with [`Signal::connect_scoped`] and removes it on drop.
///
/// A director keeps one of these for its cell-action subscription, so the
/// subscription ends with the director.
///
/// ```
/// use std::sync::Arc;
/// use horizon_table_core::Signal;
/// use parking_lot::Mutex;
///
/// let taps = Arc::new(Signal::<usize>::new());
/// let rows = Arc::new(Mutex::new(Vec::new()));
/// {
///     let rows = rows.clone();
///     let _subscription = taps.connect_scoped(move |&row| rows.lock().push(row));
///     taps.emit(3);
/// }
/// taps.emit(4);
/// assert_eq!(*rows.lock(), vec![3]);
/// ```
pub struct ConnectionGuard<Args: 'static> {
    signal: Weak<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// Returns the underlying connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `true` while both the signal and this connection are alive.
    pub fn is_connected(&self) -> bool {
        self.signal
            .upgrade()
            .is_some_and(|signal| signal.connections.lock().contains_key(self.id))
    }
}

impl<Args: 'static> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.disconnect(self.id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting(signal: &Signal<String>) -> (ConnectionId, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let slot_hits = hits.clone();
        let id = signal.connect(move |_| {
            slot_hits.fetch_add(1, Ordering::SeqCst);
        });
        (id, hits)
    }

    #[test]
    fn test_emit_delivers_payload() {
        let signal = Signal::<String>::new();
        let keys = Arc::new(Mutex::new(Vec::new()));

        let sink = keys.clone();
        signal.connect(move |key| sink.lock().push(key.clone()));

        signal.emit("favorite".into());
        signal.emit("share".into());

        assert_eq!(*keys.lock(), vec!["favorite", "share"]);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let signal = Signal::<String>::new();
        let (id, hits) = counting(&signal);

        signal.emit("a".into());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit("b".into());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_blocked_signal_reaches_no_slot() {
        let signal = Signal::<String>::new();
        let (_, hits) = counting(&signal);

        signal.set_blocked(true);
        assert!(signal.is_blocked());
        assert_eq!(signal.emit("ignored".into()), 0);

        signal.set_blocked(false);
        assert_eq!(signal.emit("delivered".into()), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for handler in ["header", "row", "footer"] {
            let order = order.clone();
            signal.connect(move |_| order.lock().push(handler));
        }

        assert_eq!(signal.emit(()), 3);
        assert_eq!(*order.lock(), vec!["header", "row", "footer"]);
    }

    #[test]
    fn test_disconnect_all_empties_signal() {
        let signal = Signal::<String>::new();
        counting(&signal);
        counting(&signal);
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
        assert_eq!(signal.emit("x".into()), 0);
    }

    #[test]
    fn test_scoped_connection_ends_with_guard() {
        let signal = Arc::new(Signal::<String>::new());
        let hits = Arc::new(AtomicUsize::new(0));

        {
            let slot_hits = hits.clone();
            let guard = signal.connect_scoped(move |_| {
                slot_hits.fetch_add(1, Ordering::SeqCst);
            });
            assert!(guard.is_connected());
            signal.emit("inside".into());
        }

        signal.emit("outside".into());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_outliving_signal() {
        let signal = Arc::new(Signal::<()>::new());
        let guard = signal.connect_scoped(|_| {});
        drop(signal);
        assert!(!guard.is_connected());
        drop(guard);
    }

    #[test]
    fn test_slot_may_reenter_signal() {
        let signal = Arc::new(Signal::<u32>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&signal);
        let sink = seen.clone();
        signal.connect(move |&depth| {
            sink.lock().push(depth);
            if depth == 0 {
                if let Some(signal) = weak.upgrade() {
                    signal.emit(1);
                }
            }
        });

        signal.emit(0);
        assert_eq!(*seen.lock(), vec![0, 1]);
    }
}
