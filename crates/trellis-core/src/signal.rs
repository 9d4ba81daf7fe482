//! Signal/slot system for Trellis.
//!
//! This module provides a type-safe signal/slot mechanism for notifying
//! interested parties when state changes. Signals are emitted by components
//! when something happens, and connected slots (callbacks) are invoked in
//! response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//! - [`Subscriptions`] - A bag of guards scoped to a component's lifetime
//!
//! # Invocation Model
//!
//! Trellis drives everything from a single host loop, so slots are always
//! invoked directly on the emitting thread, in connection order. Emission
//! snapshots the connected slots up front: a slot that connects or
//! disconnects handlers while running takes effect from the next emission.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let name_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = name_changed.connect(|name| {
//!     println!("renamed to {name}");
//! });
//!
//! // Emit the signal
//! name_changed.emit("Files".to_string());
//!
//! // Disconnect when done
//! name_changed.disconnect(conn_id);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    ///
    /// # Related
    ///
    /// - [`Signal::connect`] - Returns a `ConnectionId`
    /// - [`Signal::disconnect`] - Removes a connection by ID
    /// - [`ConnectionGuard`] - RAII alternative that auto-disconnects
    pub struct ConnectionId;
}

/// A boxed slot closure, shared so emission can run without the registry lock.
type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Shared state behind a signal handle and its connection guards.
struct SignalCore<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

/// A type-safe signal that can have multiple connected slots.
///
/// Signals are the core of the observer pattern in Trellis. When a signal is
/// emitted, all connected slots are invoked with a reference to the provided
/// arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync` and can be shared behind an `Arc`, but
/// slots always run on the thread that calls [`emit`](Self::emit).
///
/// # Related Types
///
/// - [`ConnectionId`] - Returned by [`connect`](Self::connect), used to disconnect
/// - [`ConnectionGuard`] - RAII-style connection that auto-disconnects on drop
/// - [`crate::Property`] - Often paired with signals for change notification
pub struct Signal<Args> {
    core: Arc<SignalCore<Args>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            core: Arc::new(SignalCore {
                connections: Mutex::new(SlotMap::with_key()),
                blocked: AtomicBool::new(false),
            }),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// assert!(signal.disconnect(id));
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.core.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.core.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.core.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.core.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` will do nothing. This is useful
    /// during initialization or batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.core.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.core.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing. Otherwise, all slots
    /// connected at the start of the emission are invoked in connection
    /// order, directly on the calling thread.
    #[tracing::instrument(skip_all, target = "trellis_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "trellis_core::signal", "signal blocked, skipping emit");
            return;
        }

        // Snapshot the slots so handlers run with the registry unlocked and
        // may connect or disconnect on this same signal.
        let slots: Vec<Slot<Args>> = {
            let connections = self.core.connections.lock();
            tracing::trace!(
                target: "trellis_core::signal",
                connection_count = connections.len(),
                "emitting signal"
            );
            connections.values().cloned().collect()
        };

        for slot in slots {
            slot(&args);
        }
    }

    /// Connect a slot with automatic disconnection when the guard is dropped.
    ///
    /// The guard holds a weak handle to this signal, so it is safe to keep
    /// the guard past the signal's lifetime; dropping it then is a no-op.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            core: Arc::downgrade(&self.core),
            id,
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// This is useful for RAII-style connection management, ensuring connections
/// are cleaned up when the receiver goes out of scope. Created via
/// [`Signal::connect_scoped`].
///
/// # Related
///
/// - [`Signal::connect_scoped`] - Creates a `ConnectionGuard`
/// - [`ConnectionId`] - Manual connection management alternative
/// - [`Subscriptions`] - Holds many guards for one owner
///
/// # Example
///
/// ```
/// use trellis_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);  // counter = 42
/// }
/// signal.emit(43);  // Nothing happens - connection was dropped
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args> {
    core: std::sync::Weak<SignalCore<Args>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(core) = self.core.upgrade() {
            core.connections.lock().remove(self.id);
        }
    }
}

impl<Args> fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .finish()
    }
}

/// A collection of connection guards owned by a single component.
///
/// Components that listen to several signals can park every guard here and
/// drop the whole set at once when they are torn down, instead of tracking
/// individual [`ConnectionId`]s.
///
/// # Example
///
/// ```
/// use trellis_core::{Signal, Subscriptions};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let added = Signal::<String>::new();
/// let removed = Signal::<String>::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let mut subs = Subscriptions::new();
/// let seen_add = seen.clone();
/// subs.track(added.connect_scoped(move |_| {
///     seen_add.fetch_add(1, Ordering::SeqCst);
/// }));
/// let seen_remove = seen.clone();
/// subs.track(removed.connect_scoped(move |_| {
///     seen_remove.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// added.emit("a".into());
/// removed.emit("a".into());
/// assert_eq!(seen.load(Ordering::SeqCst), 2);
///
/// drop(subs);
/// added.emit("b".into());  // no longer observed
/// assert_eq!(seen.load(Ordering::SeqCst), 2);
/// ```
#[derive(Default)]
pub struct Subscriptions {
    guards: Vec<Box<dyn Any + Send>>,
}

impl Subscriptions {
    /// Create an empty subscription set.
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Take ownership of a guard, keeping its connection alive until this
    /// set is cleared or dropped.
    pub fn track<Args: 'static>(&mut self, guard: ConnectionGuard<Args>) {
        self.guards.push(Box::new(guard));
    }

    /// Drop all tracked guards, disconnecting their connections.
    pub fn clear(&mut self) {
        self.guards.clear();
    }

    /// The number of tracked connections.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no connections are tracked.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("len", &self.guards.len())
            .finish()
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.core.connections.lock().len())
            .field("blocked", &self.core.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<i32>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<i32>: Send, Sync);
static_assertions::assert_impl_all!(Subscriptions: Send);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        let values = received.lock();
        assert_eq!(*values, vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        signal.emit(2);

        let values = received.lock();
        assert_eq!(*values, vec![1]); // Only received before disconnect
    }

    #[test]
    fn test_signal_disconnect_twice_returns_false() {
        let signal = Signal::<()>::new();
        let conn_id = signal.connect(|_| {});
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
    }

    #[test]
    fn test_signal_disconnect_all() {
        let signal = Signal::<i32>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2); // Should be ignored
        signal.set_blocked(false);
        signal.emit(3);

        let values = received.lock();
        assert_eq!(*values, vec![1, 3]);
    }

    #[test]
    fn test_slots_invoked_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = order.clone();
            signal.connect(move |_| order.lock().push(n));
        }

        signal.emit(());
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        // The emission snapshot means the handler still sees this emit, but
        // the disconnect must not deadlock and applies to the next one.
        let signal = Arc::new(Signal::<i32>::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        let signal_clone = signal.clone();
        let received_clone = received.clone();
        let id = Arc::new(Mutex::new(None));
        let id_clone = id.clone();
        let conn = signal.connect(move |&value| {
            received_clone.lock().push(value);
            if let Some(own) = id_clone.lock().take() {
                signal_clone.disconnect(own);
            }
        });
        *id.lock() = Some(conn);

        signal.emit(1);
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let received_clone = received.clone();
            let _guard = signal.connect_scoped(move |&value| {
                received_clone.lock().push(value);
            });
            signal.emit(1);
            assert_eq!(signal.connection_count(), 1);
        }

        assert_eq!(signal.connection_count(), 0);
        signal.emit(2);
        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_connection_guard_outlives_signal() {
        let signal = Signal::<i32>::new();
        let guard = signal.connect_scoped(|_| {});
        drop(signal);
        drop(guard); // Must not panic
    }

    #[test]
    fn test_subscriptions_collects_guards() {
        let first = Signal::<i32>::new();
        let second = Signal::<String>::new();
        let count = Arc::new(Mutex::new(0usize));

        let mut subs = Subscriptions::new();
        let count_a = count.clone();
        subs.track(first.connect_scoped(move |_| *count_a.lock() += 1));
        let count_b = count.clone();
        subs.track(second.connect_scoped(move |_| *count_b.lock() += 1));
        assert_eq!(subs.len(), 2);

        first.emit(7);
        second.emit("seven".to_string());
        assert_eq!(*count.lock(), 2);

        subs.clear();
        assert!(subs.is_empty());
        first.emit(8);
        second.emit("eight".to_string());
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_signal_shared_across_threads() {
        let signal = Arc::new(Signal::<usize>::new());
        let total = Arc::new(Mutex::new(0usize));

        let total_clone = total.clone();
        signal.connect(move |&n| {
            *total_clone.lock() += n;
        });

        let handles: Vec<_> = (0..4)
            .map(|n| {
                let signal = signal.clone();
                std::thread::spawn(move || signal.emit(n))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*total.lock(), 6);
    }
}
