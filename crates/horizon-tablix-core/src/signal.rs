//! Signal/slot system for Horizon Tablix.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism for
//! inter-component communication. Signals are emitted by components when
//! their state changes, and connected slots (callbacks) are invoked in
//! response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Dispatch Model
//!
//! The tablix engine is single-threaded and cooperative: there is no event
//! loop inside the core, so every slot is invoked directly on the emitting
//! thread, in connection order. Slots must therefore be cheap; anything
//! expensive belongs in the host's own scheduling.
//!
//! # Example
//!
//! ```
//! use horizon_tablix_core::Signal;
//!
//! // Create a signal that passes the new scroll offset
//! let scrolled = Signal::<usize>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = scrolled.connect(|offset| {
//!     println!("Scrolled to: {}", offset);
//! });
//!
//! // Emit the signal
//! scrolled.emit(12);
//!
//! // Disconnect when done
//! scrolled.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke (Arc-wrapped so emission can run without
    /// holding the connection lock).
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// Signals are the core of the observer pattern in Horizon Tablix. When a
/// signal is emitted, all connected slots are invoked with the provided
/// arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(usize, f32)` for multiple
///   arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync` and can be shared between threads, but
/// slots always run on the emitting thread.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot
    /// later.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_tablix_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
        };
        self.connections.lock().insert(connection)
    }

    /// Connect a slot and receive an RAII guard that disconnects on drop.
    ///
    /// Useful for temporary observers, e.g. a view that only wants updates
    /// while it is alive.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: self,
            id: Some(id),
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false`
    /// otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. Used during batch
    /// updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// If the signal is blocked, this does nothing. Slots are invoked
    /// without the connection lock held, so a slot may connect or
    /// disconnect other slots; such changes take effect on the next emit.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(
                target: "horizon_tablix_core::signal",
                "signal blocked, skipping emit"
            );
            return;
        }

        let slots: Vec<_> = self
            .connections
            .lock()
            .iter()
            .map(|(_, conn)| conn.slot.clone())
            .collect();
        tracing::trace!(
            target: "horizon_tablix_core::signal",
            connection_count = slots.len(),
            "emitting signal"
        );

        for slot in slots {
            slot(&args);
        }
    }
}

/// RAII guard for a signal connection.
///
/// The connection is removed when the guard is dropped, unless
/// [`detach`](ConnectionGuard::detach) was called first.
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<'a, Args> ConnectionGuard<'a, Args> {
    /// The underlying connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id.expect("guard holds a live connection")
    }

    /// Release the connection from the guard, leaving it connected.
    pub fn detach(mut self) -> ConnectionId {
        self.id.take().expect("guard holds a live connection")
    }
}

impl<'a, Args> Drop for ConnectionGuard<'a, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);
