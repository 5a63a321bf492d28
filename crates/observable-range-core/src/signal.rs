//! Observer registration and synchronous dispatch.
//!
//! A [`Signal<Args>`] owns an ordered list of callbacks (slots). Emitting the
//! signal invokes every connected slot, in connection order, on the calling
//! thread before `emit` returns.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The observer list and dispatcher
//! - [`ConnectionId`] - Identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Dispatch Semantics
//!
//! The connection list is snapshotted before slots run. A slot may connect or
//! disconnect other slots (or itself) while it is being dispatched; the change
//! applies from the next emission.
//!
//! [`Signal::try_emit`] isolates slot failures: a panicking slot stops the
//! dispatch and is reported as [`SignalError::SlotPanicked`] instead of
//! unwinding into the emitter.
//!
//! # Example
//!
//! ```
//! use observable_range_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::SignalError;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

/// A connected slot (Arc-wrapped so dispatch can run without the lock held).
type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

type Connections<Args> = Mutex<SlotMap<ConnectionId, Slot<Args>>>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. Slots always run on the emitting thread.
pub struct Signal<Args> {
    /// All active connections, shared weakly with scoped guards.
    connections: Arc<Connections<Args>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
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
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use observable_range_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            connections: Arc::downgrade(&self.connections),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect a slot, reporting an unknown ID as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
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
    /// While blocked, calls to `emit()` and `try_emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// A panicking slot unwinds through this call; slots after it are not
    /// invoked. Use [`try_emit`](Self::try_emit) to contain slot failures.
    #[tracing::instrument(skip_all, target = "observable_range_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "observable_range_core::signal", "signal blocked, skipping emit");
            return;
        }

        let slots = self.snapshot();
        tracing::trace!(target: "observable_range_core::signal", connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }

    /// Emit the signal, catching a panic raised by any slot.
    ///
    /// Dispatch stops at the first slot that panics; the panic message is
    /// returned as [`SignalError::SlotPanicked`]. Slots connected after the
    /// failing one are not invoked.
    #[tracing::instrument(skip_all, target = "observable_range_core::signal", level = "trace")]
    pub fn try_emit(&self, args: Args) -> Result<(), SignalError> {
        if self.is_blocked() {
            tracing::trace!(target: "observable_range_core::signal", "signal blocked, skipping emit");
            return Ok(());
        }

        let slots = self.snapshot();
        tracing::trace!(target: "observable_range_core::signal", connection_count = slots.len(), "emitting signal (isolated)");

        for slot in slots {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| slot(&args))) {
                let message = panic_message(payload.as_ref());
                tracing::warn!(target: "observable_range_core::signal", %message, "slot panicked during dispatch");
                return Err(SignalError::SlotPanicked { message });
            }
        }
        Ok(())
    }

    /// Clone the current slots so the lock is not held while they run.
    fn snapshot(&self) -> Vec<Slot<Args>> {
        self.connections.lock().values().cloned().collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`]. The guard only holds a weak
/// reference to the signal's connection list, so it may outlive the signal.
///
/// # Example
///
/// ```
/// use observable_range_core::Signal;
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
///     signal.emit(42);
/// }
/// signal.emit(43);
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args> {
    connections: Weak<Connections<Args>>,
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
        if let Some(connections) = self.connections.upgrade() {
            connections.lock().remove(self.id);
        }
    }
}
