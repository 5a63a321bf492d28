//! Core systems for observable ranged collections.
//!
//! This crate provides the leaf components the collection crate is built on:
//!
//! - **Signal/Slot System**: Ordered observer lists with synchronous dispatch
//! - **Failure Isolation**: Dispatch that reports a panicking observer as an error
//! - **Logging**: `tracing` targets and a [`Stopwatch`] for timing operations
//!
//! # Signal/Slot Example
//!
//! ```
//! use observable_range_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::SignalError;
pub use logging::Stopwatch;
pub use signal::{ConnectionGuard, ConnectionId, Signal};

static_assertions::assert_impl_all!(Signal<i32>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<String>: Send, Sync);
