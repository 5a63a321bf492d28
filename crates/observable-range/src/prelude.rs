//! Prelude module for observable-range.
//!
//! ```ignore
//! use observable_range::prelude::*;
//! ```
//!
//! This provides access to:
//! - Signal/slot system (`Signal`, `ConnectionId`, `ConnectionGuard`)
//! - The collection and its notification types

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use crate::signal::{ConnectionGuard, ConnectionId, Signal};

// ============================================================================
// Collections
// ============================================================================

pub use crate::collection::{
    ChangeKind, CollectionChanged, CollectionError, CollectionProperty, CollectionResult,
    ObservableCollection,
};
