//! Ranged observable collections.
//!
//! An [`ObservableCollection`] is an ordered container that reports every
//! mutation through signals. Bulk operations (`add_range`, `insert_range`,
//! `replace_range`, `assume_range`, `remove_range`) apply many elements but
//! emit a single [`CollectionChanged`] notification, so bound views refresh
//! once and never observe a half-applied batch.
//!
//! # Core Types
//!
//! - `ObservableCollection`: The collection and its mutating operations
//! - `CollectionChanged`: The payload describing one completed mutation
//! - `ChangeKind`: `Add`, `Remove`, `Replace` or `Reset`
//! - `CollectionProperty`: Count/indexer companion signals
//! - `Storage`: The ordered storage the collection delegates to
//! - `CollectionConfig` / `CollectionBuilder`: Per-instance settings
//!
//! # Notification Order
//!
//! ```text
//! mutate storage ──> property_changed(Count)
//!                ──> property_changed(Indexer)
//!                ──> collection_changed(CollectionChanged)
//! ```
//!
//! All three run while the collection is in the dispatching state; any
//! mutation attempted by an observer fails with
//! [`CollectionError::ReentrancyViolation`].

mod change;
mod config;
mod error;
mod observable;
mod storage;

pub use change::{ChangeKind, CollectionChanged, CollectionProperty};
pub use config::{CollectionBuilder, CollectionConfig, EmptyRangePolicy};
pub use error::{CollectionError, CollectionResult};
pub use observable::{CollectionSignals, DispatchState, ObservableCollection};
pub use storage::Storage;
