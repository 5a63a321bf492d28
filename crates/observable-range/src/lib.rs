//! observable-range - ordered collections that batch change notifications.
//!
//! This is the main crate; it re-exports the core signal system alongside the
//! collection types.
//!
//! # Example
//!
//! ```
//! use observable_range::collection::{ChangeKind, ObservableCollection};
//!
//! let rows = ObservableCollection::from_vec(vec![1, 2, 3]);
//! rows.signals().collection_changed.connect(|change| {
//!     if change.kind() == ChangeKind::Reset {
//!         println!("re-read everything");
//!     }
//! });
//!
//! rows.assume_range(Vec::new())?;
//! assert!(rows.is_empty());
//! # Ok::<(), observable_range::collection::CollectionError>(())
//! ```

pub use observable_range_core::*;

pub mod collection;
pub mod prelude;
