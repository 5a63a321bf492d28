//! Error types for collection operations.

use thiserror::Error;

/// Errors returned by mutating collection operations.
///
/// Every error is raised before the collection is modified and before any
/// notification is emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// A required input sequence was absent.
    #[error("argument `{name}` must not be absent")]
    InvalidArgument {
        /// The name of the offending argument.
        name: &'static str,
    },

    /// An index or count fell outside the collection's bounds.
    #[error("argument `{name}` is out of range: {value} (collection length {len})")]
    IndexOutOfRange {
        /// The name of the offending argument.
        name: &'static str,
        /// The rejected value.
        value: usize,
        /// The collection length at the time of the call.
        len: usize,
    },

    /// The collection was mutated from inside one of its own notifications.
    #[error("cannot change the collection while a change notification is being dispatched")]
    ReentrancyViolation,
}

/// Result type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;
