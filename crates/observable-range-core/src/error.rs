//! Error types for the observer facility.

use std::fmt;

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
    /// A connected slot panicked while the signal was being dispatched.
    SlotPanicked {
        /// The panic payload, when it was a string.
        message: String,
    },
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
            Self::SlotPanicked { message } => {
                write!(f, "Slot panicked during dispatch: {message}")
            }
        }
    }
}

impl std::error::Error for SignalError {}
