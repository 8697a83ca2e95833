//! Error types for buffer allocation and manipulation.
//!
//! Three classes of failure exist: the allocator could not (or was not
//! permitted to) provide the memory, a caller passed lengths that do not
//! agree, or an operation was attempted in a state that forbids it.

use std::error::Error;
use std::fmt;

/// Errors from buffer and record operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// Memory for the requested number of elements could not be obtained,
    /// or the request exceeds the configured element limit.
    AllocationFailed {
        /// Number of elements requested.
        requested: usize,
    },
    /// Two lengths that must agree do not (e.g. a row-length list shorter
    /// than the row count, or unequal input/output buffers).
    LengthMismatch {
        /// The length the operation required.
        expected: usize,
        /// The length actually supplied.
        actual: usize,
    },
    /// The operation is not permitted in the current state.
    InvalidState {
        /// Human-readable description of the violated state.
        reason: String,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "allocation of {requested} elements failed")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "length mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidState { reason } => write!(f, "invalid state: {reason}"),
        }
    }
}

impl Error for BufferError {}
