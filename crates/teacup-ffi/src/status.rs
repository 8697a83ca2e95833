//! C-compatible status codes.
//!
//! [`TeacupStatus`] is a `repr(i32)` enum returned by every status-returning
//! entry point. Conversions from [`BufferError`] are provided.

use teacup_core::BufferError;
use tracing::warn;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeacupStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already freed.
    InvalidHandle = -1,
    /// An argument is null, out of range, or lengths disagree.
    InvalidArgument = -2,
    /// Memory could not be obtained or the request exceeds the element limit.
    AllocationFailed = -3,
    /// The operation is not permitted in the target's current state.
    InvalidState = -4,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -5,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -6,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&BufferError> for TeacupStatus {
    fn from(e: &BufferError) -> Self {
        match e {
            BufferError::AllocationFailed { .. } => TeacupStatus::AllocationFailed,
            BufferError::LengthMismatch { .. } => TeacupStatus::InvalidArgument,
            BufferError::InvalidState { .. } => TeacupStatus::InvalidState,
        }
    }
}

/// Log a rejected request and return its status code.
pub(crate) fn reject(op: &'static str, e: &BufferError) -> i32 {
    warn!(op, error = %e, "request rejected");
    TeacupStatus::from(e) as i32
}
