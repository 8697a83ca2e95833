//! Allocation limits.

use crate::error::BufferError;

/// Configuration for buffer allocation.
///
/// Bounds the number of elements a single allocation may request. A
/// jagged buffer counts the sum of its row lengths against the same limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocConfig {
    /// Maximum number of elements per allocation.
    ///
    /// Default: 268_435_456 (1GB of `i32`, 2GB of `f64`).
    pub max_elements: usize,
}

impl AllocConfig {
    /// Default element limit: 2^28 elements.
    pub const DEFAULT_MAX_ELEMENTS: usize = 1 << 28;

    /// Create a config with the given element limit.
    pub const fn new(max_elements: usize) -> Self {
        Self { max_elements }
    }

    /// Reject requests above `max_elements`.
    pub fn check(&self, requested: usize) -> Result<(), BufferError> {
        if requested > self.max_elements {
            return Err(BufferError::AllocationFailed { requested });
        }
        Ok(())
    }

    /// Size in bytes of `len` elements of `T`, or `None` on overflow.
    pub fn bytes_for<T>(len: usize) -> Option<usize> {
        len.checked_mul(std::mem::size_of::<T>())
    }
}

impl Default for AllocConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ELEMENTS)
    }
}
