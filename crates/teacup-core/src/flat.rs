//! One-dimensional zero-initialized buffers.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::config::AllocConfig;
use crate::element::Element;
use crate::error::BufferError;

/// A contiguous, fixed-length buffer of `T`.
///
/// The length is fixed at creation and every element starts at
/// [`Element::ZERO`]. The buffer derefs to `[T]` for reads and element
/// writes, but exposes no way to grow or shrink.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatBuffer<T: Element> {
    data: Vec<T>,
}

impl<T: Element> FlatBuffer<T> {
    /// Allocate `len` zeroed elements.
    ///
    /// Fails with [`BufferError::AllocationFailed`] if `len` exceeds the
    /// configured limit, if the byte size overflows, or if the allocator
    /// cannot satisfy the request. No partially initialized buffer is ever
    /// returned.
    pub fn zeroed(len: usize, config: &AllocConfig) -> Result<Self, BufferError> {
        config.check(len)?;
        let too_large = AllocConfig::bytes_for::<T>(len).is_none_or(|b| b > isize::MAX as usize);
        if too_large {
            return Err(BufferError::AllocationFailed { requested: len });
        }
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| BufferError::AllocationFailed { requested: len })?;
        data.resize(len, T::ZERO);
        debug!(len, "allocated flat buffer");
        Ok(Self { data })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds zero elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the elements.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutably borrow the elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Overwrite the first `src.len()` elements with `src`.
    ///
    /// Elements past `src.len()` are left untouched. Fails without writing
    /// if `src` is longer than the buffer.
    pub fn write_prefix(&mut self, src: &[T]) -> Result<(), BufferError> {
        if src.len() > self.data.len() {
            return Err(BufferError::LengthMismatch {
                expected: self.data.len(),
                actual: src.len(),
            });
        }
        self.data[..src.len()].copy_from_slice(src);
        Ok(())
    }

    /// Release the buffer, returning the number of elements freed.
    pub fn release(self) -> usize {
        let len = self.data.len();
        debug!(len, "released flat buffer");
        len
    }
}

impl<T: Element> Deref for FlatBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Element> DerefMut for FlatBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}
