//! Two-dimensional jagged buffers: rows of independently sized flat buffers.

use tracing::debug;

use crate::config::AllocConfig;
use crate::element::Element;
use crate::error::BufferError;
use crate::flat::FlatBuffer;

/// What a release freed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReleaseSummary {
    /// Number of rows released.
    pub rows: usize,
    /// Total number of elements released across all rows.
    pub elements: usize,
}

/// An ordered sequence of independently sized, zero-initialized rows.
///
/// Row `i` has the length given by `row_lengths[i]` at construction. The
/// number of rows and each row's length are fixed for the buffer's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct JaggedBuffer<T: Element> {
    rows: Vec<FlatBuffer<T>>,
}

impl<T: Element> JaggedBuffer<T> {
    /// Allocate `row_count` zeroed rows, row `i` holding `row_lengths[i]`
    /// elements.
    ///
    /// `row_lengths` must have exactly `row_count` entries; otherwise this
    /// fails with [`BufferError::LengthMismatch`] before allocating. The
    /// row count and the summed row lengths are each held to
    /// `config.max_elements`. If any row
    /// fails to allocate, rows already allocated are dropped and the error
    /// is returned.
    pub fn zeroed(
        row_count: usize,
        row_lengths: &[usize],
        config: &AllocConfig,
    ) -> Result<Self, BufferError> {
        if row_lengths.len() != row_count {
            return Err(BufferError::LengthMismatch {
                expected: row_count,
                actual: row_lengths.len(),
            });
        }
        let total = row_lengths
            .iter()
            .try_fold(0usize, |acc, &len| acc.checked_add(len))
            .ok_or(BufferError::AllocationFailed {
                requested: usize::MAX,
            })?;
        config.check(row_count)?;
        config.check(total)?;

        let mut rows = Vec::new();
        rows.try_reserve_exact(row_count)
            .map_err(|_| BufferError::AllocationFailed { requested: total })?;
        for &len in row_lengths {
            rows.push(FlatBuffer::zeroed(len, config)?);
        }
        debug!(rows = row_count, elements = total, "allocated jagged buffer");
        Ok(Self { rows })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Length of each row, in row order.
    pub fn row_lengths(&self) -> Vec<usize> {
        self.rows.iter().map(FlatBuffer::len).collect()
    }

    /// Total number of elements across all rows.
    pub fn total_len(&self) -> usize {
        self.rows.iter().map(FlatBuffer::len).sum()
    }

    /// Borrow row `i`, or `None` if out of range.
    pub fn row(&self, i: usize) -> Option<&FlatBuffer<T>> {
        self.rows.get(i)
    }

    /// Mutably borrow row `i`, or `None` if out of range.
    pub fn row_mut(&mut self, i: usize) -> Option<&mut FlatBuffer<T>> {
        self.rows.get_mut(i)
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &FlatBuffer<T>> {
        self.rows.iter()
    }

    /// Verify a caller-supplied row count against the actual one.
    pub fn check_row_count(&self, row_count: usize) -> Result<(), BufferError> {
        if row_count != self.rows.len() {
            return Err(BufferError::LengthMismatch {
                expected: self.rows.len(),
                actual: row_count,
            });
        }
        Ok(())
    }

    /// Release every row, then the row collection.
    pub fn release(self) -> ReleaseSummary {
        let mut summary = ReleaseSummary::default();
        for row in self.rows {
            summary.elements += row.release();
            summary.rows += 1;
        }
        debug!(
            rows = summary.rows,
            elements = summary.elements,
            "released jagged buffer"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rows_match_requested_lengths() {
        let m = JaggedBuffer::<i32>::zeroed(3, &[2, 0, 4], &AllocConfig::default()).unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.row_lengths(), vec![2, 0, 4]);
        assert_eq!(m.total_len(), 6);
        assert!(m.rows().all(|r| r.iter().all(|&v| v == 0)));
    }

    #[test]
    fn short_row_lengths_is_length_mismatch() {
        let err = JaggedBuffer::<i32>::zeroed(3, &[1, 2], &AllocConfig::default()).unwrap_err();
        assert_eq!(
            err,
            BufferError::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn long_row_lengths_is_length_mismatch() {
        let err = JaggedBuffer::<i32>::zeroed(1, &[1, 2], &AllocConfig::default()).unwrap_err();
        assert_eq!(
            err,
            BufferError::LengthMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn total_over_limit_fails() {
        let config = AllocConfig::new(5);
        let err = JaggedBuffer::<i32>::zeroed(2, &[3, 3], &config).unwrap_err();
        assert_eq!(err, BufferError::AllocationFailed { requested: 6 });
    }

    #[test]
    fn row_count_over_limit_fails_even_with_empty_rows() {
        let config = AllocConfig::new(4);
        let err = JaggedBuffer::<i32>::zeroed(5, &[0; 5], &config).unwrap_err();
        assert_eq!(err, BufferError::AllocationFailed { requested: 5 });
        assert!(JaggedBuffer::<i32>::zeroed(4, &[0; 4], &config).is_ok());
    }

    #[test]
    fn overflowing_total_fails() {
        let err = JaggedBuffer::<i32>::zeroed(2, &[usize::MAX, 1], &AllocConfig::default())
            .unwrap_err();
        assert!(matches!(err, BufferError::AllocationFailed { .. }));
    }

    #[test]
    fn empty_matrix() {
        let m = JaggedBuffer::<f64>::zeroed(0, &[], &AllocConfig::default()).unwrap();
        assert_eq!(m.n_rows(), 0);
        assert_eq!(m.release(), ReleaseSummary::default());
    }

    #[test]
    fn row_access_out_of_range_is_none() {
        let mut m = JaggedBuffer::<i32>::zeroed(1, &[2], &AllocConfig::default()).unwrap();
        assert!(m.row(1).is_none());
        assert!(m.row_mut(1).is_none());
        m.row_mut(0).unwrap()[1] = 9;
        assert_eq!(m.row(0).unwrap().as_slice(), &[0, 9]);
    }

    #[test]
    fn check_row_count() {
        let m = JaggedBuffer::<i32>::zeroed(2, &[1, 1], &AllocConfig::default()).unwrap();
        assert!(m.check_row_count(2).is_ok());
        assert_eq!(
            m.check_row_count(3),
            Err(BufferError::LengthMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn release_counts_every_row_once() {
        let m = JaggedBuffer::<i32>::zeroed(3, &[1, 2, 3], &AllocConfig::default()).unwrap();
        assert_eq!(
            m.release(),
            ReleaseSummary {
                rows: 3,
                elements: 6
            }
        );
    }

    proptest! {
        #[test]
        fn zeroed_shape_matches_lengths(lens in proptest::collection::vec(0usize..64, 0..16)) {
            let m = JaggedBuffer::<f32>::zeroed(lens.len(), &lens, &AllocConfig::default()).unwrap();
            prop_assert_eq!(m.row_lengths(), lens.clone());
            prop_assert!(m.rows().all(|r| r.iter().all(|&v| v == 0.0)));
            let summary = m.release();
            prop_assert_eq!(summary.rows, lens.len());
            prop_assert_eq!(summary.elements, lens.iter().sum::<usize>());
        }
    }
}
