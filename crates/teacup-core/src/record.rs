//! A record bundling an element count with an optionally owned matrix.
//!
//! Presence of each field is carried by `Option`, so "the matrix flag is set"
//! and "the matrix exists" cannot disagree. The boolean accessors exist for
//! callers across the FFI boundary that expect flags.

use tracing::debug;

use crate::error::BufferError;
use crate::jagged::{JaggedBuffer, ReleaseSummary};

/// An element count plus an optional owned `i32` jagged buffer.
///
/// Created with the count populated and the matrix absent. The matrix may
/// be attached once; presence only moves from absent to present.
#[derive(Clone, Debug, PartialEq)]
pub struct DataRecord {
    nb_elements: Option<i32>,
    matrix: Option<JaggedBuffer<i32>>,
}

impl DataRecord {
    /// Create a record holding `nb_elements`, with no matrix.
    pub fn new(nb_elements: i32) -> Self {
        debug!(nb_elements, "created data record");
        Self {
            nb_elements: Some(nb_elements),
            matrix: None,
        }
    }

    /// The element count, if populated.
    pub fn nb_elements(&self) -> Option<i32> {
        self.nb_elements
    }

    /// Whether the element count is populated.
    pub fn has_nb_elements(&self) -> bool {
        self.nb_elements.is_some()
    }

    /// Whether a matrix is attached.
    pub fn has_matrix(&self) -> bool {
        self.matrix.is_some()
    }

    /// Number of matrix rows; 0 when no matrix is attached.
    pub fn n_rows(&self) -> usize {
        self.matrix.as_ref().map_or(0, JaggedBuffer::n_rows)
    }

    /// Row lengths of the attached matrix, or `None` when absent.
    pub fn row_lengths(&self) -> Option<Vec<usize>> {
        self.matrix.as_ref().map(JaggedBuffer::row_lengths)
    }

    /// Borrow the attached matrix.
    pub fn matrix(&self) -> Option<&JaggedBuffer<i32>> {
        self.matrix.as_ref()
    }

    /// Mutably borrow the attached matrix.
    pub fn matrix_mut(&mut self) -> Option<&mut JaggedBuffer<i32>> {
        self.matrix.as_mut()
    }

    /// Take ownership of `matrix` and store it in the record.
    ///
    /// Fails with [`BufferError::InvalidState`] if a matrix is already
    /// attached. The rejected `matrix` is dropped and the existing one is
    /// left in place.
    pub fn attach_matrix(&mut self, matrix: JaggedBuffer<i32>) -> Result<(), BufferError> {
        if self.matrix.is_some() {
            return Err(BufferError::InvalidState {
                reason: "data record already owns a matrix".into(),
            });
        }
        debug!(rows = matrix.n_rows(), "attached matrix to data record");
        self.matrix = Some(matrix);
        Ok(())
    }

    /// Release the record and, if present, its matrix.
    ///
    /// When no matrix is attached nothing besides the record itself is
    /// released and the summary is empty.
    pub fn release(self) -> ReleaseSummary {
        let summary = match self.matrix {
            Some(matrix) => matrix.release(),
            None => ReleaseSummary::default(),
        };
        debug!(
            rows = summary.rows,
            elements = summary.elements,
            "released data record"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllocConfig;

    fn matrix(lens: &[usize]) -> JaggedBuffer<i32> {
        JaggedBuffer::zeroed(lens.len(), lens, &AllocConfig::default()).unwrap()
    }

    #[test]
    fn new_record_has_count_and_no_matrix() {
        let r = DataRecord::new(5);
        assert_eq!(r.nb_elements(), Some(5));
        assert!(r.has_nb_elements());
        assert!(!r.has_matrix());
        assert_eq!(r.n_rows(), 0);
        assert_eq!(r.row_lengths(), None);
        assert!(r.matrix().is_none());
    }

    #[test]
    fn release_without_matrix_releases_nothing() {
        let r = DataRecord::new(5);
        assert_eq!(r.release(), ReleaseSummary::default());
    }

    #[test]
    fn release_with_matrix_releases_its_rows() {
        let mut r = DataRecord::new(2);
        r.attach_matrix(matrix(&[4, 1])).unwrap();
        assert!(r.has_matrix());
        assert_eq!(r.n_rows(), 2);
        assert_eq!(r.row_lengths(), Some(vec![4, 1]));
        assert_eq!(
            r.release(),
            ReleaseSummary {
                rows: 2,
                elements: 5
            }
        );
    }

    #[test]
    fn second_attach_is_invalid_state() {
        let mut r = DataRecord::new(1);
        r.attach_matrix(matrix(&[1])).unwrap();
        let err = r.attach_matrix(matrix(&[7, 7])).unwrap_err();
        assert!(matches!(err, BufferError::InvalidState { .. }));
        // The first matrix stays in place.
        assert_eq!(r.row_lengths(), Some(vec![1]));
    }

    #[test]
    fn matrix_mut_writes_through() {
        let mut r = DataRecord::new(1);
        r.attach_matrix(matrix(&[3])).unwrap();
        r.matrix_mut().unwrap().row_mut(0).unwrap()[2] = 42;
        assert_eq!(r.matrix().unwrap().row(0).unwrap().as_slice(), &[0, 0, 42]);
    }
}
