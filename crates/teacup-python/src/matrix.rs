//! Matrix: Python wrapper around a jagged `int` matrix handle.

use pyo3::prelude::*;

use teacup_ffi::{
    teacup_matrix_free, teacup_matrix_init, teacup_matrix_n_rows, teacup_matrix_read_row,
    teacup_matrix_row_len, teacup_matrix_write_row,
};

use crate::error::check_status;

/// A jagged matrix of 32-bit integers; row `i` has `row_lengths[i]` zeros.
///
/// Ownership can be handed to a `Data` record with
/// `Data.attach_matrix()`, after which this object is empty.
#[pyclass]
pub(crate) struct Matrix {
    handle: Option<u64>,
}

#[pymethods]
impl Matrix {
    /// Allocate a matrix.
    ///
    /// Args:
    ///     row_lengths: Length of each row.
    ///     n: Optional row count; must equal `len(row_lengths)` when given.
    #[new]
    #[pyo3(signature = (row_lengths, n=None))]
    fn new(py: Python<'_>, row_lengths: Vec<usize>, n: Option<usize>) -> PyResult<Self> {
        let n = n.unwrap_or(row_lengths.len());
        // Release GIL: teacup_matrix_init locks MATRICES.
        let (status, h) = py.detach(|| {
            let mut h: u64 = 0;
            let s = teacup_matrix_init(n, row_lengths.as_ptr(), row_lengths.len(), &mut h);
            (s, h)
        });
        check_status(status)?;
        Ok(Matrix { handle: Some(h) })
    }

    /// Number of rows.
    #[getter]
    fn n_rows(&self, py: Python<'_>) -> PyResult<usize> {
        let h = self.require_handle()?;
        let (status, rows) = py.detach(|| {
            let mut rows = 0usize;
            let s = teacup_matrix_n_rows(h, &mut rows);
            (s, rows)
        });
        check_status(status)?;
        Ok(rows)
    }

    /// Length of every row, in order.
    #[getter]
    fn row_lengths(&self, py: Python<'_>) -> PyResult<Vec<usize>> {
        let h = self.require_handle()?;
        (0..self.n_rows(py)?)
            .map(|i| row_len(py, h, i))
            .collect()
    }

    /// Copy row `i` into a list.
    fn row(&self, py: Python<'_>, i: usize) -> PyResult<Vec<i32>> {
        let h = self.require_handle()?;
        let mut buf = vec![0i32; row_len(py, h, i)?];
        let status = py.detach(|| {
            teacup_matrix_read_row(h, i, buf.as_mut_ptr(), buf.len(), std::ptr::null_mut())
        });
        check_status(status)?;
        Ok(buf)
    }

    /// Overwrite the leading elements of row `i` with `values`.
    fn set_row(&self, py: Python<'_>, i: usize, values: Vec<i32>) -> PyResult<()> {
        let h = self.require_handle()?;
        let status = py.detach(|| teacup_matrix_write_row(h, i, values.as_ptr(), values.len()));
        check_status(status)
    }

    /// Whether this object no longer owns a matrix (freed or attached).
    #[getter]
    fn freed(&self) -> bool {
        self.handle.is_none()
    }

    /// Release every row.
    ///
    /// Args:
    ///     n: Optional row count to verify before freeing; a mismatch
    ///         raises `ValueError` and leaves the matrix intact.
    #[pyo3(signature = (n=None))]
    fn free(&mut self, py: Python<'_>, n: Option<usize>) -> PyResult<()> {
        let h = self.require_handle()?;
        let n = match n {
            Some(n) => n,
            None => self.n_rows(py)?,
        };
        // Release GIL: teacup_matrix_free locks MATRICES.
        check_status(py.detach(|| teacup_matrix_free(n, std::ptr::null(), h)))?;
        self.handle = None;
        Ok(())
    }

    fn __enter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    #[pyo3(signature = (_exc_type=None, _exc_val=None, _exc_tb=None))]
    fn __exit__(
        &mut self,
        py: Python<'_>,
        _exc_type: Option<&Bound<'_, PyAny>>,
        _exc_val: Option<&Bound<'_, PyAny>>,
        _exc_tb: Option<&Bound<'_, PyAny>>,
    ) {
        self.free_quietly(py);
    }
}

impl Matrix {
    pub(crate) fn require_handle(&self) -> PyResult<u64> {
        self.handle.ok_or_else(|| {
            pyo3::exceptions::PyRuntimeError::new_err("Matrix already freed or attached")
        })
    }

    /// Forget the handle after its matrix has been moved elsewhere.
    pub(crate) fn disown(&mut self) {
        self.handle = None;
    }

    fn free_quietly(&mut self, py: Python<'_>) {
        if let Some(h) = self.handle.take() {
            py.detach(|| {
                let mut rows = 0usize;
                if teacup_matrix_n_rows(h, &mut rows) == 0 {
                    teacup_matrix_free(rows, std::ptr::null(), h);
                }
            });
        }
    }
}

fn row_len(py: Python<'_>, h: u64, i: usize) -> PyResult<usize> {
    let (status, len) = py.detach(|| {
        let mut len = 0usize;
        let s = teacup_matrix_row_len(h, i, &mut len);
        (s, len)
    });
    check_status(status)?;
    Ok(len)
}

impl Drop for Matrix {
    fn drop(&mut self) {
        if self.handle.is_some() {
            // PyO3 Drop for #[pyclass] runs with GIL held.
            Python::attach(|py| self.free_quietly(py));
        }
    }
}
