//! Data: Python wrapper around a record handle.

use pyo3::prelude::*;

use teacup_ffi::{
    teacup_data_attach_matrix, teacup_data_free, teacup_data_has_matrix, teacup_data_init,
    teacup_data_n_rows, teacup_data_nb_elements, teacup_data_read_row, teacup_data_row_len,
    TeacupReleaseSummary,
};

use crate::error::check_status;
use crate::matrix::Matrix;

/// An element count plus an optional owned matrix.
///
/// Freeing the record frees its matrix too, if one was attached.
#[pyclass]
pub(crate) struct Data {
    handle: Option<u64>,
}

#[pymethods]
impl Data {
    /// Create a record holding `nb_elements` with no matrix.
    #[new]
    fn new(py: Python<'_>, nb_elements: i32) -> PyResult<Self> {
        // Release GIL: teacup_data_init locks DATA.
        let (status, h) = py.detach(|| {
            let mut h: u64 = 0;
            let s = teacup_data_init(nb_elements, &mut h);
            (s, h)
        });
        check_status(status)?;
        Ok(Data { handle: Some(h) })
    }

    /// The element count given at creation.
    #[getter]
    fn nb_elements(&self, py: Python<'_>) -> PyResult<i32> {
        let h = self.require_handle()?;
        let (status, count) = py.detach(|| {
            let mut count = 0i32;
            let s = teacup_data_nb_elements(h, &mut count);
            (s, count)
        });
        check_status(status)?;
        Ok(count)
    }

    /// Whether the element count is populated (always true after creation).
    #[getter]
    fn has_nb_elements(&self, py: Python<'_>) -> PyResult<bool> {
        let h = self.require_handle()?;
        let status = py.detach(|| {
            let mut count = 0i32;
            teacup_data_nb_elements(h, &mut count)
        });
        Ok(status == teacup_ffi::TeacupStatus::Ok as i32)
    }

    /// Whether a matrix is attached.
    #[getter]
    fn has_matrix(&self, py: Python<'_>) -> PyResult<bool> {
        let h = self.require_handle()?;
        let (status, flag) = py.detach(|| {
            let mut flag = 0u8;
            let s = teacup_data_has_matrix(h, &mut flag);
            (s, flag)
        });
        check_status(status)?;
        Ok(flag != 0)
    }

    /// Rows in the attached matrix (0 when none).
    #[getter]
    fn n_rows(&self, py: Python<'_>) -> PyResult<usize> {
        let h = self.require_handle()?;
        let (status, rows) = py.detach(|| {
            let mut rows = 0usize;
            let s = teacup_data_n_rows(h, &mut rows);
            (s, rows)
        });
        check_status(status)?;
        Ok(rows)
    }

    /// Copy row `i` of the attached matrix into a list.
    fn row(&self, py: Python<'_>, i: usize) -> PyResult<Vec<i32>> {
        let h = self.require_handle()?;
        let (status, len) = py.detach(|| {
            let mut len = 0usize;
            let s = teacup_data_row_len(h, i, &mut len);
            (s, len)
        });
        check_status(status)?;
        let mut buf = vec![0i32; len];
        let status = py.detach(|| {
            teacup_data_read_row(h, i, buf.as_mut_ptr(), buf.len(), std::ptr::null_mut())
        });
        check_status(status)?;
        Ok(buf)
    }

    /// Move `matrix` into this record. `matrix` is empty afterwards.
    ///
    /// Raises `RuntimeError` if a matrix is already attached; `matrix` is
    /// left usable in that case.
    fn attach_matrix(&self, py: Python<'_>, matrix: &mut Matrix) -> PyResult<()> {
        let h = self.require_handle()?;
        let mh = matrix.require_handle()?;
        // Release GIL: teacup_data_attach_matrix locks DATA then MATRICES.
        check_status(py.detach(|| teacup_data_attach_matrix(h, mh)))?;
        matrix.disown();
        Ok(())
    }

    /// Whether `free()` has been called.
    #[getter]
    fn freed(&self) -> bool {
        self.handle.is_none()
    }

    /// Release the record and any attached matrix.
    ///
    /// Returns:
    ///     Tuple of (rows_released, elements_released); (0, 0) when no
    ///     matrix was attached.
    fn free(&mut self, py: Python<'_>) -> PyResult<(u64, u64)> {
        let h = self.require_handle()?;
        self.handle = None;
        // Release GIL: teacup_data_free locks DATA.
        let (status, summary) = py.detach(|| {
            let mut summary = TeacupReleaseSummary::default();
            let s = teacup_data_free(h, &mut summary);
            (s, summary)
        });
        check_status(status)?;
        Ok((summary.rows, summary.elements))
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
        if let Some(h) = self.handle.take() {
            py.detach(|| teacup_data_free(h, std::ptr::null_mut()));
        }
    }
}

impl Data {
    fn require_handle(&self) -> PyResult<u64> {
        self.handle
            .ok_or_else(|| pyo3::exceptions::PyRuntimeError::new_err("Data already freed"))
    }
}

impl Drop for Data {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            // PyO3 Drop for #[pyclass] runs with GIL held.
            Python::attach(|py| {
                py.detach(|| teacup_data_free(h, std::ptr::null_mut()));
            });
        }
    }
}
