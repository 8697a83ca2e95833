//! Tab: Python wrapper around a flat `int` buffer handle.

use numpy::{PyArray1, PyArrayMethods};
use pyo3::prelude::*;

use teacup_ffi::{teacup_tab_free, teacup_tab_init, teacup_tab_len, teacup_tab_read, teacup_tab_write};

use crate::error::check_status;

/// A zero-initialized buffer of 32-bit integers.
///
/// Freed explicitly with `free()`, on leaving a `with` block, or when
/// garbage collected. Any use after `free()` raises `RuntimeError`.
#[pyclass]
pub(crate) struct Tab {
    handle: Option<u64>,
}

#[pymethods]
impl Tab {
    /// Allocate `n` zeroed elements.
    #[new]
    fn new(py: Python<'_>, n: usize) -> PyResult<Self> {
        // Release GIL: teacup_tab_init locks TABS.
        let (status, h) = py.detach(|| {
            let mut h: u64 = 0;
            let s = teacup_tab_init(n, &mut h);
            (s, h)
        });
        check_status(status)?;
        Ok(Tab { handle: Some(h) })
    }

    fn __len__(&self, py: Python<'_>) -> PyResult<usize> {
        let h = self.require_handle()?;
        let (status, len) = py.detach(|| {
            let mut len = 0usize;
            let s = teacup_tab_len(h, &mut len);
            (s, len)
        });
        check_status(status)?;
        Ok(len)
    }

    /// Copy the contents into a Python list.
    fn to_list(&self, py: Python<'_>) -> PyResult<Vec<i32>> {
        self.read_vec(py)
    }

    /// Copy the contents into a new int32 NumPy array.
    fn to_numpy<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<i32>>> {
        Ok(PyArray1::from_vec(py, self.read_vec(py)?))
    }

    /// Copy the contents into a pre-allocated contiguous int32 array.
    ///
    /// Returns:
    ///     Number of elements copied.
    fn read_into(&self, py: Python<'_>, out: &Bound<'_, PyArray1<i32>>) -> PyResult<usize> {
        let h = self.require_handle()?;
        let mut rw = out.try_readwrite()?;
        let dst = rw.as_slice_mut()?;
        let (addr, cap) = (dst.as_mut_ptr() as usize, dst.len());
        // Release GIL: teacup_tab_read locks TABS.
        let (status, n) = py.detach(|| {
            let mut n = 0usize;
            let s = teacup_tab_read(h, addr as *mut i32, cap, &mut n);
            (s, n)
        });
        check_status(status)?;
        Ok(n)
    }

    /// Overwrite the leading elements with `values`.
    fn write(&self, py: Python<'_>, values: Vec<i32>) -> PyResult<()> {
        let h = self.require_handle()?;
        let status = py.detach(|| teacup_tab_write(h, values.as_ptr(), values.len()));
        check_status(status)
    }

    /// Whether `free()` has been called.
    #[getter]
    fn freed(&self) -> bool {
        self.handle.is_none()
    }

    /// Release the buffer. Raises `RuntimeError` if already freed.
    fn free(&mut self, py: Python<'_>) -> PyResult<()> {
        let h = self.require_handle()?;
        self.handle = None;
        // Release GIL: teacup_tab_free locks TABS.
        check_status(py.detach(|| teacup_tab_free(h)))
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
            py.detach(|| teacup_tab_free(h));
        }
    }
}

impl Tab {
    fn require_handle(&self) -> PyResult<u64> {
        self.handle
            .ok_or_else(|| pyo3::exceptions::PyRuntimeError::new_err("Tab already freed"))
    }

    fn read_vec(&self, py: Python<'_>) -> PyResult<Vec<i32>> {
        let len = self.__len__(py)?;
        let h = self.require_handle()?;
        let mut buf = vec![0i32; len];
        let status = py.detach(|| teacup_tab_read(h, buf.as_mut_ptr(), buf.len(), std::ptr::null_mut()));
        check_status(status)?;
        Ok(buf)
    }
}

impl Drop for Tab {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            // PyO3 Drop for #[pyclass] runs with GIL held.
            Python::attach(|py| {
                py.detach(|| teacup_tab_free(h));
            });
        }
    }
}
