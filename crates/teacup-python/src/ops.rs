//! Module-level functions: scalar and array ops, limits, logging.

use std::ffi::CString;

use numpy::{PyArray1, PyArrayMethods, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use teacup_ffi::{
    teacup_add, teacup_logging_init, teacup_max_elements, teacup_set_max_elements,
    teacup_square_array, teacup_sum,
};

use crate::error::check_status;

/// Add two 32-bit integers (wrapping on overflow).
#[pyfunction]
pub(crate) fn add(a: i32, b: i32) -> i32 {
    teacup_add(a, b)
}

/// Sum a 1-D float64 array.
///
/// Args:
///     tab: Contiguous float64 array.
///
/// Returns:
///     The sum, accumulated in order.
#[pyfunction]
pub(crate) fn sum(tab: PyReadonlyArray1<'_, f64>) -> PyResult<f64> {
    let values = tab.as_slice()?;
    let mut out = 0.0f64;
    check_status(teacup_sum(values.len(), values.as_ptr(), &mut out))?;
    Ok(out)
}

/// Square every element of `ina` into `outa`.
///
/// Both arrays must be contiguous float64 of equal length. Passing the
/// same array twice squares it in place.
#[pyfunction]
pub(crate) fn square_array(
    ina: &Bound<'_, PyArray1<f64>>,
    outa: &Bound<'_, PyArray1<f64>>,
) -> PyResult<()> {
    if ina.as_ptr() == outa.as_ptr() {
        let mut rw = outa.try_readwrite()?;
        let values = rw.as_slice_mut()?;
        let p = values.as_mut_ptr();
        return check_status(teacup_square_array(values.len(), p.cast_const(), p));
    }
    let input = ina.try_readonly()?;
    let mut output = outa.try_readwrite()?;
    let src = input.as_slice()?;
    let dst = output.as_slice_mut()?;
    if src.len() != dst.len() {
        return Err(PyValueError::new_err(format!(
            "square_array: input has {} elements but output has {}",
            src.len(),
            dst.len()
        )));
    }
    check_status(teacup_square_array(src.len(), src.as_ptr(), dst.as_mut_ptr()))
}

/// Set the per-allocation element limit for new Tab and Matrix objects.
#[pyfunction]
pub(crate) fn set_max_elements(n: usize) -> PyResult<()> {
    check_status(teacup_set_max_elements(n))
}

/// The current per-allocation element limit.
#[pyfunction]
pub(crate) fn max_elements() -> PyResult<usize> {
    let mut out = 0usize;
    check_status(teacup_max_elements(&mut out))?;
    Ok(out)
}

/// Print teacup's allocation and release notices to stderr.
///
/// Args:
///     filter: Optional tracing filter such as "teacup_core=debug". When
///         omitted, the TEACUP_LOG environment variable is used, falling
///         back to debug output for the teacup crates.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub(crate) fn enable_logging(filter: Option<&str>) -> PyResult<()> {
    let status = match filter {
        Some(f) => {
            let c = CString::new(f)
                .map_err(|_| PyValueError::new_err("filter must not contain NUL bytes"))?;
            teacup_logging_init(c.as_ptr())
        }
        None => teacup_logging_init(std::ptr::null()),
    };
    check_status(status)
}
