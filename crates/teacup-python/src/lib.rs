//! Python bindings for the teacup buffer utility.
//!
//! This crate provides PyO3 bindings wrapping the C FFI layer
//! (`teacup-ffi`). The native extension is named `_teacup`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use pyo3::prelude::*;

mod data;
mod error;
mod matrix;
mod ops;
mod tab;

/// The native `_teacup` extension module.
#[pymodule]
fn _teacup(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Buffers and records
    m.add_class::<tab::Tab>()?;
    m.add_class::<matrix::Matrix>()?;
    m.add_class::<data::Data>()?;

    // Functions
    m.add_function(wrap_pyfunction!(ops::add, m)?)?;
    m.add_function(wrap_pyfunction!(ops::sum, m)?)?;
    m.add_function(wrap_pyfunction!(ops::square_array, m)?)?;
    m.add_function(wrap_pyfunction!(ops::set_max_elements, m)?)?;
    m.add_function(wrap_pyfunction!(ops::max_elements, m)?)?;
    m.add_function(wrap_pyfunction!(ops::enable_logging, m)?)?;

    Ok(())
}
