//! TeacupStatus -> Python exception mapping with recovery hints.

use pyo3::exceptions::{PyMemoryError, PyRuntimeError, PyValueError};
use pyo3::PyResult;

use teacup_ffi::TeacupStatus;

/// Check an FFI status code. Returns `Ok(())` on success, raises a typed
/// Python exception with a recovery hint on error.
pub(crate) fn check_status(code: i32) -> PyResult<()> {
    if code == TeacupStatus::Ok as i32 {
        return Ok(());
    }
    let (msg, hint) = error_detail(code);
    let full = format!("teacup error {code}: {msg}\n  Hint: {hint}");
    match code {
        // Caller's fault: bad lengths, nulls, short output buffers.
        c if c == TeacupStatus::InvalidArgument as i32
            || c == TeacupStatus::BufferTooSmall as i32 =>
        {
            Err(PyValueError::new_err(full))
        }
        c if c == TeacupStatus::AllocationFailed as i32 => Err(PyMemoryError::new_err(full)),
        _ => Err(PyRuntimeError::new_err(full)),
    }
}

/// Returns `(message, recovery_hint)` for each FFI status code.
fn error_detail(code: i32) -> (&'static str, &'static str) {
    match code {
        -1 => (
            "invalid handle (already freed?)",
            "The Tab, Matrix, or Data object was freed, or a Matrix was \
             attached to a Data record (which takes ownership of it). \
             Don't use an object after .free() or outside its `with` block.",
        ),
        -2 => (
            "invalid argument",
            "Lengths must agree: a Matrix needs exactly one row length per \
             row, free() must be given the true row count, and written \
             values must fit in the target buffer or row.",
        ),
        -3 => (
            "allocation failed (out of memory or over the element limit)",
            "Request fewer elements, or raise the per-allocation limit with \
             set_max_elements(). The limit applies to the sum of all row \
             lengths for a Matrix.",
        ),
        -4 => (
            "operation not permitted in the current state",
            "A Data record can own at most one matrix. Row access on a Data \
             record requires an attached matrix. enable_logging() can only \
             install a logger once per process.",
        ),
        -5 => (
            "caller-provided buffer too small",
            "The NumPy array passed as output is shorter than the buffer \
             being read. Allocate it with len(tab) elements.",
        ),
        -6 => (
            "internal error",
            "An internal lock was poisoned by an earlier panic. Restart the \
             interpreter; handles created before the panic may be unusable.",
        ),
        -128 => (
            "panic in native code",
            "A Rust panic was caught at the FFI boundary. This is a bug in \
             teacup; please report it with the failing call.",
        ),
        _ => (
            "unknown teacup error",
            "An unrecognized status code was returned from the FFI layer. \
             This may indicate a version mismatch between the Python \
             bindings and the native library.",
        ),
    }
}
