//! C FFI bindings for teacup buffers and records.
//!
//! Buffers and records live in process-wide handle tables and cross the C
//! boundary as opaque `u64` handles. Every entry point returns an `i32`
//! status ([`TeacupStatus`]) and is wrapped in `ffi_guard!` so a Rust
//! panic never unwinds into the caller. This crate is the only one in the
//! workspace that may contain `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Run an FFI body under `catch_unwind`, mapping a panic to
/// [`TeacupStatus::Panicked`] and recording its message for
/// [`teacup_last_panic_message`].
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::TeacupStatus::Panicked as i32, $body)
    };
}

/// Like `ffi_guard!`, but returns `$fallback` on panic. For entry points
/// whose return value is data rather than a status.
macro_rules! ffi_guard_or {
    ($fallback:expr, $body:block) => {{
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $fallback
            }
        }
    }};
}

/// Lock a table mutex, returning [`TeacupStatus::InternalError`] from the
/// enclosing guarded body if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::TeacupStatus::InternalError as i32,
        }
    };
}

mod data;
mod handle;
mod limits;
mod logging;
mod matrix;
mod ops;
mod status;
mod tab;

pub use data::{
    teacup_data_attach_matrix, teacup_data_free, teacup_data_has_matrix, teacup_data_init,
    teacup_data_n_rows, teacup_data_nb_elements, teacup_data_read_row, teacup_data_row_len,
    TeacupReleaseSummary,
};
pub use limits::{teacup_max_elements, teacup_set_max_elements};
pub use logging::teacup_logging_init;
pub use matrix::{
    teacup_matrix_free, teacup_matrix_init, teacup_matrix_n_rows, teacup_matrix_read_row,
    teacup_matrix_row_len, teacup_matrix_write_row,
};
pub use ops::{teacup_add, teacup_square_array, teacup_sum};
pub use status::TeacupStatus;
pub use tab::{teacup_tab_free, teacup_tab_init, teacup_tab_len, teacup_tab_read, teacup_tab_write};

thread_local! {
    /// Message of the most recent panic caught by `ffi_guard!` on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn record_panic(payload: &(dyn Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_owned()
    };
    tracing::error!(panic = %msg, "panic caught at FFI boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Copy the last caught panic message for this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator),
/// or 0 if no panic has been caught. At most `cap - 1` bytes are copied and
/// the result is always NUL-terminated when `cap > 0`. Pass a null `buf`
/// to query the length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: caller guarantees buf points to at least cap writable bytes.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        i32::try_from(bytes.len()).unwrap_or(i32::MAX)
    })
}
