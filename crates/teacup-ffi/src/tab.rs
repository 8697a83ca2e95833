//! Flat `int` buffer FFI: init, read, write, free.

use std::sync::Mutex;

use teacup_core::FlatBuffer;

use crate::handle::HandleTable;
use crate::limits::alloc_config;
use crate::status::{reject, TeacupStatus};

static TABS: Mutex<HandleTable<FlatBuffer<i32>>> = Mutex::new(HandleTable::new());

/// Allocate a zeroed `int` buffer of `n` elements. Writes its handle to
/// `tab_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_tab_init(n: usize, tab_out: *mut u64) -> i32 {
    ffi_guard!({
        if tab_out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let Some(config) = alloc_config() else {
            return TeacupStatus::InternalError as i32;
        };
        let tab = match FlatBuffer::zeroed(n, &config) {
            Ok(t) => t,
            Err(e) => return reject("tab_init", &e),
        };
        let handle = ffi_lock!(TABS).insert(tab);
        // SAFETY: tab_out is non-null and valid per caller contract.
        unsafe { *tab_out = handle };
        TeacupStatus::Ok as i32
    })
}

/// Free a buffer. A second free of the same handle returns `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_tab_free(tab: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(TABS).remove(tab) {
            Some(t) => {
                t.release();
                TeacupStatus::Ok as i32
            }
            None => TeacupStatus::InvalidHandle as i32,
        }
    })
}

/// Write the buffer length to `len_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_tab_len(tab: u64, len_out: *mut usize) -> i32 {
    ffi_guard!({
        if len_out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let len = match ffi_lock!(TABS).get(tab) {
            Some(t) => t.len(),
            None => return TeacupStatus::InvalidHandle as i32,
        };
        // SAFETY: len_out is non-null and valid per caller contract.
        unsafe { *len_out = len };
        TeacupStatus::Ok as i32
    })
}

/// Copy the whole buffer into `buf` (capacity `cap` elements).
///
/// Returns `BufferTooSmall` without copying if `cap` is less than the
/// buffer length. `n_out`, if non-null, receives the number copied.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_tab_read(tab: u64, buf: *mut i32, cap: usize, n_out: *mut usize) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(TABS);
        let Some(t) = table.get(tab) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        copy_out(t, buf, cap, n_out)
    })
}

/// Overwrite the first `n` elements with `src`. Fails with
/// `InvalidArgument` if `n` exceeds the buffer length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_tab_write(tab: u64, src: *const i32, n: usize) -> i32 {
    ffi_guard!({
        if src.is_null() && n > 0 {
            return TeacupStatus::InvalidArgument as i32;
        }
        let values: &[i32] = if n > 0 {
            // SAFETY: caller guarantees src points to n readable i32 values.
            unsafe { std::slice::from_raw_parts(src, n) }
        } else {
            &[]
        };
        let mut table = ffi_lock!(TABS);
        let Some(t) = table.get_mut(tab) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        match t.write_prefix(values) {
            Ok(()) => TeacupStatus::Ok as i32,
            Err(e) => reject("tab_write", &e),
        }
    })
}

/// Copy `values` into a caller buffer of capacity `cap`.
#[allow(unsafe_code)]
pub(crate) fn copy_out(values: &[i32], buf: *mut i32, cap: usize, n_out: *mut usize) -> i32 {
    if values.len() > cap {
        return TeacupStatus::BufferTooSmall as i32;
    }
    if !values.is_empty() {
        if buf.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        // SAFETY: buf holds at least cap >= values.len() writable elements.
        unsafe { std::ptr::copy_nonoverlapping(values.as_ptr(), buf, values.len()) };
    }
    if !n_out.is_null() {
        // SAFETY: n_out is non-null and valid per caller contract.
        unsafe { *n_out = values.len() };
    }
    TeacupStatus::Ok as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tab(n: usize) -> u64 {
        let mut h = 0u64;
        assert_eq!(teacup_tab_init(n, &mut h), TeacupStatus::Ok as i32);
        h
    }

    #[test]
    fn init_is_zeroed() {
        let h = new_tab(5);
        let mut len = 0usize;
        assert_eq!(teacup_tab_len(h, &mut len), TeacupStatus::Ok as i32);
        assert_eq!(len, 5);

        let mut buf = [-1i32; 5];
        let mut n = 0usize;
        assert_eq!(
            teacup_tab_read(h, buf.as_mut_ptr(), buf.len(), &mut n),
            TeacupStatus::Ok as i32
        );
        assert_eq!(n, 5);
        assert_eq!(buf, [0; 5]);
        assert_eq!(teacup_tab_free(h), TeacupStatus::Ok as i32);
    }

    #[test]
    fn write_then_read() {
        let h = new_tab(4);
        let src = [3, 1, 4];
        assert_eq!(
            teacup_tab_write(h, src.as_ptr(), src.len()),
            TeacupStatus::Ok as i32
        );
        let mut buf = [0i32; 4];
        teacup_tab_read(h, buf.as_mut_ptr(), buf.len(), std::ptr::null_mut());
        assert_eq!(buf, [3, 1, 4, 0]);
        teacup_tab_free(h);
    }

    #[test]
    fn write_too_long_is_invalid_argument() {
        let h = new_tab(2);
        let src = [1, 2, 3];
        assert_eq!(
            teacup_tab_write(h, src.as_ptr(), src.len()),
            TeacupStatus::InvalidArgument as i32
        );
        teacup_tab_free(h);
    }

    #[test]
    fn read_into_small_buffer_fails() {
        let h = new_tab(3);
        let mut buf = [7i32; 2];
        assert_eq!(
            teacup_tab_read(h, buf.as_mut_ptr(), buf.len(), std::ptr::null_mut()),
            TeacupStatus::BufferTooSmall as i32
        );
        assert_eq!(buf, [7, 7]);
        teacup_tab_free(h);
    }

    #[test]
    fn double_free_is_invalid_handle() {
        let h = new_tab(1);
        assert_eq!(teacup_tab_free(h), TeacupStatus::Ok as i32);
        assert_eq!(teacup_tab_free(h), TeacupStatus::InvalidHandle as i32);
    }

    #[test]
    fn use_after_free_is_invalid_handle() {
        let h = new_tab(1);
        teacup_tab_free(h);
        let mut len = 99usize;
        assert_eq!(
            teacup_tab_len(h, &mut len),
            TeacupStatus::InvalidHandle as i32
        );
        assert_eq!(len, 99, "out must not be written on error");
        let src = [1];
        assert_eq!(
            teacup_tab_write(h, src.as_ptr(), 1),
            TeacupStatus::InvalidHandle as i32
        );
    }

    #[test]
    fn over_limit_is_allocation_failed() {
        let mut h = 0u64;
        let too_many = teacup_core::AllocConfig::DEFAULT_MAX_ELEMENTS + 1;
        assert_eq!(
            teacup_tab_init(too_many, &mut h),
            TeacupStatus::AllocationFailed as i32
        );
    }

    #[test]
    fn null_out_is_invalid_argument() {
        assert_eq!(
            teacup_tab_init(3, std::ptr::null_mut()),
            TeacupStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn empty_tab_reads_with_null_buffer() {
        let h = new_tab(0);
        let mut n = 9usize;
        assert_eq!(
            teacup_tab_read(h, std::ptr::null_mut(), 0, &mut n),
            TeacupStatus::Ok as i32
        );
        assert_eq!(n, 0);
        teacup_tab_free(h);
    }
}
