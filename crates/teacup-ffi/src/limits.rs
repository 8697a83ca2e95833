//! Process-wide allocation limit shared by all allocating entry points.

use std::sync::Mutex;

use teacup_core::AllocConfig;

use crate::status::TeacupStatus;

static LIMITS: Mutex<AllocConfig> = Mutex::new(AllocConfig::new(AllocConfig::DEFAULT_MAX_ELEMENTS));

/// Snapshot the current allocation config, or `None` if the lock is poisoned.
pub(crate) fn alloc_config() -> Option<AllocConfig> {
    LIMITS.lock().ok().map(|c| c.clone())
}

/// Set the maximum number of elements a single allocation may request.
///
/// Applies to subsequent `teacup_tab_init` and `teacup_matrix_init` calls;
/// existing buffers are unaffected.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_set_max_elements(max_elements: usize) -> i32 {
    ffi_guard!({
        ffi_lock!(LIMITS).max_elements = max_elements;
        TeacupStatus::Ok as i32
    })
}

/// Read the current element limit into `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_max_elements(out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let max = ffi_lock!(LIMITS).max_elements;
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = max };
        TeacupStatus::Ok as i32
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_read_limit() {
        // Other tests allocate concurrently; stay well above their sizes.
        assert_eq!(teacup_set_max_elements(1 << 20), TeacupStatus::Ok as i32);
        let mut out = 0usize;
        assert_eq!(teacup_max_elements(&mut out), TeacupStatus::Ok as i32);
        assert_eq!(out, 1 << 20);
        assert_eq!(alloc_config().map(|c| c.max_elements), Some(1 << 20));

        teacup_set_max_elements(AllocConfig::DEFAULT_MAX_ELEMENTS);
    }

    #[test]
    fn null_out_is_invalid_argument() {
        assert_eq!(
            teacup_max_elements(std::ptr::null_mut()),
            TeacupStatus::InvalidArgument as i32
        );
    }
}
