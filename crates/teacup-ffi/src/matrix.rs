//! Jagged `int` matrix FFI: rows of independently sized buffers.
//!
//! A matrix handle is consumed either by `teacup_matrix_free` or by
//! `teacup_data_attach_matrix`, which moves the matrix into a record.

use std::sync::Mutex;

use teacup_core::JaggedBuffer;

use crate::handle::HandleTable;
use crate::limits::alloc_config;
use crate::status::{reject, TeacupStatus};
use crate::tab::copy_out;

static MATRICES: Mutex<HandleTable<JaggedBuffer<i32>>> = Mutex::new(HandleTable::new());

pub(crate) fn matrices() -> &'static Mutex<HandleTable<JaggedBuffer<i32>>> {
    &MATRICES
}

/// Allocate an `n`-row zeroed matrix where row `i` has `m[i]` elements.
///
/// `m` points to `m_len` row lengths; `m_len` must equal `n`, otherwise
/// `InvalidArgument` is returned before any allocation.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_matrix_init(
    n: usize,
    m: *const usize,
    m_len: usize,
    matrix_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if matrix_out.is_null() || (m.is_null() && m_len > 0) {
            return TeacupStatus::InvalidArgument as i32;
        }
        let row_lengths: &[usize] = if m_len > 0 {
            // SAFETY: caller guarantees m points to m_len readable values.
            unsafe { std::slice::from_raw_parts(m, m_len) }
        } else {
            &[]
        };
        let Some(config) = alloc_config() else {
            return TeacupStatus::InternalError as i32;
        };
        let matrix = match JaggedBuffer::zeroed(n, row_lengths, &config) {
            Ok(mx) => mx,
            Err(e) => return reject("matrix_init", &e),
        };
        let handle = ffi_lock!(MATRICES).insert(matrix);
        // SAFETY: matrix_out is non-null and valid per caller contract.
        unsafe { *matrix_out = handle };
        TeacupStatus::Ok as i32
    })
}

/// Free every row of a matrix, then the matrix.
///
/// `n` must equal the matrix's row count; on mismatch `InvalidArgument` is
/// returned and the handle stays valid. `n_el` is accepted for signature
/// compatibility and ignored.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_matrix_free(n: usize, _n_el: *const usize, matrix: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(MATRICES);
        match table.get(matrix) {
            Some(mx) => {
                if let Err(e) = mx.check_row_count(n) {
                    return reject("matrix_free", &e);
                }
            }
            None => return TeacupStatus::InvalidHandle as i32,
        }
        match table.remove(matrix) {
            Some(mx) => {
                mx.release();
                TeacupStatus::Ok as i32
            }
            None => TeacupStatus::InvalidHandle as i32,
        }
    })
}

/// Write the number of rows to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_matrix_n_rows(matrix: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let rows = match ffi_lock!(MATRICES).get(matrix) {
            Some(mx) => mx.n_rows(),
            None => return TeacupStatus::InvalidHandle as i32,
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = rows };
        TeacupStatus::Ok as i32
    })
}

/// Write the length of row `row` to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_matrix_row_len(matrix: u64, row: usize, out: *mut usize) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(MATRICES);
        let Some(mx) = table.get(matrix) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        row_len(mx, row, out)
    })
}

/// Copy row `row` into `buf` (capacity `cap`). `n_out`, if non-null,
/// receives the number of elements copied.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_matrix_read_row(
    matrix: u64,
    row: usize,
    buf: *mut i32,
    cap: usize,
    n_out: *mut usize,
) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(MATRICES);
        let Some(mx) = table.get(matrix) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        read_row(mx, row, buf, cap, n_out)
    })
}

/// Overwrite the first `n` elements of row `row` with `src`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_matrix_write_row(
    matrix: u64,
    row: usize,
    src: *const i32,
    n: usize,
) -> i32 {
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
        let mut table = ffi_lock!(MATRICES);
        let Some(mx) = table.get_mut(matrix) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        let Some(r) = mx.row_mut(row) else {
            return TeacupStatus::InvalidArgument as i32;
        };
        match r.write_prefix(values) {
            Ok(()) => TeacupStatus::Ok as i32,
            Err(e) => reject("matrix_write_row", &e),
        }
    })
}

#[allow(unsafe_code)]
pub(crate) fn row_len(mx: &JaggedBuffer<i32>, row: usize, out: *mut usize) -> i32 {
    if out.is_null() {
        return TeacupStatus::InvalidArgument as i32;
    }
    let Some(r) = mx.row(row) else {
        return TeacupStatus::InvalidArgument as i32;
    };
    // SAFETY: out is non-null and valid per caller contract.
    unsafe { *out = r.len() };
    TeacupStatus::Ok as i32
}

pub(crate) fn read_row(
    mx: &JaggedBuffer<i32>,
    row: usize,
    buf: *mut i32,
    cap: usize,
    n_out: *mut usize,
) -> i32 {
    match mx.row(row) {
        Some(r) => copy_out(r, buf, cap, n_out),
        None => TeacupStatus::InvalidArgument as i32,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn new_matrix(lens: &[usize]) -> u64 {
        let mut h = 0u64;
        assert_eq!(
            teacup_matrix_init(lens.len(), lens.as_ptr(), lens.len(), &mut h),
            TeacupStatus::Ok as i32
        );
        h
    }

    fn read(h: u64, row: usize) -> Vec<i32> {
        let mut len = 0usize;
        assert_eq!(teacup_matrix_row_len(h, row, &mut len), TeacupStatus::Ok as i32);
        let mut buf = vec![-1i32; len];
        let mut n = 0usize;
        assert_eq!(
            teacup_matrix_read_row(h, row, buf.as_mut_ptr(), buf.len(), &mut n),
            TeacupStatus::Ok as i32
        );
        assert_eq!(n, len);
        buf
    }

    #[test]
    fn rows_are_zeroed_with_requested_lengths() {
        let h = new_matrix(&[2, 0, 3]);
        let mut rows = 0usize;
        assert_eq!(teacup_matrix_n_rows(h, &mut rows), TeacupStatus::Ok as i32);
        assert_eq!(rows, 3);
        assert_eq!(read(h, 0), vec![0, 0]);
        assert_eq!(read(h, 1), Vec::<i32>::new());
        assert_eq!(read(h, 2), vec![0, 0, 0]);
        assert_eq!(
            teacup_matrix_free(3, std::ptr::null(), h),
            TeacupStatus::Ok as i32
        );
    }

    #[test]
    fn three_rows_two_lengths_is_invalid_argument() {
        let lens = [4usize, 4];
        let mut h = 0xdead_u64;
        assert_eq!(
            teacup_matrix_init(3, lens.as_ptr(), lens.len(), &mut h),
            TeacupStatus::InvalidArgument as i32
        );
        assert_eq!(h, 0xdead, "out must not be written on error");
    }

    #[test]
    fn write_row_then_read_back() {
        let h = new_matrix(&[1, 4]);
        let src = [9, 8];
        assert_eq!(
            teacup_matrix_write_row(h, 1, src.as_ptr(), src.len()),
            TeacupStatus::Ok as i32
        );
        assert_eq!(read(h, 1), vec![9, 8, 0, 0]);
        assert_eq!(read(h, 0), vec![0]);
        teacup_matrix_free(2, std::ptr::null(), h);
    }

    #[test]
    fn row_out_of_range_is_invalid_argument() {
        let h = new_matrix(&[1]);
        let mut len = 0usize;
        assert_eq!(
            teacup_matrix_row_len(h, 1, &mut len),
            TeacupStatus::InvalidArgument as i32
        );
        let src = [1];
        assert_eq!(
            teacup_matrix_write_row(h, 5, src.as_ptr(), 1),
            TeacupStatus::InvalidArgument as i32
        );
        teacup_matrix_free(1, std::ptr::null(), h);
    }

    #[test]
    fn free_with_wrong_row_count_keeps_handle_valid() {
        let lens = [1usize, 2];
        let h = new_matrix(&lens);
        assert_eq!(
            teacup_matrix_free(3, lens.as_ptr(), h),
            TeacupStatus::InvalidArgument as i32
        );
        let mut rows = 0usize;
        assert_eq!(teacup_matrix_n_rows(h, &mut rows), TeacupStatus::Ok as i32);
        assert_eq!(rows, 2);
        assert_eq!(
            teacup_matrix_free(2, lens.as_ptr(), h),
            TeacupStatus::Ok as i32
        );
    }

    #[test]
    fn double_free_is_invalid_handle() {
        let h = new_matrix(&[2]);
        assert_eq!(
            teacup_matrix_free(1, std::ptr::null(), h),
            TeacupStatus::Ok as i32
        );
        assert_eq!(
            teacup_matrix_free(1, std::ptr::null(), h),
            TeacupStatus::InvalidHandle as i32
        );
    }

    #[test]
    fn empty_matrix_accepts_null_lengths() {
        let mut h = 0u64;
        assert_eq!(
            teacup_matrix_init(0, std::ptr::null(), 0, &mut h),
            TeacupStatus::Ok as i32
        );
        assert_eq!(
            teacup_matrix_free(0, std::ptr::null(), h),
            TeacupStatus::Ok as i32
        );
    }
}
