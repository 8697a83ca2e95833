//! Data record FFI: an element count plus an optionally attached matrix.
//!
//! Lock order is `DATA` before `MATRICES`; only `teacup_data_attach_matrix`
//! holds both.

use std::sync::Mutex;

use teacup_core::{DataRecord, ReleaseSummary};

use crate::handle::HandleTable;
use crate::matrix::{matrices, read_row, row_len};
use crate::status::{reject, TeacupStatus};

static DATA: Mutex<HandleTable<DataRecord>> = Mutex::new(HandleTable::new());

/// What `teacup_data_free` released.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeacupReleaseSummary {
    /// Matrix rows released (0 if no matrix was attached).
    pub rows: u64,
    /// Matrix elements released across all rows.
    pub elements: u64,
}

const _: () = assert!(std::mem::size_of::<TeacupReleaseSummary>() == 16);

impl From<ReleaseSummary> for TeacupReleaseSummary {
    fn from(s: ReleaseSummary) -> Self {
        Self {
            rows: s.rows as u64,
            elements: s.elements as u64,
        }
    }
}

/// Create a record holding `el` elements and no matrix.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_init(el: i32, data_out: *mut u64) -> i32 {
    ffi_guard!({
        if data_out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let handle = ffi_lock!(DATA).insert(DataRecord::new(el));
        // SAFETY: data_out is non-null and valid per caller contract.
        unsafe { *data_out = handle };
        TeacupStatus::Ok as i32
    })
}

/// Free a record, and its matrix iff one is attached.
///
/// `summary_out` may be null; otherwise it receives what was released.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_free(data: u64, summary_out: *mut TeacupReleaseSummary) -> i32 {
    ffi_guard!({
        let Some(record) = ffi_lock!(DATA).remove(data) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        let summary = TeacupReleaseSummary::from(record.release());
        if !summary_out.is_null() {
            // SAFETY: summary_out is non-null and valid per caller contract.
            unsafe { *summary_out = summary };
        }
        TeacupStatus::Ok as i32
    })
}

/// Write the record's element count to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_nb_elements(data: u64, out: *mut i32) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let count = match ffi_lock!(DATA).get(data) {
            Some(r) => r.nb_elements(),
            None => return TeacupStatus::InvalidHandle as i32,
        };
        let Some(count) = count else {
            return TeacupStatus::InvalidState as i32;
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = count };
        TeacupStatus::Ok as i32
    })
}

/// Write 1 to `out` if a matrix is attached, 0 otherwise.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_has_matrix(data: u64, out: *mut u8) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let present = match ffi_lock!(DATA).get(data) {
            Some(r) => r.has_matrix(),
            None => return TeacupStatus::InvalidHandle as i32,
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = u8::from(present) };
        TeacupStatus::Ok as i32
    })
}

/// Write the attached matrix's row count to `out` (0 when absent).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_n_rows(data: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        let rows = match ffi_lock!(DATA).get(data) {
            Some(r) => r.n_rows(),
            None => return TeacupStatus::InvalidHandle as i32,
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = rows };
        TeacupStatus::Ok as i32
    })
}

/// Move the matrix behind `matrix` into the record. Consumes the matrix
/// handle on success.
///
/// Returns `InvalidState` if the record already owns a matrix; the matrix
/// handle is left untouched in that case.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_attach_matrix(data: u64, matrix: u64) -> i32 {
    ffi_guard!({
        let mut records = ffi_lock!(DATA);
        let Some(record) = records.get_mut(data) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        if record.has_matrix() {
            return TeacupStatus::InvalidState as i32;
        }
        let Some(mx) = ffi_lock!(matrices()).remove(matrix) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        match record.attach_matrix(mx) {
            Ok(()) => TeacupStatus::Ok as i32,
            Err(e) => reject("data_attach_matrix", &e),
        }
    })
}

/// Write the length of row `row` of the attached matrix to `out`.
///
/// Returns `InvalidState` if no matrix is attached.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_row_len(data: u64, row: usize, out: *mut usize) -> i32 {
    ffi_guard!({
        let records = ffi_lock!(DATA);
        let Some(record) = records.get(data) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        match record.matrix() {
            Some(mx) => row_len(mx, row, out),
            None => TeacupStatus::InvalidState as i32,
        }
    })
}

/// Copy row `row` of the attached matrix into `buf` (capacity `cap`).
///
/// Returns `InvalidState` if no matrix is attached.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_data_read_row(
    data: u64,
    row: usize,
    buf: *mut i32,
    cap: usize,
    n_out: *mut usize,
) -> i32 {
    ffi_guard!({
        let records = ffi_lock!(DATA);
        let Some(record) = records.get(data) else {
            return TeacupStatus::InvalidHandle as i32;
        };
        match record.matrix() {
            Some(mx) => read_row(mx, row, buf, cap, n_out),
            None => TeacupStatus::InvalidState as i32,
        }
    })
}
