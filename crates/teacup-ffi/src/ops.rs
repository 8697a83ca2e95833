//! Stateless numeric entry points over caller-owned arrays.

use teacup_core::ops;

use crate::status::TeacupStatus;

/// Wrapping `a + b`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_add(a: i32, b: i32) -> i32 {
    ffi_guard_or!(0, { ops::add(a, b) })
}

/// Sum `n` doubles from `tab` into `*out`.
///
/// `tab` may be null only when `n == 0`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_sum(n: usize, tab: *const f64, out: *mut f64) -> i32 {
    ffi_guard!({
        if out.is_null() || (tab.is_null() && n > 0) {
            return TeacupStatus::InvalidArgument as i32;
        }
        let values: &[f64] = if n > 0 {
            // SAFETY: caller guarantees tab points to n readable f64 values.
            unsafe { std::slice::from_raw_parts(tab, n) }
        } else {
            &[]
        };
        let total = ops::sum(values);
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = total };
        TeacupStatus::Ok as i32
    })
}

/// Write `outa[i] = ina[i] * ina[i]` for `i` in `0..n`.
///
/// `ina` and `outa` may be the same array; each element is read once before
/// it is written. Partially overlapping (offset) arrays are rejected.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_square_array(n: usize, ina: *const f64, outa: *mut f64) -> i32 {
    ffi_guard!({
        if n == 0 {
            return TeacupStatus::Ok as i32;
        }
        if ina.is_null() || outa.is_null() {
            return TeacupStatus::InvalidArgument as i32;
        }
        if std::ptr::eq(ina, outa.cast_const()) {
            // SAFETY: caller guarantees outa points to n writable f64 values,
            // and no other reference to them exists for the call's duration.
            let values = unsafe { std::slice::from_raw_parts_mut(outa, n) };
            ops::square_in_place(values);
            return TeacupStatus::Ok as i32;
        }
        let (in_start, out_start) = (ina as usize, outa as usize);
        let span = n.saturating_mul(std::mem::size_of::<f64>());
        if in_start < out_start.saturating_add(span) && out_start < in_start.saturating_add(span) {
            return TeacupStatus::InvalidArgument as i32;
        }
        // SAFETY: both ranges are valid per caller contract and were just
        // checked to be disjoint.
        let (input, output) = unsafe {
            (
                std::slice::from_raw_parts(ina, n),
                std::slice::from_raw_parts_mut(outa, n),
            )
        };
        match ops::square_into(input, output) {
            Ok(()) => TeacupStatus::Ok as i32,
            Err(e) => crate::status::reject("square_array", &e),
        }
    })
}
