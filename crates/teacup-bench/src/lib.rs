//! Benchmark fixtures for teacup buffers.
//!
//! - [`ramp`]: deterministic f64 input of a given length
//! - [`triangle_row_lengths`]: row lengths 0, 1, 2, ... for jagged buffers

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use teacup_core::{AllocConfig, FlatBuffer};

/// A flat f64 buffer holding `0.0, 0.5, 1.0, ...`.
pub fn ramp(len: usize) -> FlatBuffer<f64> {
    let mut buf = FlatBuffer::zeroed(len, &AllocConfig::default())
        .unwrap_or_else(|e| panic!("ramp({len}): {e}"));
    for (i, v) in buf.iter_mut().enumerate() {
        *v = i as f64 * 0.5;
    }
    buf
}

/// Row lengths `0..rows`, giving `rows * (rows - 1) / 2` elements in total.
pub fn triangle_row_lengths(rows: usize) -> Vec<usize> {
    (0..rows).collect()
}
