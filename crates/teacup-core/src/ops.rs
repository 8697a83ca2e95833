//! Element-wise numeric operations over flat slices.
//!
//! These take plain slices so they apply equally to [`FlatBuffer`] contents,
//! jagged rows, and caller-owned memory borrowed across the FFI boundary.
//!
//! [`FlatBuffer`]: crate::FlatBuffer

use tracing::debug;

use crate::element::Element;
use crate::error::BufferError;

/// Wrapping integer addition.
pub fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Sum all elements in order, accumulating in `f64`.
pub fn sum<T: Element>(values: &[T]) -> f64 {
    let total = values.iter().fold(0.0f64, |acc, &v| acc + v.to_f64());
    debug!(n = values.len(), sum = total, "summed elements");
    total
}

/// Write `output[i] = input[i] * input[i]` for every index.
///
/// Fails with [`BufferError::LengthMismatch`] before writing anything if
/// the slices differ in length. Use [`square_in_place`] when input and
/// output are the same buffer.
pub fn square_into<T: Element>(input: &[T], output: &mut [T]) -> Result<(), BufferError> {
    if input.len() != output.len() {
        return Err(BufferError::LengthMismatch {
            expected: input.len(),
            actual: output.len(),
        });
    }
    for (out, &v) in output.iter_mut().zip(input) {
        *out = v.square();
    }
    Ok(())
}

/// Square every element of `values` in place.
pub fn square_in_place<T: Element>(values: &mut [T]) {
    for v in values.iter_mut() {
        *v = v.square();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_small_values() {
        assert_eq!(add(2, 3), 5);
        assert_eq!(add(-4, 4), 0);
    }

    #[test]
    fn add_wraps_on_overflow() {
        assert_eq!(add(i32::MAX, 1), i32::MIN);
    }

    #[test]
    fn sum_known_values() {
        assert_eq!(sum(&[1.0f64, 2.0, 3.5]), 6.5);
    }

    #[test]
    fn sum_empty_is_zero() {
        assert_eq!(sum::<f64>(&[]), 0.0);
    }

    #[test]
    fn sum_integers_widens() {
        assert_eq!(sum(&[i32::MAX, i32::MAX]), 2.0 * i32::MAX as f64);
    }

    #[test]
    fn square_into_known_values() {
        let input = [2.0f64, -3.0];
        let mut output = [0.0f64; 2];
        square_into(&input, &mut output).unwrap();
        assert_eq!(output, [4.0, 9.0]);
    }

    #[test]
    fn square_into_rejects_mismatch_without_writing() {
        let input = [1.0f64, 2.0, 3.0];
        let mut output = [-1.0f64; 2];
        assert_eq!(
            square_into(&input, &mut output),
            Err(BufferError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(output, [-1.0, -1.0]);
    }

    #[test]
    fn square_in_place_known_values() {
        let mut values = [2.0f64, -3.0, 0.5];
        square_in_place(&mut values);
        assert_eq!(values, [4.0, 9.0, 0.25]);
    }

    proptest! {
        #[test]
        fn square_into_matches_in_place(values in proptest::collection::vec(-1.0e6f64..1.0e6, 0..256)) {
            let mut out = vec![0.0; values.len()];
            square_into(&values, &mut out).unwrap();
            let mut in_place = values.clone();
            square_in_place(&mut in_place);
            prop_assert_eq!(&out, &in_place);
            for (o, v) in out.iter().zip(&values) {
                prop_assert_eq!(*o, v * v);
            }
        }

        #[test]
        fn sum_of_integers_is_exact(values in proptest::collection::vec(-1000i32..1000, 0..256)) {
            let expected: i64 = values.iter().map(|&v| i64::from(v)).sum();
            prop_assert_eq!(sum(&values), expected as f64);
        }
    }
}
