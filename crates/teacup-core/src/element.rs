//! Fixed-width element types storable in teacup buffers.

use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A fixed-width numeric element.
///
/// Sealed: implemented for `i32`, `i64`, `f32`, and `f64` only, which are
/// the widths that map one-to-one onto C `int`, `int64_t`, `float`, and
/// `double` at the FFI boundary.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    /// The additive identity; every freshly allocated element holds this.
    const ZERO: Self;

    /// Widen to `f64` for accumulation.
    fn to_f64(self) -> f64;

    /// `self * self`. Integer types wrap on overflow.
    fn square(self) -> Self;
}

impl Element for i32 {
    const ZERO: Self = 0;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn square(self) -> Self {
        self.wrapping_mul(self)
    }
}

impl Element for i64 {
    const ZERO: Self = 0;

    // Values beyond 2^53 lose precision; acceptable for accumulation.
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn square(self) -> Self {
        self.wrapping_mul(self)
    }
}

impl Element for f32 {
    const ZERO: Self = 0.0;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn square(self) -> Self {
        self * self
    }
}

impl Element for f64 {
    const ZERO: Self = 0.0;

    fn to_f64(self) -> f64 {
        self
    }

    fn square(self) -> Self {
        self * self
    }
}
