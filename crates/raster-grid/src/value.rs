//! Cell value types a grid can hold.

use crate::vector::Vector;
use std::fmt::Debug;

/// A value stored in a grid cell.
///
/// Implemented by `f64` (scalar fields) and [`Vector`] (vector fields). The
/// grid engine is generic over this trait, so interpolation is statically
/// dispatched per value type.
pub trait FieldValue: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Bilinear blend of four corner values.
    ///
    /// `x` and `y` are the fractional offsets in [0, 1] from `g00`;
    /// `g10` lies one column right, `g01` one row down.
    fn interpolate(x: f64, y: f64, g00: Self, g10: Self, g01: Self, g11: Self) -> Self;

    /// The number that represents this value in range computations.
    fn range_value(&self) -> f64;

    /// False for values that must be treated as missing (NaN, infinities).
    fn is_valid(&self) -> bool;
}

impl FieldValue for f64 {
    #[inline]
    fn interpolate(x: f64, y: f64, g00: f64, g10: f64, g01: f64, g11: f64) -> f64 {
        let rx = 1.0 - x;
        let ry = 1.0 - y;
        g00 * rx * ry + g10 * x * ry + g01 * rx * y + g11 * x * y
    }

    #[inline]
    fn range_value(&self) -> f64 {
        *self
    }

    #[inline]
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl FieldValue for Vector {
    #[inline]
    fn interpolate(x: f64, y: f64, g00: Vector, g10: Vector, g01: Vector, g11: Vector) -> Vector {
        let rx = 1.0 - x;
        let ry = 1.0 - y;
        let a = rx * ry;
        let b = x * ry;
        let c = rx * y;
        let d = x * y;
        Vector::new(
            g00.u * a + g10.u * b + g01.u * c + g11.u * d,
            g00.v * a + g10.v * b + g01.v * c + g11.v * d,
        )
    }

    /// Ranges of vector fields are ranges of magnitudes.
    #[inline]
    fn range_value(&self) -> f64 {
        self.magnitude()
    }

    #[inline]
    fn is_valid(&self) -> bool {
        self.u.is_finite() && self.v.is_finite()
    }
}
