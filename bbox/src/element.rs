use crate::common::*;

/// Scalar type of box coordinates.
pub trait Element: Float + FloatConst + Debug {
    /// Converts a floating point literal into the element type.
    fn lit(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }
}

impl<T> Element for T where T: Float + FloatConst + Debug {}

/// Floor modulo. The result has the sign of `modulus`.
pub fn floor_mod<T>(value: T, modulus: T) -> T
where
    T: Element,
{
    value - modulus * (value / modulus).floor()
}
