use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// Numeric capability required of `Vector` and `Matrix` elements.
///
/// `T::default()` is treated as the additive identity: sums start from it.
pub trait Element:
    Copy
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
}

impl<T> Element for T where
    T: Copy
        + Default
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + AddAssign
        + SubAssign
        + MulAssign
{
}
