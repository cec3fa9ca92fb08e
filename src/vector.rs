use anyhow::Result;
use log::warn;
use num_traits::Float;
use std::{
    fmt,
    io::{self, Write},
    ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Mul, MulAssign, Sub, SubAssign},
};

use crate::{
    contract::{check_len, precondition},
    Element, FormatElement,
};

/// A dense, owned sequence of `T`.
///
/// The size is the length of the backing storage, so the two can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<T> Vector<T> {
    pub fn new(data: impl Into<Vec<T>>) -> Self {
        Self { data: data.into() }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Writes `Vector(<size>) : [e0, e1, ...]` and a newline to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()>
    where
        T: FormatElement,
    {
        writeln!(out, "{self}")
    }

    /// [`Vector::write_to`] on stdout.
    pub fn print(&self)
    where
        T: FormatElement,
    {
        if let Err(e) = self.write_to(&mut io::stdout().lock()) {
            warn!("print failed: {e}");
        }
    }
}

impl<T: Clone> Vector<T> {
    /// `size` default-valued elements. Requires `size > 0`.
    pub fn with_size(size: usize) -> Self
    where
        T: Default,
    {
        Self::filled(size, T::default())
    }

    /// `size` copies of `value`. Requires `size > 0`.
    pub fn filled(size: usize, value: T) -> Self {
        precondition!(size > 0, "Vector size must be > 0");
        Self {
            data: vec![value; size],
        }
    }
}

impl<T: Element> Vector<T> {
    pub fn add_in_place(&mut self, other: &Self) -> &mut Self {
        precondition!(
            self.size() == other.size(),
            "Vector sizes must match: {} != {}",
            self.size(),
            other.size()
        );
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        self
    }

    pub fn sub_in_place(&mut self, other: &Self) -> &mut Self {
        precondition!(
            self.size() == other.size(),
            "Vector sizes must match: {} != {}",
            self.size(),
            other.size()
        );
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
        self
    }

    pub fn scale_in_place(&mut self, scalar: T) -> &mut Self {
        for a in self.data.iter_mut() {
            *a *= scalar;
        }
        self
    }

    pub fn plus(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn minus(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul_elementwise(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn scale(&self, scalar: T) -> Self {
        self.map(|a| a * scalar)
    }

    /// Broadcasts `scalar` over every element.
    pub fn add_scalar(&self, scalar: T) -> Self {
        self.map(|a| a + scalar)
    }

    /// Inner product, summed from `T::default()` in index order.
    ///
    /// The order is fixed so floating point results are reproducible.
    pub fn dot(&self, other: &Self) -> T {
        precondition!(
            self.size() == other.size(),
            "Vector sizes must match: {} != {}",
            self.size(),
            other.size()
        );
        self.data
            .iter()
            .zip(&other.data)
            .fold(T::default(), |acc, (&a, &b)| acc + a * b)
    }

    pub fn try_plus(&self, other: &Self) -> Result<Self> {
        check_len("plus", self.size(), other.size())?;
        Ok(self.plus(other))
    }

    pub fn try_minus(&self, other: &Self) -> Result<Self> {
        check_len("minus", self.size(), other.size())?;
        Ok(self.minus(other))
    }

    pub fn try_mul_elementwise(&self, other: &Self) -> Result<Self> {
        check_len("mul_elementwise", self.size(), other.size())?;
        Ok(self.mul_elementwise(other))
    }

    pub fn try_dot(&self, other: &Self) -> Result<T> {
        check_len("dot", self.size(), other.size())?;
        Ok(self.dot(other))
    }

    fn map(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            data: self.data.iter().map(|&a| f(a)).collect(),
        }
    }

    fn zip_with(&self, other: &Self, f: impl Fn(T, T) -> T) -> Self {
        precondition!(
            self.size() == other.size(),
            "Vector sizes must match: {} != {}",
            self.size(),
            other.size()
        );
        Self {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

impl<T: Element + Float> Vector<T> {
    /// Euclidean norm, `sqrt(self.dot(self))`.
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }
}

/// Checked dot product: a size mismatch is an error instead of a panic.
pub fn dot_product<T: Element>(a: &Vector<T>, b: &Vector<T>) -> Result<T> {
    a.try_dot(b)
}

impl<T: FormatElement> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector({}) : [", self.data.len())?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            x.fmt_element(f)?;
        }
        f.write_str("]")
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        precondition!(
            index < self.data.len(),
            "index {index} out of range for Vector of size {}",
            self.data.len()
        );
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        precondition!(
            index < self.data.len(),
            "index {index} out of range for Vector of size {}",
            self.data.len()
        );
        &mut self.data[index]
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: Element> AddAssign<&Vector<T>> for Vector<T> {
    fn add_assign(&mut self, rhs: &Vector<T>) {
        self.add_in_place(rhs);
    }
}

impl<T: Element> SubAssign<&Vector<T>> for Vector<T> {
    fn sub_assign(&mut self, rhs: &Vector<T>) {
        self.sub_in_place(rhs);
    }
}

impl<T: Element> MulAssign<T> for Vector<T> {
    fn mul_assign(&mut self, rhs: T) {
        self.scale_in_place(rhs);
    }
}

impl<T: Element> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Self) -> Vector<T> {
        self.plus(rhs)
    }
}

impl<T: Element> Add for Vector<T> {
    type Output = Vector<T>;

    fn add(mut self, rhs: Self) -> Vector<T> {
        self.add_in_place(&rhs);
        self
    }
}

impl<T: Element> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Self) -> Vector<T> {
        self.minus(rhs)
    }
}

impl<T: Element> Sub for Vector<T> {
    type Output = Vector<T>;

    fn sub(mut self, rhs: Self) -> Vector<T> {
        self.sub_in_place(&rhs);
        self
    }
}

// scalar operators need a concrete element type, named methods cover the rest
macro_rules! vector_scalar_ops {
    ($($t:ty),*) => {$(
        impl Mul<$t> for &Vector<$t> {
            type Output = Vector<$t>;

            fn mul(self, rhs: $t) -> Vector<$t> {
                self.scale(rhs)
            }
        }

        impl Mul<$t> for Vector<$t> {
            type Output = Vector<$t>;

            fn mul(mut self, rhs: $t) -> Vector<$t> {
                self.scale_in_place(rhs);
                self
            }
        }

        impl Add<$t> for &Vector<$t> {
            type Output = Vector<$t>;

            fn add(self, rhs: $t) -> Vector<$t> {
                self.add_scalar(rhs)
            }
        }

        impl Add<$t> for Vector<$t> {
            type Output = Vector<$t>;

            fn add(self, rhs: $t) -> Vector<$t> {
                self.add_scalar(rhs)
            }
        }
    )*};
}

vector_scalar_ops!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
