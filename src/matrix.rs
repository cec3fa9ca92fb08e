use anyhow::{bail, Result};
use log::{debug, trace, warn};
use std::{
    fmt,
    io::{self, Write},
    ops::{Add, Index, IndexMut, Mul, Sub},
};

use crate::{
    contract::{check_len, check_shape, precondition},
    Element, FormatElement, Vector,
};

/// A dense matrix stored as `rows` row vectors of length `cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<Vector<T>>,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }
}

impl<T> Matrix<T> {
    /// Builds a matrix from flat row-major `data`.
    ///
    /// Requires `rows > 0`, `cols > 0` and `data.len() == rows * cols`.
    pub fn new(data: impl Into<Vec<T>>, rows: usize, cols: usize) -> Self {
        let data = data.into();
        precondition!(
            rows > 0 && cols > 0,
            "Matrix dimensions must be > 0, got {rows}x{cols}"
        );
        precondition!(
            data.len() == rows * cols,
            "Matrix data length {} does not match {rows}x{cols}",
            data.len()
        );
        let mut elems = data.into_iter();
        let data: Vec<Vector<T>> = (0..rows)
            .map(|_| elems.by_ref().take(cols).collect())
            .collect();
        Self { rows, cols, data }
    }

    /// Takes ownership of row-major `rows`; `cols` is the length of the first row.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all share the first row's length. An empty
    /// outer or first row is a precondition violation.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        precondition!(!rows.is_empty(), "Matrix needs at least one row");
        precondition!(cols > 0, "Matrix needs at least one column");
        if let Some(pos) = rows.iter().position(|row| row.len() != cols) {
            panic!(
                "ragged rows: row {pos} has length {}, expected {cols}",
                rows[pos].len()
            );
        }
        trace!("from_rows: {}x{cols}", rows.len());
        Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().map(Vector::from).collect(),
        }
    }

    /// Checked [`Matrix::from_rows`].
    pub fn try_from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let Some(first) = rows.first() else {
            bail!("from_rows: no rows");
        };
        let cols = first.len();
        if cols == 0 {
            bail!("from_rows: first row is empty");
        }
        if let Some(pos) = rows.iter().position(|row| row.len() != cols) {
            debug!("from_rows rejected: row {pos} is ragged");
            bail!(
                "from_rows: row {pos} has length {}, expected {cols}",
                rows[pos].len()
            );
        }
        Ok(Self::from_rows(rows))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn iter_rows(&self) -> std::slice::Iter<'_, Vector<T>> {
        self.data.iter()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.data.get(row)?.get(col)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.data.get_mut(row)?.get_mut(col)
    }

    // a row replaced through `IndexMut` can break the shape
    fn check_row_lengths(&self) {
        precondition!(
            self.data.iter().all(|row| row.size() == self.cols),
            "every Matrix row must have {} elements",
            self.cols
        );
    }

    /// Writes every row as its own `Vector(..)` line.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()>
    where
        T: FormatElement,
    {
        for row in &self.data {
            row.write_to(out)?;
        }
        Ok(())
    }

    /// [`Matrix::write_to`] on stdout, so the bytes match each row's `Vector::print`.
    pub fn print(&self)
    where
        T: FormatElement,
    {
        if let Err(e) = self.write_to(&mut io::stdout().lock()) {
            warn!("print failed: {e}");
        }
    }
}

impl<T: Clone> Matrix<T> {
    pub fn with_size(rows: usize, cols: usize) -> Self
    where
        T: Default,
    {
        Self::filled(rows, cols, T::default())
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        precondition!(
            rows > 0 && cols > 0,
            "Matrix dimensions must be > 0, got {rows}x{cols}"
        );
        Self {
            rows,
            cols,
            data: vec![Vector::filled(cols, value); rows],
        }
    }

    pub fn transpose(&self) -> Self {
        self.check_row_lengths();
        trace!("transpose: {}x{}", self.rows, self.cols);
        let data: Vec<Vector<T>> = (0..self.cols)
            .map(|j| {
                self.data
                    .iter()
                    .map(|row| row[j].clone())
                    .collect::<Vector<T>>()
            })
            .collect();
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

impl<T: Element> Matrix<T> {
    /// Naive product, `result[i][j] = sum_k self[i][k] * other[k][j]`.
    ///
    /// Loops run i, j, k with each sum starting from `T::default()`.
    pub fn matmul(&self, other: &Self) -> Self {
        precondition!(
            self.cols == other.rows,
            "inner dimensions must match: {}x{} * {}x{}",
            self.rows,
            self.cols,
            other.rows,
            other.cols
        );
        self.check_row_lengths();
        other.check_row_lengths();
        trace!(
            "matmul: {}x{} * {}x{}",
            self.rows,
            self.cols,
            other.rows,
            other.cols
        );
        let mut data = Vec::with_capacity(self.rows);
        for i in 0..self.rows {
            let mut row = Vec::with_capacity(other.cols);
            for j in 0..other.cols {
                let mut acc = T::default();
                for k in 0..self.cols {
                    acc += self.data[i][k] * other.data[k][j];
                }
                row.push(acc);
            }
            data.push(Vector::from(row));
        }
        Self {
            rows: self.rows,
            cols: other.cols,
            data,
        }
    }

    /// Element `i` of the result is `self[i].dot(rhs)`.
    pub fn mul_vector(&self, rhs: &Vector<T>) -> Vector<T> {
        precondition!(
            self.cols == rhs.size(),
            "Matrix cols {} must match Vector size {}",
            self.cols,
            rhs.size()
        );
        self.data.iter().map(|row| row.dot(rhs)).collect()
    }

    pub fn scale(&self, scalar: T) -> Self {
        self.map_rows(|row| row.scale(scalar))
    }

    pub fn add_scalar(&self, scalar: T) -> Self {
        self.map_rows(|row| row.add_scalar(scalar))
    }

    pub fn plus(&self, other: &Self) -> Self {
        self.zip_rows(other, Vector::plus)
    }

    pub fn minus(&self, other: &Self) -> Self {
        self.zip_rows(other, Vector::minus)
    }

    pub fn mul_elementwise(&self, other: &Self) -> Self {
        self.zip_rows(other, Vector::mul_elementwise)
    }

    pub fn try_matmul(&self, other: &Self) -> Result<Self> {
        check_len("matmul", self.cols, other.rows)?;
        Ok(self.matmul(other))
    }

    pub fn try_mul_vector(&self, rhs: &Vector<T>) -> Result<Vector<T>> {
        check_len("mul_vector", self.cols, rhs.size())?;
        Ok(self.mul_vector(rhs))
    }

    pub fn try_plus(&self, other: &Self) -> Result<Self> {
        check_shape("plus", self.shape(), other.shape())?;
        Ok(self.plus(other))
    }

    pub fn try_minus(&self, other: &Self) -> Result<Self> {
        check_shape("minus", self.shape(), other.shape())?;
        Ok(self.minus(other))
    }

    pub fn try_mul_elementwise(&self, other: &Self) -> Result<Self> {
        check_shape("mul_elementwise", self.shape(), other.shape())?;
        Ok(self.mul_elementwise(other))
    }

    fn map_rows(&self, f: impl Fn(&Vector<T>) -> Vector<T>) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    fn zip_rows(&self, other: &Self, f: impl Fn(&Vector<T>, &Vector<T>) -> Vector<T>) -> Self {
        precondition!(
            self.shape() == other.shape(),
            "Matrix shapes must match: {}x{} != {}x{}",
            self.rows,
            self.cols,
            other.rows,
            other.cols
        );
        self.check_row_lengths();
        other.check_row_lengths();
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(a, b))
                .collect(),
        }
    }
}

/// Checked matrix product: an inner dimension mismatch is an error instead of a panic.
pub fn multiply<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    a.try_matmul(b)
}

impl<T: FormatElement> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

impl<T> From<Vec<Vec<T>>> for Matrix<T> {
    fn from(rows: Vec<Vec<T>>) -> Self {
        Self::from_rows(rows)
    }
}

impl<T: Clone> From<&[Vec<T>]> for Matrix<T> {
    fn from(rows: &[Vec<T>]) -> Self {
        Self::from_rows(rows.to_vec())
    }
}

impl<T> Index<usize> for Matrix<T> {
    type Output = Vector<T>;

    fn index(&self, row: usize) -> &Vector<T> {
        precondition!(
            row < self.rows,
            "row {row} out of range for Matrix with {} rows",
            self.rows
        );
        &self.data[row]
    }
}

impl<T> IndexMut<usize> for Matrix<T> {
    fn index_mut(&mut self, row: usize) -> &mut Vector<T> {
        precondition!(
            row < self.rows,
            "row {row} out of range for Matrix with {} rows",
            self.rows
        );
        &mut self.data[row]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        precondition!(
            row < self.rows && col < self.cols,
            "({row}, {col}) out of range for {}x{} Matrix",
            self.rows,
            self.cols
        );
        &self.data[row][col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        precondition!(
            row < self.rows && col < self.cols,
            "({row}, {col}) out of range for {}x{} Matrix",
            self.rows,
            self.cols
        );
        &mut self.data[row][col]
    }
}

impl<T: Element> Mul for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Self) -> Matrix<T> {
        self.matmul(rhs)
    }
}

impl<T: Element> Mul for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Self) -> Matrix<T> {
        self.matmul(&rhs)
    }
}

impl<T: Element> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        self.mul_vector(rhs)
    }
}

impl<T: Element> Add for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Self) -> Matrix<T> {
        self.plus(rhs)
    }
}

impl<T: Element> Add for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Self) -> Matrix<T> {
        self.plus(&rhs)
    }
}

impl<T: Element> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Self) -> Matrix<T> {
        self.minus(rhs)
    }
}

impl<T: Element> Sub for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Self) -> Matrix<T> {
        self.minus(&rhs)
    }
}

macro_rules! matrix_scalar_ops {
    ($($t:ty),*) => {$(
        impl Mul<$t> for &Matrix<$t> {
            type Output = Matrix<$t>;

            fn mul(self, rhs: $t) -> Matrix<$t> {
                self.scale(rhs)
            }
        }

        impl Mul<$t> for Matrix<$t> {
            type Output = Matrix<$t>;

            fn mul(self, rhs: $t) -> Matrix<$t> {
                self.scale(rhs)
            }
        }

        impl Add<$t> for &Matrix<$t> {
            type Output = Matrix<$t>;

            fn add(self, rhs: $t) -> Matrix<$t> {
                self.add_scalar(rhs)
            }
        }

        impl Add<$t> for Matrix<$t> {
            type Output = Matrix<$t>;

            fn add(self, rhs: $t) -> Matrix<$t> {
                self.add_scalar(rhs)
            }
        }
    )*};
}

matrix_scalar_ops!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_all<T: Element + PartialEq + fmt::Debug>(m: &Matrix<T>, expected: T) {
        for row in m.iter_rows() {
            for &x in row {
                assert_eq!(x, expected);
            }
        }
    }

    #[test]
    fn test_default_is_empty() {
        let m = Matrix::<i32>::default();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn test_filled() {
        let m = Matrix::filled(3, 3, 1);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[i][j], 1);
            }
        }
    }

    #[test]
    fn test_with_size_uses_default_value() {
        let m = Matrix::<f64>::with_size(2, 4);
        assert_eq!(m.shape(), (2, 4));
        assert_all(&m, 0.0);
    }

    #[test]
    fn test_new_splits_flat_data_into_rows() {
        let m = Matrix::new(vec![1, 2, 3, 4, 5, 6], 2, 3);
        assert_eq!(m[0].as_slice(), &[1, 2, 3]);
        assert_eq!(m[1].as_slice(), &[4, 5, 6]);
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![vec![5; 2]; 2];
        let copied = Matrix::from(rows.as_slice());
        let m = Matrix::from(rows);
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m[0][0], 5);
        assert_eq!(copied, m);
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Matrix::filled(2, 2, 1);
        let mut b = a.clone();
        b[(0, 0)] = 4;
        assert_eq!(a[(0, 0)], 1);
        assert_eq!(b.shape(), (2, 2));
    }

    #[test]
    fn test_access_operators() {
        let mut m = Matrix::filled(3, 3, 1);
        m[1][1] = 9;
        assert_eq!(m[1][1], 9);
        m[(2, 0)] = 7;
        assert_eq!(m[(2, 0)], 7);
        assert_eq!(m.get(2, 0), Some(&7));
        assert_eq!(m.get(3, 0), None);
        if let Some(x) = m.get_mut(0, 2) {
            *x = 8;
        }
        assert_eq!(m[0][2], 8);
    }

    #[test]
    fn test_multiply() -> Result<()> {
        let a = Matrix::new(vec![1, 2, 3, 4], 2, 2);
        let b = Matrix::new(vec![1, 2, 3, 4], 2, 2);
        let c = multiply(&a, &b)?;
        assert_eq!(c.rows(), 2);
        assert_eq!(c.cols(), 2);
        assert_eq!(c, Matrix::new(vec![7, 10, 15, 22], 2, 2));
        Ok(())
    }

    #[test]
    fn test_multiply_complex() -> Result<()> {
        let a = Matrix::new(vec![1, 2, 3, 4, 5, 6], 2, 3);
        let b = Matrix::new(vec![1, 2, 3, 4, 5, 6], 3, 2);
        let c = multiply(&a, &b)?;
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c, Matrix::new(vec![22, 28, 49, 64], 2, 2));
        Ok(())
    }

    #[test]
    fn test_multiply_rejects_inner_mismatch() {
        let a = Matrix::filled(2, 3, 1);
        assert!(multiply(&a, &a).is_err());
    }

    #[test]
    fn test_matmul_operator() {
        let a = Matrix::filled(2, 3, 1);
        let b = Matrix::filled(3, 2, 1);
        let c = &a * &b;
        assert_eq!(c.shape(), (2, 2));
        assert_all(&c, 3);
    }

    #[test]
    fn test_mul_vector() {
        let m = Matrix::filled(3, 3, 1);
        let v = Vector::filled(3, 1);
        let result = &m * &v;
        assert_eq!(result.size(), 3);
        assert_eq!(result[0], 3);
    }

    #[test]
    fn test_scale() {
        let m = Matrix::filled(3, 3, 1i32);
        assert_all(&(&m * 2), 2);
        assert_all(&m, 1);
    }

    #[test]
    fn test_plus_and_minus() {
        let a = Matrix::filled(3, 3, 1);
        let b = Matrix::filled(3, 3, 2);
        assert_all(&(&a + &b), 3);
        assert_all(&(&b - &a), 1);
        assert_all(&(a + b), 3);
    }

    #[test]
    fn test_add_scalar() {
        let m = Matrix::filled(3, 3, 1i32);
        let result = m + 9;
        assert_eq!(result[0][0], 10);
        assert_eq!(result[2][2], 10);
    }

    #[test]
    fn test_mul_elementwise() {
        let a = Matrix::new(vec![1, 2, 3, 4], 2, 2);
        let b = Matrix::new(vec![2, 2, 3, 3], 2, 2);
        assert_eq!(a.mul_elementwise(&b), Matrix::new(vec![2, 4, 9, 12], 2, 2));
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::new(vec![1, 2, 3, 4, 5, 6], 2, 3);
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t, Matrix::new(vec![1, 4, 2, 5, 3, 6], 3, 2));
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_try_from_rows() {
        assert!(Matrix::<i32>::try_from_rows(vec![]).is_err());
        assert!(Matrix::<i32>::try_from_rows(vec![vec![]]).is_err());
        let err = Matrix::try_from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(err.to_string(), "from_rows: row 1 has length 1, expected 2");
    }

    #[test]
    fn test_checked_variants() -> Result<()> {
        let a = Matrix::filled(2, 2, 1);
        let b = Matrix::filled(2, 3, 1);
        assert!(a.try_plus(&b).is_err());
        assert!(a.try_minus(&b).is_err());
        assert!(a.try_mul_elementwise(&b).is_err());
        assert!(b.try_mul_vector(&Vector::filled(2, 1)).is_err());
        assert_eq!(a.try_matmul(&b)?.shape(), (2, 3));
        Ok(())
    }

    #[test]
    #[should_panic(expected = "ragged rows")]
    fn test_from_rows_rejects_ragged_rows() {
        let _ = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5]]);
    }

    #[test]
    fn test_write_to() -> Result<()> {
        let mut out = Vec::new();
        Matrix::filled(2, 2, 1).write_to(&mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "Vector(2) : [1, 1]\nVector(2) : [1, 1]\n"
        );
        Ok(())
    }

    #[test]
    fn test_display() {
        let m = Matrix::new(vec![1.5, 2.0], 2, 1);
        assert_eq!(m.to_string(), "Vector(1) : [1.5]\nVector(1) : [2]");
        assert_eq!(Matrix::<i32>::default().to_string(), "");
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "inner dimensions must match")]
    fn test_matmul_rejects_inner_mismatch() {
        let a = Matrix::filled(2, 3, 1);
        let _ = &a * &a;
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "Matrix dimensions must be > 0")]
    fn test_filled_rejects_zero_dimension() {
        let _ = Matrix::filled(0, 3, 1);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "Matrix dimensions must be > 0")]
    fn test_new_rejects_zero_columns() {
        let _ = Matrix::new(Vec::<i32>::new(), 3, 0);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "Matrix dimensions must be > 0")]
    fn test_new_rejects_zero_rows() {
        let _ = Matrix::new(Vec::<i32>::new(), 0, 5);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "every Matrix row must have 2 elements")]
    fn test_transpose_rejects_replaced_row_of_wrong_length() {
        let mut m = Matrix::filled(2, 2, 1);
        m[0] = Vector::new(vec![1, 2, 3]);
        let _ = m.transpose();
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "every Matrix row must have 2 elements")]
    fn test_plus_rejects_replaced_row_of_wrong_length() {
        let mut m = Matrix::filled(2, 2, 1);
        m[1] = Vector::new(vec![4]);
        let _ = &m + &Matrix::filled(2, 2, 1);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "every Matrix row must have 2 elements")]
    fn test_matmul_rejects_replaced_row_of_wrong_length() {
        let mut m = Matrix::filled(2, 2, 1);
        m[0] = Vector::new(vec![1, 2, 3]);
        let _ = &m * &Matrix::filled(2, 2, 1);
    }

    #[test]
    fn test_replacing_row_with_same_length_is_fine() {
        let mut m = Matrix::filled(2, 2, 1);
        m[0] = Vector::new(vec![5, 6]);
        assert_eq!(m.transpose(), Matrix::new(vec![5, 1, 6, 1], 2, 2));
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "row 2 out of range for Matrix with 2 rows")]
    fn test_row_index_out_of_range() {
        let m = Matrix::filled(2, 3, 1);
        let _ = &m[2];
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-checks"))]
    #[should_panic(expected = "out of range")]
    fn test_pair_index_checks_column() {
        let m = Matrix::filled(2, 2, 1);
        let _ = m[(0, 2)];
    }
}
