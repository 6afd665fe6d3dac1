//! Core matrix and vector types

use std::fmt;
use std::ops::Index;
use serde::{Deserialize, Serialize};
use crate::error::{MatrixError, Result};
use crate::helpers::{format_matrix, format_number};

/// Magnitude below which a determinant or elimination pivot counts as zero.
///
/// Shared by `inverse`, `rank`, `solve_system` and the calculator's
/// `isInvertible` flag. Not configurable per call.
pub const SINGULARITY_EPSILON: f64 = 1e-10;

/// Fixed number of power-iteration steps used for n ≥ 3 eigenvalues
pub const POWER_ITERATIONS: usize = 100;

/// Decimal places used when matrices and numbers are rendered as text
pub const DISPLAY_PRECISION: usize = 6;

/// Dimensions of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.rows, self.cols)
    }
}

/// Dense, row-major matrix of finite `f64`.
///
/// Always has at least one row and one column, and every row has the same
/// length. Values are never modified after construction; every kernel
/// operation returns a new matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    data: Vec<Vec<f64>>,
    rows: usize,
    cols: usize,
}

/// Dense vector of finite `f64`, at least one element long
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Vector {
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from nested rows
    pub fn new(data: Vec<Vec<f64>>) -> Result<Self> {
        if data.is_empty() {
            return Err(MatrixError::InvalidShape("matrix has no rows".to_string()));
        }

        let rows = data.len();
        let cols = data[0].len();
        if cols == 0 {
            return Err(MatrixError::InvalidShape("matrix has no columns".to_string()));
        }

        for (i, row) in data.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::InvalidShape(format!(
                    "row {} has {} columns, expected {}",
                    i, row.len(), cols
                )));
            }
            if let Some(j) = row.iter().position(|x| !x.is_finite()) {
                return Err(MatrixError::NonFinite { row: i, col: j });
            }
        }

        Ok(Self { data, rows, cols })
    }

    /// Create a matrix from a row-major flat array: `elements[i * cols + j]`
    /// becomes `m[i][j]`.
    pub fn from_flat(elements: &[f64], rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidShape(format!(
                "dimensions must be at least 1×1, got {}",
                Shape::new(rows, cols)
            )));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            MatrixError::InvalidShape(format!("{} is too large", Shape::new(rows, cols)))
        })?;
        if elements.len() != expected {
            return Err(MatrixError::InvalidShape(format!(
                "{} matrix needs {} elements, got {}",
                Shape::new(rows, cols), expected, elements.len()
            )));
        }

        Self::new(elements.chunks(cols).map(<[f64]>::to_vec).collect())
    }

    /// n×n identity matrix
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i][i] = 1.0;
        }
        Ok(m)
    }

    /// rows×cols matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidShape(format!(
                "dimensions must be at least 1×1, got {}",
                Shape::new(rows, cols)
            )));
        }
        Ok(Self { data: vec![vec![0.0; cols]; rows], rows, cols })
    }

    /// Wrap rows computed by a kernel operation, refusing any element that
    /// overflowed to infinity or NaN.
    pub(crate) fn from_computed(data: Vec<Vec<f64>>, op: &'static str) -> Result<Self> {
        if data.iter().flatten().any(|x| !x.is_finite()) {
            return Err(MatrixError::Overflow { op });
        }
        Ok(Self::from_rows_unchecked(data))
    }

    /// Wrap rows that cannot hold new values (transpose, minors).
    pub(crate) fn from_rows_unchecked(data: Vec<Vec<f64>>) -> Self {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        debug_assert!(rows > 0 && cols > 0);
        debug_assert!(data.iter().all(|r| r.len() == cols));
        Self { data, rows, cols }
    }

    /// Get number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Check if matrix is square
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.iter().map(Vec::as_slice)
    }

    /// Main diagonal (length `min(rows, cols)`)
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self.data[i][i]).collect()
    }

    /// Copy of the nested row data
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.data.clone()
    }

    /// Largest absolute difference from `other`, or `None` when shapes differ
    pub fn max_abs_diff(&self, other: &Matrix) -> Option<f64> {
        if self.shape() != other.shape() {
            return None;
        }
        let diff = self.data.iter().flatten()
            .zip(other.data.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        Some(diff)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(data: Vec<Vec<f64>>) -> Result<Self> {
        Matrix::new(data)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.data
    }
}

impl Vector {
    /// Create a vector, rejecting empty or non-finite data
    pub fn new(data: Vec<f64>) -> Result<Self> {
        if data.is_empty() {
            return Err(MatrixError::InvalidShape("vector has no elements".to_string()));
        }
        if let Some(i) = data.iter().position(|x| !x.is_finite()) {
            return Err(MatrixError::NonFinite { row: i, col: 0 });
        }
        Ok(Self { data })
    }

    /// Wrap values computed by a kernel operation, refusing overflow
    pub(crate) fn from_computed(data: Vec<f64>, op: &'static str) -> Result<Self> {
        debug_assert!(!data.is_empty());
        if data.iter().any(|x| !x.is_finite()) {
            return Err(MatrixError::Overflow { op });
        }
        Ok(Self { data })
    }

    /// Get length of vector
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl TryFrom<Vec<f64>> for Vector {
    type Error = MatrixError;

    fn try_from(data: Vec<f64>) -> Result<Self> {
        Vector::new(data)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(v: Vector) -> Self {
        v.data
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_matrix(self, DISPLAY_PRECISION))
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, val) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", format_number(*val, DISPLAY_PRECISION))?;
        }
        write!(f, "]")
    }
}

#[cfg(feature = "nalgebra")]
mod dmatrix {
    use super::Matrix;
    use crate::error::Result;
    use nalgebra::DMatrix;

    impl Matrix {
        /// Convert to nalgebra DMatrix
        pub fn to_dmatrix(&self) -> DMatrix<f64> {
            DMatrix::from_fn(self.rows, self.cols, |i, j| self.data[i][j])
        }

        /// Create from nalgebra DMatrix
        pub fn from_dmatrix(m: &DMatrix<f64>) -> Result<Self> {
            let data = (0..m.nrows())
                .map(|i| (0..m.ncols()).map(|j| m[(i, j)]).collect())
                .collect();
            Matrix::new(data)
        }
    }
}
