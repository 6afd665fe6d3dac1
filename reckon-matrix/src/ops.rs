//! Matrix arithmetic: add, subtract, multiply, scale, transpose

use crate::error::Result;
use crate::helpers::{check_matmul_dims, check_same_dims};
use crate::types::Matrix;

fn zip_with(a: &Matrix, b: &Matrix, op: &'static str, f: impl Fn(f64, f64) -> f64) -> Result<Matrix> {
    let data: Vec<Vec<f64>> = a.iter_rows()
        .zip(b.iter_rows())
        .map(|(ra, rb)| ra.iter().zip(rb).map(|(&x, &y)| f(x, y)).collect())
        .collect();
    Matrix::from_computed(data, op)
}

// ============ add / subtract ============

/// Elementwise `A + B`; shapes must match
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_same_dims(a, b, "add")?;
    zip_with(a, b, "add", |x, y| x + y)
}

/// Elementwise `A - B`; shapes must match
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_same_dims(a, b, "subtract")?;
    zip_with(a, b, "subtract", |x, y| x - y)
}

// ============ multiply ============

/// Matrix product `A × B`, requires `A.cols == B.rows`.
///
/// Result is `A.rows × B.cols`; O(A.rows · A.cols · B.cols).
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_matmul_dims(a, b)?;

    let data: Vec<Vec<f64>> = a.iter_rows()
        .map(|row| {
            (0..b.cols())
                .map(|j| row.iter().enumerate().map(|(k, &x)| x * b[(k, j)]).sum::<f64>())
                .collect()
        })
        .collect();
    Matrix::from_computed(data, "multiply")
}

/// Every element multiplied by `k`
pub fn scalar_multiply(a: &Matrix, k: f64) -> Result<Matrix> {
    let data: Vec<Vec<f64>> = a.iter_rows()
        .map(|row| row.iter().map(|&x| x * k).collect())
        .collect();
    Matrix::from_computed(data, "scalar_multiply")
}

// ============ transpose ============

pub fn transpose(a: &Matrix) -> Matrix {
    let data: Vec<Vec<f64>> = (0..a.cols())
        .map(|j| (0..a.rows()).map(|i| a[(i, j)]).collect())
        .collect();
    Matrix::from_rows_unchecked(data)
}
