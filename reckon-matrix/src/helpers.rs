//! Helper functions for matrix operations

use crate::error::{MatrixError, Result};
use crate::types::Matrix;

/// Check that two matrices have compatible dimensions for multiplication
pub fn check_matmul_dims(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch {
            op: "multiply",
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

/// Check that two matrices have the same dimensions
pub fn check_same_dims(a: &Matrix, b: &Matrix, op: &'static str) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(MatrixError::DimensionMismatch {
            op,
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

/// Check that a matrix is square
pub fn check_square(m: &Matrix, op: &'static str) -> Result<()> {
    if !m.is_square() {
        return Err(MatrixError::NotSquare { op, shape: m.shape() });
    }
    Ok(())
}

/// Pass a computed scalar through, refusing infinity or NaN
pub(crate) fn check_finite(value: f64, op: &'static str) -> Result<f64> {
    if !value.is_finite() {
        return Err(MatrixError::Overflow { op });
    }
    Ok(value)
}

/// Index of the row in `start..` with the largest `|m[row][col]|`
pub(crate) fn pivot_row(m: &[Vec<f64>], start: usize, col: usize) -> usize {
    let mut best = start;
    for row in start + 1..m.len() {
        if m[row][col].abs() > m[best][col].abs() {
            best = row;
        }
    }
    best
}

/// Render with `precision` decimals (`{:.N}`), never as "-0.000…"
pub fn format_fixed(value: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, value);
    match s.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => s,
    }
}

/// Round to `precision` decimals, then print in shortest form
/// (`2.000000` → `2`, `0.1250000` → `0.125`).
pub fn format_number(value: f64, precision: usize) -> String {
    let rounded: f64 = format!("{:.*}", precision, value).parse().unwrap_or(value);
    // adding 0.0 turns -0.0 into 0.0
    format!("{}", rounded + 0.0)
}

/// `[[a, b], [c, d]]`, elements via `format_number`
pub fn format_matrix(m: &Matrix, precision: usize) -> String {
    let rows: Vec<String> = m.iter_rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|&v| format_number(v, precision)).collect();
            format!("[{}]", cells.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

/// Values joined with ", ", each via `format_fixed`
pub fn format_fixed_list(values: &[f64], precision: usize) -> String {
    values.iter()
        .map(|&v| format_fixed(v, precision))
        .collect::<Vec<_>>()
        .join(", ")
}
