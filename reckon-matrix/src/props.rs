//! Matrix properties: determinant, trace, rank

use crate::error::Result;
use crate::helpers::{check_finite, check_square, pivot_row};
use crate::types::{Matrix, SINGULARITY_EPSILON};

// ============ determinant ============

/// Determinant by Laplace (cofactor) expansion along the first row.
///
/// 1×1 and 2×2 are closed-form. Larger matrices recurse into n minors of
/// size n-1, so the cost grows as O(n!); fine up to about 10×10, not for
/// anything bigger.
pub fn determinant(a: &Matrix) -> Result<f64> {
    check_square(a, "determinant")?;
    check_finite(cofactor_det(&a.to_nested()), "determinant")
}

fn cofactor_det(m: &[Vec<f64>]) -> f64 {
    match m.len() {
        1 => m[0][0],
        2 => m[0][0] * m[1][1] - m[0][1] * m[1][0],
        _ => m[0].iter()
            .enumerate()
            .map(|(j, &x)| {
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sign * x * cofactor_det(&minor_rows(m, 0, j))
            })
            .sum(),
    }
}

fn minor_rows(m: &[Vec<f64>], row: usize, col: usize) -> Vec<Vec<f64>> {
    m.iter()
        .enumerate()
        .filter(|&(i, _)| i != row)
        .map(|(_, r)| {
            r.iter()
                .enumerate()
                .filter(|&(j, _)| j != col)
                .map(|(_, &x)| x)
                .collect()
        })
        .collect()
}

/// `a` with `row` and `col` removed.
///
/// Returns `None` when the index is out of range or removing it would leave
/// an empty matrix.
pub fn minor(a: &Matrix, row: usize, col: usize) -> Option<Matrix> {
    if row >= a.rows() || col >= a.cols() || a.rows() < 2 || a.cols() < 2 {
        return None;
    }
    Some(Matrix::from_rows_unchecked(minor_rows(&a.to_nested(), row, col)))
}

/// Whether `|det(a)|` exceeds `SINGULARITY_EPSILON`
pub fn is_invertible(a: &Matrix) -> Result<bool> {
    Ok(det_is_invertible(determinant(a)?))
}

/// Invertibility test on an already computed determinant
pub(crate) fn det_is_invertible(det: f64) -> bool {
    det.abs() > SINGULARITY_EPSILON
}

// ============ trace ============

/// Sum of the main diagonal
pub fn trace(a: &Matrix) -> Result<f64> {
    check_square(a, "trace")?;
    check_finite(a.diagonal().iter().sum(), "trace")
}

// ============ rank ============

/// Number of non-zero pivots after forward elimination.
///
/// Works on any shape. Columns are scanned left to right; in each the
/// largest-magnitude candidate at or below the current pivot row is swapped
/// up, and a candidate smaller than `SINGULARITY_EPSILON` means the column
/// has no pivot.
pub fn rank(a: &Matrix) -> usize {
    let mut m = a.to_nested();
    let rows = a.rows();
    let cols = a.cols();
    let mut rank = 0;

    for col in 0..cols {
        if rank == rows {
            break;
        }

        let p = pivot_row(&m, rank, col);
        if m[p][col].abs() < SINGULARITY_EPSILON {
            continue;
        }
        m.swap(rank, p);

        for row in rank + 1..rows {
            let factor = m[row][col] / m[rank][col];
            for c in col..cols {
                m[row][c] -= factor * m[rank][c];
            }
        }

        rank += 1;
    }

    rank
}
