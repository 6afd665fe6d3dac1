//! Inverse and linear system solver

use crate::error::{MatrixError, Result};
use crate::helpers::{check_square, pivot_row};
use crate::props::determinant;
use crate::types::{Matrix, Vector, SINGULARITY_EPSILON};

// ============================================================================
// INVERSE - Gauss-Jordan on [A | I]
// ============================================================================

/// Inverse of a square matrix.
///
/// Refuses with `Singular` when `|det(A)| < SINGULARITY_EPSILON`, then runs
/// Gauss-Jordan elimination with partial pivoting on the augmented
/// `[A | I]` and returns its right half.
pub fn inverse(a: &Matrix) -> Result<Matrix> {
    check_square(a, "inverse")?;
    if determinant(a)?.abs() < SINGULARITY_EPSILON {
        return Err(MatrixError::Singular { op: "inverse" });
    }

    let n = a.rows();
    let mut aug: Vec<Vec<f64>> = a.iter_rows()
        .enumerate()
        .map(|(i, row)| {
            let mut r = Vec::with_capacity(2 * n);
            r.extend_from_slice(row);
            r.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for i in 0..n {
        let p = pivot_row(&aug, i, i);
        aug.swap(i, p);

        let pivot = aug[i][i];
        for x in aug[i].iter_mut() {
            *x /= pivot;
        }

        for k in 0..n {
            if k == i {
                continue;
            }
            let factor = aug[k][i];
            if factor == 0.0 {
                continue;
            }
            for j in 0..2 * n {
                aug[k][j] -= factor * aug[i][j];
            }
        }
    }

    let data: Vec<Vec<f64>> = aug.into_iter().map(|row| row[n..].to_vec()).collect();
    Matrix::from_computed(data, "inverse")
}

// ============================================================================
// SOLVE - Ax = b by elimination and back substitution
// ============================================================================

/// Solve `A·x = b` for square `A`.
///
/// Forward elimination with partial pivoting on `[A | b]`; any pivot with
/// magnitude below `SINGULARITY_EPSILON` aborts with `Singular`. The
/// solution is recovered by back substitution from the last row up.
pub fn solve_system(a: &Matrix, b: &Vector) -> Result<Vector> {
    check_square(a, "solve_system")?;
    let n = a.rows();
    if b.len() != n {
        return Err(MatrixError::LengthMismatch { expected: n, got: b.len() });
    }

    let mut aug: Vec<Vec<f64>> = a.iter_rows()
        .zip(b.as_slice())
        .map(|(row, &bi)| {
            let mut r = row.to_vec();
            r.push(bi);
            r
        })
        .collect();

    for i in 0..n {
        let p = pivot_row(&aug, i, i);
        aug.swap(i, p);

        if aug[i][i].abs() < SINGULARITY_EPSILON {
            return Err(MatrixError::Singular { op: "solve_system" });
        }

        for k in i + 1..n {
            let factor = aug[k][i] / aug[i][i];
            for j in i..=n {
                aug[k][j] -= factor * aug[i][j];
            }
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = (i + 1..n).map(|j| aug[i][j] * x[j]).sum();
        x[i] = (aug[i][n] - tail) / aug[i][i];
    }

    Vector::from_computed(x, "solve_system")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::multiply;
    use approx::assert_abs_diff_eq;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn v(data: &[f64]) -> Vector {
        Vector::new(data.to_vec()).unwrap()
    }

    fn assert_near_identity(p: &Matrix) {
        let id = Matrix::identity(p.rows()).unwrap();
        let diff = p.max_abs_diff(&id).unwrap();
        assert!(diff < 1e-6, "max deviation from identity: {}", diff);
    }

    #[test]
    fn test_inverse_2x2() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let inv = inverse(&a).unwrap();
        let expected = m(&[&[0.6, -0.7], &[-0.2, 0.4]]);
        assert!(inv.max_abs_diff(&expected).unwrap() < 1e-12);
    }

    #[test]
    fn test_inverse_times_original() {
        let a = m(&[&[2.0, -1.0, 0.0], &[-1.0, 2.0, -1.0], &[0.0, -1.0, 2.0]]);
        let inv = inverse(&a).unwrap();
        assert_near_identity(&multiply(&a, &inv).unwrap());
        assert_near_identity(&multiply(&inv, &a).unwrap());
    }

    #[test]
    fn test_inverse_needs_pivoting() {
        // zero on the diagonal: only works if rows are swapped
        let a = m(&[&[0.0, 1.0, 2.0], &[1.0, 0.0, 3.0], &[4.0, -3.0, 8.0]]);
        let inv = inverse(&a).unwrap();
        assert_near_identity(&multiply(&a, &inv).unwrap());
    }

    #[test]
    fn test_inverse_matches_nalgebra() {
        let data = [
            3.0, 0.0, 2.0, -1.0,
            1.0, 2.0, 0.0, -2.0,
            4.0, 0.0, 6.0, -3.0,
            5.0, 0.0, 2.0, 0.0,
        ];
        let a = Matrix::from_flat(&data, 4, 4).unwrap();
        let expected = nalgebra::DMatrix::from_row_slice(4, 4, &data).try_inverse().unwrap();
        let inv = inverse(&a).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(inv[(i, j)], expected[(i, j)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_inverse_singular() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(inverse(&a), Err(MatrixError::Singular { op: "inverse" }));

        let zero = Matrix::zeros(2, 2).unwrap();
        assert_eq!(inverse(&zero), Err(MatrixError::Singular { op: "inverse" }));
    }

    #[test]
    fn test_inverse_not_square() {
        let a = m(&[&[1.0, 2.0]]);
        assert!(matches!(inverse(&a), Err(MatrixError::NotSquare { op: "inverse", .. })));
    }

    #[test]
    fn test_inverse_1x1() {
        assert_eq!(inverse(&m(&[&[4.0]])).unwrap(), m(&[&[0.25]]));
    }

    #[test]
    fn test_inverse_overflow() {
        // det = 1e-2, but 1 / 1e-310 is out of range
        let a = m(&[&[1e-310, 0.0], &[0.0, 1e308]]);
        assert_eq!(inverse(&a), Err(MatrixError::Overflow { op: "inverse" }));
    }

    #[test]
    fn test_solve_2x2() {
        // 2x + y = 5, x + 3y = 5  →  x = 2, y = 1
        let a = m(&[&[2.0, 1.0], &[1.0, 3.0]]);
        let x = solve_system(&a, &v(&[5.0, 5.0])).unwrap();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_solve_3x3_with_pivoting() {
        // x = (1, -2, 3)
        let a = m(&[&[0.0, 2.0, 1.0], &[1.0, 1.0, 1.0], &[2.0, -1.0, 0.0]]);
        let x = solve_system(&a, &v(&[-1.0, 2.0, 4.0])).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[1], -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[2], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_matches_nalgebra() {
        let data = [
            4.0, -2.0, 1.0, 3.0,
            3.0, 6.0, -4.0, 2.0,
            2.0, 1.0, 8.0, -5.0,
            1.0, 3.0, -2.0, 9.0,
        ];
        let rhs = [1.0, -2.0, 3.0, 4.0];
        let expected = nalgebra::DMatrix::from_row_slice(4, 4, &data)
            .lu()
            .solve(&nalgebra::DVector::from_row_slice(&rhs))
            .unwrap();

        let a = Matrix::from_flat(&data, 4, 4).unwrap();
        let x = solve_system(&a, &v(&rhs)).unwrap();
        for i in 0..4 {
            assert_abs_diff_eq!(x[i], expected[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_solve_identity() {
        let a = Matrix::identity(3).unwrap();
        let x = solve_system(&a, &v(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(x.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_solve_errors() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert_eq!(
            solve_system(&a, &v(&[1.0, 2.0])),
            Err(MatrixError::Singular { op: "solve_system" })
        );
        assert_eq!(
            solve_system(&a, &v(&[1.0, 2.0, 3.0])),
            Err(MatrixError::LengthMismatch { expected: 2, got: 3 })
        );

        assert_eq!(
            solve_system(&m(&[&[1e-9]]), &v(&[1e308])),
            Err(MatrixError::Overflow { op: "solve_system" })
        );

        let rect = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert!(matches!(
            solve_system(&rect, &v(&[1.0, 2.0])),
            Err(MatrixError::NotSquare { op: "solve_system", .. })
        ));
    }
}
