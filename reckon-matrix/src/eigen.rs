//! Eigenvalue estimates
//!
//! Deliberately limited:
//! - 1×1 and 2×2 are exact, except that a complex-conjugate 2×2 pair is
//!   reported by its real part twice.
//! - n ≥ 3 returns a single value, the dominant eigenvalue, from a fixed
//!   number of power-iteration steps. No convergence test, no deflation, so
//!   the other eigenvalues are never produced.

use crate::error::{MatrixError, Result};
use crate::helpers::{check_finite, check_square};
use crate::props::{determinant, trace};
use crate::types::{Matrix, POWER_ITERATIONS};

/// Eigenvalues of a square matrix, see module docs for the limits.
///
/// For 2×2 the larger root comes first.
pub fn eigenvalues(a: &Matrix) -> Result<Vec<f64>> {
    check_square(a, "eigenvalues")?;

    match a.rows() {
        1 => Ok(vec![a[(0, 0)]]),
        2 => {
            // λ² - tr(A)λ + det(A) = 0
            let tr = trace(a)?;
            let det = determinant(a)?;
            let discriminant = check_finite(tr * tr - 4.0 * det, "eigenvalues")?;

            if discriminant >= 0.0 {
                let root = discriminant.sqrt();
                Ok(vec![
                    check_finite((tr + root) / 2.0, "eigenvalues")?,
                    check_finite((tr - root) / 2.0, "eigenvalues")?,
                ])
            } else {
                // complex pair: real part only
                Ok(vec![tr / 2.0, tr / 2.0])
            }
        }
        _ => Ok(vec![dominant_eigenvalue(a)?]),
    }
}

/// Dominant eigenvalue by power iteration.
///
/// Starts from the all-ones vector and applies `v ← A·v / |A·v|`
/// `POWER_ITERATIONS` times, then returns the Rayleigh quotient `vᵀ·A·v`.
/// If `A·v` is ever exactly zero, `v` is in the null space and the estimate
/// is 0.
pub fn dominant_eigenvalue(a: &Matrix) -> Result<f64> {
    check_square(a, "eigenvalues")?;
    let n = a.rows();
    let mut v = vec![1.0; n];

    for _ in 0..POWER_ITERATIONS {
        let av = mat_vec(a, &v);
        if av.iter().any(|x| !x.is_finite()) {
            return Err(MatrixError::Overflow { op: "eigenvalues" });
        }
        match normalize(&av) {
            Some(next) => v = next,
            None => return Ok(0.0),
        }
    }

    let av = mat_vec(a, &v);
    check_finite(v.iter().zip(&av).map(|(x, y)| x * y).sum(), "eigenvalues")
}

/// `x / |x|`, or `None` for the zero vector.
///
/// Divides by the largest magnitude first so the squares neither overflow
/// nor underflow.
fn normalize(x: &[f64]) -> Option<Vec<f64>> {
    let scale = x.iter().fold(0.0_f64, |m, y| m.max(y.abs()));
    if scale == 0.0 {
        return None;
    }
    let scaled: Vec<f64> = x.iter().map(|y| y / scale).collect();
    let norm = scaled.iter().map(|y| y * y).sum::<f64>().sqrt();
    Some(scaled.into_iter().map(|y| y / norm).collect())
}

fn mat_vec(a: &Matrix, v: &[f64]) -> Vec<f64> {
    a.iter_rows()
        .map(|row| row.iter().zip(v).map(|(x, y)| x * y).sum::<f64>())
        .collect()
}
