//! Reckon Matrix - Dense matrix kernel and matrix calculator
//!
//! Provides:
//! - Element-wise and product operations (add, subtract, multiply, scalar_multiply, transpose)
//! - Matrix properties (determinant, trace, rank)
//! - Inverse (Gauss-Jordan) and linear systems (Gaussian elimination)
//! - Eigenvalues: exact for 1×1 and 2×2, dominant only (power iteration) above
//! - `Operation`: a tagged request carrying exactly its operands
//! - `MatrixCalculator`: the flat-record calculator built on top
//!
//! All arithmetic is plain f64. Near-zero tests use `SINGULARITY_EPSILON`.

mod types;
mod error;
mod helpers;
mod ops;
mod props;
mod solve;
mod eigen;
mod operation;
mod calculator;

pub use types::{Matrix, Vector, Shape, SINGULARITY_EPSILON, POWER_ITERATIONS, DISPLAY_PRECISION};
pub use error::{MatrixError, Result};
pub use helpers::{format_fixed, format_matrix, format_number};
pub use ops::{add, subtract, multiply, scalar_multiply, transpose};
pub use props::{determinant, is_invertible, minor, rank, trace};
pub use solve::{inverse, solve_system};
pub use eigen::{dominant_eigenvalue, eigenvalues};
pub use operation::{Operation, OperationKind, OperationResult, ResultValue};
pub use calculator::{MatrixCalculator, MatrixInputs, MatrixOutputs, MATRIX_CALCULATOR_ID};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Matrix {
        Matrix::from_flat(&[2.0, -1.0, 0.0, 1.0, 3.0, 2.0, 0.0, 1.0, 4.0], 3, 3).unwrap()
    }

    #[test]
    fn test_transpose_of_product() {
        let a = sample();
        let b = Matrix::from_flat(&[1.0, 2.0, 0.0, 1.0, -1.0, 3.0], 3, 2).unwrap();
        let left = transpose(&multiply(&a, &b).unwrap());
        let right = multiply(&transpose(&b), &transpose(&a)).unwrap();
        assert!(left.max_abs_diff(&right).unwrap() < 1e-12);
    }

    #[test]
    fn test_determinant_of_transpose_and_scale() {
        let a = sample();
        let det = determinant(&a).unwrap();
        assert_abs_diff_eq!(determinant(&transpose(&a)).unwrap(), det, epsilon = 1e-9);
        // det(kA) = kⁿ det(A)
        assert_abs_diff_eq!(determinant(&scalar_multiply(&a, 2.0).unwrap()).unwrap(), 8.0 * det, epsilon = 1e-9);
    }

    #[test]
    fn test_determinant_of_inverse() {
        let a = sample();
        let det = determinant(&a).unwrap();
        let inv_det = determinant(&inverse(&a).unwrap()).unwrap();
        assert_abs_diff_eq!(det * inv_det, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solution_satisfies_system() {
        let a = sample();
        let b = Vector::new(vec![1.0, -2.0, 5.0]).unwrap();
        let x = solve_system(&a, &b).unwrap();
        let x_col = Matrix::from_flat(x.as_slice(), 3, 1).unwrap();
        let ax = multiply(&a, &x_col).unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(ax[(i, 0)], b[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rank_bounds() {
        let a = Matrix::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        assert!(rank(&a) <= 2);
        assert_eq!(rank(&a), rank(&transpose(&a)));
    }

    #[test]
    fn test_trace_is_sum_of_2x2_eigenvalues() {
        let a = Matrix::from_flat(&[4.0, 1.0, 2.0, 3.0], 2, 2).unwrap();
        let vals = eigenvalues(&a).unwrap();
        assert_abs_diff_eq!(vals.iter().sum::<f64>(), trace(&a).unwrap(), epsilon = 1e-12);
        assert_abs_diff_eq!(vals[0] * vals[1], determinant(&a).unwrap(), epsilon = 1e-12);
    }
}
