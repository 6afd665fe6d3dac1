//! Kernel error taxonomy

use crate::types::Shape;
use reckon_core::{codes, CalcError};
use thiserror::Error;

/// Why a matrix operation refused to run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// Operand shapes incompatible for add/subtract/multiply
    #[error("{op}: incompatible dimensions {left} and {right}")]
    DimensionMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    /// Square-only operation invoked on a non-square matrix
    #[error("{op}: requires square matrix, got {shape}")]
    NotSquare { op: &'static str, shape: Shape },

    /// Matrix is singular (or numerically indistinguishable from it)
    #[error("{op}: matrix is singular")]
    Singular { op: &'static str },

    /// Right-hand side length disagrees with the coefficient matrix
    #[error("vector b has length {got}, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },

    /// Unrecognized operation tag
    #[error("unknown operation: {0}")]
    InvalidOperation(String),

    /// Data cannot form a rectangular, non-empty matrix or vector
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("element at ({row}, {col}) is not a finite number")]
    NonFinite { row: usize, col: usize },

    /// Finite operands whose result exceeds the f64 range
    #[error("{op}: result overflows f64")]
    Overflow { op: &'static str },
}

impl MatrixError {
    /// Machine-readable code, shared with `CalcError`
    pub fn code(&self) -> &'static str {
        match self {
            MatrixError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            MatrixError::NotSquare { .. } => codes::NOT_SQUARE,
            MatrixError::Singular { .. } => codes::SINGULAR,
            MatrixError::LengthMismatch { .. } => codes::LENGTH_MISMATCH,
            MatrixError::InvalidOperation(_) => codes::INVALID_OPERATION,
            MatrixError::InvalidShape(_) => codes::INVALID_SHAPE,
            MatrixError::NonFinite { .. } => codes::NON_FINITE,
            MatrixError::Overflow { .. } => codes::OVERFLOW,
        }
    }

    fn suggestion(&self) -> String {
        match self {
            MatrixError::DimensionMismatch { op: "multiply", .. } => {
                "Number of columns in A must equal number of rows in B".to_string()
            }
            MatrixError::DimensionMismatch { .. } => "Matrices must have the same dimensions".to_string(),
            MatrixError::NotSquare { .. } => "Use a matrix with as many rows as columns".to_string(),
            MatrixError::Singular { .. } => {
                "The matrix has no inverse; check for linearly dependent rows".to_string()
            }
            MatrixError::LengthMismatch { expected, .. } => {
                format!("Vector b must have {} elements", expected)
            }
            MatrixError::InvalidOperation(_) => format!(
                "Use one of: {}",
                crate::operation::OperationKind::ALL
                    .iter()
                    .map(|k| k.tag())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            MatrixError::InvalidShape(_) => {
                "Element count must equal rows × cols, with at least one of each".to_string()
            }
            MatrixError::NonFinite { .. } => "Replace NaN or infinite entries".to_string(),
            MatrixError::Overflow { .. } => "Rescale the input to smaller magnitudes".to_string(),
        }
    }
}

impl From<MatrixError> for CalcError {
    fn from(err: MatrixError) -> Self {
        let suggestion = err.suggestion();
        CalcError::new(err.code(), err.to_string()).with_suggestion(suggestion)
    }
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, MatrixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MatrixError::DimensionMismatch { op: "add", left: Shape::new(2, 2), right: Shape::new(3, 2) };
        assert_eq!(err.to_string(), "add: incompatible dimensions 2×2 and 3×2");

        let err = MatrixError::NotSquare { op: "trace", shape: Shape::new(2, 3) };
        assert_eq!(err.to_string(), "trace: requires square matrix, got 2×3");
    }

    #[test]
    fn test_into_calc_error_keeps_code() {
        let err: CalcError = MatrixError::Singular { op: "inverse" }.into();
        assert_eq!(err.code, codes::SINGULAR);
        assert_eq!(err.message, "inverse: matrix is singular");
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_invalid_operation_lists_tags() {
        let err: CalcError = MatrixError::InvalidOperation("lu_decomposition".into()).into();
        let suggestion = err.suggestion.unwrap();
        assert!(suggestion.contains("solve_system"));
        assert!(suggestion.contains("scalar_multiply"));
    }

    #[test]
    fn test_overflow_code() {
        let err: CalcError = MatrixError::Overflow { op: "determinant" }.into();
        assert_eq!(err.code, codes::OVERFLOW);
        assert_eq!(err.message, "determinant: result overflows f64");
    }

    #[test]
    fn test_multiply_mismatch_suggestion() {
        let err: CalcError = MatrixError::DimensionMismatch {
            op: "multiply",
            left: Shape::new(2, 3),
            right: Shape::new(2, 3),
        }.into();
        assert!(err.suggestion.unwrap().starts_with("Number of columns"));
    }
}
