//! Tagged operations over the kernel
//!
//! Each `Operation` variant carries exactly the operands it needs, so there
//! is no "is this field required" checking once one has been built.

use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use crate::eigen::eigenvalues;
use crate::error::{MatrixError, Result};
use crate::ops::{add, multiply, scalar_multiply, subtract, transpose};
use crate::props::{determinant, rank, trace};
use crate::solve::{inverse, solve_system};
use crate::types::{Matrix, Vector};

/// Operation tag, as it appears in calculator input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    ScalarMultiply,
    Transpose,
    Determinant,
    Inverse,
    Rank,
    Trace,
    Eigenvalues,
    SolveSystem,
}

impl OperationKind {
    pub const ALL: [OperationKind; 11] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::ScalarMultiply,
        OperationKind::Transpose,
        OperationKind::Determinant,
        OperationKind::Inverse,
        OperationKind::Rank,
        OperationKind::Trace,
        OperationKind::Eigenvalues,
        OperationKind::SolveSystem,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Multiply => "multiply",
            OperationKind::ScalarMultiply => "scalar_multiply",
            OperationKind::Transpose => "transpose",
            OperationKind::Determinant => "determinant",
            OperationKind::Inverse => "inverse",
            OperationKind::Rank => "rank",
            OperationKind::Trace => "trace",
            OperationKind::Eigenvalues => "eigenvalues",
            OperationKind::SolveSystem => "solve_system",
        }
    }
}

impl FromStr for OperationKind {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        OperationKind::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| MatrixError::InvalidOperation(s.to_string()))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One kernel call with its operands
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Add(Matrix, Matrix),
    Subtract(Matrix, Matrix),
    Multiply(Matrix, Matrix),
    ScalarMultiply(Matrix, f64),
    Transpose(Matrix),
    Determinant(Matrix),
    Inverse(Matrix),
    Rank(Matrix),
    Trace(Matrix),
    Eigenvalues(Matrix),
    SolveSystem(Matrix, Vector),
}

/// What an operation produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResultValue {
    Matrix(Matrix),
    Scalar(f64),
    /// Rank
    Count(usize),
    /// Eigenvalues or a solution vector
    Values(Vec<f64>),
}

/// Result of `Operation::execute`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub kind: OperationKind,
    pub label: String,
    pub value: ResultValue,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Add(..) => OperationKind::Add,
            Operation::Subtract(..) => OperationKind::Subtract,
            Operation::Multiply(..) => OperationKind::Multiply,
            Operation::ScalarMultiply(..) => OperationKind::ScalarMultiply,
            Operation::Transpose(_) => OperationKind::Transpose,
            Operation::Determinant(_) => OperationKind::Determinant,
            Operation::Inverse(_) => OperationKind::Inverse,
            Operation::Rank(_) => OperationKind::Rank,
            Operation::Trace(_) => OperationKind::Trace,
            Operation::Eigenvalues(_) => OperationKind::Eigenvalues,
            Operation::SolveSystem(..) => OperationKind::SolveSystem,
        }
    }

    /// The left (or only) matrix operand
    pub fn matrix_a(&self) -> &Matrix {
        match self {
            Operation::Add(a, _)
            | Operation::Subtract(a, _)
            | Operation::Multiply(a, _)
            | Operation::ScalarMultiply(a, _)
            | Operation::Transpose(a)
            | Operation::Determinant(a)
            | Operation::Inverse(a)
            | Operation::Rank(a)
            | Operation::Trace(a)
            | Operation::Eigenvalues(a)
            | Operation::SolveSystem(a, _) => a,
        }
    }

    /// The right matrix operand, for binary matrix operations
    pub fn matrix_b(&self) -> Option<&Matrix> {
        match self {
            Operation::Add(_, b) | Operation::Subtract(_, b) | Operation::Multiply(_, b) => Some(b),
            _ => None,
        }
    }

    /// Human-readable description of what is computed and how
    pub fn label(&self) -> String {
        match self {
            Operation::Add(..) => "Matrix Addition: A + B".to_string(),
            Operation::Subtract(..) => "Matrix Subtraction: A - B".to_string(),
            Operation::Multiply(..) => "Matrix Multiplication: A × B".to_string(),
            Operation::ScalarMultiply(_, k) => format!("Scalar Multiplication: {} × A", k),
            Operation::Transpose(_) => "Matrix Transpose: Aᵀ".to_string(),
            Operation::Determinant(_) => "Determinant calculation using cofactor expansion".to_string(),
            Operation::Inverse(_) => "Matrix Inverse using Gauss-Jordan elimination".to_string(),
            Operation::Rank(_) => "Matrix Rank using Gaussian elimination".to_string(),
            Operation::Trace(_) => "Matrix Trace: sum of diagonal elements".to_string(),
            Operation::Eigenvalues(_) => "Eigenvalue calculation".to_string(),
            Operation::SolveSystem(..) => {
                "Linear System Solution: Ax = b using Gaussian elimination".to_string()
            }
        }
    }

    /// Run the kernel
    pub fn execute(&self) -> Result<OperationResult> {
        let value = match self {
            Operation::Add(a, b) => ResultValue::Matrix(add(a, b)?),
            Operation::Subtract(a, b) => ResultValue::Matrix(subtract(a, b)?),
            Operation::Multiply(a, b) => ResultValue::Matrix(multiply(a, b)?),
            Operation::ScalarMultiply(a, k) => ResultValue::Matrix(scalar_multiply(a, *k)?),
            Operation::Transpose(a) => ResultValue::Matrix(transpose(a)),
            Operation::Determinant(a) => ResultValue::Scalar(determinant(a)?),
            Operation::Inverse(a) => ResultValue::Matrix(inverse(a)?),
            Operation::Rank(a) => ResultValue::Count(rank(a)),
            Operation::Trace(a) => ResultValue::Scalar(trace(a)?),
            Operation::Eigenvalues(a) => ResultValue::Values(eigenvalues(a)?),
            Operation::SolveSystem(a, b) => ResultValue::Values(solve_system(a, b)?.into_vec()),
        };

        Ok(OperationResult {
            kind: self.kind(),
            label: self.label(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_kind_round_trips_through_tag() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.tag().parse::<OperationKind>().unwrap(), kind);
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.tag());
        }
    }

    #[test]
    fn test_unknown_tags() {
        for tag in ["eigenvectors", "lu_decomposition", "Add", ""] {
            assert_eq!(
                tag.parse::<OperationKind>(),
                Err(MatrixError::InvalidOperation(tag.to_string()))
            );
        }
    }

    #[test]
    fn test_execute_add() {
        let op = Operation::Add(m(&[&[1.0, 2.0], &[3.0, 4.0]]), m(&[&[5.0, 6.0], &[7.0, 8.0]]));
        let result = op.execute().unwrap();

        assert_eq!(result.kind, OperationKind::Add);
        assert_eq!(result.label, "Matrix Addition: A + B");
        assert_eq!(result.value, ResultValue::Matrix(m(&[&[6.0, 8.0], &[10.0, 12.0]])));
    }

    #[test]
    fn test_execute_scalar_results() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);

        let det = Operation::Determinant(a.clone()).execute().unwrap();
        assert_eq!(det.value, ResultValue::Scalar(-2.0));

        let tr = Operation::Trace(a.clone()).execute().unwrap();
        assert_eq!(tr.value, ResultValue::Scalar(5.0));

        let rk = Operation::Rank(a).execute().unwrap();
        assert_eq!(rk.value, ResultValue::Count(2));
    }

    #[test]
    fn test_execute_solve() {
        let a = m(&[&[2.0, 1.0], &[1.0, 3.0]]);
        let b = Vector::new(vec![5.0, 5.0]).unwrap();
        let result = Operation::SolveSystem(a, b).execute().unwrap();
        let ResultValue::Values(x) = &result.value else {
            panic!("expected values, got {:?}", result.value);
        };
        assert!((x[0] - 2.0).abs() < 1e-10);
        assert!((x[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_execute_propagates_errors() {
        let singular = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(
            Operation::Inverse(singular).execute(),
            Err(MatrixError::Singular { op: "inverse" })
        );

        let op = Operation::Multiply(m(&[&[1.0, 2.0]]), m(&[&[1.0, 2.0]]));
        assert!(matches!(op.execute(), Err(MatrixError::DimensionMismatch { .. })));

        let op = Operation::ScalarMultiply(m(&[&[1e308]]), 1e10);
        assert_eq!(op.execute(), Err(MatrixError::Overflow { op: "scalar_multiply" }));
    }

    #[test]
    fn test_operands() {
        let a = m(&[&[1.0]]);
        let b = m(&[&[2.0]]);
        let op = Operation::Multiply(a.clone(), b.clone());
        assert_eq!(op.matrix_a(), &a);
        assert_eq!(op.matrix_b(), Some(&b));
        assert_eq!(op.kind(), OperationKind::Multiply);

        let op = Operation::ScalarMultiply(a.clone(), 2.5);
        assert_eq!(op.matrix_b(), None);
        assert_eq!(op.label(), "Scalar Multiplication: 2.5 × A");
    }

    #[test]
    fn test_result_serializes_tagged() {
        let result = Operation::Rank(Matrix::identity(3).unwrap()).execute().unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "rank");
        assert_eq!(json["value"]["type"], "count");
        assert_eq!(json["value"]["value"], 3);
    }
}
