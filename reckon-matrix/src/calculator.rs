//! The matrix calculator: flat input record in, flat output record out
//!
//! Front ends send one record with the operation tag and every operand as
//! row/column counts plus a row-major element array. The record is turned
//! into an `Operation` first; only then does the kernel run.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use reckon_core::prelude::*;
use crate::error::MatrixError;
use crate::helpers::{format_fixed, format_fixed_list, format_matrix};
use crate::operation::{Operation, OperationKind, OperationResult, ResultValue};
use crate::props::{det_is_invertible, determinant, rank, trace};
use crate::types::{Matrix, Vector, DISPLAY_PRECISION};

pub const MATRIX_CALCULATOR_ID: &str = "matrix-calculator";

const FAILURE_NOTE: &str = "Matrix calculation failed";

/// Input record of the matrix calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixInputs {
    pub operation: String,
    pub matrix_a_rows: usize,
    pub matrix_a_cols: usize,
    pub matrix_a_elements: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_b_rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_b_cols: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_b_elements: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_b: Option<Vec<f64>>,
}

/// Output record of the matrix calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixOutputs {
    /// Formatted result of the requested operation
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub determinant: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eigenvalues: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invertible: Option<bool>,
}

impl MatrixInputs {
    /// Matrix A from its flat fields
    pub fn matrix_a(&self) -> Result<Matrix, CalcError> {
        Matrix::from_flat(&self.matrix_a_elements, self.matrix_a_rows, self.matrix_a_cols)
            .map_err(|e| CalcError::from(e).for_field("matrixAElements"))
    }

    /// Matrix B, if all three of its fields are present
    pub fn matrix_b(&self) -> Result<Option<Matrix>, CalcError> {
        match (self.matrix_b_rows, self.matrix_b_cols, &self.matrix_b_elements) {
            (Some(rows), Some(cols), Some(elements)) => Matrix::from_flat(elements, rows, cols)
                .map(Some)
                .map_err(|e| CalcError::from(e).for_field("matrixBElements")),
            _ => Ok(None),
        }
    }

    /// Build the tagged operation, checking that its operands are present
    pub fn to_operation(&self) -> Result<Operation, CalcError> {
        let kind: OperationKind = self.operation.parse()
            .map_err(|e: MatrixError| CalcError::from(e).for_field("operation"))?;
        let a = self.matrix_a()?;

        let op = match kind {
            OperationKind::Add => Operation::Add(a, self.require_b("addition")?),
            OperationKind::Subtract => Operation::Subtract(a, self.require_b("subtraction")?),
            OperationKind::Multiply => Operation::Multiply(a, self.require_b("multiplication")?),
            OperationKind::ScalarMultiply => {
                let k = self.scalar_value
                    .ok_or_else(|| CalcError::missing_input("scalarValue", "scalar multiplication"))?;
                if !k.is_finite() {
                    return Err(CalcError::invalid_input("scalarValue", "must be a finite number"));
                }
                Operation::ScalarMultiply(a, k)
            }
            OperationKind::Transpose => Operation::Transpose(a),
            OperationKind::Determinant => Operation::Determinant(a),
            OperationKind::Inverse => Operation::Inverse(a),
            OperationKind::Rank => Operation::Rank(a),
            OperationKind::Trace => Operation::Trace(a),
            OperationKind::Eigenvalues => Operation::Eigenvalues(a),
            OperationKind::SolveSystem => {
                let b = self.vector_b
                    .clone()
                    .ok_or_else(|| CalcError::missing_input("vectorB", "system solving"))?;
                let b = Vector::new(b).map_err(|e| CalcError::from(e).for_field("vectorB"))?;
                Operation::SolveSystem(a, b)
            }
        };
        Ok(op)
    }

    fn require_b(&self, purpose: &str) -> Result<Matrix, CalcError> {
        self.matrix_b()?
            .ok_or_else(|| CalcError::missing_input("matrixBElements", &format!("matrix {}", purpose)))
    }
}

/// The "Advanced Matrix Calculator"
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixCalculator;

static INPUTS: [FieldMeta; 9] = [
    FieldMeta::required("operation", "string", "add, subtract, multiply, scalar_multiply, transpose, determinant, inverse, rank, trace, eigenvalues or solve_system"),
    FieldMeta::required("matrixARows", "integer", "Rows of matrix A"),
    FieldMeta::required("matrixACols", "integer", "Columns of matrix A"),
    FieldMeta::required("matrixAElements", "number[]", "Elements of A, row by row"),
    FieldMeta::optional("matrixBRows", "integer", "Rows of matrix B"),
    FieldMeta::optional("matrixBCols", "integer", "Columns of matrix B"),
    FieldMeta::optional("matrixBElements", "number[]", "Elements of B, row by row (add, subtract, multiply)"),
    FieldMeta::optional("scalarValue", "number", "Scalar k for scalar_multiply"),
    FieldMeta::optional("vectorB", "number[]", "Right-hand side b for solve_system"),
];

static OUTPUTS: [FieldMeta; 6] = [
    FieldMeta::required("result", "string", "Formatted result"),
    FieldMeta::optional("determinant", "number", "Determinant of A (square A)"),
    FieldMeta::optional("trace", "number", "Trace of A (square A)"),
    FieldMeta::optional("rank", "integer", "Rank of A"),
    FieldMeta::optional("eigenvalues", "number[]", "Eigenvalues of A (dominant only for n ≥ 3)"),
    FieldMeta::optional("isInvertible", "boolean", "Whether |det A| > 1e-10 (square A)"),
];

static EXAMPLES: [&str; 3] = [
    r#"{"operation":"determinant","matrixARows":2,"matrixACols":2,"matrixAElements":[1,2,3,4]} → -2.000000"#,
    r#"{"operation":"add","matrixARows":1,"matrixACols":2,"matrixAElements":[1,2],"matrixBRows":1,"matrixBCols":2,"matrixBElements":[3,4]} → [[4, 6]]"#,
    r#"{"operation":"solve_system","matrixARows":2,"matrixACols":2,"matrixAElements":[2,1,1,3],"vectorB":[5,5]} → [2.000000, 1.000000]"#,
];

impl Formula for MatrixCalculator {
    type Inputs = MatrixInputs;
    type Outputs = MatrixOutputs;

    fn meta(&self) -> FormulaMeta {
        FormulaMeta {
            id: MATRIX_CALCULATOR_ID,
            name: "Advanced Matrix Calculator",
            description: "Comprehensive matrix operations with step-by-step solutions",
            category: "math",
            inputs: &INPUTS,
            outputs: &OUTPUTS,
            examples: &EXAMPLES,
        }
    }

    fn calculate(&self, inputs: &MatrixInputs) -> Result<CalculationResult<MatrixOutputs>, CalcError> {
        let fail = |e: CalcError| e.in_formula(MATRIX_CALCULATOR_ID).with_note(FAILURE_NOTE);

        let op = inputs.to_operation().map_err(fail)?;
        let a = op.matrix_a();
        debug!(operation = %op.kind(), a = %a.shape(), b = ?op.matrix_b().map(Matrix::shape), "running matrix operation");

        let result = op.execute().map_err(|e| fail(e.into()))?;
        let mut outputs = operation_outputs(&result);
        if a.is_square() {
            fill_square_properties(&mut outputs, a);
        }

        // B is reported whenever it was supplied, even if the operation ignores it
        let b_dims = inputs.matrix_b()
            .ok()
            .flatten()
            .map(|b| b.shape().to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let explanation = format!("{}. Matrix A is {}.", result.label, a.shape());
        let shown = outputs.result.clone();

        Ok(CalculationResult::new(outputs, explanation)
            .with_step("Operation", result.kind.tag())
            .with_step("Matrix A Dimensions", a.shape().to_string())
            .with_step("Matrix B Dimensions", b_dims)
            .with_step("Method", result.label)
            .with_step("Result", shown))
    }
}

/// Result string plus whichever typed field the operation itself produces
fn operation_outputs(result: &OperationResult) -> MatrixOutputs {
    let mut outputs = MatrixOutputs::default();
    match (&result.value, result.kind) {
        (ResultValue::Matrix(m), _) => {
            outputs.result = format_matrix(m, DISPLAY_PRECISION);
        }
        (ResultValue::Scalar(x), kind) => {
            outputs.result = format_fixed(*x, DISPLAY_PRECISION);
            if kind == OperationKind::Trace {
                outputs.trace = Some(*x);
            } else {
                outputs.determinant = Some(*x);
            }
        }
        (ResultValue::Count(n), _) => {
            outputs.result = n.to_string();
            outputs.rank = Some(*n);
        }
        (ResultValue::Values(values), OperationKind::Eigenvalues) => {
            outputs.result = format_fixed_list(values, DISPLAY_PRECISION);
            outputs.eigenvalues = Some(values.clone());
        }
        (ResultValue::Values(values), _) => {
            outputs.result = format!("[{}]", format_fixed_list(values, DISPLAY_PRECISION));
        }
    }
    outputs
}

/// Determinant, trace, rank and invertibility of a square A, keeping any
/// value the operation already produced. A property that cannot be computed
/// is left out.
fn fill_square_properties(outputs: &mut MatrixOutputs, a: &Matrix) {
    match determinant(a) {
        Ok(det) => {
            outputs.determinant.get_or_insert(det);
            outputs.is_invertible = Some(det_is_invertible(det));
        }
        Err(e) => warn!(error = %e, "skipping determinant of matrix A"),
    }
    match trace(a) {
        Ok(tr) => {
            outputs.trace.get_or_insert(tr);
        }
        Err(e) => warn!(error = %e, "skipping trace of matrix A"),
    }
    outputs.rank.get_or_insert_with(|| rank(a));
}
