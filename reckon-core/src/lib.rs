//! Reckon Core - Fundamental types
//!
//! This crate provides the types shared by every Reckon calculator:
//! - `Formula`: the calculator trait and its metadata
//! - `CalculationResult`: outputs, explanation and intermediate steps
//! - `CalcError`: structured errors for front-end consumption

mod error;
mod formula;

pub use error::{CalcError, ErrorContext, Severity, codes};
pub use formula::{CalculationResult, FieldMeta, Formula, FormulaMeta};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CalcError, CalculationResult, FieldMeta, Formula, FormulaMeta, Severity};
    pub use crate::error::codes;
}
