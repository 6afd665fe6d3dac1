//! Calculator traits

use crate::CalcError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata about a calculator input or output field
#[derive(Debug, Clone, Serialize)]
pub struct FieldMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
}

impl FieldMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: true }
    }
}

/// Metadata for a calculator
#[derive(Debug, Clone, Serialize)]
pub struct FormulaMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub inputs: &'static [FieldMeta],
    pub outputs: &'static [FieldMeta],
    pub examples: &'static [&'static str],
}

/// What a calculator hands back to the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult<O> {
    pub outputs: O,
    pub explanation: String,
    pub intermediate_steps: BTreeMap<String, String>,
}

impl<O> CalculationResult<O> {
    pub fn new(outputs: O, explanation: impl Into<String>) -> Self {
        Self {
            outputs,
            explanation: explanation.into(),
            intermediate_steps: BTreeMap::new(),
        }
    }

    /// Builder: record an intermediate step
    pub fn with_step(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.intermediate_steps.insert(label.into(), value.into());
        self
    }
}

/// A calculator: typed inputs in, `CalculationResult` out
pub trait Formula: Send + Sync {
    type Inputs: DeserializeOwned;
    type Outputs: Serialize;

    fn meta(&self) -> FormulaMeta;

    fn calculate(&self, inputs: &Self::Inputs) -> Result<CalculationResult<Self::Outputs>, CalcError>;

    /// Run the calculator on an untyped JSON record
    fn calculate_json(&self, inputs: serde_json::Value) -> Result<serde_json::Value, CalcError> {
        let id = self.meta().id;
        let inputs: Self::Inputs = serde_json::from_value(inputs)
            .map_err(|e| CalcError::from(e).in_formula(id))?;
        let result = self.calculate(&inputs)?;
        serde_json::to_value(result)
            .map_err(|e| CalcError::internal(e.to_string()).in_formula(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use serde_json::json;

    struct Doubler;

    #[derive(Deserialize)]
    struct DoublerInputs {
        value: f64,
    }

    static DOUBLER_INPUTS: [FieldMeta; 1] = [FieldMeta::required("value", "number", "Value to double")];
    static DOUBLER_OUTPUTS: [FieldMeta; 1] = [FieldMeta::required("doubled", "number", "Twice the value")];

    impl Formula for Doubler {
        type Inputs = DoublerInputs;
        type Outputs = BTreeMap<String, f64>;

        fn meta(&self) -> FormulaMeta {
            FormulaMeta {
                id: "doubler", name: "Doubler", description: "Doubles a number", category: "test",
                inputs: &DOUBLER_INPUTS, outputs: &DOUBLER_OUTPUTS, examples: &[],
            }
        }

        fn calculate(&self, inputs: &DoublerInputs) -> Result<CalculationResult<Self::Outputs>, CalcError> {
            if inputs.value < 0.0 {
                return Err(CalcError::invalid_input("value", "must be non-negative"));
            }
            let mut outputs = BTreeMap::new();
            outputs.insert("doubled".to_string(), inputs.value * 2.0);
            Ok(CalculationResult::new(outputs, "Doubled").with_step("Input", inputs.value.to_string()))
        }
    }

    #[test]
    fn test_calculate_json() {
        let out = Doubler.calculate_json(json!({ "value": 21 })).unwrap();
        assert_eq!(out["outputs"]["doubled"], 42.0);
        assert_eq!(out["explanation"], "Doubled");
        assert_eq!(out["intermediateSteps"]["Input"], "21");
    }

    #[test]
    fn test_calculate_json_bad_record() {
        let err = Doubler.calculate_json(json!({ "other": 1 })).unwrap_err();
        assert!(err.is(codes::PARSE_ERROR));
        assert_eq!(err.context.unwrap().formula.as_deref(), Some("doubler"));
    }

    #[test]
    fn test_calculate_json_propagates_formula_error() {
        let err = Doubler.calculate_json(json!({ "value": -1 })).unwrap_err();
        assert!(err.is(codes::INVALID_INPUT));
    }

    #[test]
    fn test_meta_serializes() {
        let meta = serde_json::to_value(Doubler.meta()).unwrap();
        assert_eq!(meta["id"], "doubler");
        assert_eq!(meta["inputs"][0]["optional"], false);
    }
}
