//! JSON projection of inference solutions.
//!
//! Downstream tooling (diagnostics dumps, LSP hovers, golden tests) wants a
//! stable, readable view of what an attempt inferred without depending on
//! the engine's value types. The projection renders every value in the
//! surface syntax and keeps both maps in deterministic order.

use crate::unify::InferenceSolution;
use mx_types::{render, TypeWorld};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rendered, serializable snapshot of an [`InferenceSolution`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionFacts {
    #[serde(rename = "typeParameters")]
    type_parameters: BTreeMap<String, String>,
    #[serde(rename = "multiplicityParameters")]
    multiplicity_parameters: BTreeMap<String, String>,
}

impl SolutionFacts {
    pub fn from_solution(solution: &InferenceSolution, world: &TypeWorld) -> Self {
        Self {
            type_parameters: solution
                .type_params()
                .iter()
                .map(|(name, value)| (name.clone(), render(value, world)))
                .collect(),
            multiplicity_parameters: solution
                .mult_params()
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("serialize string maps")
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
