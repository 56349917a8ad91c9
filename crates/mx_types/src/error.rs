//! Error types surfaced by the model and utility layer.

use thiserror::Error;

/// Failures raised by the pure utility functions.
///
/// These are programmer-facing conditions: malformed type declarations or
/// queries that the model cannot answer. The inference engine treats most of
/// them as "no information" rather than propagating them to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeModelError {
    #[error("'{sub}' is not a subtype of '{sup}'")]
    NotASupertype { sub: String, sup: String },
    #[error("conflicting values for type parameter '{parameter}' reached through different inheritance paths: '{first}' / '{second}'")]
    DiamondMismatch {
        parameter: String,
        first: String,
        second: String,
    },
    #[error("type '{type_name}' declares {expected} parameters but {actual} arguments were supplied")]
    ArgumentArity {
        type_name: String,
        expected: usize,
        actual: usize,
    },
    #[error("cannot determine subsumption for non-concrete multiplicity {multiplicity}")]
    NonConcreteMultiplicity { multiplicity: String },
}
