//! mx_types - typed model and generic-type/multiplicity utilities for the mx compiler.
//!
//! This crate owns the value-level vocabulary the semantic phases operate on:
//! the arena of type definitions ([`TypeWorld`]), generic types with their
//! type and multiplicity arguments, function types, and the pure utility
//! functions (concreteness, subtyping, joins, inheritance-aware argument
//! resolution) that the inference engine in `mx_inference` calls into.

pub mod error;
pub mod generic;
pub mod inherit;
pub mod join;
pub mod model;
pub mod multiplicity;

pub use error::TypeModelError;
pub use generic::{
    render, render_function_type, substitute, substitute_multiplicity, FunctionType, GenericType,
    Parameter, RawType, TypeBindings,
};
pub use inherit::{resolve_type_args_via_inheritance, ResolvedArguments};
pub use join::best_common_generic_type;
pub use model::{TypeDef, TypeDefId, TypeWorld};
pub use multiplicity::Multiplicity;
