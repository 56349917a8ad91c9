//! mx_inference - type-parameter and multiplicity-parameter inference for mx.
//!
//! The engine unifies a generic function's declared signature against the
//! concrete types and multiplicities of the arguments at a call site,
//! producing two maps (inferred type parameters, inferred multiplicity
//! parameters) the overload-resolution phase uses to instantiate the
//! signature and re-check applicability. Inference runs single-threaded and
//! synchronously over already-resident model data; every attempt owns its
//! state exclusively, and speculative callers branch with
//! [`ContextState::copy`] instead of sharing.

pub mod error;
pub mod facts;
pub mod observer;
pub mod state;
pub mod unify;

#[cfg(test)]
mod tests;

pub use error::InferenceError;
pub use facts::SolutionFacts;
pub use observer::{
    InferenceObserver, ObserverStack, RecordingObserver, SourceId, TraceEvent, VoidObserver,
};
pub use state::{
    merge_collection_states, render_state, ContextId, ContextStack, ContextState,
    ParameterValueWithFlag,
};
pub use unify::{Argument, CallExpression, InferenceSolution, Unifier};
