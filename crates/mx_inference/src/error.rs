//! Failures fatal to an inference attempt.

use thiserror::Error;

/// The only fatal failure mode of the engine.
///
/// Arity mismatches (declared vs. actual parameter count, or a declared
/// type's parameter list vs. its argument list) abort the attempt
/// immediately; the caller may retry with a different candidate signature.
/// A parameter the engine cannot pin down is deliberately *not* an error:
/// it is simply absent from the result maps and left to later validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("expected {expected} argument(s) but found {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}
