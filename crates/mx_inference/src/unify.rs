//! The unification engine.
//!
//! Given a candidate function's declared signature and the concrete shape of
//! a call expression, the [`Unifier`] walks both structures in lockstep and
//! fills a [`ContextState`] with values for the signature's unbound type and
//! multiplicity parameters. Inference is monotone: an abstract binding is
//! always replaceable by a concrete one, and a concrete binding only ever
//! widens (through the type join or the minimal subsuming multiplicity) when
//! two positions genuinely conflict. A parameter the walk never pins down is
//! simply absent from the result; only arity violations are fatal.

use crate::error::InferenceError;
use crate::observer::{ObserverStack, TraceEvent};
use crate::state::{ContextId, ContextState};
use mx_types::{
    best_common_generic_type, render, resolve_type_args_via_inheritance, substitute, FunctionType,
    GenericType, Multiplicity, TypeWorld,
};
use std::collections::BTreeMap;

/// One actual argument at a call site: its static type and multiplicity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub generic: GenericType,
    pub multiplicity: Multiplicity,
}

impl Argument {
    pub fn new(generic: GenericType, multiplicity: Multiplicity) -> Self {
        Self {
            generic,
            multiplicity,
        }
    }
}

/// A call expression as the engine sees it: the invoked name (used for trace
/// events) and the typed argument values.
#[derive(Debug, Clone)]
pub struct CallExpression {
    function_name: String,
    arguments: Vec<Argument>,
}

impl CallExpression {
    pub fn new(function_name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            function_name: function_name.into(),
            arguments,
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }
}

/// Immutable snapshot of an inference attempt's outcome: name to inferred
/// value, concrete or still abstract. Unresolved parameters are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceSolution {
    type_params: BTreeMap<String, GenericType>,
    mult_params: BTreeMap<String, Multiplicity>,
}

impl InferenceSolution {
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_state(state: &ContextState) -> Self {
        let mut solution = Self::default();
        for name in state.type_param_names() {
            if let Some(entry) = state.get_type_param(&name) {
                solution.type_params.insert(name, entry.value().clone());
            }
        }
        for name in state.mult_param_names() {
            if let Some(entry) = state.get_mult_param(&name) {
                solution.mult_params.insert(name, entry.value().clone());
            }
        }
        solution
    }

    pub fn type_params(&self) -> &BTreeMap<String, GenericType> {
        &self.type_params
    }

    pub fn mult_params(&self) -> &BTreeMap<String, Multiplicity> {
        &self.mult_params
    }

    pub fn type_param(&self, name: &str) -> Option<&GenericType> {
        self.type_params.get(name)
    }

    pub fn mult_param(&self, name: &str) -> Option<&Multiplicity> {
        self.mult_params.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.type_params.is_empty() && self.mult_params.is_empty()
    }
}

/// The inference engine. One instance may serve many attempts, but each
/// attempt owns its [`ContextState`] exclusively; speculative callers branch
/// with [`ContextState::copy`] rather than sharing.
#[derive(Debug)]
pub struct Unifier<'a> {
    world: &'a TypeWorld,
    observer: &'a mut ObserverStack,
    next_context: u32,
}

impl<'a> Unifier<'a> {
    pub fn new(world: &'a TypeWorld, observer: &'a mut ObserverStack) -> Self {
        Self {
            world,
            observer,
            next_context: 0,
        }
    }

    /// Infers the signature's unbound parameters from the call's actual
    /// argument types and multiplicities.
    ///
    /// The declared parameter count must equal the actual argument count;
    /// any arity violation (here or on a nested type-argument list) aborts
    /// the attempt with no partial result.
    pub fn infer(
        &mut self,
        signature: &FunctionType,
        call: &CallExpression,
    ) -> Result<InferenceSolution, InferenceError> {
        let mut state = ContextState::new();
        self.infer_into(signature, call, &mut state)?;
        Ok(InferenceSolution::from_state(&state))
    }

    /// [`Unifier::infer`] against a caller-provided state.
    ///
    /// The state may be pre-seeded (e.g. with final bindings for an
    /// enclosing scope's parameters) or a [`ContextState::copy`] taken for a
    /// speculative attempt.
    pub fn infer_into(
        &mut self,
        signature: &FunctionType,
        call: &CallExpression,
        state: &mut ContextState,
    ) -> Result<(), InferenceError> {
        let expected = signature.params.len();
        let actual = call.arguments().len();
        self.observer.trace_with(|| TraceEvent::FunctionEntry {
            function: call.function_name(),
            parameters: expected,
        });

        if expected != actual {
            self.observer.trace_with(|| TraceEvent::InferenceFailed {
                function: call.function_name(),
                reason: format!("expected {expected} argument(s), found {actual}"),
            });
            return Err(InferenceError::ArityMismatch { expected, actual });
        }

        let origin = self.allocate_context();
        for (index, (parameter, argument)) in signature
            .params
            .iter()
            .zip(call.arguments())
            .enumerate()
        {
            self.unify_one_level(
                &parameter.generic,
                &parameter.multiplicity,
                &argument.generic,
                &argument.multiplicity,
                origin,
                state,
            )?;
            self.observer.trace_with(|| TraceEvent::ParameterMatched {
                index,
                declared: render(&parameter.generic, self.world),
                actual: render(&argument.generic, self.world),
            });
        }

        let resolved_return = substitute(&signature.return_type, &state.to_bindings());
        self.observer.trace_with(|| TraceEvent::ReturnTypeResolved {
            resolved: render(&resolved_return, self.world),
        });
        self.observer.trace_with(|| TraceEvent::CandidateMatched {
            function: call.function_name(),
        });
        Ok(())
    }

    /// One level of declared-vs-actual matching: the multiplicity step, then
    /// the type step, recursing structurally where the declared type has
    /// inner structure.
    fn unify_one_level(
        &mut self,
        decl_type: &GenericType,
        decl_mult: &Multiplicity,
        actual_type: &GenericType,
        actual_mult: &Multiplicity,
        origin: ContextId,
        state: &mut ContextState,
    ) -> Result<(), InferenceError> {
        self.unify_multiplicity(decl_mult, actual_mult, origin, state);
        self.unify_type(decl_type, actual_type, origin, state)
    }

    /// The multiplicity step. Only an abstract declared multiplicity infers
    /// anything; a concrete one merely has to be conformed to, which is
    /// checked elsewhere.
    fn unify_multiplicity(
        &mut self,
        decl_mult: &Multiplicity,
        actual_mult: &Multiplicity,
        origin: ContextId,
        state: &mut ContextState,
    ) {
        let Some(name) = decl_mult.parameter_name() else {
            return;
        };
        let current = state
            .get_mult_param(name)
            .map(|entry| (entry.value().clone(), entry.is_final()));
        match current {
            None => state.put_mult_param(name, actual_mult.clone(), origin, false),
            Some((_, true)) => {}
            Some((value, false)) if !value.is_concrete() && actual_mult.is_concrete() => {
                state.put_mult_param(name, actual_mult.clone(), origin, false);
            }
            Some((value, false)) if value != *actual_mult => {
                let widened = value.min_subsuming(actual_mult);
                self.observer.trace_with(|| TraceEvent::MultiplicityWidened {
                    parameter: name,
                    from: value.to_string(),
                    to: widened.to_string(),
                });
                state.put_mult_param(name, widened, origin, false);
            }
            Some(_) => {}
        }
    }

    /// The type step: four mutually exclusive branches on the shape of the
    /// declared type.
    fn unify_type(
        &mut self,
        decl_type: &GenericType,
        actual_type: &GenericType,
        origin: ContextId,
        state: &mut ContextState,
    ) -> Result<(), InferenceError> {
        if let Some(name) = decl_type.type_parameter_name() {
            self.bind_type_param(name, actual_type, origin, state);
            return Ok(());
        }

        if let Some(decl_function) = decl_type.raw_function() {
            return self.unify_function_types(decl_function, actual_type, origin, state);
        }

        self.unify_class_arguments(decl_type, actual_type, origin, state)
    }

    /// Binds or refines a named type parameter. The single choke point for
    /// type writes, so the monotone policy and the final-entry protection
    /// live in one place.
    fn bind_type_param(
        &mut self,
        name: &str,
        actual_type: &GenericType,
        origin: ContextId,
        state: &mut ContextState,
    ) {
        let current = state
            .get_type_param(name)
            .map(|entry| (entry.value().clone(), entry.is_final()));
        match current {
            None => state.put_type_param(name, actual_type.clone(), origin, false),
            Some((_, true)) => {}
            Some((value, false)) if !value.is_concrete() && actual_type.is_concrete() => {
                state.put_type_param(name, actual_type.clone(), origin, false);
            }
            Some((value, false)) if value != *actual_type => {
                let widened = best_common_generic_type(
                    &[value.clone(), actual_type.clone()],
                    self.world,
                    true,
                    false,
                );
                self.observer.trace_with(|| TraceEvent::TypeWidened {
                    parameter: name,
                    from: render(&value, self.world),
                    to: render(&widened, self.world),
                });
                state.put_type_param(name, widened, origin, false);
            }
            Some(_) => {}
        }
    }

    /// Higher-order flow: a function-typed declared parameter recurses into
    /// the actual's function shape, parameter by parameter and then the
    /// return pair, so the lambda's own generic holes get filled from how
    /// it is actually shaped.
    fn unify_function_types(
        &mut self,
        decl_function: &FunctionType,
        actual_type: &GenericType,
        origin: ContextId,
        state: &mut ContextState,
    ) -> Result<(), InferenceError> {
        let Some(actual_function) = actual_type.raw_function() else {
            // Nothing structural to recurse into; conformance is checked
            // elsewhere.
            return Ok(());
        };
        if decl_function.params.len() != actual_function.params.len() {
            return Err(InferenceError::ArityMismatch {
                expected: decl_function.params.len(),
                actual: actual_function.params.len(),
            });
        }

        self.observer.shift_tab();
        for (declared, actual) in decl_function.params.iter().zip(&actual_function.params) {
            self.unify_one_level(
                &declared.generic,
                &declared.multiplicity,
                &actual.generic,
                &actual.multiplicity,
                origin,
                state,
            )?;
        }
        self.unify_one_level(
            &decl_function.return_type,
            &decl_function.return_multiplicity,
            &actual_function.return_type,
            &actual_function.return_multiplicity,
            origin,
            state,
        )?;
        self.observer.unshift_tab();
        Ok(())
    }

    /// Class-argument flow: the actual may be a subtype of the declared raw
    /// type, so its arguments are first re-expressed in the declared type's
    /// own parameter names, then matched by *name*, not position. A
    /// bottom-typed actual (the empty-collection type) carries no
    /// information and stops the recursion.
    fn unify_class_arguments(
        &mut self,
        decl_type: &GenericType,
        actual_type: &GenericType,
        origin: ContextId,
        state: &mut ContextState,
    ) -> Result<(), InferenceError> {
        let (type_args, mult_args) = match decl_type {
            GenericType::Concrete {
                type_args,
                mult_args,
                ..
            } => (type_args, mult_args),
            GenericType::Parameter(_) => return Ok(()),
        };
        if type_args.is_empty() && mult_args.is_empty() {
            return Ok(());
        }
        let Some(decl_raw) = decl_type.raw_class() else {
            return Ok(());
        };
        let Some(actual_raw) = actual_type.raw_class() else {
            return Ok(());
        };
        if self.world.is_bottom(actual_raw) {
            return Ok(());
        }

        let def = self.world.def(decl_raw);
        if def.type_params().len() != type_args.len() {
            return Err(InferenceError::ArityMismatch {
                expected: def.type_params().len(),
                actual: type_args.len(),
            });
        }
        if def.mult_params().len() != mult_args.len() {
            return Err(InferenceError::ArityMismatch {
                expected: def.mult_params().len(),
                actual: mult_args.len(),
            });
        }

        let resolved = match resolve_type_args_via_inheritance(actual_type, decl_raw, self.world) {
            Ok(resolved) => resolved,
            // An unrelated actual or a diamond conflict contributes no
            // information; later validation rejects the call if it matters.
            Err(_) => return Ok(()),
        };

        self.observer.shift_tab();
        for (position, name) in def.mult_params().iter().enumerate() {
            if let Some(actual_mult) = resolved.multiplicities.get(name) {
                self.unify_multiplicity(&mult_args[position], actual_mult, origin, state);
            }
        }
        for (position, name) in def.type_params().iter().enumerate() {
            if let Some(actual_arg) = resolved.types.get(name) {
                self.unify_type(&type_args[position], actual_arg, origin, state)?;
            }
        }
        self.observer.unshift_tab();
        Ok(())
    }

    fn allocate_context(&mut self) -> ContextId {
        self.next_context += 1;
        ContextId::new(self.next_context)
    }
}
