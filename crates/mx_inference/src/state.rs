//! Per-attempt inference state.
//!
//! A [`ContextState`] is the dumb store the unifier writes into: two maps
//! from parameter name to inferred value, plus the lookahead flags. It is
//! created empty for every inference attempt, mutated only by the engine
//! during that attempt, and copied when unification must branch without
//! corrupting the original.

use mx_types::{best_common_generic_type, render, GenericType, Multiplicity, TypeBindings, TypeWorld};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Non-owning handle of the inference context that produced a value.
///
/// Contexts are transient and scoped to one inference attempt, so entries
/// carry an id rather than a strong reference back to their producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u32);

impl ContextId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

/// An inferred value together with its provenance.
///
/// Entries are immutable once stored; refinement replaces the whole entry.
/// `is_final` marks a value as not subject to further refinement; the
/// engine (not this store) enforces that final entries are never
/// overwritten.
#[derive(Debug, Clone)]
pub struct ParameterValueWithFlag<V> {
    value: Rc<V>,
    origin: ContextId,
    is_final: bool,
}

impl<V> ParameterValueWithFlag<V> {
    pub fn new(value: V, origin: ContextId, is_final: bool) -> Self {
        Self {
            value: Rc::new(value),
            origin,
            is_final,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn origin(&self) -> ContextId {
        self.origin
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// The two name-indexed parameter maps plus the lookahead flags.
#[derive(Debug, Clone, Default)]
pub struct ContextState {
    type_params: FxHashMap<String, ParameterValueWithFlag<GenericType>>,
    mult_params: FxHashMap<String, ParameterValueWithFlag<Multiplicity>>,
    ahead: bool,
    ahead_consumed: bool,
}

impl ContextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_type_param(&self, name: &str) -> Option<&ParameterValueWithFlag<GenericType>> {
        self.type_params.get(name)
    }

    pub fn put_type_param(
        &mut self,
        name: impl Into<String>,
        value: GenericType,
        origin: ContextId,
        is_final: bool,
    ) {
        self.type_params
            .insert(name.into(), ParameterValueWithFlag::new(value, origin, is_final));
    }

    pub fn has_type_param(&self, name: &str) -> bool {
        self.type_params.contains_key(name)
    }

    /// Sorted snapshot of the bound type-parameter names.
    pub fn type_param_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.type_params.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_mult_param(&self, name: &str) -> Option<&ParameterValueWithFlag<Multiplicity>> {
        self.mult_params.get(name)
    }

    pub fn put_mult_param(
        &mut self,
        name: impl Into<String>,
        value: Multiplicity,
        origin: ContextId,
        is_final: bool,
    ) {
        self.mult_params
            .insert(name.into(), ParameterValueWithFlag::new(value, origin, is_final));
    }

    pub fn has_mult_param(&self, name: &str) -> bool {
        self.mult_params.contains_key(name)
    }

    /// Sorted snapshot of the bound multiplicity-parameter names.
    pub fn mult_param_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.mult_params.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether this state was produced during a lookahead pass. One-way.
    pub fn is_ahead(&self) -> bool {
        self.ahead
    }

    pub fn set_ahead(&mut self) {
        self.ahead = true;
    }

    /// Whether a lookahead result has been folded into a later pass. One-way.
    pub fn is_ahead_consumed(&self) -> bool {
        self.ahead_consumed
    }

    pub fn set_ahead_consumed(&mut self) {
        self.ahead_consumed = true;
    }

    /// An independent state: own maps, same flag values. Entries are
    /// immutable and shared by reference, so the copy is cheap. A failed or
    /// speculative branch of unification works on a copy and is simply
    /// discarded.
    pub fn copy(&self) -> ContextState {
        self.clone()
    }

    /// Resolves a generic type against the bindings gathered so far.
    ///
    /// A reference that is not a bare parameter resolves to itself; a bare
    /// parameter resolves to its binding, if any.
    pub fn resolve(&self, generic: &GenericType) -> Option<GenericType> {
        match generic.type_parameter_name() {
            None => Some(generic.clone()),
            Some(name) => self
                .get_type_param(name)
                .map(|entry| entry.value().clone()),
        }
    }

    /// Whether a generic type counts as resolved: concrete in itself, or
    /// bound to a value that is final or concrete.
    pub fn is_type_parameter_resolved(&self, generic: &GenericType) -> bool {
        match generic.type_parameter_name() {
            None => true,
            Some(name) => match self.get_type_param(name) {
                Some(entry) => entry.is_final() || entry.value().is_concrete(),
                None => false,
            },
        }
    }

    /// Snapshot of the bindings as a substitution.
    pub fn to_bindings(&self) -> TypeBindings {
        let mut bindings = TypeBindings::new();
        for (name, entry) in &self.type_params {
            bindings.types.insert(name.clone(), entry.value().clone());
        }
        for (name, entry) in &self.mult_params {
            bindings
                .multiplicities
                .insert(name.clone(), entry.value().clone());
        }
        bindings
    }
}

/// Renders a state as `[T = *Integer, U = V] / [m = [1]]`; `*` marks final
/// entries. Diagnostic output only.
pub fn render_state(state: &ContextState, world: &TypeWorld) -> String {
    let types = state
        .type_param_names()
        .iter()
        .filter_map(|name| state.get_type_param(name).map(|entry| (name, entry)))
        .map(|(name, entry)| {
            format!(
                "{} = {}{}",
                name,
                if entry.is_final() { "*" } else { "" },
                render(entry.value(), world)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let mults = state
        .mult_param_names()
        .iter()
        .filter_map(|name| state.get_mult_param(name).map(|entry| (name, entry)))
        .map(|(name, entry)| {
            format!(
                "{} = {}{}",
                name,
                if entry.is_final() { "*" } else { "" },
                entry.value()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{types}] / [{mults}]")
}

/// Ordered list of states for one context.
///
/// The first state is the authoritative one; further states are pushed
/// while the elements of a collection literal are processed one by one, so
/// that what each element teaches can later be merged back as a whole.
#[derive(Debug, Default)]
pub struct ContextStack {
    states: Vec<ContextState>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self {
            states: vec![ContextState::new()],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The state unification currently writes into (the last one).
    pub fn current(&self) -> Option<&ContextState> {
        self.states.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut ContextState> {
        self.states.last_mut()
    }

    /// Pushes a copy of the base state for the next collection element.
    pub fn add_state_for_collection_element(&mut self) {
        if let Some(first) = self.states.first() {
            let copy = first.copy();
            self.states.push(copy);
        }
    }

    /// Removes the last `count` element states and returns them preceded by
    /// a copy of the base state they branched from, ready for
    /// [`merge_collection_states`].
    pub fn drop_states(&mut self, count: usize) -> Vec<ContextState> {
        if count >= self.states.len() {
            return self.states.drain(..).collect();
        }
        let keep = self.states.len() - count;
        let mut dropped = vec![self.states[keep - 1].copy()];
        dropped.extend(self.states.drain(keep..));
        dropped
    }
}

/// Folds what a collection literal's elements taught back into the base
/// state.
///
/// Only parameters the base still holds abstractly are touched: their
/// per-element values widen through the type join / the minimal subsuming
/// multiplicity. Final entries and already-concrete bindings are left
/// alone.
pub fn merge_collection_states(
    base: &mut ContextState,
    elements: &[ContextState],
    world: &TypeWorld,
) {
    for name in base.type_param_names() {
        let Some(entry) = base.get_type_param(&name) else {
            continue;
        };
        let origin = entry.origin();
        if entry.is_final() || entry.value().is_concrete() {
            continue;
        }
        let values: Vec<GenericType> = elements
            .iter()
            .filter_map(|element| element.get_type_param(&name))
            .map(|entry| entry.value().clone())
            .collect();
        if values.is_empty() {
            continue;
        }
        let widened = best_common_generic_type(&values, world, true, false);
        base.put_type_param(name, widened, origin, false);
    }

    for name in base.mult_param_names() {
        let Some(entry) = base.get_mult_param(&name) else {
            continue;
        };
        let origin = entry.origin();
        if entry.is_final() || entry.value().is_concrete() {
            continue;
        }
        let values: Vec<Multiplicity> = elements
            .iter()
            .filter_map(|element| element.get_mult_param(&name))
            .map(|entry| entry.value().clone())
            .collect();
        let Some(widened) = Multiplicity::min_subsuming_all(&values) else {
            continue;
        };
        base.put_mult_param(name, widened, origin, false);
    }
}
