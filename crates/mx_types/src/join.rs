//! Best-common-generic-type: the join in the subtype lattice.
//!
//! Given a set of types observed for the same inference slot, the join is
//! the most specific type every input conforms to. Widening during
//! inference only ever moves up the lattice, so the join is the engine's
//! merge operator for conflicting concrete bindings.

use crate::generic::{FunctionType, GenericType, Parameter};
use crate::inherit::resolve_type_args_via_inheritance;
use crate::model::TypeWorld;
use crate::multiplicity::Multiplicity;

/// Computes the most specific common supertype of `types`.
///
/// Rules, in order:
/// - bottom-typed inputs (`Nothing`, the empty-collection type) are neutral
///   and dropped; a set of only bottoms joins to bottom;
/// - structurally identical inputs short-circuit to that type;
/// - an unresolved parameter reference among the inputs joins to `Any`
///   (nothing more specific can be promised);
/// - function types join only when `allow_function` is set and all inputs
///   are functions of the same arity (parameters join invariantly, returns
///   covariantly); otherwise `Any`;
/// - class types walk the first input's supertype chain and return the
///   first raw type every input conforms to, joining arguments pointwise:
///   equal arguments are kept, unequal ones recurse when `covariant`, and
///   an invariant mismatch pushes the search one level further up.
pub fn best_common_generic_type(
    types: &[GenericType],
    world: &TypeWorld,
    covariant: bool,
    allow_function: bool,
) -> GenericType {
    let meaningful: Vec<&GenericType> = types
        .iter()
        .filter(|t| !is_bottom_reference(t, world))
        .collect();
    let Some(first) = meaningful.first() else {
        return GenericType::class(world.nothing());
    };

    if meaningful.iter().all(|t| *t == *first) {
        return (*first).clone();
    }
    if meaningful
        .iter()
        .any(|t| t.type_parameter_name().is_some())
    {
        return GenericType::class(world.any());
    }
    if meaningful.iter().any(|t| t.raw_function().is_some()) {
        if !allow_function || !meaningful.iter().all(|t| t.raw_function().is_some()) {
            return GenericType::class(world.any());
        }
        return join_function_types(&meaningful, world);
    }

    join_class_types(&meaningful, world, covariant)
}

fn is_bottom_reference(generic: &GenericType, world: &TypeWorld) -> bool {
    generic.raw_class().is_some_and(|id| world.is_bottom(id))
}

fn join_class_types(
    types: &[&GenericType],
    world: &TypeWorld,
    covariant: bool,
) -> GenericType {
    let Some(first_raw) = types[0].raw_class() else {
        return GenericType::class(world.any());
    };

    'candidate: for candidate in world.all_supertype_defs(first_raw) {
        if !types
            .iter()
            .all(|t| t.raw_class().is_some_and(|raw| world.subtype_of(raw, candidate)))
        {
            continue;
        }

        let def = world.def(candidate);
        if def.type_params().is_empty() && def.mult_params().is_empty() {
            return GenericType::class(candidate);
        }

        let mut resolved = Vec::with_capacity(types.len());
        for t in types {
            match resolve_type_args_via_inheritance(t, candidate, world) {
                Ok(arguments) => resolved.push(arguments),
                Err(_) => continue 'candidate,
            }
        }

        let mut type_args = Vec::with_capacity(def.type_params().len());
        for name in def.type_params() {
            let values: Vec<GenericType> = resolved
                .iter()
                .map(|arguments| {
                    arguments
                        .types
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| GenericType::parameter(name.clone()))
                })
                .collect();
            if values.iter().all(|v| *v == values[0]) {
                type_args.push(values[0].clone());
            } else if covariant {
                type_args.push(best_common_generic_type(&values, world, covariant, false));
            } else {
                continue 'candidate;
            }
        }

        let mut mult_args = Vec::with_capacity(def.mult_params().len());
        for name in def.mult_params() {
            let values: Vec<Multiplicity> = resolved
                .iter()
                .map(|arguments| {
                    arguments
                        .multiplicities
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| Multiplicity::parameter(name.clone()))
                })
                .collect();
            if values.iter().all(|v| *v == values[0]) {
                mult_args.push(values[0].clone());
            } else {
                mult_args.push(
                    Multiplicity::min_subsuming_all(&values)
                        .unwrap_or_else(Multiplicity::zero_to_many),
                );
            }
        }

        return GenericType::class_with_all_args(candidate, type_args, mult_args);
    }

    GenericType::class(world.any())
}

fn join_function_types(types: &[&GenericType], world: &TypeWorld) -> GenericType {
    let functions: Vec<&FunctionType> = types.iter().filter_map(|t| t.raw_function()).collect();
    let Some(first) = functions.first() else {
        return GenericType::class(world.any());
    };
    let arity = first.params.len();
    if functions.len() != types.len() || !functions.iter().all(|f| f.params.len() == arity) {
        return GenericType::class(world.any());
    }

    let mut params = Vec::with_capacity(arity);
    for position in 0..arity {
        let generics: Vec<GenericType> = functions
            .iter()
            .map(|f| f.params[position].generic.clone())
            .collect();
        let multiplicities: Vec<Multiplicity> = functions
            .iter()
            .map(|f| f.params[position].multiplicity.clone())
            .collect();
        params.push(Parameter::new(
            best_common_generic_type(&generics, world, false, false),
            Multiplicity::min_subsuming_all(&multiplicities)
                .unwrap_or_else(Multiplicity::zero_to_many),
        ));
    }

    let returns: Vec<GenericType> = functions.iter().map(|f| f.return_type.clone()).collect();
    let return_mults: Vec<Multiplicity> = functions
        .iter()
        .map(|f| f.return_multiplicity.clone())
        .collect();

    GenericType::function(FunctionType::new(
        params,
        best_common_generic_type(&returns, world, true, false),
        Multiplicity::min_subsuming_all(&return_mults)
            .unwrap_or_else(Multiplicity::zero_to_many),
    ))
}
