//! Inheritance-aware type-argument resolution.
//!
//! When a declared parameter type is `Box<T>` and the actual argument is a
//! `SpecialBox<Integer>`, the actual's arguments must first be re-expressed
//! in terms of `Box`'s own parameter names before any inference can happen.
//! The resolution walks the generalization tree from the actual's raw type
//! up to the declared raw type, substituting arguments at every step.

use crate::error::TypeModelError;
use crate::generic::{render, substitute, GenericType, TypeBindings};
use crate::model::{TypeDefId, TypeWorld};
use crate::multiplicity::Multiplicity;
use std::collections::BTreeMap;

/// Arguments of some generic type re-expressed in the parameter names of a
/// (super)type reached through inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedArguments {
    pub types: BTreeMap<String, GenericType>,
    pub multiplicities: BTreeMap<String, Multiplicity>,
}

impl ResolvedArguments {
    fn as_bindings(&self) -> TypeBindings {
        TypeBindings {
            types: self.types.clone(),
            multiplicities: self.multiplicities.clone(),
        }
    }
}

/// Re-expresses `actual`'s arguments in terms of `declared_raw`'s own
/// parameter names.
///
/// `actual` must be a class-shaped reference whose raw type is a subtype of
/// `declared_raw`. Two inheritance paths reaching `declared_raw` with
/// structurally different argument values are a diamond conflict and are
/// rejected rather than silently picking one.
pub fn resolve_type_args_via_inheritance(
    actual: &GenericType,
    declared_raw: TypeDefId,
    world: &TypeWorld,
) -> Result<ResolvedArguments, TypeModelError> {
    let start = actual.raw_class().ok_or_else(|| TypeModelError::NotASupertype {
        sub: render(actual, world),
        sup: world.name(declared_raw).to_string(),
    })?;

    // The top type has no parameters; every walk trivially reaches it.
    if world.is_top(declared_raw) {
        return Ok(ResolvedArguments::default());
    }

    let initial = bind_own_arguments(start, actual, world)?;
    let mut found = Vec::new();
    walk(world, start, &initial, declared_raw, &mut found)?;

    let mut results = found.into_iter();
    let first = results.next().ok_or_else(|| TypeModelError::NotASupertype {
        sub: world.name(start).to_string(),
        sup: world.name(declared_raw).to_string(),
    })?;

    for other in results {
        for (name, value) in &first.types {
            if other.types.get(name) != Some(value) {
                return Err(TypeModelError::DiamondMismatch {
                    parameter: name.clone(),
                    first: render(value, world),
                    second: other
                        .types
                        .get(name)
                        .map(|v| render(v, world))
                        .unwrap_or_else(|| "<missing>".to_string()),
                });
            }
        }
        for (name, value) in &first.multiplicities {
            if other.multiplicities.get(name) != Some(value) {
                return Err(TypeModelError::DiamondMismatch {
                    parameter: name.clone(),
                    first: value.to_string(),
                    second: other
                        .multiplicities
                        .get(name)
                        .map(Multiplicity::to_string)
                        .unwrap_or_else(|| "<missing>".to_string()),
                });
            }
        }
    }

    Ok(first)
}

/// Binds a definition's own parameter names to the arguments carried by a
/// reference to it.
fn bind_own_arguments(
    id: TypeDefId,
    reference: &GenericType,
    world: &TypeWorld,
) -> Result<ResolvedArguments, TypeModelError> {
    let def = world.def(id);
    let (type_args, mult_args) = match reference {
        GenericType::Concrete {
            type_args,
            mult_args,
            ..
        } => (type_args.as_slice(), mult_args.as_slice()),
        GenericType::Parameter(_) => (&[] as &[GenericType], &[] as &[Multiplicity]),
    };

    if def.type_params().len() != type_args.len() {
        return Err(TypeModelError::ArgumentArity {
            type_name: def.name().to_string(),
            expected: def.type_params().len(),
            actual: type_args.len(),
        });
    }
    if def.mult_params().len() != mult_args.len() {
        return Err(TypeModelError::ArgumentArity {
            type_name: def.name().to_string(),
            expected: def.mult_params().len(),
            actual: mult_args.len(),
        });
    }

    let mut resolved = ResolvedArguments::default();
    for (name, value) in def.type_params().iter().zip(type_args) {
        resolved.types.insert(name.clone(), value.clone());
    }
    for (name, value) in def.mult_params().iter().zip(mult_args) {
        resolved.multiplicities.insert(name.clone(), value.clone());
    }
    Ok(resolved)
}

fn walk(
    world: &TypeWorld,
    current: TypeDefId,
    bindings: &ResolvedArguments,
    target: TypeDefId,
    found: &mut Vec<ResolvedArguments>,
) -> Result<(), TypeModelError> {
    if current == target {
        found.push(bindings.clone());
        return Ok(());
    }

    let substitution = bindings.as_bindings();
    for generalization in world.direct_generalizations(current) {
        let Some(sup) = generalization.raw_class() else {
            continue;
        };
        if !world.subtype_of(sup, target) {
            continue;
        }
        let instantiated = substitute(generalization, &substitution);
        let sup_bindings = bind_own_arguments(sup, &instantiated, world)?;
        walk(world, sup, &sup_bindings, target, found)?;
    }
    Ok(())
}
