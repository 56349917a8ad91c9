//! Collection literals: per-element states and the widening merge.

use super::fixtures::{fixture, one};
use crate::observer::ObserverStack;
use crate::state::{merge_collection_states, ContextId, ContextStack};
use crate::unify::{Argument, CallExpression, Unifier};
use mx_types::{FunctionType, GenericType, Multiplicity, Parameter};

#[test]
fn element_states_merge_back_through_the_joins() {
    let f = fixture();
    let mut observer = ObserverStack::silent();
    let mut unifier = Unifier::new(&f.world, &mut observer);

    // The surrounding expression has already introduced `T` and `m` but
    // knows nothing about them yet.
    let mut stack = ContextStack::new();
    if let Some(base) = stack.current_mut() {
        base.put_type_param("T", GenericType::parameter("T"), ContextId::new(0), false);
        base.put_mult_param(
            "m",
            Multiplicity::parameter("m"),
            ContextId::new(0),
            false,
        );
    }

    let declared = FunctionType::new(
        vec![Parameter::new(
            GenericType::parameter("T"),
            Multiplicity::parameter("m"),
        )],
        GenericType::parameter("T"),
        one(),
    );

    // Each element of the collection literal is unified into its own state
    // branched from the base.
    let elements = [
        (GenericType::class(f.integer), Multiplicity::exactly(1)),
        (GenericType::class(f.float), Multiplicity::exactly(3)),
    ];
    for (generic, multiplicity) in elements {
        stack.add_state_for_collection_element();
        let call = CallExpression::new("wrap", vec![Argument::new(generic, multiplicity)]);
        let state = stack.current_mut().expect("element state");
        unifier.infer_into(&declared, &call, state).unwrap();
    }

    let mut dropped = stack.drop_states(2);
    assert_eq!(dropped.len(), 3);
    let mut base = dropped.remove(0);
    merge_collection_states(&mut base, &dropped, &f.world);

    assert_eq!(
        base.get_type_param("T").unwrap().value(),
        &GenericType::class(f.number)
    );
    assert_eq!(
        base.get_mult_param("m").unwrap().value(),
        &Multiplicity::concrete(1, Some(3))
    );
}

#[test]
fn merge_leaves_parameters_no_element_touched() {
    let f = fixture();
    let mut stack = ContextStack::new();
    if let Some(base) = stack.current_mut() {
        base.put_type_param("T", GenericType::parameter("T"), ContextId::new(0), false);
    }
    stack.add_state_for_collection_element();

    let mut dropped = stack.drop_states(1);
    let mut base = dropped.remove(0);
    merge_collection_states(&mut base, &dropped, &f.world);

    assert_eq!(
        base.get_type_param("T").unwrap().value(),
        &GenericType::parameter("T")
    );
}
