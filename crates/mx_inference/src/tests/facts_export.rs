//! JSON projection of a solved attempt.

use super::fixtures::{fixture, one};
use crate::facts::SolutionFacts;
use crate::observer::ObserverStack;
use crate::unify::{Argument, CallExpression, Unifier};
use mx_types::{FunctionType, GenericType, Multiplicity, Parameter};
use serde_json::json;

#[test]
fn solution_facts_render_both_maps_deterministically() {
    let f = fixture();
    let mut observer = ObserverStack::silent();
    let mut unifier = Unifier::new(&f.world, &mut observer);

    let declared = FunctionType::new(
        vec![Parameter::new(
            GenericType::class_with_args(f.boxed, vec![GenericType::parameter("T")]),
            Multiplicity::parameter("m"),
        )],
        GenericType::parameter("T"),
        one(),
    );
    let call = CallExpression::new(
        "unbox",
        vec![Argument::new(
            GenericType::class_with_args(f.boxed, vec![GenericType::class(f.integer)]),
            one(),
        )],
    );

    let solution = unifier.infer(&declared, &call).unwrap();
    let facts = SolutionFacts::from_solution(&solution, &f.world);

    assert_eq!(
        facts.to_json(),
        json!({
            "typeParameters": { "T": "Integer" },
            "multiplicityParameters": { "m": "[1]" },
        })
    );

    let pretty = facts.to_pretty_json().unwrap();
    assert!(pretty.contains("\"typeParameters\""));
    assert!(pretty.contains("\"T\": \"Integer\""));
}
