//! Trace output contract: the engine's events as seen by the recording
//! handler.

use super::fixtures::{fixture, one};
use crate::observer::{ObserverStack, SourceId};
use crate::unify::{Argument, CallExpression, Unifier};
use mx_types::{FunctionType, GenericType, Multiplicity, Parameter};

fn probe() -> SourceId {
    SourceId::new("probe.mx")
}

#[test]
fn successful_inference_emits_the_stable_event_sequence() {
    let f = fixture();
    let mut observer = ObserverStack::with_diagnostic_source(probe());
    observer.enter(&probe());

    let declared = FunctionType::new(
        vec![Parameter::new(
            GenericType::parameter("T"),
            Multiplicity::parameter("m"),
        )],
        GenericType::parameter("T"),
        one(),
    );
    let call = CallExpression::new(
        "map",
        vec![Argument::new(GenericType::class(f.integer), one())],
    );

    let mut unifier = Unifier::new(&f.world, &mut observer);
    unifier.infer(&declared, &call).unwrap();
    observer.exit();

    let lines = observer.recorded_lines();
    assert!(lines.iter().any(|l| l.contains("function-entry: map/1")));
    assert!(lines.iter().any(|l| l.contains("parameter-matched: #0 T <- Integer")));
    assert!(lines.iter().any(|l| l.contains("return-type-resolved: Integer")));
    assert!(lines.iter().any(|l| l.contains("candidate-matched: map")));
}

#[test]
fn widening_is_traced() {
    let f = fixture();
    let mut observer = ObserverStack::with_diagnostic_source(probe());
    observer.enter(&probe());

    let declared = FunctionType::new(
        vec![
            Parameter::new(GenericType::parameter("T"), Multiplicity::parameter("m")),
            Parameter::new(GenericType::parameter("T"), Multiplicity::parameter("m")),
        ],
        GenericType::parameter("T"),
        one(),
    );
    let call = CallExpression::new(
        "zip",
        vec![
            Argument::new(GenericType::class(f.integer), Multiplicity::exactly(1)),
            Argument::new(GenericType::class(f.float), Multiplicity::exactly(2)),
        ],
    );

    let mut unifier = Unifier::new(&f.world, &mut observer);
    unifier.infer(&declared, &call).unwrap();
    observer.exit();

    let lines = observer.recorded_lines();
    assert!(lines
        .iter()
        .any(|l| l.contains("type-widened: T: Integer ~> Number")));
    assert!(lines
        .iter()
        .any(|l| l.contains("multiplicity-widened: m: [1] ~> [1..2]")));
}

#[test]
fn arity_failure_is_traced_as_inference_failed() {
    let f = fixture();
    let mut observer = ObserverStack::with_diagnostic_source(probe());
    observer.enter(&probe());

    let declared = FunctionType::new(
        vec![Parameter::new(GenericType::parameter("T"), one())],
        GenericType::parameter("T"),
        one(),
    );
    let call = CallExpression::new(
        "map",
        vec![
            Argument::new(GenericType::class(f.integer), one()),
            Argument::new(GenericType::class(f.integer), one()),
        ],
    );

    let mut unifier = Unifier::new(&f.world, &mut observer);
    unifier.infer(&declared, &call).unwrap_err();
    observer.exit();

    let lines = observer.recorded_lines();
    assert!(lines
        .iter()
        .any(|l| l.contains("inference-failed: map: expected 1 argument(s), found 2")));
    assert!(!lines.iter().any(|l| l.contains("candidate-matched")));
}

#[test]
fn silent_stack_records_nothing_during_inference() {
    let f = fixture();
    let mut observer = ObserverStack::silent();
    observer.enter(&SourceId::new("app.mx"));

    let declared = FunctionType::new(
        vec![Parameter::new(GenericType::parameter("T"), one())],
        GenericType::parameter("T"),
        one(),
    );
    let call = CallExpression::new(
        "map",
        vec![Argument::new(GenericType::class(f.integer), one())],
    );

    let mut unifier = Unifier::new(&f.world, &mut observer);
    unifier.infer(&declared, &call).unwrap();
    observer.exit();

    assert!(observer.recorded_lines().is_empty());
    assert!(!observer.is_tracing());
}
