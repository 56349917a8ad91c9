//! Shared type hierarchy for the engine scenarios.

use mx_types::{GenericType, Multiplicity, TypeDef, TypeDefId, TypeWorld};

pub struct Fixture {
    pub world: TypeWorld,
    pub number: TypeDefId,
    pub integer: TypeDefId,
    pub float: TypeDefId,
    pub string: TypeDefId,
    pub boxed: TypeDefId,
    pub special_box: TypeDefId,
    pub list: TypeDefId,
}

pub fn fixture() -> Fixture {
    let mut world = TypeWorld::new();
    let number = world.define(TypeDef::named("Number"));
    let integer =
        world.define(TypeDef::named("Integer").with_generalization(GenericType::class(number)));
    let float =
        world.define(TypeDef::named("Float").with_generalization(GenericType::class(number)));
    let string = world.define(TypeDef::named("String"));
    let boxed = world.define(TypeDef::named("Box").with_type_params(["T"]));
    // SpecialBox<A, B> extends Box<B>: its own argument ordering deliberately
    // differs from the supertype's parameter list.
    let special_box = world.define(
        TypeDef::named("SpecialBox")
            .with_type_params(["A", "B"])
            .with_generalization(GenericType::class_with_args(
                boxed,
                vec![GenericType::parameter("B")],
            )),
    );
    let list = world.define(TypeDef::named("List").with_type_params(["E"]));
    Fixture {
        world,
        number,
        integer,
        float,
        string,
        boxed,
        special_box,
        list,
    }
}

pub fn one() -> Multiplicity {
    Multiplicity::exactly(1)
}
