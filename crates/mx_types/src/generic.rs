//! Generic types, function types, and the value-level operations over them.
//!
//! A [`GenericType`] is either a reference to a named type parameter or a
//! concrete type: a raw type plus ordered type arguments and, for function
//! types, ordered multiplicity arguments. Concreteness is transitive: a type
//! is concrete only if it and all of its arguments are.

use crate::model::{TypeDefId, TypeWorld};
use crate::multiplicity::Multiplicity;
use std::collections::BTreeMap;

/// The unparameterized type underlying a concrete [`GenericType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawType {
    /// A named definition in the [`TypeWorld`] arena.
    Class(TypeDefId),
    /// A structural function type, e.g. `{A[1]->B[*]}`.
    Function(Box<FunctionType>),
}

/// A single declared parameter of a [`FunctionType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub generic: GenericType,
    pub multiplicity: Multiplicity,
}

impl Parameter {
    pub fn new(generic: GenericType, multiplicity: Multiplicity) -> Self {
        Self {
            generic,
            multiplicity,
        }
    }
}

/// Ordered parameters plus the return type/multiplicity pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub params: Vec<Parameter>,
    pub return_type: GenericType,
    pub return_multiplicity: Multiplicity,
}

impl FunctionType {
    pub fn new(
        params: Vec<Parameter>,
        return_type: GenericType,
        return_multiplicity: Multiplicity,
    ) -> Self {
        Self {
            params,
            return_type,
            return_multiplicity,
        }
    }
}

/// A possibly parametric type reference.
///
/// Structural equality is derived equality: raw classes compare by arena
/// handle, function raw types recursively, parameters by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericType {
    /// Reference to a named type parameter, e.g. `T`.
    Parameter(String),
    /// A concrete type with its arguments.
    Concrete {
        raw: RawType,
        type_args: Vec<GenericType>,
        mult_args: Vec<Multiplicity>,
    },
}

impl GenericType {
    /// A class reference with no arguments.
    pub fn class(id: TypeDefId) -> Self {
        GenericType::Concrete {
            raw: RawType::Class(id),
            type_args: Vec::new(),
            mult_args: Vec::new(),
        }
    }

    /// A class reference with type arguments.
    pub fn class_with_args(id: TypeDefId, type_args: Vec<GenericType>) -> Self {
        GenericType::Concrete {
            raw: RawType::Class(id),
            type_args,
            mult_args: Vec::new(),
        }
    }

    /// A class reference with both type and multiplicity arguments.
    pub fn class_with_all_args(
        id: TypeDefId,
        type_args: Vec<GenericType>,
        mult_args: Vec<Multiplicity>,
    ) -> Self {
        GenericType::Concrete {
            raw: RawType::Class(id),
            type_args,
            mult_args,
        }
    }

    /// A function-typed reference.
    pub fn function(function_type: FunctionType) -> Self {
        GenericType::Concrete {
            raw: RawType::Function(Box::new(function_type)),
            type_args: Vec::new(),
            mult_args: Vec::new(),
        }
    }

    /// A reference to a named type parameter.
    pub fn parameter(name: impl Into<String>) -> Self {
        GenericType::Parameter(name.into())
    }

    /// Returns the parameter name when this reference is abstract.
    pub fn type_parameter_name(&self) -> Option<&str> {
        match self {
            GenericType::Parameter(name) => Some(name),
            GenericType::Concrete { .. } => None,
        }
    }

    /// The arena handle of the raw class, when the raw type is a class.
    pub fn raw_class(&self) -> Option<TypeDefId> {
        match self {
            GenericType::Concrete {
                raw: RawType::Class(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }

    /// The function type behind the raw type, when there is one.
    pub fn raw_function(&self) -> Option<&FunctionType> {
        match self {
            GenericType::Concrete {
                raw: RawType::Function(function_type),
                ..
            } => Some(function_type),
            _ => None,
        }
    }

    /// Transitive concreteness: the reference itself and every nested type
    /// and multiplicity argument must be resolved.
    pub fn is_concrete(&self) -> bool {
        match self {
            GenericType::Parameter(_) => false,
            GenericType::Concrete {
                raw,
                type_args,
                mult_args,
            } => {
                let raw_concrete = match raw {
                    RawType::Class(_) => true,
                    RawType::Function(function_type) => {
                        function_type.params.iter().all(|parameter| {
                            parameter.generic.is_concrete()
                                && parameter.multiplicity.is_concrete()
                        }) && function_type.return_type.is_concrete()
                            && function_type.return_multiplicity.is_concrete()
                    }
                };
                raw_concrete
                    && type_args.iter().all(GenericType::is_concrete)
                    && mult_args.iter().all(Multiplicity::is_concrete)
            }
        }
    }
}

/// Name-indexed bindings used when substituting parameters away.
#[derive(Debug, Clone, Default)]
pub struct TypeBindings {
    pub types: BTreeMap<String, GenericType>,
    pub multiplicities: BTreeMap<String, Multiplicity>,
}

impl TypeBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.multiplicities.is_empty()
    }
}

/// Replaces named parameters with their bound values, recursively, including
/// inside function raw types. Unbound names stay abstract, so the result is
/// only as concrete as the bindings allow.
pub fn substitute(generic: &GenericType, bindings: &TypeBindings) -> GenericType {
    match generic {
        GenericType::Parameter(name) => bindings
            .types
            .get(name)
            .cloned()
            .unwrap_or_else(|| generic.clone()),
        GenericType::Concrete {
            raw,
            type_args,
            mult_args,
        } => GenericType::Concrete {
            raw: match raw {
                RawType::Class(id) => RawType::Class(*id),
                RawType::Function(function_type) => RawType::Function(Box::new(FunctionType::new(
                    function_type
                        .params
                        .iter()
                        .map(|parameter| {
                            Parameter::new(
                                substitute(&parameter.generic, bindings),
                                substitute_multiplicity(&parameter.multiplicity, bindings),
                            )
                        })
                        .collect(),
                    substitute(&function_type.return_type, bindings),
                    substitute_multiplicity(&function_type.return_multiplicity, bindings),
                ))),
            },
            type_args: type_args
                .iter()
                .map(|arg| substitute(arg, bindings))
                .collect(),
            mult_args: mult_args
                .iter()
                .map(|arg| substitute_multiplicity(arg, bindings))
                .collect(),
        },
    }
}

/// Multiplicity counterpart of [`substitute`].
pub fn substitute_multiplicity(
    multiplicity: &Multiplicity,
    bindings: &TypeBindings,
) -> Multiplicity {
    match multiplicity.parameter_name() {
        Some(name) => bindings
            .multiplicities
            .get(name)
            .cloned()
            .unwrap_or_else(|| multiplicity.clone()),
        None => multiplicity.clone(),
    }
}

/// Renders a generic type in the surface syntax, e.g. `Box<Integer>`,
/// `Pair<K, V|[1],[m]>`, `{A[1]->B[*]}`.
pub fn render(generic: &GenericType, world: &TypeWorld) -> String {
    match generic {
        GenericType::Parameter(name) => name.clone(),
        GenericType::Concrete {
            raw,
            type_args,
            mult_args,
        } => {
            let mut out = match raw {
                RawType::Class(id) => world.name(*id).to_string(),
                RawType::Function(function_type) => {
                    return render_function_type(function_type, world)
                }
            };
            if !type_args.is_empty() || !mult_args.is_empty() {
                out.push('<');
                out.push_str(
                    &type_args
                        .iter()
                        .map(|arg| render(arg, world))
                        .collect::<Vec<_>>()
                        .join(", "),
                );
                if !mult_args.is_empty() {
                    out.push('|');
                    out.push_str(
                        &mult_args
                            .iter()
                            .map(Multiplicity::to_string)
                            .collect::<Vec<_>>()
                            .join(","),
                    );
                }
                out.push('>');
            }
            out
        }
    }
}

/// Renders a function type as `{A[1], B[m]->C[*]}`.
pub fn render_function_type(function_type: &FunctionType, world: &TypeWorld) -> String {
    let params = function_type
        .params
        .iter()
        .map(|parameter| {
            format!(
                "{}{}",
                render(&parameter.generic, world),
                parameter.multiplicity
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{{{}->{}{}}}",
        params,
        render(&function_type.return_type, world),
        function_type.return_multiplicity
    )
}
