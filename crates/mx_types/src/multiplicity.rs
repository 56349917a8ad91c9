//! Multiplicity (cardinality) values and the pure operations over them.
//!
//! A multiplicity constrains how many values a parameter or property may
//! hold. It is either a concrete `[lower..upper]` range (upper possibly
//! unbounded) or a reference to a named multiplicity parameter awaiting
//! inference. Concreteness is a leaf property: a multiplicity never nests.

use crate::error::TypeModelError;
use std::fmt;

/// A cardinality constraint, concrete or parametric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// Reference to a named multiplicity parameter, e.g. `m` in `T[m]`.
    Parameter(String),
    /// A resolved `[lower..upper]` range. `upper == None` means unbounded.
    Concrete { lower: u32, upper: Option<u32> },
}

impl Multiplicity {
    /// Builds a concrete `[lower..upper]` multiplicity.
    pub fn concrete(lower: u32, upper: Option<u32>) -> Self {
        Multiplicity::Concrete { lower, upper }
    }

    /// Builds the exact multiplicity `[n..n]`.
    pub fn exactly(n: u32) -> Self {
        Multiplicity::Concrete {
            lower: n,
            upper: Some(n),
        }
    }

    /// `[0..1]`
    pub fn zero_or_one() -> Self {
        Multiplicity::Concrete {
            lower: 0,
            upper: Some(1),
        }
    }

    /// `[0..*]`
    pub fn zero_to_many() -> Self {
        Multiplicity::Concrete {
            lower: 0,
            upper: None,
        }
    }

    /// `[1..*]`
    pub fn one_to_many() -> Self {
        Multiplicity::Concrete {
            lower: 1,
            upper: None,
        }
    }

    /// Builds a reference to a named multiplicity parameter.
    pub fn parameter(name: impl Into<String>) -> Self {
        Multiplicity::Parameter(name.into())
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Multiplicity::Concrete { .. })
    }

    /// Returns the parameter name when this multiplicity is abstract.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Multiplicity::Parameter(name) => Some(name),
            Multiplicity::Concrete { .. } => None,
        }
    }

    /// Returns `(lower, upper)` when concrete.
    pub fn bounds(&self) -> Option<(u32, Option<u32>)> {
        match self {
            Multiplicity::Concrete { lower, upper } => Some((*lower, *upper)),
            Multiplicity::Parameter(_) => None,
        }
    }

    /// Whether every cardinality valid for `other` is also valid for `self`.
    ///
    /// Both multiplicities must be concrete; asking about subsumption of an
    /// unresolved parameter is a caller error.
    pub fn subsumes(&self, other: &Multiplicity) -> Result<bool, TypeModelError> {
        let (sub_lower, sub_upper) = self.require_concrete()?;
        let (other_lower, other_upper) = other.require_concrete()?;
        if other_lower < sub_lower {
            return Ok(false);
        }
        match (sub_upper, other_upper) {
            (None, _) => Ok(true),
            (Some(_), None) => Ok(false),
            (Some(a), Some(b)) => Ok(b <= a),
        }
    }

    /// The smallest concrete range subsuming both inputs.
    ///
    /// If either input is abstract the result is `[0..*]`: an unresolved
    /// parameter could stand for any range, so only the unbounded range is a
    /// safe cover.
    pub fn min_subsuming(&self, other: &Multiplicity) -> Multiplicity {
        match (self.bounds(), other.bounds()) {
            (Some((lower_a, upper_a)), Some((lower_b, upper_b))) => Multiplicity::Concrete {
                lower: lower_a.min(lower_b),
                upper: match (upper_a, upper_b) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                },
            },
            _ => Multiplicity::zero_to_many(),
        }
    }

    /// Folds [`Multiplicity::min_subsuming`] over a non-empty sequence.
    ///
    /// Returns `None` for an empty input.
    pub fn min_subsuming_all<'a>(
        multiplicities: impl IntoIterator<Item = &'a Multiplicity>,
    ) -> Option<Multiplicity> {
        let mut iter = multiplicities.into_iter();
        let first = iter.next()?;
        let seed = if first.is_concrete() {
            first.clone()
        } else {
            Multiplicity::zero_to_many()
        };
        Some(iter.fold(seed, |acc, next| acc.min_subsuming(next)))
    }

    fn require_concrete(&self) -> Result<(u32, Option<u32>), TypeModelError> {
        self.bounds()
            .ok_or_else(|| TypeModelError::NonConcreteMultiplicity {
                multiplicity: self.to_string(),
            })
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplicity::Parameter(name) => write!(f, "[{name}]"),
            Multiplicity::Concrete { lower, upper } => match upper {
                Some(upper) if upper == lower => write!(f, "[{lower}]"),
                Some(upper) => write!(f, "[{lower}..{upper}]"),
                None if *lower == 0 => write!(f, "[*]"),
                None => write!(f, "[{lower}..*]"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concreteness_is_a_leaf_property() {
        assert!(Multiplicity::exactly(1).is_concrete());
        assert!(Multiplicity::zero_to_many().is_concrete());
        assert!(!Multiplicity::parameter("m").is_concrete());
    }

    #[test]
    fn subsumes_compares_ranges() {
        let zero_many = Multiplicity::zero_to_many();
        let one = Multiplicity::exactly(1);
        let one_many = Multiplicity::one_to_many();

        assert!(zero_many.subsumes(&one).unwrap());
        assert!(zero_many.subsumes(&one_many).unwrap());
        assert!(!one.subsumes(&zero_many).unwrap());
        assert!(!one.subsumes(&Multiplicity::exactly(2)).unwrap());
        assert!(one_many.subsumes(&Multiplicity::exactly(5)).unwrap());
    }

    #[test]
    fn subsumes_rejects_abstract_inputs() {
        let err = Multiplicity::parameter("m")
            .subsumes(&Multiplicity::exactly(1))
            .unwrap_err();
        assert!(matches!(
            err,
            TypeModelError::NonConcreteMultiplicity { .. }
        ));
    }

    #[test]
    fn min_subsuming_widens_to_the_covering_range() {
        let one = Multiplicity::exactly(1);
        let two = Multiplicity::exactly(2);
        assert_eq!(one.min_subsuming(&two), Multiplicity::concrete(1, Some(2)));

        let zero_one = Multiplicity::zero_or_one();
        let one_many = Multiplicity::one_to_many();
        assert_eq!(
            zero_one.min_subsuming(&one_many),
            Multiplicity::zero_to_many()
        );
    }

    #[test]
    fn min_subsuming_with_abstract_input_is_zero_to_many() {
        let m = Multiplicity::parameter("m");
        assert_eq!(
            m.min_subsuming(&Multiplicity::exactly(1)),
            Multiplicity::zero_to_many()
        );
        assert_eq!(
            Multiplicity::exactly(1).min_subsuming(&m),
            Multiplicity::zero_to_many()
        );
    }

    #[test]
    fn min_subsuming_all_folds_left() {
        let inputs = [
            Multiplicity::exactly(1),
            Multiplicity::exactly(3),
            Multiplicity::zero_or_one(),
        ];
        assert_eq!(
            Multiplicity::min_subsuming_all(&inputs),
            Some(Multiplicity::concrete(0, Some(3)))
        );
        assert_eq!(Multiplicity::min_subsuming_all([]), None);
    }

    #[test]
    fn display_uses_the_compact_forms() {
        assert_eq!(Multiplicity::exactly(1).to_string(), "[1]");
        assert_eq!(Multiplicity::concrete(1, Some(4)).to_string(), "[1..4]");
        assert_eq!(Multiplicity::zero_to_many().to_string(), "[*]");
        assert_eq!(Multiplicity::one_to_many().to_string(), "[1..*]");
        assert_eq!(Multiplicity::parameter("m").to_string(), "[m]");
    }
}
