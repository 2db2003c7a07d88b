//! Group structure on converters. Converters compose by concatenation, every converter has an
//! inverse, and the registry treats two units as the same when their converters are equivalent in
//! this group.

use std::fmt::Debug;

use crate::converter::UnitConverter;

pub trait GroupElement: Debug + Clone {}

impl<T: Debug + Clone> GroupElement for T {}

/// A group over elements of type `E`. The equivalence used by the group may be coarser than
/// `PartialEq` on `E`.
pub trait Group<E: GroupElement> {
    fn identity(&self) -> E;

    /// The element `b` with `ab = ba = e`.
    fn inv(&self, element: &E) -> E;

    /// Associative composition.
    fn compose(&self, a: &E, b: &E) -> E;

    fn equiv(&self, a: &E, b: &E) -> bool;

    /// Composes all elements in order. An empty sequence gives the identity.
    fn reduce<'a, T: IntoIterator<Item = &'a E>>(&self, elems: T) -> E
    where
        E: 'a,
    {
        elems
            .into_iter()
            .fold(self.identity(), |acc, el| self.compose(&acc, el))
    }

    fn is_identity(&self, a: &E) -> bool {
        self.equiv(a, &self.identity())
    }
}

/// Converters under concatenation. `compose(a, b)` applies `a` first. Equivalence tolerates
/// rounding in coefficients that could not be kept exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConverterGroup;

impl Group<UnitConverter> for ConverterGroup {
    fn identity(&self) -> UnitConverter {
        UnitConverter::Identity
    }

    fn inv(&self, element: &UnitConverter) -> UnitConverter {
        element.inverse()
    }

    fn compose(&self, a: &UnitConverter, b: &UnitConverter) -> UnitConverter {
        a.concatenate(b)
    }

    fn equiv(&self, a: &UnitConverter, b: &UnitConverter) -> bool {
        a.equivalent(b)
    }

    fn is_identity(&self, a: &UnitConverter) -> bool {
        a.is_identity() || a.equivalent(&UnitConverter::Identity)
    }
}
