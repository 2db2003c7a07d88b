//! Physical dimensions as vectors of rational exponents over the seven SI base dimensions.

use std::fmt::Display;

use crate::error::UnitError;
use crate::fraction::{BaseInt, Fraction};
use crate::symbols::superscript;

/// The SI base dimensions, in the conventional order M, L, T, I, Θ, N, J.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseDimension {
    Mass,
    Length,
    Time,
    ElectricCurrent,
    Temperature,
    AmountOfSubstance,
    LuminousIntensity,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; 7] = [
        Self::Mass,
        Self::Length,
        Self::Time,
        Self::ElectricCurrent,
        Self::Temperature,
        Self::AmountOfSubstance,
        Self::LuminousIntensity,
    ];

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Mass => "M",
            Self::Length => "L",
            Self::Time => "T",
            Self::ElectricCurrent => "I",
            Self::Temperature => "Θ",
            Self::AmountOfSubstance => "N",
            Self::LuminousIntensity => "J",
        }
    }

    /// The symbol of the SI base unit.
    pub const fn unit_symbol(&self) -> &'static str {
        match self {
            Self::Mass => "kg",
            Self::Length => "m",
            Self::Time => "s",
            Self::ElectricCurrent => "A",
            Self::Temperature => "K",
            Self::AmountOfSubstance => "mol",
            Self::LuminousIntensity => "cd",
        }
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

/// An immutable dimension. Equality is exact on the reduced exponents; the all-zero dimension is
/// the dimensionless identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    exponents: [Fraction; 7],
}

impl Dimension {
    pub const NONE: Dimension = Dimension {
        exponents: [Fraction::ZERO; 7],
    };

    /// A dimension from integer exponents in the order M, L, T, I, Θ, N, J.
    pub const fn from_ints(exps: [BaseInt; 7]) -> Self {
        let mut exponents = [Fraction::ZERO; 7];
        let mut i = 0;
        while i < 7 {
            exponents[i] = Fraction::from_int(exps[i]);
            i += 1;
        }
        Self { exponents }
    }

    pub const fn base(dim: BaseDimension) -> Self {
        let mut exponents = [Fraction::ZERO; 7];
        exponents[dim.index()] = Fraction::ONE;
        Self { exponents }
    }

    pub const fn exponent(&self, dim: BaseDimension) -> Fraction {
        self.exponents[dim.index()]
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(Fraction::is_zero)
    }

    fn zip_with(
        &self,
        other: &Self,
        op: impl Fn(&Fraction, &Fraction) -> Option<Fraction>,
    ) -> Result<Self, UnitError> {
        let mut exponents = [Fraction::ZERO; 7];
        for (i, exp) in exponents.iter_mut().enumerate() {
            *exp = op(&self.exponents[i], &other.exponents[i])
                .ok_or(UnitError::Overflow("dimension exponent"))?;
        }
        Ok(Self { exponents })
    }

    fn map(&self, op: impl Fn(&Fraction) -> Option<Fraction>) -> Result<Self, UnitError> {
        self.zip_with(&Self::NONE, |a, _| op(a))
    }

    pub fn multiply(&self, other: &Self) -> Result<Self, UnitError> {
        self.zip_with(other, Fraction::checked_add)
    }

    pub fn divide(&self, other: &Self) -> Result<Self, UnitError> {
        self.zip_with(other, Fraction::checked_sub)
    }

    pub fn pow(&self, n: i32) -> Result<Self, UnitError> {
        let n = Fraction::from_int(n as BaseInt);
        self.map(|e| e.checked_mul(&n))
    }

    /// Divides every exponent by `n`. Fails with [`UnitError::ZeroRoot`] when `n` is zero.
    pub fn root(&self, n: i32) -> Result<Self, UnitError> {
        if n == 0 {
            return Err(UnitError::ZeroRoot);
        }
        let n = Fraction::from_int(n as BaseInt);
        self.map(|e| e.checked_div(&n))
    }

    pub fn inverse(&self) -> Self {
        let mut exponents = self.exponents;
        for exp in exponents.iter_mut() {
            *exp = -*exp;
        }
        Self { exponents }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let parts: Vec<String> = BaseDimension::ALL
            .iter()
            .filter(|b| !self.exponent(**b).is_zero())
            .map(|b| {
                let exp = self.exponent(*b);
                if exp == Fraction::ONE {
                    b.symbol().to_string()
                } else if exp.is_integer() {
                    format!("{}{}", b.symbol(), superscript(exp.numerator()))
                } else {
                    format!("{}^({})", b.symbol(), exp)
                }
            })
            .collect();
        write!(f, "{}", parts.join("⋅"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frac;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use BaseDimension::*;

    fn force() -> Dimension {
        Dimension::from_ints([1, 1, -2, 0, 0, 0, 0])
    }

    #[test]
    fn test_arithmetic() {
        let length = Dimension::base(Length);
        let energy = force().multiply(&length).unwrap();
        assert_eq!(energy, Dimension::from_ints([1, 2, -2, 0, 0, 0, 0]));
        assert_eq!(energy.divide(&length).unwrap(), force());
        assert_eq!(length.pow(3).unwrap().root(3).unwrap(), length);
        assert_eq!(length.root(3).unwrap().exponent(Length), frac!(1 / 3));
        assert!(length.divide(&length).unwrap().is_dimensionless());
    }

    #[test]
    fn test_root_zero() {
        assert_eq!(Dimension::base(Time).root(0), Err(UnitError::ZeroRoot));
    }

    #[test]
    fn test_display() {
        assert_eq!(force().to_string(), "M⋅L⋅T⁻²");
        assert_eq!(Dimension::NONE.to_string(), "1");
        assert_eq!(
            Dimension::base(Length).pow(2).unwrap().root(3).unwrap().to_string(),
            "L^(2/3)"
        );
        assert_eq!(Dimension::base(Temperature).to_string(), "Θ");
    }

    fn dimension() -> impl Strategy<Value = Dimension> {
        prop::array::uniform7(-4i64..=4).prop_map(Dimension::from_ints)
    }

    proptest! {
        #[test]
        fn test_group_laws(a in dimension(), b in dimension(), c in dimension()) {
            let ab_c = a.multiply(&b).unwrap().multiply(&c).unwrap();
            let a_bc = a.multiply(&b.multiply(&c).unwrap()).unwrap();
            prop_assert_eq!(ab_c, a_bc);
            prop_assert_eq!(a.multiply(&Dimension::NONE).unwrap(), a);
            prop_assert!(a.multiply(&a.inverse()).unwrap().is_dimensionless());
            prop_assert_eq!(a.divide(&b).unwrap(), a.multiply(&b.inverse()).unwrap());
        }
    }
}
