//! Values paired with units.
//!
//! Operands on a ratio scale combine directly in the left operand's unit. Operands on an interval
//! scale, like degrees Celsius, are first expressed in their system unit so that `2 °C + 3 K` and
//! `3 K + 2 °C` describe the same temperature.

use std::fmt::Display;
use std::hash::{Hash, Hasher};

use approx::{AbsDiffEq, RelativeEq};

use crate::error::UnitError;
use crate::quantity_kind::QuantityKind;
use crate::unit::Unit;
use crate::units::Units;

/// An immutable amount of some unit. Every operation returns a new quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    value: f64,
    unit: Unit,
    /// The kind of the unit's system unit, or `None` for a generic quantity.
    kind: Option<QuantityKind>,
}

impl Quantity {
    pub fn create(value: f64, unit: &Unit) -> Self {
        Self {
            value,
            unit: unit.clone(),
            kind: unit.quantity_kind(),
        }
    }

    /// A quantity whose unit is given as text, in any form [`Units::value_of`] accepts.
    pub fn create_from_symbol(value: f64, unit: &str) -> Result<Self, UnitError> {
        Ok(Self::create(value, &Units::value_of(unit)?))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn kind(&self) -> Option<QuantityKind> {
        self.kind
    }

    /// This quantity expressed in `unit`.
    pub fn to(&self, unit: &Unit) -> Result<Self, UnitError> {
        if unit.is_same(&self.unit) {
            return Ok(self.clone());
        }
        let converter = self.unit.converter_to(unit)?;
        Ok(Self::create(converter.convert(self.value), unit))
    }

    /// The value in the system unit.
    fn system_value(&self) -> f64 {
        self.unit.converter_to_system().convert(self.value)
    }

    /// This quantity, promoted to its system unit if its unit has an offset.
    fn on_ratio_scale(&self) -> Self {
        if self.unit.is_ratio_scale() {
            self.clone()
        } else {
            Self::create(self.system_value(), &self.unit.system_unit())
        }
    }

    fn combine(&self, other: &Quantity, sign: f64) -> Result<Self, UnitError> {
        if self.unit.is_ratio_scale() && other.unit.is_ratio_scale() {
            let value = other.unit.converter_to(&self.unit)?.convert(other.value);
            return Ok(Self::create(self.value + sign * value, &self.unit));
        }
        let system = self.unit.system_unit();
        let value = other.unit.converter_to(&system)?.convert(other.value);
        Self::create(self.system_value() + sign * value, &system).to(&self.unit)
    }

    /// Applies `op` to the value on a ratio scale, then returns to this quantity's unit.
    fn scale(&self, op: impl FnOnce(f64) -> f64) -> Self {
        if self.unit.is_ratio_scale() {
            return Self::create(op(self.value), &self.unit);
        }
        let system = Self::create(op(self.system_value()), &self.unit.system_unit());
        system.to(&self.unit).unwrap_or(system)
    }

    pub fn add(&self, other: &Quantity) -> Result<Self, UnitError> {
        self.combine(other, 1.0)
    }

    pub fn subtract(&self, other: &Quantity) -> Result<Self, UnitError> {
        self.combine(other, -1.0)
    }

    pub fn multiply(&self, other: &Quantity) -> Result<Self, UnitError> {
        let (a, b) = (self.on_ratio_scale(), other.on_ratio_scale());
        Ok(Self::create(a.value * b.value, &a.unit.multiply(&b.unit)?))
    }

    pub fn divide(&self, other: &Quantity) -> Result<Self, UnitError> {
        let (a, b) = (self.on_ratio_scale(), other.on_ratio_scale());
        Ok(Self::create(a.value / b.value, &a.unit.divide(&b.unit)?))
    }

    pub fn multiply_by(&self, factor: f64) -> Self {
        self.scale(|v| v * factor)
    }

    pub fn divide_by(&self, divisor: f64) -> Self {
        self.scale(|v| v / divisor)
    }

    pub fn inverse(&self) -> Result<Self, UnitError> {
        let q = self.on_ratio_scale();
        Ok(Self::create(1.0 / q.value, &q.unit.inverse()?))
    }

    /// The same value in this unit relabelled as measuring `kind`.
    pub fn as_type(&self, kind: QuantityKind) -> Result<Self, UnitError> {
        Ok(Self::create(self.value, &self.unit.as_type(kind)?))
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal values hash alike: -0.0 + 0.0 is 0.0.
        (self.value + 0.0).to_bits().hash(state);
        self.unit.hash(state);
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = self.unit.to_string();
        if unit.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, unit)
        }
    }
}

/// Compares in the left operand's unit. Incompatible quantities are never equal.
impl AbsDiffEq for Quantity {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        other
            .to(&self.unit)
            .is_ok_and(|o| self.value.abs_diff_eq(&o.value, epsilon))
    }
}

impl RelativeEq for Quantity {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        other
            .to(&self.unit)
            .is_ok_and(|o| self.value.relative_eq(&o.value, epsilon, max_relative))
    }
}

/// Something holding a value and a unit symbol, which can be copied into a [`Quantity`].
pub trait QuantityLike {
    fn value(&self) -> f64;

    fn unit_symbol(&self) -> String;

    /// The quantity itself, when the implementation is already one.
    fn as_quantity(&self) -> Option<&Quantity> {
        None
    }
}

impl QuantityLike for Quantity {
    fn value(&self) -> f64 {
        self.value
    }

    fn unit_symbol(&self) -> String {
        self.unit.to_string()
    }

    fn as_quantity(&self) -> Option<&Quantity> {
        Some(self)
    }
}

/// The quantity itself if it is already a [`Quantity`], otherwise a copy with the same value and
/// unit. Fails if the unit symbol is not one this crate knows.
pub fn cast_or_copy<Q: QuantityLike + ?Sized>(quantity: &Q) -> Result<Quantity, UnitError> {
    if let Some(q) = quantity.as_quantity() {
        return Ok(q.clone());
    }
    let unit = Units::value_of(&quantity.unit_symbol())
        .map_err(|_| UnitError::UnsupportedImplementation(std::any::type_name::<Q>().to_string()))?;
    Ok(Quantity::create(quantity.value(), &unit))
}

fn min_or_max<'a>(
    q1: Option<&'a Quantity>,
    q2: Option<&'a Quantity>,
    max: bool,
) -> Result<Option<&'a Quantity>, UnitError> {
    let (q1, q2) = match (q1, q2) {
        (None, q) | (q, None) => return Ok(q),
        (Some(q1), Some(q2)) => (q1, q2),
    };
    let (s1, s2) = (q1.unit.system_unit(), q2.unit.system_unit());
    if s1 != s2 {
        return Err(UnitError::Incommensurable {
            from: q1.unit.to_string(),
            to: q2.unit.to_string(),
            from_dim: s1.dimension().to_string(),
            to_dim: s2.dimension().to_string(),
        });
    }
    let (v1, v2) = (q1.system_value(), q2.system_value());
    if v2.is_nan() {
        return Ok(Some(q1));
    }
    if v1.is_nan() {
        return Ok(Some(q2));
    }
    let first = if max { v1 >= v2 } else { v1 <= v2 };
    Ok(Some(if first { q1 } else { q2 }))
}

/// The smaller of two quantities of the same system unit. A missing or NaN operand is never
/// chosen over a defined one, and ties return `q1`.
pub fn min<'a>(
    q1: Option<&'a Quantity>,
    q2: Option<&'a Quantity>,
) -> Result<Option<&'a Quantity>, UnitError> {
    min_or_max(q1, q2, false)
}

/// The larger of two quantities, with the same rules as [`min`].
pub fn max<'a>(
    q1: Option<&'a Quantity>,
    q2: Option<&'a Quantity>,
) -> Result<Option<&'a Quantity>, UnitError> {
    min_or_max(q1, q2, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use pretty_assertions::assert_eq;

    fn hash_of(q: &Quantity) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        q.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_signed_zero_hash() {
        let u = Units::global();
        let zero = Quantity::create(0.0, &u.metre);
        let negative_zero = Quantity::create(-0.0, &u.metre);
        assert_eq!(zero, negative_zero);
        assert_eq!(hash_of(&zero), hash_of(&negative_zero));
        assert_ne!(hash_of(&zero), hash_of(&Quantity::create(1.0, &u.metre)));
    }

    #[test]
    fn test_create() {
        let u = Units::global();
        let q = Quantity::create(5.0, &u.kilometre);
        assert_eq!(q.kind(), Some(QuantityKind::Length));
        assert_eq!(q.to_string(), "5 km");
        assert_eq!(Quantity::create(0.5, &u.unity).to_string(), "0.5");
        let q = Quantity::create_from_symbol(3.0, "metres per second").unwrap();
        assert!(q.unit().is_same(&u.metres_per_second));
        assert_eq!(q.kind(), Some(QuantityKind::Speed));
        assert!(Quantity::create_from_symbol(3.0, "furlongs").is_err());
    }

    #[test]
    fn test_to() {
        let u = Units::global();
        let q = Quantity::create(5.0, &u.kilometre).to(&u.metre).unwrap();
        assert_eq!(q.value(), 5000.0);
        let q = Quantity::create(100.0, &u.celsius).to(&u.fahrenheit).unwrap();
        assert_relative_eq!(q.value(), 212.0, max_relative = 1e-9);
        let err = Quantity::create(1.0, &u.metre).to(&u.second).unwrap_err();
        assert_eq!(err.key(), "IncompatibleUnits");
    }

    #[test]
    fn test_add_ratio() {
        let u = Units::global();
        let q = Quantity::create(1.0, &u.kilometre)
            .add(&Quantity::create(500.0, &u.metre))
            .unwrap();
        assert!(q.unit().is_same(&u.kilometre));
        assert_relative_eq!(q.value(), 1.5);
        let q = Quantity::create(1.0, &u.kilometre)
            .subtract(&Quantity::create(500.0, &u.metre))
            .unwrap();
        assert_relative_eq!(q.value(), 0.5);
    }

    #[test]
    fn test_add_temperature() {
        let u = Units::global();
        let two_c = Quantity::create(2.0, &u.celsius);
        let three_k = Quantity::create(3.0, &u.kelvin);

        let q = two_c.add(&three_k).unwrap();
        assert!(q.unit().is_same(&u.celsius));
        assert_relative_eq!(q.value(), 5.0, max_relative = 1e-9);
        assert_relative_eq!(q.to(&u.kelvin).unwrap().value(), 278.15, max_relative = 1e-9);

        let q = three_k.add(&two_c).unwrap();
        assert!(q.unit().is_same(&u.kelvin));
        assert_relative_eq!(q.value(), 278.15, max_relative = 1e-9);

        let q = two_c.add(&Quantity::create(-8.0, &u.celsius)).unwrap();
        assert_relative_eq!(q.value(), 267.15, max_relative = 1e-9);

        let q = two_c.subtract(&three_k).unwrap();
        assert_abs_diff_eq!(q.value(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_multiply() {
        let u = Units::global();
        let q = Quantity::create(3.0, &u.centimetre)
            .multiply(&Quantity::create(4.0, &u.second))
            .unwrap();
        assert_eq!(q.value(), 12.0);
        assert_eq!(q.unit().to_string(), "cm⋅s");

        let q = Quantity::create(2.0, &u.celsius).multiply_by(3.0);
        assert!(q.unit().is_same(&u.celsius));
        assert_relative_eq!(q.value(), 552.3, max_relative = 1e-9);

        let q = Quantity::create(3.0, &u.metre).multiply_by(2.0);
        assert_eq!(q.value(), 6.0);
        assert!(q.unit().is_same(&u.metre));
    }

    #[test]
    fn test_divide() {
        let u = Units::global();
        let q = Quantity::create(10.0, &u.kilometre)
            .divide(&Quantity::create(2.0, &u.hour))
            .unwrap();
        assert_eq!(q.value(), 5.0);
        assert!(q.unit().is_same(&u.kilometres_per_hour));
        assert_eq!(q.to_string(), "5 km∕h");

        let q = Quantity::create(6.0, &u.metre).divide_by(4.0);
        assert_eq!(q.value(), 1.5);

        let q = Quantity::create(4.0, &u.second).inverse().unwrap();
        assert_eq!(q.value(), 0.25);
        assert_eq!(q.unit().dimension(), u.hertz.dimension());
    }

    #[test]
    fn test_as_type() {
        let u = Units::global();
        let q = Quantity::create(5.0, &u.joule);
        assert_eq!(q.kind(), Some(QuantityKind::Energy));
        let t = q.as_type(QuantityKind::Torque).unwrap();
        assert!(t.unit().is_same(&u.newton_metre));
        assert_eq!(t.kind(), Some(QuantityKind::Torque));
        assert_eq!(t.value(), 5.0);
        assert!(q.as_type(QuantityKind::Length).is_err());
    }

    #[test]
    fn test_equality() {
        let u = Units::global();
        let a = Quantity::create(5.0, &u.kilometre);
        assert_eq!(a, Quantity::create(5.0, &u.kilometre));
        assert!(a != Quantity::create(5000.0, &u.metre));
        assert_relative_eq!(a, Quantity::create(5000.0, &u.metre));
        assert!(!a.abs_diff_eq(&Quantity::create(5.0, &u.second), 1.0));
    }

    #[test]
    fn test_min_max() {
        let u = Units::global();
        let km = Quantity::create(1.0, &u.kilometre);
        let m = Quantity::create(500.0, &u.metre);
        let nan = Quantity::create(f64::NAN, &u.metre);
        let same = Quantity::create(1000.0, &u.metre);

        assert!(std::ptr::eq(min(Some(&km), Some(&m)).unwrap().unwrap(), &m));
        assert!(std::ptr::eq(max(Some(&km), Some(&m)).unwrap().unwrap(), &km));
        assert!(std::ptr::eq(min(None, Some(&m)).unwrap().unwrap(), &m));
        assert!(std::ptr::eq(max(Some(&km), None).unwrap().unwrap(), &km));
        assert_eq!(min(None, None).unwrap(), None);
        assert!(std::ptr::eq(min(Some(&nan), Some(&m)).unwrap().unwrap(), &m));
        assert!(std::ptr::eq(max(Some(&m), Some(&nan)).unwrap().unwrap(), &m));
        assert!(std::ptr::eq(min(Some(&km), Some(&same)).unwrap().unwrap(), &km));
        assert!(std::ptr::eq(max(Some(&same), Some(&km)).unwrap().unwrap(), &same));

        let s = Quantity::create(1.0, &u.second);
        assert!(min(Some(&km), Some(&s)).is_err());
    }

    struct Reading {
        amount: f64,
        symbol: &'static str,
    }

    impl QuantityLike for Reading {
        fn value(&self) -> f64 {
            self.amount
        }

        fn unit_symbol(&self) -> String {
            self.symbol.to_string()
        }
    }

    #[test]
    fn test_cast_or_copy() {
        let u = Units::global();
        let q = Quantity::create(2.0, &u.hour);
        assert_eq!(cast_or_copy(&q).unwrap(), q);

        let copied = cast_or_copy(&Reading {
            amount: 7.0,
            symbol: "km",
        })
        .unwrap();
        assert_eq!(copied, Quantity::create(7.0, &u.kilometre));

        let err = cast_or_copy(&Reading {
            amount: 7.0,
            symbol: "furlong",
        })
        .unwrap_err();
        assert_eq!(err.key(), "UnsupportedImplementation");
    }
}
