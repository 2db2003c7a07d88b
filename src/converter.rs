//! Converters between units: functions from values in one unit to values in another. Linear
//! converters keep their coefficients as integers whenever possible so that conversions exact in
//! base 10 stay exact, and composition simplifies eagerly so that a converter followed by its
//! inverse collapses to the identity.

use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

use approx::{abs_diff_eq, relative_eq};

use crate::error::UnitError;
use crate::fraction::{gcd, Fraction, Number};
use crate::symbols::subscript;

/// Integers up to this magnitude are exact as doubles.
const MAX_EXACT: i128 = 1 << 53;

/// Relative tolerance under which two converters are considered the same function.
pub const EQUIVALENCE_TOLERANCE: f64 = 1e-12;

/// The converter `y = (scale⋅x + offset) / divisor`. When `exact` is set, all three coefficients
/// are integers small enough to be represented exactly.
#[derive(Debug, Clone, Copy)]
pub struct LinearConverter {
    scale: f64,
    offset: f64,
    divisor: f64,
    exact: bool,
}

impl LinearConverter {
    /// The converter `y = num⋅x / den`, with the coefficients kept apart as given.
    pub fn scale(num: i64, den: i64) -> UnitConverter {
        Self::from_triple(num as i128, 0, den as i128).into_converter()
    }

    /// The converter `y = x + num/den`, with the coefficients kept apart as given.
    pub fn offset(num: i64, den: i64) -> UnitConverter {
        Self::from_triple(den as i128, num as i128, den as i128).into_converter()
    }

    /// The converter `y = scale⋅x + offset`. Decimal coefficients like 0.3048 are read exactly.
    pub fn create(scale: f64, offset: f64) -> UnitConverter {
        Self::from_numbers(Number::from_f64(scale), Number::from_f64(offset)).into_converter()
    }

    /// Builds from scale and offset, exact if both are.
    pub fn from_numbers(scale: Number, offset: Number) -> Self {
        match (scale, offset) {
            (Number::Exact(s), Number::Exact(o)) => {
                let (sn, sd) = (s.numerator() as i128, s.denominator() as i128);
                let (on, od) = (o.numerator() as i128, o.denominator() as i128);
                Self::reduced_triple(sn * od, on * sd, sd * od)
            }
            (s, o) => Self::approximate(s.to_f64(), o.to_f64(), 1.0),
        }
    }

    fn approximate(scale: f64, offset: f64, divisor: f64) -> Self {
        Self {
            scale,
            offset,
            divisor,
            exact: false,
        }
    }

    /// A converter from integer coefficients, exact if they are small enough. `d` must be nonzero.
    fn from_triple(a: i128, b: i128, d: i128) -> Self {
        let (a, b, d) = if d < 0 { (-a, -b, -d) } else { (a, b, d) };
        let exact = [a, b, d].iter().all(|v| v.abs() <= MAX_EXACT);
        Self {
            scale: a as f64,
            offset: b as f64,
            divisor: d as f64,
            exact,
        }
    }

    /// Like [`Self::from_triple`], but divides out common factors first.
    fn reduced_triple(a: i128, b: i128, d: i128) -> Self {
        let g = gcd(gcd(a, b), d).max(1);
        Self::from_triple(a / g, b / g, d / g)
    }

    /// The integer coefficients, if exact.
    fn triple(&self) -> Option<(i128, i128, i128)> {
        self.exact
            .then_some((self.scale as i128, self.offset as i128, self.divisor as i128))
    }

    pub fn into_converter(self) -> UnitConverter {
        if self.is_identity() {
            UnitConverter::Identity
        } else {
            UnitConverter::Linear(self)
        }
    }

    pub fn convert(&self, x: f64) -> f64 {
        // Multiply first and divide last: (656.16666666666667⋅1200)/3937 is exactly 200.
        let y = x.mul_add(self.scale, self.offset);
        if self.divisor == 1.0 {
            y
        } else {
            y / self.divisor
        }
    }

    /// The overall scale factor, `scale / divisor`.
    pub fn ratio(&self) -> f64 {
        self.scale / self.divisor
    }

    /// The value of zero after conversion, `offset / divisor`.
    pub fn shift(&self) -> f64 {
        self.offset / self.divisor
    }

    /// The scale factor as an exact fraction, if it is one.
    pub fn exact_ratio(&self) -> Option<Fraction> {
        let (a, _, d) = self.triple()?;
        Fraction::new(i64::try_from(a).ok()?, i64::try_from(d).ok()?).ok()
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Whether there is no offset, so that the converter preserves ratios.
    pub fn is_ratio(&self) -> bool {
        self.offset == 0.0
    }

    pub fn is_identity(&self) -> bool {
        match self.triple() {
            Some((a, b, d)) => a == d && b == 0,
            None => {
                relative_eq!(self.ratio(), 1.0, max_relative = 4.0 * f64::EPSILON)
                    && abs_diff_eq!(self.shift(), 0.0, epsilon = 4.0 * f64::EPSILON)
            }
        }
    }

    pub fn inverse(&self) -> Self {
        match self.triple() {
            Some((a, b, d)) => Self::from_triple(d, -b, a),
            None => {
                let sign = self.scale.signum();
                Self::approximate(
                    sign * self.divisor,
                    -sign * self.offset,
                    sign * self.scale,
                )
            }
        }
    }

    /// Applies `self`, then `other`.
    pub fn concatenate(&self, other: &Self) -> Self {
        if let (Some((a1, b1, d1)), Some((a2, b2, d2))) = (self.triple(), other.triple()) {
            let wide = (|| {
                Some((
                    a2.checked_mul(a1)?,
                    a2.checked_mul(b1)?.checked_add(b2.checked_mul(d1)?)?,
                    d1.checked_mul(d2)?,
                ))
            })();
            if let Some((a, b, d)) = wide {
                let result = Self::reduced_triple(a, b, d);
                if result.exact {
                    return result;
                }
            }
        }
        let d = self.divisor * other.divisor;
        Self::approximate(
            other.scale * self.scale / d,
            (other.scale * self.offset + other.offset * self.divisor) / d,
            1.0,
        )
    }

    /// Raises the scale to the `n`-th power, or takes its `n`-th root. Only defined without an
    /// offset.
    pub fn pow(&self, n: i32, root: bool) -> Result<UnitConverter, UnitError> {
        if !self.is_ratio() {
            return Err(UnitError::UnsupportedOperation(format!(
                "power of the offset converter {}",
                self
            )));
        }
        if root && n == 0 {
            return Err(UnitError::ZeroRoot);
        }
        let ratio = match self.exact_ratio() {
            Some(r) if root => r.root(n),
            Some(r) => r.pow(n),
            None if root => Number::Approx(self.ratio().powf(1.0 / n as f64)),
            None => Number::Approx(self.ratio().powi(n)),
        };
        Ok(Self::from_numbers(ratio, Number::Exact(Fraction::ZERO)).into_converter())
    }
}

impl PartialEq for LinearConverter {
    fn eq(&self, other: &Self) -> bool {
        self.ratio() == other.ratio() && self.shift() == other.shift()
    }
}

impl Hash for LinearConverter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // +0.0 and -0.0 compare equal, so they must hash equal.
        (self.ratio() + 0.0).to_bits().hash(state);
        (self.shift() + 0.0).to_bits().hash(state);
    }
}

impl Display for LinearConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let x = if self.scale == 1.0 {
            "x".to_string()
        } else {
            format!("{}⋅x", self.scale)
        };
        let numerator = if self.offset == 0.0 {
            x
        } else if self.offset < 0.0 {
            format!("{} - {}", x, -self.offset)
        } else {
            format!("{} + {}", x, self.offset)
        };
        match (self.divisor == 1.0, self.offset == 0.0) {
            (true, _) => write!(f, "y = {}", numerator),
            (false, true) => write!(f, "y = {}∕{}", numerator, self.divisor),
            (false, false) => write!(f, "y = ({})∕{}", numerator, self.divisor),
        }
    }
}

/// A conversion function between two units.
#[derive(Debug, Clone)]
pub enum UnitConverter {
    /// `y = x`, bit for bit.
    Identity,
    Linear(LinearConverter),
    /// `y = 10^(k⋅x)`, from a logarithmic unit to the ratio it measures.
    Exponential(f64),
    /// `y = log₁₀(x) / k`, the inverse of [`UnitConverter::Exponential`].
    Logarithmic(f64),
    /// The first converter, then the second.
    Composed(Box<UnitConverter>, Box<UnitConverter>),
}

impl UnitConverter {
    pub fn convert(&self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Linear(l) => l.convert(x),
            Self::Exponential(k) => 10f64.powf(k * x),
            Self::Logarithmic(k) => x.log10() / k,
            Self::Composed(a, b) => b.convert(a.convert(x)),
        }
    }

    /// The local rate of change at `x`: how an uncertainty around `x` scales.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Self::Identity => 1.0,
            Self::Linear(l) => l.ratio(),
            Self::Exponential(k) => std::f64::consts::LN_10 * k * 10f64.powf(k * x),
            Self::Logarithmic(k) => 1.0 / (x * k * std::f64::consts::LN_10),
            Self::Composed(a, b) => b.derivative(a.convert(x)) * a.derivative(x),
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            Self::Identity => true,
            Self::Linear(l) => l.is_identity(),
            _ => false,
        }
    }

    /// Whether `f(a + b) = f(a) + f(b)`: the identity and scalings without offset.
    pub fn is_linear(&self) -> bool {
        match self {
            Self::Identity => true,
            Self::Linear(l) => l.is_ratio(),
            _ => false,
        }
    }

    /// The scale factor of a linear converter.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::Identity => Some(1.0),
            Self::Linear(l) if l.is_ratio() => Some(l.ratio()),
            _ => None,
        }
    }

    /// The scale factor of a linear converter as an exact fraction, if it is one.
    pub fn exact_ratio(&self) -> Option<Fraction> {
        match self {
            Self::Identity => Some(Fraction::ONE),
            Self::Linear(l) if l.is_ratio() => l.exact_ratio(),
            _ => None,
        }
    }

    /// Scale and offset of the identity or an affine converter.
    pub fn affine_parts(&self) -> Option<(f64, f64)> {
        match self {
            Self::Identity => Some((1.0, 0.0)),
            Self::Linear(l) => Some((l.ratio(), l.shift())),
            _ => None,
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::Linear(l) => l.inverse().into_converter(),
            Self::Exponential(k) => Self::Logarithmic(*k),
            Self::Logarithmic(k) => Self::Exponential(*k),
            Self::Composed(a, b) => Self::Composed(Box::new(b.inverse()), Box::new(a.inverse())),
        }
    }

    /// A converter equivalent to applying `self`, then `other`.
    pub fn concatenate(&self, other: &Self) -> Self {
        Self::simplify(self, other)
            .unwrap_or_else(|| Self::Composed(Box::new(self.clone()), Box::new(other.clone())))
    }

    /// The composition of `first` then `second` if it is simpler than a plain chain.
    fn simplify(first: &Self, second: &Self) -> Option<Self> {
        let same_k = |a: &f64, b: &f64| relative_eq!(*a, *b, max_relative = EQUIVALENCE_TOLERANCE);
        match (first, second) {
            (Self::Identity, c) | (c, Self::Identity) => Some(c.clone()),
            (Self::Linear(a), Self::Linear(b)) => Some(a.concatenate(b).into_converter()),
            (Self::Linear(a), Self::Exponential(k)) if a.is_ratio() => {
                Some(Self::Exponential(k * a.ratio()))
            }
            (Self::Logarithmic(k), Self::Linear(b)) if b.is_ratio() => {
                Some(Self::Logarithmic(k / b.ratio()))
            }
            (Self::Exponential(k1), Self::Logarithmic(k2))
            | (Self::Logarithmic(k1), Self::Exponential(k2))
                if same_k(k1, k2) =>
            {
                Some(Self::Identity)
            }
            (Self::Composed(a, b), c) => Self::simplify(b, c).map(|bc| a.concatenate(&bc)),
            (a, Self::Composed(b, c)) => Self::simplify(a, b).map(|ab| ab.concatenate(c)),
            _ => None,
        }
    }

    /// The converter for a unit raised to the `n`-th power (or `n`-th root).
    pub fn pow(&self, n: i32, root: bool) -> Result<Self, UnitError> {
        match self {
            Self::Identity if root && n == 0 => Err(UnitError::ZeroRoot),
            Self::Identity => Ok(Self::Identity),
            Self::Linear(l) => l.pow(n, root),
            other => Err(UnitError::UnsupportedOperation(format!(
                "power of the non-linear converter {}",
                other
            ))),
        }
    }

    /// Structural equality with a tolerance on the coefficients.
    pub fn equivalent(&self, other: &Self) -> bool {
        match (self.affine_parts(), other.affine_parts()) {
            (Some((s1, o1)), Some((s2, o2))) => {
                relative_eq!(s1, s2, max_relative = EQUIVALENCE_TOLERANCE)
                    && abs_diff_eq!(
                        o1,
                        o2,
                        epsilon = EQUIVALENCE_TOLERANCE * o1.abs().max(o2.abs()).max(1.0)
                    )
            }
            (None, None) => match (self, other) {
                (Self::Exponential(a), Self::Exponential(b))
                | (Self::Logarithmic(a), Self::Logarithmic(b)) => {
                    relative_eq!(*a, *b, max_relative = EQUIVALENCE_TOLERANCE)
                }
                (Self::Composed(a1, b1), Self::Composed(a2, b2)) => {
                    a1.equivalent(a2) && b1.equivalent(b2)
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::Identity
    }
}

impl PartialEq for UnitConverter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exponential(a), Self::Exponential(b))
            | (Self::Logarithmic(a), Self::Logarithmic(b)) => a == b,
            (Self::Composed(a1, b1), Self::Composed(a2, b2)) => a1 == a2 && b1 == b2,
            _ => match (self.affine_parts(), other.affine_parts()) {
                (Some(p), Some(q)) => p == q,
                _ => false,
            },
        }
    }
}

impl Hash for UnitConverter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Identity => LinearConverter::from_triple(1, 0, 1).hash(state),
            Self::Linear(l) => l.hash(state),
            Self::Exponential(k) => {
                "exp".hash(state);
                k.to_bits().hash(state);
            }
            Self::Logarithmic(k) => {
                "log".hash(state);
                k.to_bits().hash(state);
            }
            Self::Composed(a, b) => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}

/// Writes `k⋅x` as `x∕n` when `k` is `1/n`.
fn scaled_x(k: f64) -> String {
    match Fraction::from_f64(k) {
        Some(f) if f == Fraction::ONE => "x".to_string(),
        Some(f) if f.numerator() == 1 => format!("x∕{}", f.denominator()),
        _ => format!("{}⋅x", k),
    }
}

impl Display for UnitConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "y = x"),
            Self::Linear(l) => write!(f, "{}", l),
            Self::Exponential(k) => write!(f, "y = 10^({})", scaled_x(*k)),
            Self::Logarithmic(k) => {
                let log = format!("log{}(x)", subscript(10));
                let coef = 1.0 / k;
                if coef == 1.0 {
                    write!(f, "y = {}", log)
                } else {
                    write!(f, "y = {}⋅{}", coef, log)
                }
            }
            Self::Composed(a, b) => write!(f, "{} then {}", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_identity_preserves_negative_zero() {
        let y = UnitConverter::Identity.convert(-0.0);
        assert!(y == 0.0 && y.is_sign_negative());
        assert!(LinearConverter::scale(7, 7).is_identity());
        assert!(matches!(
            LinearConverter::create(1.0, 0.0),
            UnitConverter::Identity
        ));
    }

    #[test]
    fn test_scale() {
        assert_eq!(LinearConverter::scale(254, 100).convert(450.0), 1143.0);
        let us_foot = LinearConverter::scale(1200, 3937);
        assert_eq!(us_foot.convert(656.16666666666667), 200.0);
        assert_eq!(us_foot.inverse().convert(200.0), 656.16666666666667);
    }

    #[test]
    fn test_offset() {
        let c_to_k = LinearConverter::offset(27315, 100);
        assert_eq!(c_to_k.convert(27.01), 300.16);
        assert!(!c_to_k.is_linear());
        assert_eq!(c_to_k.derivative(10.0), 1.0);
        assert!(c_to_k.concatenate(&c_to_k.inverse()).is_identity());
        assert!(c_to_k
            .concatenate(&LinearConverter::offset(-54630, 200))
            .is_identity());
    }

    #[test]
    fn test_concatenate() {
        let in_to_cm = LinearConverter::scale(254, 100);
        let cm_to_mm = LinearConverter::scale(10, 1);
        let mm_to_m = LinearConverter::scale(1, 1000);
        let in_to_m = in_to_cm.concatenate(&cm_to_mm).concatenate(&mm_to_m);
        assert_eq!(in_to_m, LinearConverter::scale(254, 10000));
        match in_to_m {
            UnitConverter::Linear(l) => {
                assert!(l.is_exact());
                assert_eq!(l.exact_ratio(), Some(crate::frac!(127 / 5000)));
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn test_pow() {
        let c = LinearConverter::scale(10, 3);
        assert_eq!(c.pow(2, false).unwrap(), LinearConverter::scale(100, 9));
        assert_eq!(c.pow(3, false).unwrap(), LinearConverter::scale(1000, 27));
        assert_eq!(
            LinearConverter::scale(1000, 27).pow(3, true).unwrap(),
            LinearConverter::scale(10, 3)
        );
        assert!(LinearConverter::offset(1, 1).pow(2, false).is_err());
        assert_eq!(c.pow(0, true), Err(UnitError::ZeroRoot));
    }

    #[test]
    fn test_equality() {
        let a = LinearConverter::scale(254, 100);
        let b = LinearConverter::create(2.54, 0.0);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_ne!(a, LinearConverter::scale(100, 254));
        assert_eq!(UnitConverter::Identity, LinearConverter::scale(3, 3));

        use std::collections::hash_map::DefaultHasher;
        let hash = |c: &UnitConverter| {
            let mut h = DefaultHasher::new();
            c.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_display() {
        assert_eq!(UnitConverter::Identity.to_string(), "y = x");
        assert_eq!(LinearConverter::scale(100, 1).to_string(), "y = 100⋅x");
        assert_eq!(LinearConverter::scale(1, 100).to_string(), "y = x∕100");
        assert_eq!(LinearConverter::scale(254, 100).to_string(), "y = 254⋅x∕100");
        assert_eq!(
            LinearConverter::offset(27315, 100).to_string(),
            "y = (100⋅x + 27315)∕100"
        );
        assert_eq!(UnitConverter::Exponential(0.5).to_string(), "y = 10^(x∕2)");
        assert_eq!(
            UnitConverter::Logarithmic(0.5).to_string(),
            "y = 2⋅log₁₀(x)"
        );
    }

    #[test]
    fn test_logarithmic() {
        let bel = UnitConverter::Exponential(0.5);
        assert_relative_eq!(bel.convert(2.0), 10.0);
        let decibel = LinearConverter::scale(1, 10).concatenate(&bel);
        assert_eq!(decibel, UnitConverter::Exponential(0.05));
        assert!(decibel.concatenate(&decibel.inverse()).is_identity());

        let chain = LinearConverter::offset(5, 1).concatenate(&bel);
        assert!(matches!(chain, UnitConverter::Composed(_, _)));
        assert!(chain.concatenate(&chain.inverse()).is_identity());
        assert_relative_eq!(chain.inverse().convert(chain.convert(3.0)), 3.0);
        assert!(bel.pow(2, false).is_err());
    }

    fn converter() -> impl Strategy<Value = UnitConverter> {
        (1i64..10_000, -10_000i64..10_000, 1i64..10_000)
            .prop_map(|(a, b, d)| LinearConverter::from_triple(a as i128, b as i128, d as i128))
            .prop_map(LinearConverter::into_converter)
    }

    proptest! {
        #[test]
        fn test_inverse_is_identity(c in converter()) {
            prop_assert!(c.concatenate(&c.inverse()).is_identity());
            prop_assert!(c.inverse().concatenate(&c).is_identity());
        }

        #[test]
        fn test_concatenation_associative(
            a in converter(), b in converter(), x in -1e3f64..1e3
        ) {
            let direct = b.convert(a.convert(x));
            let composed = a.concatenate(&b).convert(x);
            prop_assert!(relative_eq!(direct, composed, epsilon = 1e-9, max_relative = 1e-9));
        }
    }
}
