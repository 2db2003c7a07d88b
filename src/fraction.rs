//! An exact rational data type, developed specifically for conversion factors that are exact in
//! base 10 but not in base 2, like 0.3048 m/ft.
//!
//! Arithmetic on two [`Fraction`]s produces a [`Number`]: exact when the result fits in 64-bit
//! numerator and denominator, otherwise a double-precision approximation. Losing exactness on
//! overflow is deliberate. Conversion factors large enough to overflow are not exact in the
//! first place, and a double keeps the range without failing.

use std::{
    cmp::Ordering,
    fmt::Display,
    ops::{Add, Div, Mul, Neg, Sub},
    str::FromStr,
};

use num_traits::{Inv, One, Pow, Zero};

use crate::error::UnitError;

/// The base type used for numerator and denominator.
pub type BaseInt = i64;

/// A fraction in lowest terms with a positive denominator.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Fraction {
    num: BaseInt,
    den: BaseInt,
}

/// Greatest common divisor, always nonnegative.
pub const fn gcd(p: i128, q: i128) -> i128 {
    let mut p = p.abs();
    let mut q = q.abs();
    while q != 0 {
        let r = p % q;
        p = q;
        q = r;
    }

    p
}

/// Exact integer n-th root of a nonnegative value, if there is one.
fn exact_root(v: BaseInt, n: u32) -> Option<BaseInt> {
    if v < 0 {
        return None;
    }
    let guess = (v as f64).powf(1.0 / n as f64).round() as BaseInt;
    [guess - 1, guess, guess + 1]
        .into_iter()
        .filter(|r| *r >= 0)
        .find(|r| r.checked_pow(n) == Some(v))
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Creates a reduced fraction. Fails with [`UnitError::ZeroDenominator`] if `den` is zero.
    pub fn new(num: BaseInt, den: BaseInt) -> Result<Self, UnitError> {
        if den == 0 {
            return Err(UnitError::ZeroDenominator);
        }
        Self::reduced(num as i128, den as i128).ok_or(UnitError::Overflow("fraction"))
    }

    /// The integer `n` as a fraction.
    ///
    /// # Panics
    ///
    /// Panics if `n` is [`BaseInt::MIN`], which has no negation. Use [`Fraction::new`] for
    /// untrusted input.
    pub const fn from_int(n: BaseInt) -> Self {
        assert!(n != BaseInt::MIN, "fraction numerator out of range");
        Self { num: n, den: 1 }
    }

    /// Reduces a wide fraction to lowest terms, if it then fits. `den` must be nonzero. The minimum
    /// integer is excluded so negation never overflows.
    fn reduced(num: i128, den: i128) -> Option<Self> {
        let g = gcd(num, den).max(1);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        let num = BaseInt::try_from(num).ok().filter(|n| *n != BaseInt::MIN)?;
        let den = BaseInt::try_from(den).ok()?;
        Some(Self { num, den })
    }

    pub const fn numerator(&self) -> BaseInt {
        self.num
    }

    pub const fn denominator(&self) -> BaseInt {
        self.den
    }

    pub const fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub const fn signum(&self) -> BaseInt {
        self.num.signum()
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// The exact decimal value of a double, as printed in its shortest round-trip form. Returns
    /// `None` for non-finite values and values with more digits than fit in the numerator.
    pub fn from_f64(x: f64) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        // The Display impl of f64 never uses exponent notation.
        let repr = format!("{}", x);
        Self::from_decimal_str(&repr)
    }

    fn from_decimal_str(s: &str) -> Option<Self> {
        let (neg, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        let frac_part = frac_part.trim_end_matches('0');
        let all_digits = format!("{}{}", int_part, frac_part);
        let num: BaseInt = all_digits.trim_start_matches('0').parse().or_else(|_| {
            if all_digits.chars().all(|c| c == '0') {
                Ok(0)
            } else {
                Err(())
            }
        }).ok()?;
        let den = (10 as BaseInt).checked_pow(frac_part.len() as u32)?;
        let num = if neg { -num } else { num };
        Self::reduced(num as i128, den as i128)
    }

    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        let num = self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128;
        Self::reduced(num, self.den as i128 * rhs.den as i128)
    }

    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        self.checked_add(&-*rhs)
    }

    pub fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Self::reduced(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    /// Division. `None` on overflow or division by zero.
    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        self.checked_mul(&rhs.checked_recip()?)
    }

    pub fn checked_recip(&self) -> Option<Self> {
        if self.num == 0 {
            None
        } else {
            Self::reduced(self.den as i128, self.num as i128)
        }
    }

    /// Integer power, negative exponents included.
    pub fn checked_pow(&self, n: i32) -> Option<Self> {
        let base = if n < 0 { self.checked_recip()? } else { *self };
        let e = n.unsigned_abs();
        Self::reduced(
            base.num.checked_pow(e)? as i128,
            base.den.checked_pow(e)? as i128,
        )
    }

    /// The exact `n`-th root, if both numerator and denominator are perfect powers. Odd roots of
    /// negative values are negative.
    pub fn checked_root(&self, n: i32) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let base = if n < 0 { self.checked_recip()? } else { *self };
        let e = n.unsigned_abs();
        if base.num < 0 && e % 2 == 0 {
            return None;
        }
        let num = exact_root(base.num.abs(), e)? * base.num.signum();
        let den = exact_root(base.den, e)?;
        Some(Self { num, den })
    }

    /// Raises to a power or takes a root, falling back to a double if the result is inexact.
    pub fn pow(&self, n: i32) -> Number {
        self.checked_pow(n)
            .map(Number::Exact)
            .unwrap_or_else(|| Number::Approx(self.to_f64().powi(n)))
    }

    pub fn root(&self, n: i32) -> Number {
        self.checked_root(n)
            .map(Number::Exact)
            .unwrap_or_else(|| Number::Approx(self.to_f64().powf(1.0 / n as f64)))
    }
}

/// Creates a [`Fraction`] from integer literals, panicking if the denominator is zero. Only meant
/// for constant data.
#[macro_export]
macro_rules! frac {
    ($num:literal / $den:literal) => {{
        match $crate::fraction::Fraction::new($num, $den) {
            Ok(f) => f,
            Err(_) => panic!("Invalid fraction: {}/{}", $num, $den),
        }
    }};
    ($num:expr) => {
        $crate::fraction::Fraction::from_int($num)
    };
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<BaseInt> for Fraction {
    fn from(value: BaseInt) -> Self {
        Self::from_int(value)
    }
}

impl From<Fraction> for f64 {
    fn from(value: Fraction) -> Self {
        value.to_f64()
    }
}

impl Neg for Fraction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            num: -self.num,
            den: self.den,
        }
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fraction {
    type Err = UnitError;

    /// Reads `n`, `n/d`, or a plain decimal like `0.25`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_err = || UnitError::UnsupportedOperation(format!("\"{s}\" is not a fraction"));
        match s.split_once('/') {
            Some((n, d)) => {
                let n: BaseInt = n.trim().parse().map_err(|_| parse_err())?;
                let d: BaseInt = d.trim().parse().map_err(|_| parse_err())?;
                Self::new(n, d)
            }
            None => Self::from_decimal_str(s).ok_or_else(parse_err),
        }
    }
}

impl Add for Fraction {
    type Output = Number;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(&rhs)
            .map(Number::Exact)
            .unwrap_or_else(|| Number::Approx(self.to_f64() + rhs.to_f64()))
    }
}

impl Sub for Fraction {
    type Output = Number;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Fraction {
    type Output = Number;

    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(&rhs)
            .map(Number::Exact)
            .unwrap_or_else(|| Number::Approx(self.to_f64() * rhs.to_f64()))
    }
}

impl Div for Fraction {
    type Output = Number;

    /// Division by zero gives the IEEE result.
    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(&rhs)
            .map(Number::Exact)
            .unwrap_or_else(|| Number::Approx(self.to_f64() / rhs.to_f64()))
    }
}

impl Inv for Fraction {
    type Output = Number;

    fn inv(self) -> Self::Output {
        Fraction::ONE / self
    }
}

/// A value that is exact as long as it can be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Exact(Fraction),
    Approx(f64),
}

impl Number {
    /// Reads a double, keeping it exact if its decimal form fits in a [`Fraction`].
    pub fn from_f64(x: f64) -> Self {
        Fraction::from_f64(x)
            .map(Self::Exact)
            .unwrap_or(Self::Approx(x))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Exact(f) => f.to_f64(),
            Self::Approx(x) => *x,
        }
    }

    pub fn as_fraction(&self) -> Option<Fraction> {
        match self {
            Self::Exact(f) => Some(*f),
            Self::Approx(_) => None,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    pub fn root(&self, n: i32) -> Number {
        match self {
            Self::Exact(f) => f.root(n),
            Self::Approx(x) => Self::Approx(x.powf(1.0 / n as f64)),
        }
    }
}

impl From<Fraction> for Number {
    fn from(value: Fraction) -> Self {
        Self::Exact(value)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(frac) => write!(f, "{}", frac),
            Self::Approx(x) => write!(f, "{}", x),
        }
    }
}

macro_rules! number_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Number {
            type Output = Number;

            fn $method(self, rhs: Self) -> Self::Output {
                match (self, rhs) {
                    (Number::Exact(a), Number::Exact(b)) => a $op b,
                    (a, b) => Number::Approx(a.to_f64() $op b.to_f64()),
                }
            }
        }
    };
}

number_op!(Add, add, +);
number_op!(Sub, sub, -);
number_op!(Mul, mul, *);
number_op!(Div, div, /);

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Self::Output {
        match self {
            Self::Exact(f) => Self::Exact(-f),
            Self::Approx(x) => Self::Approx(-x),
        }
    }
}

impl Zero for Number {
    fn zero() -> Self {
        Self::Exact(Fraction::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.to_f64() == 0.0
    }
}

impl One for Number {
    fn one() -> Self {
        Self::Exact(Fraction::ONE)
    }
}

impl Pow<i32> for Number {
    type Output = Number;

    fn pow(self, rhs: i32) -> Self::Output {
        match self {
            Self::Exact(f) => f.pow(rhs),
            Self::Approx(x) => Self::Approx(x.powi(rhs)),
        }
    }
}

impl Inv for Number {
    type Output = Number;

    fn inv(self) -> Self::Output {
        Number::one() / self
    }
}
