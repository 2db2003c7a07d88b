//! SI prefixes: choosing one for a scale factor, and splitting one off a symbol.

use approx::relative_eq;
use phf::phf_map;

use crate::converter::{LinearConverter, UnitConverter};
use crate::symbols::{digit_value, is_symbol_char};

/// The one-character SI prefixes and their powers of ten. Deca is the only two-character prefix
/// and is handled separately.
pub static PREFIXES: phf::Map<char, i32> = phf_map! {
    'y' => -24,
    'z' => -21,
    'a' => -18,
    'f' => -15,
    'p' => -12,
    'n' => -9,
    'µ' => -6,
    'm' => -3,
    'c' => -2,
    'd' => -1,
    'h' => 2,
    'k' => 3,
    'M' => 6,
    'G' => 9,
    'T' => 12,
    'P' => 15,
    'E' => 18,
    'Z' => 21,
    'Y' => 24,
};

pub const DECA: &str = "da";

/// The micro sign. The Greek letter mu and UCUM's ASCII `u` are read as this.
pub const MICRO: char = '\u{00B5}';

/// Maps the alternate spellings of micro to the micro sign.
pub fn normalize_micro(c: char) -> char {
    match c {
        '\u{03BC}' => MICRO,
        c => c,
    }
}

/// The prefix character for a power of ten, if there is one.
pub fn prefix_for(exponent: i32) -> Option<char> {
    PREFIXES
        .entries()
        .find(|(_, e)| **e == exponent)
        .map(|(c, _)| *c)
}

/// The prefix for a unit with symbol exponent `power` scaled by `scale`: `scale` must be
/// `(10^k)^power` for a prefix of power of ten `k`. Returns `None` if `power` is zero (ambiguous),
/// if `scale` is not a power of ten, or if no prefix has the right power.
pub fn symbol(scale: f64, power: i32) -> Option<char> {
    if power == 0 || !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let k = scale.log10().round() as i32;
    if !relative_eq!(scale, 10f64.powi(k), max_relative = 1e-12) || k % power != 0 {
        return None;
    }
    prefix_for(k / power)
}

/// The exponent on the first factor of a symbol, like 2 for `m²` or `m²⋅s`. Returns 0 when the
/// exponent cannot be determined unambiguously: an exponent with two digits, an exponent followed
/// by more symbol characters, a fractional exponent, or a symbol that starts with a digit.
pub fn power(symbol: &str) -> i32 {
    let chars: Vec<char> = symbol.chars().collect();
    let mut negative = false;
    for (i, c) in chars.iter().enumerate() {
        if is_symbol_char(*c) {
            if negative {
                return 0;
            }
            continue;
        }
        if i == 0 {
            return 0;
        }
        if !negative && matches!(c, '\u{207B}' | '-') {
            negative = true;
            continue;
        }
        return match digit_value(*c) {
            Some(p) => match chars.get(i + 1) {
                Some(next) if is_symbol_char(*next) || digit_value(*next).is_some() => 0,
                _ if negative => -(p as i32),
                _ => p as i32,
            },
            None if negative || *c == '^' => 0,
            None => 1,
        };
    }
    if negative {
        0
    } else {
        1
    }
}

/// The exact scaling by `10^exponent`.
pub fn converter(exponent: i32) -> UnitConverter {
    match 10i64.checked_pow(exponent.unsigned_abs()) {
        Some(p) if exponent >= 0 => LinearConverter::scale(p, 1),
        Some(p) => LinearConverter::scale(1, p),
        None => LinearConverter::create(10f64.powi(exponent), 0.0),
    }
}

/// Prepends a prefix to a symbol.
pub fn concat(prefix: char, symbol: &str) -> String {
    format!("{}{}", prefix, symbol)
}

/// `symbol` scaled by `scale`, with the prefix that [`symbol`] finds for it, or deca: `km` for `m`
/// and 1000, `dam²` for `m²` and 100.
pub fn prefixed(scale: f64, symbol: &str) -> Option<String> {
    let power = power(symbol);
    if let Some(prefix) = self::symbol(scale, power) {
        return Some(concat(prefix, symbol));
    }
    let deca = power != 0 && relative_eq!(scale, 10f64.powi(power), max_relative = 1e-12);
    deca.then(|| format!("{}{}", DECA, symbol))
}

/// The ways a symbol might split into a prefix and a remainder, as the prefix's power of ten and
/// the remainder. Deca comes first, so `dam` is decametre rather than a deci-something.
pub fn split(symbol: &str) -> Vec<(i32, &str)> {
    let mut out = vec![];
    if let Some(rest) = symbol.strip_prefix(DECA) {
        if !rest.is_empty() {
            out.push((1, rest));
        }
    }
    let mut chars = symbol.chars();
    if let Some(first) = chars.next() {
        let rest = chars.as_str();
        let exp = match normalize_micro(first) {
            'u' => Some(-6),
            c => PREFIXES.get(&c).copied(),
        };
        if let (Some(exp), false) = (exp, rest.is_empty()) {
            out.push((exp, rest));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_power() {
        assert_eq!(power("m"), 1);
        assert_eq!(power("m²"), 2);
        assert_eq!(power("m³"), 3);
        assert_eq!(power("m2"), 2);
        assert_eq!(power("m²⋅s"), 2);
        assert_eq!(power("m∕s²"), 1);
        assert_eq!(power("s⁻¹"), -1);
        assert_eq!(power("m²s"), 0);
        assert_eq!(power("m¹²"), 0);
        assert_eq!(power("1∕s"), 0);
        assert_eq!(power("m^⅔"), 0);
        assert_eq!(power(""), 1);
    }

    #[test]
    fn test_symbol() {
        assert_eq!(symbol(1000.0, 1), Some('k'));
        assert_eq!(symbol(0.001, 1), Some('m'));
        assert_eq!(symbol(1e-6, 3), Some('c'));
        assert_eq!(symbol(1e-9, 3), Some('m'));
        assert_eq!(symbol(1e6, 2), Some('k'));
        assert_eq!(symbol(1000.0, -1), Some('m'));
        assert_eq!(symbol(10.0, 1), None);
        assert_eq!(symbol(1e-4, 3), None);
        assert_eq!(symbol(2.54, 1), None);
        assert_eq!(symbol(1000.0, 0), None);
        assert_eq!(symbol(1e30, 1), None);
    }

    #[test]
    fn test_prefixed() {
        assert_eq!(prefixed(1000.0, "m").as_deref(), Some("km"));
        assert_eq!(prefixed(10.0, "m").as_deref(), Some("dam"));
        assert_eq!(prefixed(100.0, "m²").as_deref(), Some("dam²"));
        assert_eq!(prefixed(0.1, "s⁻¹").as_deref(), Some("das⁻¹"));
        assert_eq!(prefixed(10.0, "1∕s"), None);
        assert_eq!(prefixed(2.54, "m"), None);
    }

    #[test]
    fn test_converter() {
        assert_eq!(converter(3).convert(2.0), 2000.0);
        assert_eq!(converter(-6).convert(5.0), 5e-6);
        assert!(converter(0).is_identity());
    }

    #[test]
    fn test_split() {
        assert_eq!(split("km"), vec![(3, "m")]);
        assert_eq!(split("dam"), vec![(1, "m"), (-1, "am")]);
        assert_eq!(split("μg"), vec![(-6, "g")]);
        assert_eq!(split("ug"), vec![(-6, "g")]);
        assert!(split("m").is_empty());
        assert!(split("xm").is_empty());
    }

    proptest! {
        #[test]
        fn test_inference_roundtrip(k in -8i32..=8, power in 1i32..=3) {
            let exponent = 3 * k;
            prop_assume!(prefix_for(exponent).is_some() && (exponent * power).abs() < 300);
            let scale = 10f64.powi(exponent * power);
            prop_assert_eq!(symbol(scale, power), prefix_for(exponent));
        }
    }
}
