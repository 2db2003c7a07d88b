//! Units written out as words: `metre`, `square kilometres`, `metres per second`, `degrees_north`.

use crate::prefixes;
use crate::registry::UnitRegistry;
use crate::unit::Unit;
use crate::units::Units;

include!(concat!(env!("OUT_DIR"), "/unit_names.rs"));

/// SI prefixes spelled out, with their powers of ten.
const PREFIX_WORDS: [(&str, i32); 21] = [
    ("yocto", -24),
    ("zepto", -21),
    ("atto", -18),
    ("femto", -15),
    ("pico", -12),
    ("nano", -9),
    ("micro", -6),
    ("milli", -3),
    ("centi", -2),
    ("deci", -1),
    ("deca", 1),
    ("deka", 1),
    ("hecto", 2),
    ("kilo", 3),
    ("mega", 6),
    ("giga", 9),
    ("tera", 12),
    ("peta", 15),
    ("exa", 18),
    ("zetta", 21),
    ("yotta", 24),
];

/// Suffixes naming a direction of an angle, as in the CF convention's `degrees_north`.
const DIRECTIONS: [&str; 12] = [
    "_north", "_south", "_east", "_west", "_N", "_S", "_E", "_W", "N", "S", "E", "W",
];

fn strip_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ä' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        c => c,
    }
}

/// Lowercase, without accents, with words separated by single spaces.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase).map(strip_accent));
    }
    out
}

/// The symbol for a normalized name, accepting a plural `s`.
pub fn symbol_of(name: &str) -> Option<&'static str> {
    UNIT_NAMES.get(name).copied().or_else(|| {
        name.strip_suffix('s')
            .and_then(|singular| UNIT_NAMES.get(singular).copied())
    })
}

/// The unit a name refers to, if any.
pub fn resolve(text: &str) -> Option<Unit> {
    let name = normalize(text);
    if name.is_empty() {
        return None;
    }
    resolve_normalized(&name).or_else(|| resolve_direction(text))
}

fn resolve_normalized(name: &str) -> Option<Unit> {
    if let Some(symbol) = symbol_of(name) {
        return UnitRegistry::global().lookup_by_symbol(symbol);
    }
    if let Some((num, den)) = name.split_once(" per ") {
        return resolve_normalized(num)?
            .divide(&resolve_normalized(den)?)
            .ok();
    }
    for (word, n) in [("square ", 2), ("cubic ", 3)] {
        if let Some(rest) = name.strip_prefix(word) {
            return resolve_normalized(rest)?.pow(n).ok();
        }
    }
    for (word, n) in [(" squared", 2), (" cubed", 3)] {
        if let Some(rest) = name.strip_suffix(word) {
            return resolve_normalized(rest)?.pow(n).ok();
        }
    }
    PREFIX_WORDS.iter().find_map(|(word, exp)| {
        let unit = resolve_normalized(name.strip_prefix(word)?)?;
        unit.is_prefixable()
            .then(|| unit.transform(&prefixes::converter(*exp)))
    })
}

fn resolve_direction(text: &str) -> Option<Unit> {
    DIRECTIONS
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .filter(|rest| !rest.is_empty())
        .and_then(resolve)
        .filter(Units::is_angular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Degree_Celsius"), "degree celsius");
        assert_eq!(normalize("  mètres   per\tseconde "), "metres per seconde");
        assert_eq!(normalize("__"), "");
    }

    #[test]
    fn test_symbol_of() {
        assert_eq!(symbol_of("metre"), Some("m"));
        assert_eq!(symbol_of("metres"), Some("m"));
        assert_eq!(symbol_of("feet"), Some("ft"));
        assert_eq!(symbol_of("unity"), Some(""));
        assert_eq!(symbol_of("furlong"), None);
    }

    #[test]
    fn test_sentences() {
        let u = Units::global();
        assert!(resolve("square metres").unwrap().is_same(&u.square_metre));
        assert!(resolve("cubic metre").unwrap().is_same(&u.cubic_metre));
        assert!(resolve("metres per second").unwrap().is_same(&u.metres_per_second));
        assert!(resolve("metre per second squared")
            .unwrap()
            .is_same(&u.metres_per_second_squared));
        assert!(resolve("Kilometres").unwrap().is_same(&u.kilometre));
        assert!(resolve("millimetre").unwrap().is_same(&u.millimetre));
        assert!(resolve("kilometres per hour")
            .unwrap()
            .is_same(&u.kilometres_per_hour));
        assert!(resolve("degree Kelvin").unwrap().is_same(&u.kelvin));
        assert_eq!(resolve("milligram").unwrap().to_string(), "mg");
        // Prefixes only apply to prefixable units.
        assert!(resolve("kilominute").is_none());
        assert!(resolve("furlongs per fortnight").is_none());
    }

    #[test]
    fn test_directions() {
        let degree = &Units::global().degree;
        for name in ["degrees_north", "degree_N", "degreeN", "degrees_east", "degreeE"] {
            assert!(resolve(name).unwrap().is_same(degree), "{}", name);
        }
        assert!(resolve("metreN").is_none());
    }
}
