//! Symbols for unit markup. Allow for use of Unicode when desired with ASCII fallback.

use phf::phf_map;

use crate::fraction::Fraction;
use crate::markup::Block;

macro_rules! sym {
    ($i:ident, $asc:literal, $uni:literal) => {
        pub const $i: Block = Block::new_symbol($asc, $uni);
    };
}

sym!(MULTIPLY, ".", "\u{22C5}");
sym!(DIVIDE, "/", "\u{2215}");
sym!(LPAREN, "(", "(");
sym!(RPAREN, ")", ")");
sym!(CARET, "^", "^");

// The rules for superscripting and subscripting numbers are a total disaster in Unicode due to
// reasons. I hope the compiler knows how to make this fast.

/// Returns the Unicode superscript for a digit or sign, if it exists, otherwise `None`.
pub const fn super_digit(c: char) -> Option<char> {
    match c {
        '0' => Some('\u{2070}'),
        '1' => Some('\u{00B9}'),
        '2' => Some('\u{00B2}'),
        '3' => Some('\u{00B3}'),
        '4' => Some('\u{2074}'),
        '5' => Some('\u{2075}'),
        '6' => Some('\u{2076}'),
        '7' => Some('\u{2077}'),
        '8' => Some('\u{2078}'),
        '9' => Some('\u{2079}'),
        '+' => Some('\u{207A}'),
        '-' => Some('\u{207B}'),
        _ => None,
    }
}

/// Maps a superscript digit or sign back to ASCII.
pub const fn from_super_digit(c: char) -> Option<char> {
    match c {
        '\u{2070}' => Some('0'),
        '\u{00B9}' => Some('1'),
        '\u{00B2}' => Some('2'),
        '\u{00B3}' => Some('3'),
        '\u{2074}' => Some('4'),
        '\u{2075}' => Some('5'),
        '\u{2076}' => Some('6'),
        '\u{2077}' => Some('7'),
        '\u{2078}' => Some('8'),
        '\u{2079}' => Some('9'),
        '\u{207A}' => Some('+'),
        '\u{207B}' => Some('-'),
        _ => None,
    }
}

/// Returns the Unicode subscript for a digit, if it exists, otherwise `None`.
pub const fn sub_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => char::from_u32(0x2080 + (c as u32 - '0' as u32)),
        '+' => Some('\u{208A}'),
        '-' => Some('\u{208B}'),
        _ => None,
    }
}

/// Maps a subscript digit or sign back to ASCII.
pub const fn from_sub_digit(c: char) -> Option<char> {
    match c {
        '\u{2080}'..='\u{2089}' => char::from_u32('0' as u32 + (c as u32 - 0x2080)),
        '\u{208A}' => Some('+'),
        '\u{208B}' => Some('-'),
        _ => None,
    }
}

/// The digit value of an ASCII, superscript, or subscript digit.
pub fn digit_value(c: char) -> Option<u32> {
    let ascii = from_super_digit(c).or(from_sub_digit(c)).unwrap_or(c);
    ascii.to_digit(10)
}

pub fn is_super_digit(c: char) -> bool {
    from_super_digit(c).is_some_and(|a| a.is_ascii_digit())
}

pub fn is_sub_digit(c: char) -> bool {
    from_sub_digit(c).is_some_and(|a| a.is_ascii_digit())
}

/// Writes an integer using superscript characters.
pub fn superscript(n: i64) -> String {
    n.to_string().chars().filter_map(super_digit).collect()
}

/// Writes an integer using subscript characters.
pub fn subscript(n: i64) -> String {
    n.to_string().chars().filter_map(sub_digit).collect()
}

/// Unicode vulgar fractions, usable as exponents like `m^⅔`.
pub static VULGAR_FRACTIONS: phf::Map<char, (i64, i64)> = phf_map! {
    '\u{00BD}' => (1, 2),
    '\u{2153}' => (1, 3),
    '\u{2154}' => (2, 3),
    '\u{00BC}' => (1, 4),
    '\u{00BE}' => (3, 4),
    '\u{2155}' => (1, 5),
    '\u{2156}' => (2, 5),
    '\u{2157}' => (3, 5),
    '\u{2158}' => (4, 5),
    '\u{2159}' => (1, 6),
    '\u{215A}' => (5, 6),
    '\u{215B}' => (1, 8),
    '\u{215C}' => (3, 8),
    '\u{215D}' => (5, 8),
    '\u{215E}' => (7, 8),
};

/// The vulgar fraction character for a positive proper fraction, if Unicode has one.
pub fn vulgar_fraction(f: Fraction) -> Option<char> {
    VULGAR_FRACTIONS
        .entries()
        .find(|(_, (n, d))| f.numerator() == *n && f.denominator() == *d)
        .map(|(c, _)| *c)
}

/// Characters other than letters that can appear in a unit symbol.
const SPECIAL_SYMBOL_CHARS: &str = "°%‰′″'℃℉";

/// Whether a character can be part of a unit symbol.
pub fn is_symbol_char(c: char) -> bool {
    c.is_alphabetic() || SPECIAL_SYMBOL_CHARS.contains(c)
}
