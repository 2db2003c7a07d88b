//! Parsing unit expressions like `kg∕(m²⋅s)`, `km/h`, `m^⅔`, or `K.m2.kg-1.s-1`.
//!
//! Parsing happens in two steps: nom parsers build an [`Expression`] that borrows from the input,
//! and the expression is then evaluated against the registry. Evaluation errors point back into
//! the input through the borrowed symbol slices.

use std::fmt::Display;

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{anychar, char, digit1, i64, multispace0, multispace1, one_of};
use nom::combinator::{map, map_opt, map_res, opt, recognize, value};
use nom::error::ParseError as NomParseError;
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

use crate::error::{ParseError, ParseErrorKind, UnitError};
use crate::format::exponent_block;
use crate::fraction::{BaseInt, Fraction};
use crate::markup::{Render, Unicode};
use crate::prefixes;
use crate::registry::UnitRegistry;
use crate::symbols::{digit_value, is_sub_digit, is_super_digit, is_symbol_char, VULGAR_FRACTIONS};
use crate::unit::Unit;
use crate::units::Units;

/// A binary operator between two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Multiply,
    Divide,
}

/// Something that can be raised to a power.
#[derive(Debug, Clone, PartialEq)]
pub enum Term<'a> {
    /// A unit symbol, possibly prefixed.
    Symbol(&'a str),
    /// A scale factor like `1000`.
    Number(&'a str),
    Group(Box<Expression<'a>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Power<'a> {
    pub term: Term<'a>,
    pub exponent: Fraction,
}

/// Terms combined left to right: `a/b⋅c` is `(a/b)⋅c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression<'a> {
    pub first: Power<'a>,
    pub rest: Vec<(Operator, Power<'a>)>,
}

impl Display for Term<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Symbol(s) => {
                let s: String = s.chars().map(prefixes::normalize_micro).collect();
                write!(f, "{}", s)
            }
            Term::Number(n) => write!(f, "{}", n),
            Term::Group(e) => write!(f, "({})", e),
        }
    }
}

impl Display for Power<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.term,
            Render::<Unicode>::render_as_str(&exponent_block(&self.exponent))
        )
    }
}

/// Writes the expression in the canonical Unicode style.
impl Display for Expression<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first)?;
        for (op, p) in &self.rest {
            let op = match op {
                Operator::Multiply => '⋅',
                Operator::Divide => '∕',
            };
            write!(f, "{}{}", op, p)?;
        }
        Ok(())
    }
}

/// A combinator that takes a parser `inner` and produces a parser that also consumes both leading and
/// trailing whitespace, returning the output of `inner`.
fn ws<'a, F, O, E: NomParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parses a unit symbol: letters and a few special characters like `°` and `%`.
pub fn symbol(input: &str) -> IResult<&str, &str> {
    take_while1(is_symbol_char)(input)
}

/// Parses an unsigned decimal number, like `1000` or `2.54`.
pub fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)
}

/// Parses a parenthesized expression.
pub fn group(input: &str) -> IResult<&str, Expression> {
    delimited(
        pair(char('('), multispace0),
        expression,
        pair(multispace0, char(')')),
    )(input)
}

pub fn term(input: &str) -> IResult<&str, Term> {
    alt((
        map(symbol, Term::Symbol),
        map(number, Term::Number),
        map(group, |e| Term::Group(Box::new(e))),
    ))(input)
}

/// Parses an integer or a ratio of integers, like `2`, `-1`, or `2/3`.
pub fn ratio(input: &str) -> IResult<&str, Fraction> {
    map_res(
        pair(ws(i64), opt(preceded(one_of("/∕"), ws(i64)))),
        |(n, d)| Fraction::new(n, d.unwrap_or(1)),
    )(input)
}

/// Parses a Unicode vulgar fraction like `⅔`.
pub fn vulgar(input: &str) -> IResult<&str, Fraction> {
    map_opt(anychar, |c| {
        VULGAR_FRACTIONS
            .get(&c)
            .and_then(|(n, d)| Fraction::new(*n, *d).ok())
    })(input)
}

fn script_digits(sign: Option<char>, digits: &str) -> Option<Fraction> {
    let n = digits.chars().try_fold(0 as BaseInt, |acc, c| {
        acc.checked_mul(10)?.checked_add(BaseInt::from(digit_value(c)?))
    })?;
    Some(Fraction::from_int(if matches!(sign, Some('⁻' | '₋')) { -n } else { n }))
}

/// Parses a superscript integer like `²` or `⁻¹`, or a subscript one like `₂` or `₋₁`.
pub fn superscript_int(input: &str) -> IResult<&str, Fraction> {
    alt((
        map_opt(
            pair(opt(one_of("⁻⁺")), take_while1(is_super_digit)),
            |(sign, digits)| script_digits(sign, digits),
        ),
        map_opt(
            pair(opt(one_of("₋₊")), take_while1(is_sub_digit)),
            |(sign, digits)| script_digits(sign, digits),
        ),
    ))(input)
}

/// Parses the exponent after a term: `^2`, `^-1`, `^(2/3)`, `^⅔`, `²`, `⁻¹`, `₂`, `⅔`, or plain
/// digits as in `m2` and `s-1`.
pub fn exponent(input: &str) -> IResult<&str, Fraction> {
    alt((
        preceded(
            char('^'),
            alt((
                delimited(char('('), ratio, char(')')),
                vulgar,
                superscript_int,
                map_res(i64, |n| Fraction::new(n, 1)),
            )),
        ),
        superscript_int,
        vulgar,
        map_res(i64, |n| Fraction::new(n, 1)),
    ))(input)
}

pub fn power(input: &str) -> IResult<&str, Power> {
    map(pair(term, opt(exponent)), |(term, exponent)| Power {
        term,
        exponent: exponent.unwrap_or(Fraction::ONE),
    })(input)
}

/// Parses an operator. Whitespace alone between two terms is a multiplication.
pub fn operator(input: &str) -> IResult<&str, Operator> {
    alt((
        ws(alt((
            value(Operator::Multiply, one_of("*⋅·.×")),
            value(Operator::Divide, one_of("/∕÷")),
        ))),
        value(Operator::Multiply, multispace1),
    ))(input)
}

pub fn expression(input: &str) -> IResult<&str, Expression> {
    map(
        pair(power, many0(pair(operator, power))),
        |(first, rest)| Expression { first, rest },
    )(input)
}

/// Evaluates parsed expressions, reporting errors as positions in `text`.
struct Evaluator<'t> {
    text: &'t str,
}

impl<'t> Evaluator<'t> {
    /// The character offset of `fragment`, which must be a slice of the text.
    fn position(&self, fragment: &str) -> usize {
        let offset = (fragment.as_ptr() as usize).saturating_sub(self.text.as_ptr() as usize);
        self.text.get(..offset).map_or(0, |s| s.chars().count())
    }

    fn error(&self, kind: ParseErrorKind, fragment: &str) -> UnitError {
        ParseError::new(kind, self.text, fragment, self.position(fragment)).into()
    }

    /// The error for input that the grammar could not consume.
    fn leftover(&self, rest: &str) -> UnitError {
        let rest = rest.trim_start();
        let kind = match rest.chars().next() {
            Some('^') => ParseErrorKind::MalformedExponent,
            Some(c)
                if !(is_symbol_char(c)
                    || c.is_ascii_digit()
                    || c.is_whitespace()
                    || "()*⋅·.×/∕÷^-⁻₋".contains(c)) =>
            {
                ParseErrorKind::IllegalCharacter
            }
            _ => ParseErrorKind::UnexpectedCharacters,
        };
        self.error(kind, rest)
    }

    /// Looks a symbol up, then tries splitting off a prefix.
    fn symbol(&self, symbol: &str) -> Result<Unit, UnitError> {
        let registry = UnitRegistry::global();
        let normalized: String = symbol.chars().map(prefixes::normalize_micro).collect();
        if let Some(unit) = registry.lookup_by_symbol(&normalized) {
            return Ok(unit);
        }
        for (exp, rest) in prefixes::split(&normalized) {
            if let Some(unit) = registry.lookup_by_symbol(rest).filter(Unit::is_prefixable) {
                return Ok(unit.transform(&prefixes::converter(exp)));
            }
        }
        Err(self.error(ParseErrorKind::UnknownUnit, symbol))
    }

    fn power(&self, power: &Power) -> Result<Unit, UnitError> {
        let base = match &power.term {
            Term::Symbol(s) => self.symbol(s)?,
            Term::Number(n) => {
                let value: f64 = n
                    .parse()
                    .map_err(|_| self.error(ParseErrorKind::UnexpectedCharacters, n))?;
                Units::global().unity.multiply_by(value)
            }
            Term::Group(e) => self.expression(e)?,
        };
        let exp = power.exponent;
        let num = i32::try_from(exp.numerator()).map_err(|_| UnitError::Overflow("exponent"))?;
        let den = i32::try_from(exp.denominator()).map_err(|_| UnitError::Overflow("exponent"))?;
        let raised = base.pow(num)?;
        if den == 1 {
            Ok(raised)
        } else {
            raised.root(den)
        }
    }

    fn expression(&self, expr: &Expression) -> Result<Unit, UnitError> {
        let mut unit = self.power(&expr.first)?;
        for (op, p) in &expr.rest {
            let rhs = self.power(p)?;
            unit = match op {
                Operator::Multiply => unit.multiply(&rhs)?,
                Operator::Divide => unit.divide(&rhs)?,
            };
        }
        Ok(unit)
    }
}

/// Checks that parentheses are balanced, pointing at the first one without a partner.
fn check_parentheses(text: &str) -> Result<(), UnitError> {
    let mut open = vec![];
    for (i, (byte, c)) in text.char_indices().enumerate() {
        match c {
            '(' => open.push((i, byte)),
            ')' if open.pop().is_none() => {
                return Err(ParseError::new(
                    ParseErrorKind::UnbalancedParenthesis,
                    text,
                    &text[byte..],
                    i,
                )
                .into())
            }
            _ => {}
        }
    }
    match open.first() {
        Some((i, byte)) => Err(ParseError::new(
            ParseErrorKind::UnbalancedParenthesis,
            text,
            &text[*byte..],
            *i,
        )
        .into()),
        None => Ok(()),
    }
}

/// Parses a unit expression. The empty string is the unity.
///
/// A registered symbol is taken whole before the expression is split into terms, so `N⋅m` is the
/// newton metre rather than the joule. A compound without a symbol of its own, like the kilometre
/// per square metre second, is the same unit however it is spelled.
pub fn parse_unit(text: &str) -> Result<Unit, UnitError> {
    let input = text.trim();
    if input.is_empty() {
        return Ok(Units::global().unity.clone());
    }
    let normalized: String = input.chars().map(prefixes::normalize_micro).collect();
    if let Some(unit) = UnitRegistry::global().lookup_by_symbol(&normalized) {
        return Ok(unit);
    }
    check_parentheses(text)?;
    let eval = Evaluator { text };
    let (rest, expr) = match expression(input) {
        Ok(parsed) => parsed,
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => return Err(eval.leftover(e.input)),
        Err(nom::Err::Incomplete(_)) => return Err(eval.leftover(input)),
    };
    if !rest.is_empty() {
        return Err(eval.leftover(rest));
    }
    eval.expression(&expr)
}
