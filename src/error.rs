//! Error conditions raised by the unit engine. Every condition carries a stable key (see
//! [`UnitError::key`]) so that callers can map it to localized text; the `Display` messages here
//! are the English fallback.

use std::fmt::Display;

use thiserror::Error;

use crate::quantity_kind::QuantityKind;

/// The kinds of failure the expression parser can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A symbol that is neither registered, a prefixed registered symbol, nor a known name.
    UnknownUnit,
    /// A parenthesis without its partner.
    UnbalancedParenthesis,
    /// An exponent marker not followed by a valid integer or fraction.
    MalformedExponent,
    /// The expression parsed, but something was left over.
    UnexpectedCharacters,
    /// A character that has no meaning anywhere in a unit expression.
    IllegalCharacter,
    /// A quantity without a leading number.
    MissingValue,
}

impl ParseErrorKind {
    pub const fn key(&self) -> &'static str {
        match self {
            Self::UnknownUnit => "UnknownUnit",
            Self::UnbalancedParenthesis => "NonEquilibratedParenthesis",
            Self::MalformedExponent => "NotAnInteger",
            Self::UnexpectedCharacters => "UnexpectedCharactersAfter",
            Self::IllegalCharacter => "IllegalCharacter",
            Self::MissingValue => "CanNotParse",
        }
    }
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::UnknownUnit => "unknown unit",
            Self::UnbalancedParenthesis => "unbalanced parenthesis",
            Self::MalformedExponent => "malformed exponent",
            Self::UnexpectedCharacters => "unexpected characters",
            Self::IllegalCharacter => "illegal character",
            Self::MissingValue => "missing numeric value",
        };
        write!(f, "{msg}")
    }
}

/// A failure to read a unit or quantity from text. `position` counts characters, not bytes, from
/// the start of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} \"{fragment}\" at position {position} in \"{text}\"")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The complete input.
    pub text: String,
    /// The offending part of the input.
    pub fragment: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, text: &str, fragment: &str, position: usize) -> Self {
        Self {
            kind,
            text: text.to_string(),
            fragment: fragment.to_string(),
            position,
        }
    }

    /// Moves the error right by `offset` characters, for errors found in a suffix of a larger input.
    pub fn shifted(mut self, text: &str, offset: usize) -> Self {
        self.text = text.to_string();
        self.position += offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("cannot convert from \"{from}\" to \"{to}\": incompatible dimensions {from_dim} and {to_dim}")]
    Incommensurable {
        from: String,
        to: String,
        from_dim: String,
        to_dim: String,
    },
    #[error("\"{0}\" is not on a ratio scale and does not support multiplication, division, or powers")]
    NonRatioUnit(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("zero denominator")]
    ZeroDenominator,
    #[error("root of order zero")]
    ZeroRoot,
    #[error("integer overflow in {0}")]
    Overflow(&'static str),
    #[error("unsupported implementation: {0}")]
    UnsupportedImplementation(String),
    #[error("\"{unit}\" cannot represent {kind}")]
    IncompatibleQuantity { unit: String, kind: QuantityKind },
    #[error("no unit registered for code {0}")]
    UnknownCode(String),
}

impl UnitError {
    /// The stable identifier of this condition.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.kind.key(),
            Self::Incommensurable { .. } => "IncompatibleUnits",
            Self::NonRatioUnit(_) => "NonRatioUnit",
            Self::UnsupportedOperation(_) => "UnsupportedOperation",
            Self::ZeroDenominator | Self::ZeroRoot | Self::Overflow(_) => "ArithmeticError",
            Self::UnsupportedImplementation(_) => "UnsupportedImplementation",
            Self::IncompatibleQuantity { .. } => "IncompatibleUnitDimension",
            Self::UnknownCode(_) => "UnknownUnit",
        }
    }
}
