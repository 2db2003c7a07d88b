//! Units of measurement: dimensions, exact converters between units, a registry of named units,
//! parsing and formatting of unit expressions, and quantities built on top of them.

pub mod algebra;
pub mod converter;
pub mod definition_uri;
pub mod dimension;
pub mod error;
pub mod format;
pub mod fraction;
pub mod markup;
pub mod names;
pub mod parsing;
pub mod prefixes;
pub mod quantity;
pub mod quantity_format;
pub mod quantity_kind;
pub mod registry;
pub mod symbols;
pub mod unit;
pub mod units;

pub use converter::UnitConverter;
pub use dimension::Dimension;
pub use error::{ParseError, ParseErrorKind, UnitError};
pub use format::{Style, UnitFormat};
pub use fraction::Fraction;
pub use quantity::Quantity;
pub use quantity_format::QuantityFormat;
pub use quantity_kind::QuantityKind;
pub use unit::{Scope, Unit};
pub use units::Units;
