//! Quantities as text: a decimal number, a separator, then the unit.

use either::Either;
use log::debug;
use nom::bytes::complete::take_while;
use nom::number::complete::double;
use nom::sequence::terminated;
use nom::IResult;

use crate::error::{ParseError, ParseErrorKind, UnitError};
use crate::format::UnitFormat;
use crate::markup::Block;
use crate::quantity::Quantity;

/// The narrow no-break space written between the number and the unit.
pub const SEPARATOR: char = '\u{202F}';

/// Characters ending the unit of a quantity inside a longer text.
const DELIMITERS: [char; 2] = [',', ';'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantityFormat {
    pub unit_format: UnitFormat,
    pub separator: char,
}

impl Default for QuantityFormat {
    fn default() -> Self {
        Self::new(UnitFormat::default())
    }
}

fn value(input: &str) -> IResult<&str, f64> {
    terminated(double, take_while(char::is_whitespace))(input)
}

fn char_offset(text: &str, rest: &str) -> usize {
    text[..text.len() - rest.len()].chars().count()
}

impl QuantityFormat {
    pub fn new(unit_format: UnitFormat) -> Self {
        Self {
            unit_format,
            separator: SEPARATOR,
        }
    }

    /// The value, then the unit symbol after the separator. Dimensionless values have no
    /// separator.
    pub fn format(&self, quantity: &Quantity) -> String {
        let number = Block::new_text(quantity.value().to_string());
        let markup = if quantity.unit().symbol() == Some("") {
            Either::Left(number)
        } else {
            Either::Right((
                number,
                Block::new_text(self.separator.to_string()),
                self.unit_format.block(quantity.unit()),
            ))
        };
        self.unit_format.render(&markup)
    }

    /// Reads a number followed by a unit expression or unit name: `5 km`, `9.81 m∕s²`,
    /// `100 feet`. The whole text must be consumed. Error positions count from the start of
    /// `text`.
    pub fn parse(&self, text: &str) -> Result<Quantity, UnitError> {
        let start = text.trim_start();
        let (rest, number) = value(start).map_err(|_| {
            let fragment = start.split_whitespace().next().unwrap_or_default();
            ParseError::new(
                ParseErrorKind::MissingValue,
                text,
                fragment,
                char_offset(text, start),
            )
        })?;
        let unit_text = rest.trim_end();
        let unit = self.unit_format.parse(unit_text).map_err(|err| match err {
            UnitError::Parse(e) => e.shifted(text, char_offset(text, rest)).into(),
            other => other,
        })?;
        Ok(Quantity::create(number, &unit))
    }

    /// Reads a quantity at the start of `text`, with its unit ending at a comma, a semicolon,
    /// or the end of the text. Returns the quantity and the text from the delimiter on, or `None`
    /// if no quantity could be read.
    pub fn parse_prefix<'a>(&self, text: &'a str) -> Option<(Quantity, &'a str)> {
        let end = text.find(DELIMITERS).unwrap_or(text.len());
        match self.parse(&text[..end]) {
            Ok(quantity) => Some((quantity, &text[end..])),
            Err(err) => {
                debug!("no quantity at the start of \"{}\": {}", text, err);
                None
            }
        }
    }
}
