//! Writing units as text, and reading them back.
//!
//! Units are first turned into markup [`Block`]s, then rendered either with Unicode operators and
//! superscripts (`kg∕(m²⋅s)`) or in the ASCII style of UCUM (`kg/(m2.s)`).

use crate::error::UnitError;
use crate::fraction::Fraction;
use crate::markup::{Ascii, Block, Render, Unicode};
use crate::names;
use crate::parsing;
use crate::symbols::{
    from_super_digit, superscript, vulgar_fraction, CARET, DIVIDE, LPAREN, MULTIPLY, RPAREN,
    VULGAR_FRACTIONS,
};
use crate::unit::{Factor, Unit, UnitNode};

/// How units are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// Unicode symbols: `⋅`, `∕`, superscript exponents, `µ`, `°C`.
    #[default]
    Symbol,
    /// ASCII symbols as UCUM writes them: `.`, `/`, trailing exponents, `u`, `Cel`.
    Ucum,
}

/// Formats units as symbols and parses symbols into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UnitFormat {
    pub style: Style,
}

/// The ASCII spelling of a unit symbol.
pub(crate) fn ascii_symbol(symbol: &str) -> String {
    match symbol {
        "°C" => return "Cel".to_string(),
        "°F" => return "[degF]".to_string(),
        "°" => return "deg".to_string(),
        _ => {}
    }
    let mut out = String::with_capacity(symbol.len());
    for c in symbol.chars() {
        match c {
            '⋅' | '·' => out.push('.'),
            '∕' => out.push('/'),
            '⁻' => out.push('-'),
            'µ' | 'μ' => out.push('u'),
            '′' => out.push('\''),
            '″' => out.push_str("''"),
            'Ω' => out.push_str("Ohm"),
            c => match (from_super_digit(c), VULGAR_FRACTIONS.get(&c)) {
                (Some(d), _) => out.push(d),
                (None, Some((n, d))) => out.push_str(&format!("({}/{})", n, d)),
                (None, None) => out.push(c),
            },
        }
    }
    out
}

/// A unit symbol, which ASCII mode spells differently.
fn symbol_block(symbol: &str) -> Block {
    Block::new_dynamic_symbol(ascii_symbol(symbol), symbol.to_string())
}

/// The exponent written after a symbol: `²`, `⁻¹`, `^⅔`, `^(2∕7)`. Empty for 1.
pub(crate) fn exponent_block(power: &Fraction) -> Block {
    if *power == Fraction::ONE {
        Block::NONE
    } else if power.is_integer() {
        let n = power.numerator();
        Block::new_dynamic_symbol(n.to_string(), superscript(n))
    } else if let Some(c) = vulgar_fraction(*power) {
        Block::new_concatenation([
            CARET,
            Block::new_dynamic_symbol(
                format!("({}/{})", power.numerator(), power.denominator()),
                c.to_string(),
            ),
        ])
    } else {
        Block::new_concatenation([
            CARET,
            LPAREN,
            Block::new_text(power.numerator().to_string()),
            DIVIDE,
            Block::new_text(power.denominator().to_string()),
            RPAREN,
        ])
    }
}

fn factor_block(symbol: &str, power: &Fraction) -> Block {
    Block::new_concatenation([symbol_block(symbol), exponent_block(power)])
}

fn product_block(factors: &[Factor], negate: bool) -> Vec<Block> {
    let mut out = vec![];
    for (i, f) in factors.iter().enumerate() {
        if i > 0 {
            out.push(MULTIPLY);
        }
        let power = if negate { -f.power } else { f.power };
        out.push(factor_block(&f.symbol, &power));
    }
    out
}

/// Numerator first, then the denominator after a division slash, in parentheses if it has more
/// than one factor: `kg∕(m²⋅s)`, `1∕s`.
fn factors_block(factors: &[Factor]) -> Block {
    let (num, den): (Vec<Factor>, Vec<Factor>) = factors
        .iter()
        .cloned()
        .partition(|f| f.power.signum() > 0);
    let mut out = if num.is_empty() {
        vec![Block::new_text("1")]
    } else {
        product_block(&num, false)
    };
    match den.len() {
        0 => {}
        1 => {
            out.push(DIVIDE);
            out.extend(product_block(&den, true));
        }
        _ => {
            out.push(DIVIDE);
            out.push(LPAREN);
            out.extend(product_block(&den, true));
            out.push(RPAREN);
        }
    }
    Block::new_concatenation(out)
}

/// The Unicode symbol of a product of factors.
pub(crate) fn factors_symbol(factors: &[Factor]) -> String {
    Render::<Unicode>::render_as_str(&factors_block(factors))
}

/// A conventional unit without a symbol, as its scale and target: `1000⋅m⋅s`, `m∕100`,
/// `1000∕(m⋅s)`.
fn scaled_block(unit: &Unit, target: &Unit) -> Block {
    let target_block = unit_block(target);
    let Some(scale) = unit.to_target().and_then(|c| c.ratio()) else {
        let conv = unit.to_target().map(|c| c.to_string()).unwrap_or_default();
        return Block::new_concatenation([
            LPAREN,
            Block::new_text(conv),
            RPAREN,
            MULTIPLY,
            target_block,
        ]);
    };
    let (num, den) = match unit.to_target().and_then(|c| c.exact_ratio()) {
        Some(f) => (f.numerator().to_string(), f.denominator()),
        None => (scale.to_string(), 1),
    };
    let mut out = vec![];
    match target.symbol() {
        Some("") => out.push(Block::new_text(num)),
        // 1000∕(m⋅s) rather than 1000⋅1∕(m⋅s)
        Some(sym) if num != "1" && sym.starts_with("1∕") => {
            out.push(Block::new_text(num));
            out.push(symbol_block(&sym["1".len()..]));
        }
        _ => {
            if num != "1" {
                out.push(Block::new_text(num));
                out.push(MULTIPLY);
            }
            out.push(target_block);
        }
    }
    if den != 1 {
        out.push(DIVIDE);
        out.push(Block::new_text(den.to_string()));
    }
    Block::new_concatenation(out)
}

fn unit_block(unit: &Unit) -> Block {
    if let Some(symbol) = unit.symbol() {
        return symbol_block(symbol);
    }
    match unit.node() {
        UnitNode::System(s) => factors_block(&s.factors),
        UnitNode::Conventional(c) => scaled_block(unit, &c.target),
    }
}

impl UnitFormat {
    pub fn new(style: Style) -> Self {
        Self { style }
    }

    /// Markup for a unit, which can be rendered in either style.
    pub fn block(&self, unit: &Unit) -> Block {
        unit_block(unit)
    }

    pub fn format(&self, unit: &Unit) -> String {
        self.render(&self.block(unit))
    }

    /// Renders markup in this format's style.
    pub fn render<R: Render<Unicode> + Render<Ascii>>(&self, markup: &R) -> String {
        match self.style {
            Style::Symbol => Render::<Unicode>::render_as_str(markup),
            Style::Ucum => Render::<Ascii>::render_as_str(markup),
        }
    }

    /// Parses a unit expression, or failing that a unit name like `square metres`. Both styles
    /// accept both spellings, so parsing does not depend on the style.
    pub fn parse(&self, text: &str) -> Result<Unit, UnitError> {
        parsing::parse_unit(text).or_else(|err| names::resolve(text).ok_or(err))
    }
}
