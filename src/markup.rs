//! Markup for unit symbols. A symbol like `kg∕(m²⋅s)` is built once as a tree of blocks, and a
//! render mode decides how each piece looks: Unicode operators and superscripts by default, or the
//! plain ASCII of UCUM (`kg/(m2.s)`).

use std::borrow::Cow;

use either::Either;
use fortuples::fortuples;

/// One piece of markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Written the same way in every mode.
    Text(String),
    /// Written differently depending on the mode, like an operator or an exponent.
    Symbol(Symbol),
    /// Pieces written one after the other.
    Concatenation(Vec<Block>),
}

/// The two spellings of a symbol.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Symbol {
    pub ascii: Cow<'static, str>,
    pub unicode: Cow<'static, str>,
}

impl Block {
    pub const NONE: Block = Block::Text(String::new());

    pub fn new_text<T: Into<String>>(text: T) -> Self {
        Block::Text(text.into())
    }

    pub const fn new_symbol(ascii: &'static str, unicode: &'static str) -> Self {
        Block::Symbol(Symbol {
            ascii: Cow::Borrowed(ascii),
            unicode: Cow::Borrowed(unicode),
        })
    }

    /// A symbol built at runtime, like the exponent of a power.
    pub fn new_dynamic_symbol(ascii: String, unicode: String) -> Self {
        Block::Symbol(Symbol {
            ascii: Cow::Owned(ascii),
            unicode: Cow::Owned(unicode),
        })
    }

    pub fn new_concatenation<T: IntoIterator<Item = Block>>(blocks: T) -> Self {
        Block::Concatenation(blocks.into_iter().collect())
    }
}

/// How blocks are written out. Only the spelling of symbols differs between modes.
pub trait RenderMode: Default {
    fn symbol<'s>(&self, sym: &'s Symbol) -> &'s str;

    fn write_block(&self, block: &Block, out: &mut String) {
        match block {
            Block::Text(text) => out.push_str(text),
            Block::Symbol(sym) => out.push_str(self.symbol(sym)),
            Block::Concatenation(blocks) => {
                for b in blocks {
                    self.write_block(b, out);
                }
            }
        }
    }
}

/// Unicode operators and superscript exponents.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Unicode;

impl RenderMode for Unicode {
    fn symbol<'s>(&self, sym: &'s Symbol) -> &'s str {
        &sym.unicode
    }
}

/// Plain ASCII, as in UCUM.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Ascii;

impl RenderMode for Ascii {
    fn symbol<'s>(&self, sym: &'s Symbol) -> &'s str {
        &sym.ascii
    }
}

/// Anything that can be written as markup in mode `M`.
pub trait Render<M: RenderMode> {
    fn render_into(&self, mode: &M, out: &mut String);

    fn render_as_str(&self) -> String {
        let mut out = String::new();
        self.render_into(&M::default(), &mut out);
        out
    }
}

impl<M: RenderMode> Render<M> for Block {
    fn render_into(&self, mode: &M, out: &mut String) {
        mode.write_block(self, out);
    }
}

impl<M: RenderMode, T: Render<M>> Render<M> for Vec<T> {
    fn render_into(&self, mode: &M, out: &mut String) {
        for item in self {
            item.render_into(mode, out);
        }
    }
}

impl<M: RenderMode, L: Render<M>, R: Render<M>> Render<M> for Either<L, R> {
    fn render_into(&self, mode: &M, out: &mut String) {
        match self {
            Either::Left(l) => l.render_into(mode, out),
            Either::Right(r) => r.render_into(mode, out),
        }
    }
}

fortuples! {
    #[tuples::min_size(1)]
    impl<M: RenderMode> Render<M> for #Tuple
    where
        #(#Member: Render<M>),*
    {
        fn render_into(&self, mode: &M, out: &mut String) {
            #(#self.render_into(mode, out);)*
        }
    }
}
