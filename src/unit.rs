//! The unit model. A unit is either a [`SystemUnit`], the unscaled representative of a dimension,
//! or a [`ConventionalUnit`], another unit transformed by a converter (km = m × 1000). Units are
//! shared handles: cloning is cheap, and interned units can be compared by identity with
//! [`Unit::is_same`].
//!
//! Arithmetic on a conventional unit is done on its target and re-wrapped with the converter, so
//! every unit is at most a short chain of conventional layers above one system unit. A layer
//! stacks on another conventional unit only when that unit is prefixable, as in centilitre over
//! litre over cubic metre.

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::algebra::{ConverterGroup, Group};
use crate::converter::{LinearConverter, UnitConverter};
use crate::dimension::{BaseDimension, Dimension};
use crate::error::UnitError;
use crate::format::{self, UnitFormat};
use crate::fraction::Fraction;
use crate::prefixes;
use crate::quantity_kind::QuantityKind;
use crate::registry::UnitRegistry;

/// The system of units a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// SI units and their prefixed forms.
    Si,
    /// Non-SI units accepted for use with SI, like the minute, litre, and degree.
    Accepted,
    /// Imperial and US customary units.
    Imperial,
    #[default]
    Other,
}

/// One symbol raised to a power, as a building block of a product of units.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Factor {
    pub symbol: String,
    pub power: Fraction,
}

impl Factor {
    pub fn new(symbol: &str, power: Fraction) -> Self {
        Self {
            symbol: symbol.to_string(),
            power,
        }
    }
}

#[derive(Debug)]
pub struct SystemUnit {
    pub(crate) dimension: Dimension,
    pub(crate) kind: Option<QuantityKind>,
    pub(crate) symbol: Option<String>,
    /// The product this unit was built from. A named atomic unit is its own single factor.
    pub(crate) factors: Vec<Factor>,
    pub(crate) scope: Scope,
    pub(crate) prefixable: bool,
}

#[derive(Debug)]
pub struct ConventionalUnit {
    pub(crate) target: Unit,
    pub(crate) to_target: UnitConverter,
    pub(crate) symbol: Option<String>,
    pub(crate) scope: Scope,
    pub(crate) prefixable: bool,
}

#[derive(Debug)]
pub(crate) enum UnitNode {
    System(SystemUnit),
    Conventional(ConventionalUnit),
}

/// A unit of measurement.
#[derive(Clone)]
pub struct Unit(Arc<UnitNode>);

/// The factors of a dimension in SI base units, in the order M, L, T, I, Θ, N, J.
fn base_factors(dimension: &Dimension) -> Vec<Factor> {
    BaseDimension::ALL
        .iter()
        .filter(|b| !dimension.exponent(**b).is_zero())
        .map(|b| Factor::new(b.unit_symbol(), dimension.exponent(*b)))
        .collect()
}

impl SystemUnit {
    /// The unit of a dimension reached by arithmetic: the registered unit of that dimension if there
    /// is one, otherwise a new unit named after the dimension in base units, like `kg∕(m²⋅s)`. The
    /// name does not depend on how the dimension was reached. It takes a prefix unless it starts
    /// with the kilogram: `cm⋅s`.
    fn resolve(registry: &UnitRegistry, dimension: Dimension) -> Unit {
        if let Some(existing) = registry.for_dimension(&dimension) {
            return existing;
        }
        let factors = base_factors(&dimension);
        let prefixable = factors
            .first()
            .is_some_and(|f| f.symbol != BaseDimension::Mass.unit_symbol());
        let unit = Unit::from_node(UnitNode::System(SystemUnit {
            dimension,
            kind: None,
            symbol: Some(format::factors_symbol(&factors)),
            factors,
            scope: Scope::Other,
            prefixable,
        }));
        registry.intern_system(unit)
    }
}

impl ConventionalUnit {
    /// The unit `target` transformed by `to_target`, reusing an existing unit where possible: an
    /// identity converter gives `target` itself, and an equivalent sibling of `target` is reused.
    /// A new unit gets a prefixed symbol if `target` is prefixable and the scale matches a prefix.
    pub(crate) fn create(
        registry: &UnitRegistry,
        target: &Unit,
        to_target: UnitConverter,
    ) -> Unit {
        if to_target.is_identity() {
            return target.clone();
        }
        if to_target.is_linear() {
            if let Some(existing) = registry.find_related(target, &to_target) {
                return existing;
            }
        }
        let symbol = match (target.is_prefixable(), target.symbol(), to_target.ratio()) {
            (true, Some(sym), Some(scale)) if !sym.is_empty() => prefixes::prefixed(scale, sym),
            _ => None,
        };
        let unit = Unit::from_node(UnitNode::Conventional(ConventionalUnit {
            target: target.clone(),
            to_target,
            symbol,
            scope: target.scope(),
            prefixable: false,
        }));
        registry.intern_derived(target, unit)
    }
}

impl Unit {
    pub(crate) fn from_node(node: UnitNode) -> Self {
        Self(Arc::new(node))
    }

    pub(crate) fn node(&self) -> &UnitNode {
        &self.0
    }

    /// A new named system unit. Used to define the unit table.
    pub(crate) fn new_system(
        symbol: &str,
        dimension: Dimension,
        factors: Vec<Factor>,
        kind: Option<QuantityKind>,
        scope: Scope,
        prefixable: bool,
    ) -> Self {
        Self::from_node(UnitNode::System(SystemUnit {
            dimension,
            kind,
            symbol: Some(symbol.to_string()),
            factors,
            scope,
            prefixable,
        }))
    }

    /// A new named conventional unit. Used to define the unit table.
    pub(crate) fn new_conventional(
        symbol: &str,
        target: &Unit,
        to_target: UnitConverter,
        scope: Scope,
        prefixable: bool,
    ) -> Self {
        Self::from_node(UnitNode::Conventional(ConventionalUnit {
            target: target.clone(),
            to_target,
            symbol: Some(symbol.to_string()),
            scope,
            prefixable,
        }))
    }

    /// An identity usable as a map key. Interned units live as long as their registry, so the key
    /// is never reused while it matters.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Whether both handles refer to the same instance.
    pub fn is_same(&self, other: &Unit) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn symbol(&self) -> Option<&str> {
        match self.node() {
            UnitNode::System(s) => s.symbol.as_deref(),
            UnitNode::Conventional(c) => c.symbol.as_deref(),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self.node(), UnitNode::System(_))
    }

    pub fn dimension(&self) -> Dimension {
        match self.node() {
            UnitNode::System(s) => s.dimension,
            UnitNode::Conventional(c) => c.target.dimension(),
        }
    }

    /// The system unit at the root of this unit's target chain.
    pub fn system_unit(&self) -> Unit {
        match self.node() {
            UnitNode::System(_) => self.clone(),
            UnitNode::Conventional(c) => c.target.system_unit(),
        }
    }

    /// The quantity kind of the system unit, if it has one.
    pub fn quantity_kind(&self) -> Option<QuantityKind> {
        match self.node() {
            UnitNode::System(s) => s.kind,
            UnitNode::Conventional(c) => c.target.quantity_kind(),
        }
    }

    pub fn scope(&self) -> Scope {
        match self.node() {
            UnitNode::System(s) => s.scope,
            UnitNode::Conventional(c) => c.scope,
        }
    }

    pub fn is_prefixable(&self) -> bool {
        match self.node() {
            UnitNode::System(s) => s.prefixable,
            UnitNode::Conventional(c) => c.prefixable,
        }
    }

    /// The factors of a system unit. Empty for conventional units and for the unity.
    pub fn factors(&self) -> &[Factor] {
        match self.node() {
            UnitNode::System(s) => &s.factors,
            UnitNode::Conventional(_) => &[],
        }
    }

    pub fn target(&self) -> Option<&Unit> {
        match self.node() {
            UnitNode::System(_) => None,
            UnitNode::Conventional(c) => Some(&c.target),
        }
    }

    pub fn to_target(&self) -> Option<&UnitConverter> {
        match self.node() {
            UnitNode::System(_) => None,
            UnitNode::Conventional(c) => Some(&c.to_target),
        }
    }

    /// The dimensionless system unit with no factors.
    pub fn is_unity(&self) -> bool {
        match self.node() {
            UnitNode::System(s) => s.factors.is_empty() && s.dimension.is_dimensionless(),
            UnitNode::Conventional(_) => false,
        }
    }

    /// Converter from this unit to its system unit.
    pub fn converter_to_system(&self) -> UnitConverter {
        let mut chain = vec![];
        let mut unit = self;
        while let UnitNode::Conventional(c) = unit.node() {
            chain.push(&c.to_target);
            unit = &c.target;
        }
        ConverterGroup.reduce(chain)
    }

    /// Whether the unit scales its system unit without an offset.
    pub fn is_ratio_scale(&self) -> bool {
        self.converter_to_system().is_linear()
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension() == other.dimension()
    }

    /// Equivalent system units and an equivalent conversion to them.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        if self.is_same(other) {
            return true;
        }
        match (self.node(), other.node()) {
            (UnitNode::System(a), UnitNode::System(b)) => {
                a.dimension == b.dimension && a.kind == b.kind
            }
            (UnitNode::Conventional(_), UnitNode::Conventional(_)) => {
                self.system_unit().is_equivalent(&other.system_unit())
                    && ConverterGroup.equiv(
                        &self.converter_to_system(),
                        &other.converter_to_system(),
                    )
            }
            _ => false,
        }
    }

    /// The converter from values in this unit to values in `other`.
    pub fn converter_to(&self, other: &Unit) -> Result<UnitConverter, UnitError> {
        if self.is_same(other) {
            return Ok(UnitConverter::Identity);
        }
        if !self.is_compatible(other) {
            return Err(UnitError::Incommensurable {
                from: self.to_string(),
                to: other.to_string(),
                from_dim: self.dimension().to_string(),
                to_dim: other.dimension().to_string(),
            });
        }
        if let UnitNode::Conventional(c) = self.node() {
            if c.target.is_same(other) {
                return Ok(c.to_target.clone());
            }
        }
        Ok(self
            .converter_to_system()
            .concatenate(&other.converter_to_system().inverse()))
    }

    /// The code this unit is registered under in the global registry.
    pub fn epsg_code(&self) -> Option<u32> {
        UnitRegistry::global().code_of(self)
    }

    fn ensure_ratio(&self) -> Result<(), UnitError> {
        match self.node() {
            UnitNode::Conventional(c) if !c.to_target.is_linear() => {
                Err(UnitError::NonRatioUnit(self.to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn multiply(&self, other: &Unit) -> Result<Unit, UnitError> {
        self.multiply_in(UnitRegistry::global(), other)
    }

    pub fn divide(&self, other: &Unit) -> Result<Unit, UnitError> {
        self.divide_in(UnitRegistry::global(), other)
    }

    pub fn pow(&self, n: i32) -> Result<Unit, UnitError> {
        self.pow_in(UnitRegistry::global(), n)
    }

    pub fn root(&self, n: i32) -> Result<Unit, UnitError> {
        self.root_in(UnitRegistry::global(), n)
    }

    pub fn inverse(&self) -> Result<Unit, UnitError> {
        self.pow(-1)
    }

    /// This unit scaled by `factor`: `METRE.multiply_by(1000.0)` is the kilometre.
    pub fn multiply_by(&self, factor: f64) -> Unit {
        self.transform(&LinearConverter::create(factor, 0.0))
    }

    /// This unit divided by `divisor`: `METRE.divide_by(1000.0)` is the millimetre.
    pub fn divide_by(&self, divisor: f64) -> Unit {
        self.transform(&LinearConverter::create(divisor, 0.0).inverse())
    }

    /// The unit whose values convert to this unit's values through `op`.
    pub fn transform(&self, op: &UnitConverter) -> Unit {
        self.transform_in(UnitRegistry::global(), op)
    }

    /// This unit relabelled as measuring `kind`: `JOULE.as_type(Torque)` is the newton metre.
    pub fn as_type(&self, kind: QuantityKind) -> Result<Unit, UnitError> {
        self.as_type_in(UnitRegistry::global(), kind)
    }

    /// A system unit with the same dimension under a different symbol.
    pub fn alternate(&self, symbol: &str) -> Result<Unit, UnitError> {
        self.alternate_in(UnitRegistry::global(), symbol)
    }

    pub(crate) fn multiply_in(&self, registry: &UnitRegistry, other: &Unit) -> Result<Unit, UnitError> {
        if other.is_unity() {
            return Ok(self.clone());
        }
        if self.is_unity() {
            return Ok(other.clone());
        }
        match (self.node(), other.node()) {
            (UnitNode::Conventional(c), _) => {
                self.ensure_ratio()?;
                let product = c.target.multiply_in(registry, other)?;
                Ok(product.transform_in(registry, &c.to_target))
            }
            (_, UnitNode::Conventional(c)) => {
                other.ensure_ratio()?;
                let product = self.multiply_in(registry, &c.target)?;
                Ok(product.transform_in(registry, &c.to_target))
            }
            (UnitNode::System(a), UnitNode::System(b)) => Ok(SystemUnit::resolve(
                registry,
                a.dimension.multiply(&b.dimension)?,
            )),
        }
    }

    pub(crate) fn divide_in(&self, registry: &UnitRegistry, other: &Unit) -> Result<Unit, UnitError> {
        if other.is_unity() {
            return Ok(self.clone());
        }
        match (self.node(), other.node()) {
            (UnitNode::Conventional(c), _) => {
                self.ensure_ratio()?;
                let quotient = c.target.divide_in(registry, other)?;
                Ok(quotient.transform_in(registry, &c.to_target))
            }
            (_, UnitNode::Conventional(c)) => {
                other.ensure_ratio()?;
                let quotient = self.divide_in(registry, &c.target)?;
                Ok(quotient.transform_in(registry, &c.to_target.inverse()))
            }
            (UnitNode::System(a), UnitNode::System(b)) => Ok(SystemUnit::resolve(
                registry,
                a.dimension.divide(&b.dimension)?,
            )),
        }
    }

    pub(crate) fn pow_in(&self, registry: &UnitRegistry, n: i32) -> Result<Unit, UnitError> {
        if n == 1 {
            return Ok(self.clone());
        }
        match self.node() {
            UnitNode::Conventional(c) => {
                self.ensure_ratio()?;
                let power = c.target.pow_in(registry, n)?;
                Ok(power.transform_in(registry, &c.to_target.pow(n, false)?))
            }
            UnitNode::System(s) => Ok(SystemUnit::resolve(registry, s.dimension.pow(n)?)),
        }
    }

    pub(crate) fn root_in(&self, registry: &UnitRegistry, n: i32) -> Result<Unit, UnitError> {
        if n == 0 {
            return Err(UnitError::ZeroRoot);
        }
        if n == 1 {
            return Ok(self.clone());
        }
        match self.node() {
            UnitNode::Conventional(c) => {
                self.ensure_ratio()?;
                let root = c.target.root_in(registry, n)?;
                Ok(root.transform_in(registry, &c.to_target.pow(n, true)?))
            }
            UnitNode::System(s) => Ok(SystemUnit::resolve(registry, s.dimension.root(n)?)),
        }
    }

    pub(crate) fn transform_in(&self, registry: &UnitRegistry, op: &UnitConverter) -> Unit {
        if op.is_identity() {
            return self.clone();
        }
        match self.node() {
            UnitNode::Conventional(c) if !c.prefixable => {
                let to_target = ConverterGroup.compose(op, &c.to_target);
                ConventionalUnit::create(registry, &c.target, to_target)
            }
            _ => ConventionalUnit::create(registry, self, op.clone()),
        }
    }

    pub(crate) fn as_type_in(
        &self,
        registry: &UnitRegistry,
        kind: QuantityKind,
    ) -> Result<Unit, UnitError> {
        match self.node() {
            UnitNode::System(s) => {
                if s.kind == Some(kind) {
                    return Ok(self.clone());
                }
                if s.dimension != kind.dimension() {
                    return Err(UnitError::IncompatibleQuantity {
                        unit: self.to_string(),
                        kind,
                    });
                }
                Ok(registry
                    .for_quantity(kind)
                    .filter(|u| u.dimension() == s.dimension)
                    .unwrap_or_else(|| self.clone()))
            }
            UnitNode::Conventional(c) => {
                let target = c.target.as_type_in(registry, kind)?;
                if target.is_same(&c.target) {
                    Ok(self.clone())
                } else {
                    Ok(target.transform_in(registry, &c.to_target))
                }
            }
        }
    }

    pub(crate) fn alternate_in(&self, registry: &UnitRegistry, symbol: &str) -> Result<Unit, UnitError> {
        match self.node() {
            UnitNode::System(s) => Ok(registry.intern_if_absent(Unit::new_system(
                symbol,
                s.dimension,
                vec![Factor::new(symbol, Fraction::ONE)],
                s.kind,
                s.scope,
                s.prefixable,
            ))),
            UnitNode::Conventional(_) => Err(UnitError::UnsupportedOperation(format!(
                "\"{}\" is not a system unit and has no alternate",
                self
            ))),
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        if self.is_same(other) {
            return true;
        }
        match (self.node(), other.node()) {
            (UnitNode::System(a), UnitNode::System(b)) => {
                a.dimension == b.dimension
                    && a.kind == b.kind
                    && a.symbol == b.symbol
                    && a.factors == b.factors
            }
            (UnitNode::Conventional(a), UnitNode::Conventional(b)) => {
                a.symbol == b.symbol && a.to_target == b.to_target && a.target == b.target
            }
            _ => false,
        }
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension().hash(state);
        self.symbol().hash(state);
    }
}

impl Debug for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", UnitFormat::default().format(self))
    }
}
