//! The table of known units. Lookups take a read lock; interning takes the write lock for the whole
//! check-then-insert, so concurrent attempts to create the same unit all observe one instance.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, trace};

use crate::algebra::{ConverterGroup, Group};
use crate::converter::UnitConverter;
use crate::dimension::Dimension;
use crate::quantity_kind::QuantityKind;
use crate::unit::{Scope, Unit};

#[derive(Debug, Default)]
struct Tables {
    by_symbol: HashMap<String, Unit>,
    by_code: HashMap<u32, Unit>,
    /// The first code registered for each unit, keyed by unit identity.
    codes: HashMap<usize, u32>,
    /// The first unit registered for each dimension.
    by_dimension: HashMap<Dimension, Unit>,
    by_quantity: HashMap<QuantityKind, Unit>,
    /// Units derived from a target, keyed by the target's identity.
    related: HashMap<usize, Vec<Unit>>,
    /// Every named unit, in registration order.
    units: Vec<Unit>,
}

/// An append-only table of units. Units are never removed: the registry owns every interned unit
/// for its whole lifetime.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    tables: RwLock<Tables>,
}

impl UnitRegistry {
    /// An empty registry. Most callers want [`UnitRegistry::global`], which is populated with the
    /// standard units.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, initialized on first use.
    pub fn global() -> &'static UnitRegistry {
        &crate::units::SYSTEM.registry
    }

    // Every mutation is a single insert, so a poisoned table is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lookup_by_symbol(&self, symbol: &str) -> Option<Unit> {
        self.read().by_symbol.get(symbol).cloned()
    }

    pub fn lookup_by_code(&self, code: u32) -> Option<Unit> {
        self.read().by_code.get(&code).cloned()
    }

    /// The code a unit was registered under, if any.
    pub fn code_of(&self, unit: &Unit) -> Option<u32> {
        self.read().codes.get(&unit.id()).copied()
    }

    /// The canonical unit for a dimension.
    pub fn for_dimension(&self, dimension: &Dimension) -> Option<Unit> {
        self.read().by_dimension.get(dimension).cloned()
    }

    /// The system unit of a quantity kind.
    pub fn for_quantity(&self, kind: QuantityKind) -> Option<Unit> {
        self.read().by_quantity.get(&kind).cloned()
    }

    /// Every named unit, in registration order.
    pub fn units(&self) -> Vec<Unit> {
        self.read().units.clone()
    }

    pub fn units_with_dimension(&self, dimension: &Dimension) -> Vec<Unit> {
        self.read()
            .units
            .iter()
            .filter(|u| u.dimension() == *dimension)
            .cloned()
            .collect()
    }

    pub fn units_in_scope(&self, scope: Scope) -> Vec<Unit> {
        self.read()
            .units
            .iter()
            .filter(|u| u.scope() == scope)
            .cloned()
            .collect()
    }

    /// Inserts a named unit unless its symbol is taken. Returns the registered unit: the existing
    /// one if it is equivalent, otherwise the argument. An unnamed unit is returned unchanged.
    pub fn intern_if_absent(&self, unit: Unit) -> Unit {
        let mut tables = self.write();
        Self::intern_locked(&mut tables, unit)
    }

    fn intern_locked(tables: &mut Tables, unit: Unit) -> Unit {
        let Some(symbol) = unit.symbol().map(str::to_string) else {
            return unit;
        };
        match tables.by_symbol.get(&symbol) {
            Some(existing) if existing.is_equivalent(&unit) => existing.clone(),
            Some(existing) => {
                debug!(
                    "symbol \"{}\" already names {:?}; keeping {:?} unregistered",
                    symbol, existing, unit
                );
                unit
            }
            None => {
                trace!("interning \"{}\"", symbol);
                tables.by_symbol.insert(symbol, unit.clone());
                tables.units.push(unit.clone());
                unit
            }
        }
    }

    /// An existing unit derived from `target` by an equivalent converter.
    pub(crate) fn find_related(&self, target: &Unit, to_target: &UnitConverter) -> Option<Unit> {
        Self::find_related_locked(&self.read(), target, to_target)
    }

    fn find_related_locked(
        tables: &Tables,
        target: &Unit,
        to_target: &UnitConverter,
    ) -> Option<Unit> {
        tables.related.get(&target.id()).and_then(|siblings| {
            siblings
                .iter()
                .find(|u| {
                    u.to_target()
                        .is_some_and(|c| ConverterGroup.equiv(c, to_target))
                })
                .cloned()
        })
    }

    /// Interns a unit derived from `target`. If an equivalent sibling or an equivalent unit with the
    /// same symbol already exists, that one is returned instead.
    pub(crate) fn intern_derived(&self, target: &Unit, unit: Unit) -> Unit {
        let mut tables = self.write();
        if let Some(existing) = unit
            .to_target()
            .and_then(|c| Self::find_related_locked(&tables, target, c))
        {
            return existing;
        }
        let unit = Self::intern_locked(&mut tables, unit);
        let siblings = tables.related.entry(target.id()).or_default();
        if !siblings.iter().any(|u| u.is_same(&unit)) {
            siblings.push(unit.clone());
        }
        unit
    }

    /// Interns a system unit produced by arithmetic. The first unit of each dimension becomes the
    /// canonical one, so `m⋅s` and `s⋅m` are the same unit.
    pub(crate) fn intern_system(&self, unit: Unit) -> Unit {
        let mut tables = self.write();
        let dimension = unit.dimension();
        if let Some(existing) = tables.by_dimension.get(&dimension) {
            return existing.clone();
        }
        let unit = Self::intern_locked(&mut tables, unit);
        tables.by_dimension.insert(dimension, unit.clone());
        unit
    }

    /// Registers a predefined unit under its symbol, dimension, quantity kind, and codes. Later
    /// definitions never replace earlier ones.
    pub(crate) fn define(&self, unit: &Unit, codes: &[u32]) {
        let mut tables = self.write();
        if let Some(symbol) = unit.symbol() {
            tables
                .by_symbol
                .entry(symbol.to_string())
                .or_insert_with(|| unit.clone());
        }
        if unit.is_system() {
            tables
                .by_dimension
                .entry(unit.dimension())
                .or_insert_with(|| unit.clone());
            if let Some(kind) = unit.quantity_kind() {
                tables.by_quantity.entry(kind).or_insert_with(|| unit.clone());
            }
        }
        if let Some(target) = unit.target() {
            tables
                .related
                .entry(target.id())
                .or_default()
                .push(unit.clone());
        }
        for code in codes {
            tables.by_code.entry(*code).or_insert_with(|| unit.clone());
            tables.codes.entry(unit.id()).or_insert(*code);
        }
        tables.units.push(unit.clone());
    }

    /// Adds another spelling for a registered unit, like `Cel` for `°C`.
    pub(crate) fn alias(&self, symbol: &str, unit: &Unit) {
        self.write()
            .by_symbol
            .entry(symbol.to_string())
            .or_insert_with(|| unit.clone());
    }

    /// Number of named units.
    pub fn len(&self) -> usize {
        self.read().units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
