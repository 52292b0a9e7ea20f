//! The symbol table: one flat namespace of spaces, mappings, and
//! external entities.
//!
//! The table is seeded from the standard library, grows during analysis,
//! and is read-only once the interpreter takes over. Registration is
//! last-wins, matching the language's flat-namespace semantics.

use rustc_hash::FxHashMap;

use topos_common::topology::TopologyBag;
use topos_parser::ast::TypeExpr;
use topos_stdlib::ExternalEntity;

/// One entry in the symbol table.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A user-declared space. Behaves as a type; its literal topology
    /// defaults feed the `init` compatibility check.
    Space {
        property_types: FxHashMap<String, TypeExpr>,
        topology: TopologyBag,
    },
    /// A user-declared mapping with its optional signature.
    Mapping {
        source: Option<TypeExpr>,
        target: Option<TypeExpr>,
        property_types: FxHashMap<String, TypeExpr>,
    },
    /// An entity contributed by a standard-library manifest.
    External(ExternalEntity),
}

impl Symbol {
    /// The declared source type of this entry, if any. External
    /// signature strings are parsed on demand (`*` products included).
    pub fn source_type(&self) -> Option<TypeExpr> {
        match self {
            Symbol::Space { .. } => None,
            Symbol::Mapping { source, .. } => source.clone(),
            Symbol::External(e) => e.source.as_deref().map(TypeExpr::from_signature),
        }
    }

    /// The declared target type of this entry, if any.
    pub fn target_type(&self) -> Option<TypeExpr> {
        match self {
            Symbol::Space { .. } => None,
            Symbol::Mapping { target, .. } => target.clone(),
            Symbol::External(e) => e.target.as_deref().map(TypeExpr::from_signature),
        }
    }

    /// Spaces and external entities without an explicit signature act as
    /// the identity on themselves when used as path steps.
    pub fn is_self_typed(&self) -> bool {
        matches!(self, Symbol::Space { .. } | Symbol::External(_))
    }

    /// The effect tag, for entities that carry one.
    pub fn effect(&self) -> Option<&str> {
        match self {
            Symbol::External(e) => e.effect.as_deref(),
            _ => None,
        }
    }

    /// The topological property bag recorded for this entry.
    pub fn topology(&self) -> TopologyBag {
        match self {
            Symbol::Space { topology, .. } => topology.clone(),
            Symbol::External(e) => e.topology.clone(),
            Symbol::Mapping { .. } => TopologyBag::default(),
        }
    }
}

/// Flat name -> symbol table.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table from loaded standard-library definitions.
    pub fn from_stdlib(stdlib: FxHashMap<String, ExternalEntity>) -> Self {
        let symbols = stdlib
            .into_iter()
            .map(|(name, entity)| (name, Symbol::External(entity)))
            .collect();
        Self { symbols }
    }

    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.symbols.insert(name.into(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
