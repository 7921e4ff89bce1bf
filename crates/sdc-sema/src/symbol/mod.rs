//! The symbol table (spec §3 `Symbol`).
//!
//! Symbols are created once by the Declaration Visitor and mutated in place
//! by the Symbol Analyzer as they advance through `Stage`; they are never
//! removed for the life of a compilation, so a plain growable arena
//! (`IndexMap` keyed by `SymbolId`, insertion order preserved for
//! deterministic iteration) is enough — no generational reuse needed.

mod kind;

pub use kind::{
    AliasPayload, ClassPayload, EnumEntry, EnumPayload, FunctionPayload, InterfacePayload,
    MethodSlot, SymbolKind, TemplateInstancePayload, TemplateParamPayload, TemplatePayload,
    VariablePayload,
};

use indexmap::IndexMap;
use sdc_core::{Name, Span};

pub use crate::ids::{ScopeId, SymbolId};
use crate::attrs::{Storage, Visibility};
use crate::stage::Stage;
use crate::ty::{Linkage, Type};

/// A single declaration's resolved record. Every field except `kind` is
/// common to all symbols (spec §3); `kind` carries the per-variant payload.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub location: Span,
    pub name: Name,
    pub linkage: Linkage,
    pub visibility: Visibility,
    pub storage: Storage,
    /// `None` until assigned, no later than `Stage::Signed` (spec invariant).
    pub mangle: Option<Name>,
    pub step: Stage,
    pub has_context: bool,
    /// The scope this symbol owns (its members, parameters, or entries),
    /// if any — `Module`, `Function`, aggregates, `Template`, and
    /// `TemplateInstance` all own one.
    pub scope: Option<ScopeId>,
    /// Resolved type; absent until the analyzer reaches the stage that
    /// determines it (variables/fields at `Signed`, functions likewise).
    pub ty: Option<Type>,
    pub kind: SymbolKind,
}

impl Symbol {
    /// A fresh stub as produced by the Declaration Visitor: location and
    /// name set, everything else default and `step == Parsed`.
    pub fn stub(location: Span, name: Name, linkage: Linkage, visibility: Visibility, kind: SymbolKind) -> Self {
        Symbol {
            location,
            name,
            linkage,
            visibility,
            storage: Storage::Local,
            mangle: None,
            step: Stage::Parsed,
            has_context: false,
            scope: None,
            ty: None,
            kind,
        }
    }

    /// Advance `step` to `stage`. Never regresses (spec invariant); a
    /// caller trying to move backwards is an analyzer bug, not a user
    /// error, so this asserts rather than returning a `SemaError`.
    pub fn advance_to(&mut self, stage: Stage) {
        assert!(stage >= self.step, "symbol step must not regress");
        self.step = stage;
    }
}

/// The symbol arena. `SymbolId` is a dense index into `symbols`; nothing is
/// ever removed, so `SymbolId`s stay valid for the life of the table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<SymbolId, Symbol>,
    next: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::from_raw(self.next);
        self.next += 1;
        self.symbols.insert(id, symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[&id]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.symbols.get_mut(&id).expect("dangling SymbolId")
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().map(|(&id, sym)| (id, sym))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdc_core::Span;

    fn dummy_symbol() -> Symbol {
        Symbol::stub(
            Span::synthetic(),
            Name::from_raw(0),
            Linkage::D,
            Visibility::Public,
            SymbolKind::Module { is_package: false },
        )
    }

    #[test]
    fn insert_returns_distinct_ids() {
        let mut table = SymbolTable::new();
        let a = table.insert(dummy_symbol());
        let b = table.insert(dummy_symbol());
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn advance_to_moves_step_forward() {
        let mut table = SymbolTable::new();
        let id = table.insert(dummy_symbol());
        table.get_mut(id).advance_to(Stage::Populated);
        assert_eq!(table.get(id).step, Stage::Populated);
    }

    #[test]
    #[should_panic(expected = "must not regress")]
    fn advance_to_rejects_regression() {
        let mut table = SymbolTable::new();
        let id = table.insert(dummy_symbol());
        table.get_mut(id).advance_to(Stage::Signed);
        table.get_mut(id).advance_to(Stage::Populated);
    }
}
