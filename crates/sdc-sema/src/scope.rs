//! Scopes: name → symbol containers with parent-chained lookup (spec §3
//! `Scope`).

use indexmap::IndexMap;
use sdc_core::Name;

use crate::ids::{ScopeId, SymbolId};

/// What a name resolves to within a single scope.
#[derive(Debug, Clone)]
enum Binding {
    Single(SymbolId),
    Overload(SymbolId),
}

/// Whether enclosed symbols may capture their environment. A `Function`'s
/// body scope is a `Closure` scope; an aggregate's member scope is a plain
/// `Symbol` scope (spec §3 `Scope` variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Symbol,
    Closure,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub owner: Option<SymbolId>,
    pub parent: Option<ScopeId>,
    bindings: IndexMap<Name, Binding>,
}

impl Scope {
    fn new(kind: ScopeKind, owner: Option<SymbolId>, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            owner,
            parent,
            bindings: IndexMap::new(),
        }
    }

    /// Insert a non-overloadable symbol. Returns the previous binding's
    /// owning symbol, if the name already existed (the caller raises
    /// `DuplicateSymbol` against it).
    fn insert(&mut self, name: Name, sym: SymbolId) -> Option<SymbolId> {
        let prev = self.bindings.insert(name, Binding::Single(sym));
        prev.map(Self::binding_symbol)
    }

    fn binding_symbol(binding: Binding) -> SymbolId {
        match binding {
            Binding::Single(s) | Binding::Overload(s) => s,
        }
    }

    /// Insert a function/template symbol, merging into an `OverloadSet`
    /// symbol when the name is already bound to one. The caller is
    /// responsible for creating the `OverloadSet` symbol itself and
    /// passing its id in `overload_set`; this only tracks which binding a
    /// name currently has.
    fn insert_overloadable(&mut self, name: Name, overload_set: SymbolId) {
        self.bindings.insert(name, Binding::Overload(overload_set));
    }

    fn lookup_local(&self, name: Name) -> Option<SymbolId> {
        self.bindings.get(&name).cloned().map(Self::binding_symbol)
    }

    pub fn is_overload(&self, name: Name) -> bool {
        matches!(self.bindings.get(&name), Some(Binding::Overload(_)))
    }
}

/// The scope arena, paralleling `SymbolTable`.
#[derive(Debug, Default)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, kind: ScopeKind, owner: Option<SymbolId>, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::from_raw(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, owner, parent));
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// Insert a non-overloadable declaration. Returns the existing symbol
    /// it collides with, if any.
    pub fn declare(&mut self, scope: ScopeId, name: Name, sym: SymbolId) -> Option<SymbolId> {
        self.get_mut(scope).insert(name, sym)
    }

    pub fn declare_overloadable(&mut self, scope: ScopeId, name: Name, overload_set: SymbolId) {
        self.get_mut(scope).insert_overloadable(name, overload_set);
    }

    /// Look up `name` in `scope` only, without walking to parents — used
    /// by the Declaration Visitor to decide whether a new declaration
    /// collides with one already in the *same* scope.
    pub fn lookup_local(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        self.get(scope).lookup_local(name)
    }

    pub fn is_overload(&self, scope: ScopeId, name: Name) -> bool {
        self.get(scope).is_overload(name)
    }

    /// Walk from `scope` up through parents, returning the first binding
    /// found for `name`.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if let Some(sym) = s.lookup_local(name) {
                return Some(sym);
            }
            current = s.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u32) -> SymbolId {
        SymbolId::from_raw(n)
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let mut table = ScopeTable::new();
        let root = table.create(ScopeKind::Symbol, None, None);
        let child = table.create(ScopeKind::Symbol, None, Some(root));

        let name = Name::from_raw(0);
        table.declare(root, name, sym(1));

        assert_eq!(table.lookup(child, name), Some(sym(1)));
    }

    #[test]
    fn local_binding_shadows_parent() {
        let mut table = ScopeTable::new();
        let root = table.create(ScopeKind::Symbol, None, None);
        let child = table.create(ScopeKind::Symbol, None, Some(root));

        let name = Name::from_raw(0);
        table.declare(root, name, sym(1));
        table.declare(child, name, sym(2));

        assert_eq!(table.lookup(child, name), Some(sym(2)));
    }

    #[test]
    fn duplicate_declaration_reports_previous_symbol() {
        let mut table = ScopeTable::new();
        let root = table.create(ScopeKind::Symbol, None, None);
        let name = Name::from_raw(0);

        assert_eq!(table.declare(root, name, sym(1)), None);
        assert_eq!(table.declare(root, name, sym(2)), Some(sym(1)));
    }

    #[test]
    fn unrelated_name_is_not_found() {
        let mut table = ScopeTable::new();
        let root = table.create(ScopeKind::Symbol, None, None);
        table.declare(root, Name::from_raw(0), sym(1));
        assert_eq!(table.lookup(root, Name::from_raw(1)), None);
    }
}
