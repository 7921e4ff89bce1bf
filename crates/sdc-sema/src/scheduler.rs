//! Staged, cycle-tolerant scheduler (spec §4.1).
//!
//! There is no native coroutine primitive on stable Rust, so "a cooperative
//! task per declaration" (spec §9) is modeled as recursive descent: `advance`
//! is an ordinary function that drives a symbol through stages, calling
//! `require` on its dependencies, which in turn calls back into `advance`.
//! Cycle tolerance comes from two things working together:
//!
//! - `advance` implementations publish intermediate stages as they reach
//!   them (`Symbol::advance_to`) rather than only at the end, so a `require`
//!   for an already-reached stage returns immediately without re-entering
//!   `advance` at all.
//! - the `advancing` set below catches the remaining case: a symbol that
//!   requires a *strictly higher* stage of another symbol that is itself
//!   still being advanced — a true cycle, per spec §4.1.

use std::collections::{HashMap, HashSet};

use sdc_core::Interner;

use crate::ambient::AnalysisState;
use crate::ast::Decl;
use crate::config::SemaConfig;
use crate::datalayout::DataLayout;
use crate::error::{Result, SemaError};
use crate::evaluator::Evaluator;
use crate::ids::SymbolId;
use crate::scope::ScopeTable;
use crate::stage::Stage;
use crate::symbol::SymbolTable;

/// Drives `sym` from its current stage towards `target`, calling back into
/// `Scheduler::require` for any dependency it needs along the way.
pub type AdvanceFn = fn(&mut Scheduler, SymbolId, Stage) -> Result<()>;

/// Everything a single `analyze` call needs is reachable from `&mut
/// Scheduler`: the symbol/scope arenas, the scheduling bookkeeping, and
/// the out-of-scope collaborators (spec §6) the pass was constructed
/// with. `advance` is a plain function pointer rather than a capturing
/// closure, so bundling the collaborators here (instead of passing them
/// down as extra parameters) is what lets `require` call back into
/// `advance` without a ever-growing argument list.
pub struct Scheduler {
    pub symbols: SymbolTable,
    pub scopes: ScopeTable,
    pub interner: Interner,
    pub config: SemaConfig,
    pub evaluator: Box<dyn Evaluator>,
    pub layout: Box<dyn DataLayout>,
    pub state: AnalysisState,
    /// The builtin `Object` root class, bootstrapped once by whatever
    /// assembles a pass (`pass.rs`) before any user module is scheduled.
    /// `Module::analyze` binds it as the implicit base of every class
    /// without a written base and the implicit import every module gets
    /// (spec §4.3 "Module", §6 "buildMain").
    pub object_class: Option<SymbolId>,
    declarations: HashMap<SymbolId, Decl>,
    /// A module's body isn't a single `Decl` the way every other symbol's
    /// is — it's the list the Declaration Visitor flattens — so it gets
    /// its own side table rather than forcing `Decl` to grow a variant
    /// that would never apply to anything else.
    module_bodies: HashMap<SymbolId, Vec<Decl>>,
    /// The stub symbols `visitor::flatten` produced for a module's body,
    /// cached so the second `Module::analyze` pass (driving every member
    /// to `Processed`) doesn't have to re-flatten or re-derive them from
    /// the scope.
    module_members: HashMap<SymbolId, Vec<SymbolId>>,
    /// An aggregate's (fields, non-field members) split, cached by the
    /// same reasoning as `module_members` — the field-before-others
    /// `Processed` ordering invariant needs to revisit this split on the
    /// second pass without re-flattening.
    aggregate_members: HashMap<SymbolId, (Vec<SymbolId>, Vec<SymbolId>)>,
    advancing: HashSet<SymbolId>,
    advance: AdvanceFn,
}

impl Scheduler {
    pub fn new(
        advance: AdvanceFn,
        interner: Interner,
        config: SemaConfig,
        evaluator: Box<dyn Evaluator>,
        layout: Box<dyn DataLayout>,
    ) -> Self {
        let mut scopes = ScopeTable::new();
        let root_scope = scopes.create(crate::scope::ScopeKind::Symbol, None, None);
        Self {
            symbols: SymbolTable::new(),
            scopes,
            interner,
            config,
            evaluator,
            layout,
            state: AnalysisState::new(root_scope),
            object_class: None,
            declarations: HashMap::new(),
            module_bodies: HashMap::new(),
            module_members: HashMap::new(),
            aggregate_members: HashMap::new(),
            advancing: HashSet::new(),
            advance,
        }
    }

    /// A scheduler wired to the default, host-targeting collaborators —
    /// what the unit tests in this crate reach for when they only care
    /// about scheduling behavior, not the concrete evaluator/layout.
    #[cfg(test)]
    pub fn new_bare(advance: AdvanceFn) -> Self {
        let mut interner = Interner::new();
        let config = SemaConfig::new(&mut interner, "linux");
        Self::new(
            advance,
            interner,
            config,
            Box::new(crate::evaluator::ConstFoldEvaluator),
            Box::new(crate::datalayout::Lp64Layout),
        )
    }

    /// Register a task: when `sym` is later advanced, `decl` is what the
    /// dispatcher in `advance` analyzes against it.
    pub fn schedule(&mut self, sym: SymbolId, decl: Decl) {
        self.declarations.insert(sym, decl);
    }

    pub fn declaration(&self, sym: SymbolId) -> Option<&Decl> {
        self.declarations.get(&sym)
    }

    pub fn schedule_module(&mut self, sym: SymbolId, decls: Vec<Decl>) {
        self.module_bodies.insert(sym, decls);
    }

    pub fn module_body(&self, sym: SymbolId) -> Option<&Vec<Decl>> {
        self.module_bodies.get(&sym)
    }

    pub fn set_module_members(&mut self, sym: SymbolId, members: Vec<SymbolId>) {
        self.module_members.insert(sym, members);
    }

    pub fn module_members(&self, sym: SymbolId) -> Option<&Vec<SymbolId>> {
        self.module_members.get(&sym)
    }

    pub fn set_aggregate_members(&mut self, sym: SymbolId, fields: Vec<SymbolId>, others: Vec<SymbolId>) {
        self.aggregate_members.insert(sym, (fields, others));
    }

    pub fn aggregate_fields(&self, sym: SymbolId) -> Option<&Vec<SymbolId>> {
        self.aggregate_members.get(&sym).map(|(f, _)| f)
    }

    pub fn aggregate_others(&self, sym: SymbolId) -> Option<&Vec<SymbolId>> {
        self.aggregate_members.get(&sym).map(|(_, o)| o)
    }

    /// Returns only once `sym.step >= stage`.
    pub fn require(&mut self, sym: SymbolId, stage: Stage) -> Result<()> {
        if self.symbols.get(sym).step >= stage {
            return Ok(());
        }

        if !self.advancing.insert(sym) {
            return Err(SemaError::CycleError(sym));
        }

        let advance = self.advance;
        let result = advance(self, sym, stage);
        self.advancing.remove(&sym);
        result
    }

    /// Run `f` with the given ambient-state fields overridden, restoring
    /// them on every exit path once `f` returns. Unlike `AnalysisState::with`,
    /// `f` gets the whole `&mut Scheduler` back — every `analyze` routine
    /// needs the symbol/scope arenas and collaborators alongside the
    /// ambient state, not the ambient state alone, since everything now
    /// lives on one struct.
    #[allow(clippy::too_many_arguments)]
    pub fn with_state<R>(
        &mut self,
        mangle_prefix: Option<String>,
        this_type: Option<crate::ty::Type>,
        return_type: Option<crate::ty::Type>,
        ctx_sym: Option<SymbolId>,
        scope: Option<crate::ids::ScopeId>,
        f: impl FnOnce(&mut Scheduler) -> R,
    ) -> R {
        let saved = self.state.clone();
        if let Some(p) = mangle_prefix {
            self.state.mangle_prefix = p;
        }
        if let Some(t) = this_type {
            self.state.this_type = Some(t);
        }
        if let Some(t) = return_type {
            self.state.return_type = Some(t);
        }
        if let Some(c) = ctx_sym {
            self.state.ctx_sym = Some(c);
        }
        if let Some(s) = scope {
            self.state.scope = s;
        }

        struct Restore<'a> {
            scheduler: &'a mut Scheduler,
            saved: AnalysisState,
        }

        impl Drop for Restore<'_> {
            fn drop(&mut self) {
                std::mem::swap(&mut self.scheduler.state, &mut self.saved);
            }
        }

        let mut restore = Restore { scheduler: self, saved };
        f(restore.scheduler)
    }

    /// Drive every scheduled symbol to `Processed`.
    pub fn terminate(&mut self) -> Result<()> {
        let ids: Vec<SymbolId> = self.symbols.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.require(id, Stage::Processed)?;
        }
        Ok(())
    }
}

