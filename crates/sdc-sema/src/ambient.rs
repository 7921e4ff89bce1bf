//! Ambient analysis state (spec §4.3, §5): the mangle prefix, `thisType`,
//! `returnType`, `ctxSym`, and current scope that every nested `analyze`
//! call reads and, for the duration of its own analysis, overrides.
//!
//! Spec §5 calls this "the core's single most error-prone contract" and
//! insists it never become process-global. `AnalysisState::with` is the
//! single chokepoint that mutates it: callers pass only the fields they
//! want to override, run a closure with the new state installed, and the
//! previous values are restored on every exit path — including panics and
//! early `?` returns — by a `Drop` guard rather than by hand.

use crate::ids::{ScopeId, SymbolId};
use crate::ty::Type;

#[derive(Debug, Clone)]
pub struct AnalysisState {
    pub mangle_prefix: String,
    pub this_type: Option<Type>,
    pub return_type: Option<Type>,
    pub ctx_sym: Option<SymbolId>,
    pub scope: ScopeId,
}

impl AnalysisState {
    pub fn new(root_scope: ScopeId) -> Self {
        Self {
            mangle_prefix: String::new(),
            this_type: None,
            return_type: None,
            ctx_sym: None,
            scope: root_scope,
        }
    }

    /// Run `f` with the given fields overridden (`None` leaves a field
    /// unchanged), restoring the previous state when `f` returns — on
    /// every path, since the restore happens in `Drop`.
    #[allow(clippy::too_many_arguments)]
    pub fn with<R>(
        &mut self,
        mangle_prefix: Option<String>,
        this_type: Option<Type>,
        return_type: Option<Type>,
        ctx_sym: Option<SymbolId>,
        scope: Option<ScopeId>,
        f: impl FnOnce(&mut AnalysisState) -> R,
    ) -> R {
        let saved = self.clone();

        if let Some(p) = mangle_prefix {
            self.mangle_prefix = p;
        }
        if let Some(t) = this_type {
            self.this_type = Some(t);
        }
        if let Some(t) = return_type {
            self.return_type = Some(t);
        }
        if let Some(c) = ctx_sym {
            self.ctx_sym = Some(c);
        }
        if let Some(s) = scope {
            self.scope = s;
        }

        struct Restore<'a> {
            state: &'a mut AnalysisState,
            saved: AnalysisState,
        }

        impl Drop for Restore<'_> {
            fn drop(&mut self) {
                std::mem::swap(self.state, &mut self.saved);
            }
        }

        let mut restore = Restore { state: self, saved };
        f(restore.state)
    }

    /// Convenience for the common case of only pushing a new scope (e.g.
    /// descending into a block statement's own lexical scope).
    pub fn with_scope<R>(&mut self, scope: ScopeId, f: impl FnOnce(&mut AnalysisState) -> R) -> R {
        self.with(None, None, None, None, Some(scope), f)
    }
}
