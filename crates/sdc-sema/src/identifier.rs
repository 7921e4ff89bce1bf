//! Identifier resolution glue: scope lookup plus the `UnresolvedIdentifier`
//! error the spec names (spec §4.2, §7).

use sdc_core::{Name, Span};

use crate::error::{Result, SemaError};
use crate::ids::{ScopeId, SymbolId};
use crate::scheduler::Scheduler;
use crate::stage::Stage;

/// Resolve `name` starting from `scope`, walking parents. The found
/// symbol is advanced to at least `Populated` before being returned —
/// callers need at minimum a stub with a settled kind to branch on
/// (overload set vs. single symbol), and `Populated` is the earliest
/// stage that guarantees that.
pub fn resolve(scheduler: &mut Scheduler, scope: ScopeId, name: Name, span: Span) -> Result<SymbolId> {
    let sym = scheduler
        .scopes
        .lookup(scope, name)
        .ok_or_else(|| SemaError::UnresolvedIdentifier {
            name: scheduler.interner.resolve(name).to_string(),
            span,
        })?;
    scheduler.require(sym, Stage::Populated)?;
    Ok(sym)
}
