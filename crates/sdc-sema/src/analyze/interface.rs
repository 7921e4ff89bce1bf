//! `Interface` analysis (spec §4.3 "Interface"): mangle only. Member and
//! base-interface resolution are reserved for a future pass — interfaces
//! don't participate in override matching the way classes do, so nothing
//! downstream needs more than the mangled name yet.

use crate::ast::Decl;
use crate::error::Result;
use crate::ids::SymbolId;
use crate::mangle;
use crate::scheduler::Scheduler;
use crate::stage::Stage;

pub fn analyze(scheduler: &mut Scheduler, sym: SymbolId, _target: Stage, _decl: Option<Decl>) -> Result<()> {
    if scheduler.symbols.get(sym).mangle.is_none() {
        let mangled = mangle::mangle_aggregate_name(
            &scheduler.state.mangle_prefix,
            mangle::TAG_INTERFACE,
            &scheduler.interner,
            scheduler.symbols.get(sym),
        );
        let mangle_name = scheduler.interner.intern(&mangled);
        scheduler.symbols.get_mut(sym).mangle = Some(mangle_name);
    }
    scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    Ok(())
}
