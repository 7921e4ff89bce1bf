//! `Module` analysis (spec §4.3 "Module"): flatten the top-level
//! declaration list into the module's own scope and drive every member to
//! `Processed`.

use crate::ast::Decl;
use crate::error::Result;
use crate::ids::SymbolId;
use crate::scheduler::Scheduler;
use crate::scope::ScopeKind;
use crate::stage::Stage;
use crate::visitor;

pub fn analyze(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, _decl: Option<Decl>) -> Result<()> {
    if scheduler.symbols.get(sym).scope.is_none() {
        let scope = scheduler.scopes.create(ScopeKind::Symbol, Some(sym), None);
        scheduler.symbols.get_mut(sym).scope = Some(scope);

        // Implicit `import object;` — every module sees the builtin root
        // class without writing the import (spec §6).
        if let Some(object) = scheduler.object_class {
            if object != sym {
                let object_name = scheduler.symbols.get(object).name;
                scheduler.scopes.declare(scope, object_name, object);
            }
        }

        let body = scheduler.module_body(sym).cloned().unwrap_or_default();
        let members = visitor::flatten(&body, scope, scheduler)?;
        scheduler.set_module_members(sym, members.clone());
        scheduler.symbols.get_mut(sym).advance_to(Stage::Populated);

        for member in &members {
            scheduler.require(*member, Stage::Populated)?;
        }
    }

    if target <= Stage::Populated {
        return Ok(());
    }

    let members = scheduler.module_members(sym).cloned().unwrap_or_default();
    for member in &members {
        scheduler.require(*member, Stage::Processed)?;
    }

    scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    Ok(())
}
