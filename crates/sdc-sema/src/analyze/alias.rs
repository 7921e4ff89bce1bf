//! `TypeAlias`/`ValueAlias`/`SymbolAlias` analysis (spec §4.3 "Alias").

use crate::ast::Decl;
use crate::error::Result;
use crate::ids::SymbolId;
use crate::mangle;
use crate::scheduler::Scheduler;
use crate::stage::Stage;
use crate::symbol::{AliasPayload, SymbolKind};
use crate::ty::Linkage;

pub fn analyze_type_alias(scheduler: &mut Scheduler, sym: SymbolId, _target: Stage, decl: Option<Decl>) -> Result<()> {
    let decl = decl.expect("TypeAlias symbol scheduled without its declaration");
    let ty = match decl.kind {
        crate::ast::DeclKind::TypeAlias(ty) => ty,
        other => unreachable!("analyze::alias called on non-type-alias decl {other:?}"),
    };

    let mangle_name = mangle_symbol(scheduler, sym, |scheduler, prefix| {
        let type_mangle = mangle::mangle_type(&scheduler.interner, &scheduler.symbols, &ty);
        mangle::finalize_d_mangle(prefix, &type_mangle)
    });

    let symbol = scheduler.symbols.get_mut(sym);
    symbol.mangle = Some(mangle_name);
    symbol.ty = Some(ty.clone());
    symbol.kind = SymbolKind::TypeAlias(Some(ty));
    symbol.advance_to(Stage::Processed);
    Ok(())
}

pub fn analyze_value_alias(scheduler: &mut Scheduler, sym: SymbolId, _target: Stage, decl: Option<Decl>) -> Result<()> {
    let decl = decl.expect("ValueAlias symbol scheduled without its declaration");
    let expr = match &decl.kind {
        crate::ast::DeclKind::ValueAlias(expr) => expr.clone(),
        other => unreachable!("analyze::alias called on non-value-alias decl {other:?}"),
    };

    let value = scheduler.evaluator.evaluate(&expr)?;
    let ty = value.ty();

    let mangle_name = mangle_symbol(scheduler, sym, |scheduler, prefix| {
        let type_mangle = mangle::mangle_type(&scheduler.interner, &scheduler.symbols, &ty);
        // Fold the value into the mangle alongside its type, so two
        // `ValueAlias`es of the same type but different values don't
        // collide (spec §4.3 "Aliases": "mangles the type+value together").
        let value_mangle = format!("{type_mangle}v{}", value.bits());
        mangle::finalize_d_mangle(prefix, &value_mangle)
    });

    let symbol = scheduler.symbols.get_mut(sym);
    symbol.mangle = Some(mangle_name);
    symbol.ty = Some(ty);
    symbol.kind = SymbolKind::ValueAlias(Some(value));
    symbol.advance_to(Stage::Processed);
    Ok(())
}

/// Shared `D`/`C` linkage split every `analyze_*_alias` needs: `D` linkage
/// builds the prefix + type(+value) mangle through `build`, `C` linkage
/// mangles to the bare name (spec §4.3 "Function / Method" mangling rule,
/// reused verbatim here since aliases mangle the same way).
fn mangle_symbol(
    scheduler: &mut Scheduler,
    sym: SymbolId,
    build: impl FnOnce(&mut Scheduler, &str) -> String,
) -> sdc_core::Name {
    let prefix = mangle::extend_prefix(&scheduler.state.mangle_prefix, &scheduler.interner, scheduler.symbols.get(sym).name);
    let mangled = match scheduler.symbols.get(sym).linkage {
        Linkage::D => build(scheduler, &prefix),
        Linkage::C | Linkage::Cpp | Linkage::Windows => {
            mangle::finalize_c_mangle(&scheduler.interner, scheduler.symbols.get(sym).name)
        }
    };
    scheduler.interner.intern(&mangled)
}

/// `SymbolAlias` publishes its target's mangle once the target reaches
/// `Populated` and its context flag once the target reaches `Signed` (spec
/// §4.3 "Aliases") — two gated steps, mirroring the sign/populate split
/// `Function`/`Aggregate` use, so a pair of mutually aliasing symbols that
/// only need each other's `Populated`-stage mangle don't force each other
/// up to `Signed` and trip the cycle guard.
pub fn analyze_symbol_alias(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    let step = scheduler.symbols.get(sym).step;
    if step < Stage::Populated {
        populate(scheduler, sym, decl.as_ref())?;
    }
    if target <= Stage::Populated {
        return Ok(());
    }
    sign(scheduler, sym)
}

fn populate(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<&Decl>) -> Result<()> {
    let decl = decl.expect("SymbolAlias symbol scheduled without its declaration");
    let target_name = match &decl.kind {
        crate::ast::DeclKind::SymbolAlias(name) => *name,
        other => unreachable!("analyze::alias called on non-symbol-alias decl {other:?}"),
    };

    let scope = scheduler.state.scope;
    let target_sym = crate::identifier::resolve(scheduler, scope, target_name, decl.span)?;
    scheduler.require(target_sym, Stage::Populated)?;

    let mangle = scheduler.symbols.get(target_sym).mangle;
    let ty = scheduler.symbols.get(target_sym).ty.clone();

    let symbol = scheduler.symbols.get_mut(sym);
    symbol.mangle = mangle;
    symbol.ty = ty;
    symbol.kind = SymbolKind::SymbolAlias(AliasPayload { target: Some(target_sym) });
    symbol.advance_to(Stage::Populated);
    Ok(())
}

fn sign(scheduler: &mut Scheduler, sym: SymbolId) -> Result<()> {
    let target_sym = match &scheduler.symbols.get(sym).kind {
        SymbolKind::SymbolAlias(AliasPayload { target: Some(t) }) => *t,
        other => unreachable!("analyze::alias symbol-alias missing its resolved target {other:?}"),
    };

    scheduler.require(target_sym, Stage::Signed)?;
    let has_context = scheduler.symbols.get(target_sym).has_context;
    let ty = scheduler.symbols.get(target_sym).ty.clone();

    let symbol = scheduler.symbols.get_mut(sym);
    symbol.has_context = has_context;
    if symbol.ty.is_none() {
        symbol.ty = ty;
    }
    symbol.advance_to(Stage::Processed);
    Ok(())
}
