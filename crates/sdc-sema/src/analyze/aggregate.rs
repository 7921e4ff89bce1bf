//! `Struct`/`Union` analysis (spec §4.3 "Struct / Union").
//!
//! Builds the aggregate's member scope, synthesizes the `__ctx` field for
//! nested aggregates, flattens the member list, and drives fields to
//! `Processed` before the rest of the members — the ordering invariant
//! layout and mangling both depend on.

use crate::ast::Decl;
use crate::error::Result;
use crate::ids::SymbolId;
use crate::mangle;
use crate::scheduler::Scheduler;
use crate::scope::ScopeKind;
use crate::stage::Stage;
use crate::symbol::{Symbol, SymbolKind, VariablePayload};
use crate::ty::{Linkage, Type};

pub fn analyze_struct(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    analyze(scheduler, sym, target, decl, mangle::TAG_STRUCT_OR_UNION)
}

pub fn analyze_union(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    analyze(scheduler, sym, target, decl, mangle::TAG_STRUCT_OR_UNION)
}

fn analyze(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>, tag: char) -> Result<()> {
    if scheduler.symbols.get(sym).scope.is_none() {
        populate(scheduler, sym, decl, tag)?;
    }
    if target <= Stage::Populated {
        return Ok(());
    }

    let fields = aggregate_fields(scheduler, sym);
    for field in &fields {
        scheduler.require(*field, Stage::Processed)?;
    }

    let others = other_members(scheduler, sym);
    for member in &others {
        scheduler.require(*member, Stage::Processed)?;
    }

    scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    Ok(())
}

fn populate(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<Decl>, tag: char) -> Result<()> {
    let decl = decl.expect("Struct/Union symbol scheduled without its AggregateDecl");
    let body = match &decl.kind {
        crate::ast::DeclKind::Struct(a) | crate::ast::DeclKind::Union(a) => a.members.clone(),
        other => unreachable!("analyze::aggregate called on non-aggregate decl {other:?}"),
    };

    let parent_scope = scheduler.state.scope;
    let scope = scheduler.scopes.create(ScopeKind::Symbol, Some(sym), Some(parent_scope));
    scheduler.symbols.get_mut(sym).scope = Some(scope);

    let this_type = Type::Aggregate(sym);
    let prefix = mangle::extend_prefix(&scheduler.state.mangle_prefix, &scheduler.interner, scheduler.symbols.get(sym).name);
    let mangled = mangle::mangle_aggregate_name(&scheduler.state.mangle_prefix, tag, &scheduler.interner, scheduler.symbols.get(sym));
    let mangle_name = scheduler.interner.intern(&mangled);
    scheduler.symbols.get_mut(sym).mangle = Some(mangle_name);

    let mut fields = Vec::new();
    if scheduler.symbols.get(sym).has_context {
        let ctx = scheduler.state.ctx_sym;
        if let Some(ctx_sym) = ctx {
            let field = scheduler.symbols.insert(Symbol::stub(
                scheduler.symbols.get(sym).location,
                scheduler.interner.intern("__ctx"),
                Linkage::D,
                crate::attrs::Visibility::Private,
                SymbolKind::Field(VariablePayload {
                    field_index: Some(0),
                    ..Default::default()
                }),
            ));
            let fsym = scheduler.symbols.get_mut(field);
            fsym.ty = Some(Type::Context(ctx_sym));
            fsym.storage = crate::attrs::Storage::Local;
            fsym.advance_to(Stage::Processed);
            fields.push(field);
        }
    }

    let members =
        scheduler.with_state(Some(prefix), Some(this_type), None, None, Some(scope), |scheduler| {
            crate::visitor::flatten(&body, scope, scheduler)
        })?;

    let mut next_index = fields.len() as u32;
    let mut others = Vec::new();
    for member in &members {
        let is_field = matches!(scheduler.symbols.get(*member).kind, SymbolKind::Variable(_));
        if is_field {
            let payload = match &scheduler.symbols.get(*member).kind {
                SymbolKind::Variable(p) => p.clone(),
                _ => unreachable!(),
            };
            let symbol = scheduler.symbols.get_mut(*member);
            symbol.kind = SymbolKind::Field(VariablePayload {
                field_index: Some(next_index),
                ..payload
            });
            next_index += 1;
            fields.push(*member);
        } else {
            others.push(*member);
        }
    }

    scheduler.set_aggregate_members(sym, fields, others);
    scheduler.symbols.get_mut(sym).advance_to(Stage::Populated);
    Ok(())
}

fn aggregate_fields(scheduler: &Scheduler, sym: SymbolId) -> Vec<SymbolId> {
    scheduler.aggregate_fields(sym).cloned().unwrap_or_default()
}

fn other_members(scheduler: &Scheduler, sym: SymbolId) -> Vec<SymbolId> {
    scheduler.aggregate_others(sym).cloned().unwrap_or_default()
}
