//! `Template` analysis (spec §4.3 "Template"): parameter-kind resolution
//! and the IFTI hint cache; `TemplateInstance` analysis: binding arguments
//! into a fresh scope and re-flattening the template's own member list
//! against it.

use crate::ast::{Decl, TemplateParamKind};
use crate::attrs::Storage;
use crate::error::Result;
use crate::ids::SymbolId;
use crate::mangle;
use crate::scheduler::Scheduler;
use crate::scope::ScopeKind;
use crate::stage::Stage;
use crate::symbol::{Symbol, SymbolKind, TemplateInstancePayload, TemplatePayload, TemplateParamPayload};
use crate::ty::Linkage;

pub fn analyze_template(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    if scheduler.symbols.get(sym).scope.is_none() {
        populate(scheduler, sym, decl)?;
    }
    if target > Stage::Populated {
        scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    }
    Ok(())
}

fn populate(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<Decl>) -> Result<()> {
    let decl = decl.expect("Template symbol scheduled without its TemplateDecl");
    let t = match &decl.kind {
        crate::ast::DeclKind::Template(t) => t.clone(),
        other => unreachable!("analyze::template called on non-template decl {other:?}"),
    };

    let parent_scope = scheduler.state.scope;
    let scope = scheduler.scopes.create(ScopeKind::Symbol, Some(sym), Some(parent_scope));
    scheduler.symbols.get_mut(sym).scope = Some(scope);

    let mut params = Vec::with_capacity(t.params.len());
    for p in &t.params {
        let (kind, bound_type, bound_value, bound_symbol) = match &p.kind {
            TemplateParamKind::Type { default } => (SymbolKindTag::Type, default.clone(), None, None),
            TemplateParamKind::Value { ty, default } => {
                let value = match default {
                    Some(expr) => Some(scheduler.evaluator.evaluate(expr)?),
                    None => None,
                };
                (SymbolKindTag::Value, Some(ty.clone()), value, None)
            }
            TemplateParamKind::Alias { default } => {
                let resolved = match default {
                    Some(name) => Some(crate::identifier::resolve(scheduler, parent_scope, *name, p.span)?),
                    None => None,
                };
                (SymbolKindTag::Alias, None, None, resolved)
            }
            TemplateParamKind::TypedAlias { ty, default } => {
                let resolved = match default {
                    Some(name) => Some(crate::identifier::resolve(scheduler, parent_scope, *name, p.span)?),
                    None => None,
                };
                (SymbolKindTag::TypedAlias, Some(ty.clone()), None, resolved)
            }
        };

        let payload = TemplateParamPayload {
            name: p.name,
            kind: p.kind.clone(),
            bound_type,
            bound_value,
            bound_symbol,
        };
        let param_kind = match kind {
            SymbolKindTag::Type => SymbolKind::TypeTemplateParameter(payload),
            SymbolKindTag::Value => SymbolKind::ValueTemplateParameter(payload),
            SymbolKindTag::Alias => SymbolKind::AliasTemplateParameter(payload),
            SymbolKindTag::TypedAlias => SymbolKind::TypedAliasTemplateParameter(payload),
        };

        let param_sym = scheduler.symbols.insert(Symbol::stub(
            p.span,
            p.name,
            Linkage::D,
            scheduler.symbols.get(sym).visibility,
            param_kind,
        ));
        scheduler.symbols.get_mut(param_sym).advance_to(Stage::Processed);
        scheduler.scopes.declare(scope, p.name, param_sym);
        params.push(param_sym);
    }

    let own_name = scheduler.symbols.get(sym).name;
    let ifti_hint = t.members.iter().find_map(|member| match &member.kind {
        crate::ast::DeclKind::Function(f) if member.name == own_name => {
            Some(f.params.iter().map(|p| crate::ty::ParamType {
                ty: p.ty.clone(),
                is_ref: p.is_ref,
                is_final: p.is_final,
            }).collect())
        }
        _ => None,
    });

    scheduler.schedule_module(sym, t.members);
    scheduler.symbols.get_mut(sym).kind = SymbolKind::Template(TemplatePayload { params, ifti_hint });
    scheduler.symbols.get_mut(sym).advance_to(Stage::Populated);
    Ok(())
}

enum SymbolKindTag {
    Type,
    Value,
    Alias,
    TypedAlias,
}

/// Implicit function template instantiation (IFTI) and explicit
/// `Foo!(Args)` instantiation both land here: bind `arguments` to the
/// template's parameter names in a fresh scope, then re-flatten its
/// member list against that scope so each member resolves `T`/`N`/etc.
/// to the supplied argument rather than the parameter stub.
pub fn instantiate(scheduler: &mut Scheduler, template: SymbolId, arguments: Vec<SymbolId>) -> Result<SymbolId> {
    scheduler.require(template, Stage::Populated)?;

    // Pre-compute the instance's own mangle from the template's accumulated
    // prefix plus an encoding of each argument (spec §4.3 "TemplateInstance":
    // "Set mangle prefix from the instance's pre-computed mangle") — this
    // has to happen before flattening so members mangle against it, and
    // before any `Type::Aggregate`/`Type::Context` referencing this instance
    // ever resolves it through `mangle::resolve_aggregate_mangle`.
    let prefix = mangle::extend_prefix(&scheduler.state.mangle_prefix, &scheduler.interner, scheduler.symbols.get(template).name);
    let mut instance_mangle = prefix.clone();
    for &arg in &arguments {
        match scheduler.symbols.get(arg).mangle {
            Some(m) => instance_mangle.push_str(scheduler.interner.resolve(m)),
            None => instance_mangle.push_str(&mangle::mangle_identifier(&scheduler.interner, scheduler.symbols.get(arg).name)),
        }
    }
    let mangle_name = scheduler.interner.intern(&instance_mangle);

    let instance = scheduler.symbols.insert(Symbol::stub(
        scheduler.symbols.get(template).location,
        scheduler.symbols.get(template).name,
        Linkage::D,
        scheduler.symbols.get(template).visibility,
        SymbolKind::TemplateInstance(TemplateInstancePayload {
            template: Some(template),
            arguments: arguments.clone(),
            enclosing_context: None,
        }),
    ));
    scheduler.symbols.get_mut(instance).mangle = Some(mangle_name);

    let template_scope = scheduler.symbols.get(template).scope.expect("template scope created in populate");
    let param_names: Vec<sdc_core::Name> = match &scheduler.symbols.get(template).kind {
        SymbolKind::Template(p) => p.params.iter().map(|&param| scheduler.symbols.get(param).name).collect(),
        _ => Vec::new(),
    };

    let scope = scheduler.scopes.create(ScopeKind::Symbol, Some(instance), Some(template_scope));
    scheduler.symbols.get_mut(instance).scope = Some(scope);
    for (name, arg) in param_names.into_iter().zip(arguments.iter()) {
        scheduler.scopes.declare(scope, name, *arg);
    }

    let body = scheduler.module_body(template).cloned().unwrap_or_default();
    let members = scheduler.with_state(Some(instance_mangle), None, None, None, Some(scope), |scheduler| {
        crate::visitor::flatten(&body, scope, scheduler)
    })?;
    for member in &members {
        scheduler.require(*member, Stage::Processed)?;
    }

    // Only a member that actually closes over a context promotes the
    // instance to Local storage with a recorded enclosing context (spec
    // §4.3 "TemplateInstance"); an instance whose members are all
    // context-free stays at its default storage.
    let carries_context = members.iter().any(|&member| scheduler.symbols.get(member).has_context);
    let enclosing_context = scheduler.state.ctx_sym;
    let symbol = scheduler.symbols.get_mut(instance);
    if carries_context {
        symbol.storage = Storage::Local;
        if let SymbolKind::TemplateInstance(payload) = &mut symbol.kind {
            payload.enclosing_context = enclosing_context;
        }
    } else {
        symbol.storage = Storage::Static;
    }
    symbol.advance_to(Stage::Processed);
    Ok(instance)
}

pub fn analyze_instance(scheduler: &mut Scheduler, sym: SymbolId, _target: Stage) -> Result<()> {
    // `instantiate` drives a `TemplateInstance` fully to `Processed` up
    // front (it has no meaningful intermediate stage of its own — every
    // member's own stage is what callers actually depend on), so this is
    // only reached if a caller `require`s one that's already done.
    scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    Ok(())
}
