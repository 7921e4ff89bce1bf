//! `Class` analysis (spec §4.3 "Class"): base resolution, field/method
//! inheritance, and override matching.
//!
//! Override resolution carries a known quirk, reproduced rather than
//! fixed: a method sharing a base method's *name* but not its full
//! signature (params/return type) is rejected with `OverrideNotFound`
//! instead of being registered as a new sibling virtual method — see
//! DESIGN.md. A method whose name doesn't collide with any inherited
//! method at all is unaffected; it's simply added as new.

use crate::ast::Decl;
use crate::cast;
use crate::error::{Result, SemaError};
use crate::ids::SymbolId;
use crate::mangle;
use crate::scheduler::Scheduler;
use crate::scope::ScopeKind;
use crate::stage::Stage;
use crate::symbol::{ClassPayload, FunctionPayload, SymbolKind, VariablePayload};
use crate::ty::Type;
use crate::vrp::{mask_for_type, ValueRange};

pub fn analyze(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    if scheduler.symbols.get(sym).scope.is_none() {
        populate(scheduler, sym, decl)?;
    }
    if target <= Stage::Populated {
        return Ok(());
    }

    let (fields, methods) = match &scheduler.symbols.get(sym).kind {
        SymbolKind::Class(p) => (p.fields.clone(), p.methods.clone()),
        _ => unreachable!(),
    };
    for field in &fields {
        scheduler.require(*field, Stage::Processed)?;
    }
    for method in &methods {
        scheduler.require(*method, Stage::Processed)?;
    }

    scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    Ok(())
}

fn populate(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<Decl>) -> Result<()> {
    let decl = decl.expect("Class symbol scheduled without its ClassDecl");
    let (base_name, body) = match &decl.kind {
        crate::ast::DeclKind::Class(c) => (c.base, c.members.clone()),
        other => unreachable!("analyze::class called on non-class decl {other:?}"),
    };

    let parent_scope = scheduler.state.scope;
    let scope = scheduler.scopes.create(ScopeKind::Symbol, Some(sym), Some(parent_scope));
    scheduler.symbols.get_mut(sym).scope = Some(scope);

    let base = match base_name {
        Some(name) => {
            let base = crate::identifier::resolve(scheduler, parent_scope, name, decl.span)?;
            scheduler.require(base, Stage::Processed)?;
            Some(base)
        }
        None => scheduler.object_class.filter(|&obj| obj != sym),
    };

    let (mut fields, mut methods, mut next_index) = match base {
        Some(base_sym) => match &scheduler.symbols.get(base_sym).kind {
            SymbolKind::Class(p) => (p.fields.clone(), p.methods.clone(), p.next_field_index),
            _ => (Vec::new(), Vec::new(), 0),
        },
        None => (Vec::new(), Vec::new(), 0),
    };

    scheduler.symbols.get_mut(sym).kind = SymbolKind::Class(ClassPayload {
        base,
        fields: Vec::new(),
        methods: Vec::new(),
        next_field_index,
    });

    let prefix = mangle::extend_prefix(&scheduler.state.mangle_prefix, &scheduler.interner, scheduler.symbols.get(sym).name);
    let mangled = mangle::mangle_aggregate_name(&scheduler.state.mangle_prefix, mangle::TAG_CLASS, &scheduler.interner, scheduler.symbols.get(sym));
    let mangle_name = scheduler.interner.intern(&mangled);
    scheduler.symbols.get_mut(sym).mangle = Some(mangle_name);

    let this_type = Type::Aggregate(sym);
    let members =
        scheduler.with_state(Some(prefix), Some(this_type), None, None, Some(scope), |scheduler| {
            crate::visitor::flatten(&body, scope, scheduler)
        })?;

    for member in &members {
        scheduler.require(*member, Stage::Signed)?;
        let is_method = matches!(scheduler.symbols.get(*member).kind, SymbolKind::Method(..));
        if is_method {
            resolve_override(scheduler, *member, &mut methods)?;
        } else {
            let payload = match &scheduler.symbols.get(*member).kind {
                SymbolKind::Variable(p) => p.clone(),
                _ => continue,
            };
            let symbol = scheduler.symbols.get_mut(*member);
            symbol.kind = SymbolKind::Field(VariablePayload {
                field_index: Some(next_index),
                ..payload
            });
            next_index += 1;
            fields.push(*member);
        }
    }

    if let SymbolKind::Class(payload) = &mut scheduler.symbols.get_mut(sym).kind {
        payload.fields = fields;
        payload.methods = methods;
        payload.next_field_index = next_index;
    }

    scheduler.symbols.get_mut(sym).advance_to(Stage::Populated);
    Ok(())
}

/// Resolve `method` against the running `methods` list (inherited base
/// methods, with earlier same-class members already folded in): an exact
/// signature match reuses that slot (provided `override` was written); a
/// name collision with no signature match is rejected outright — even
/// though a real new overload with that name would be legitimate, this is
/// the quirk being reproduced, not fixed (see the module doc comment); no
/// collision at all means `method` is simply new and gets the next vtable
/// slot.
fn resolve_override(scheduler: &mut Scheduler, method: SymbolId, methods: &mut Vec<SymbolId>) -> Result<()> {
    let (payload, marked_override, span) = match &scheduler.symbols.get(method).kind {
        SymbolKind::Method(payload, slot) => (payload.clone(), slot.marked_override, scheduler.symbols.get(method).location),
        _ => unreachable!(),
    };
    let name = scheduler.symbols.get(method).name;

    let mut name_match = None;
    let mut full_match = None;
    for (idx, &base) in methods.iter().enumerate() {
        let SymbolKind::Method(base_payload, _) = &scheduler.symbols.get(base).kind else {
            continue;
        };
        if scheduler.symbols.get(base).name != name {
            continue;
        }
        name_match = Some(idx);
        if methods_match(base_payload, &payload) {
            full_match = Some(idx);
            break;
        }
    }

    match (full_match, name_match) {
        (Some(idx), _) => {
            if !marked_override {
                return Err(SemaError::MissingOverrideKeyword { span });
            }
            let base = methods[idx];
            let vtable_index = match &scheduler.symbols.get(base).kind {
                SymbolKind::Method(_, slot) => slot.vtable_index,
                _ => unreachable!(),
            };
            if let SymbolKind::Method(_, slot) = &mut scheduler.symbols.get_mut(method).kind {
                slot.vtable_index = vtable_index;
            }
            methods[idx] = method;
            Ok(())
        }
        (None, Some(_)) => Err(SemaError::OverrideNotFound { span }),
        (None, None) => {
            if marked_override {
                return Err(SemaError::OverrideNotFound { span });
            }
            let vtable_index = methods.len() as u32;
            if let SymbolKind::Method(_, slot) = &mut scheduler.symbols.get_mut(method).kind {
                slot.vtable_index = vtable_index;
            }
            methods.push(method);
            Ok(())
        }
    }
}

pub(super) fn methods_match(base: &FunctionPayload, candidate: &FunctionPayload) -> bool {
    if base.variadic != candidate.variadic || base.ref_return != candidate.ref_return {
        return false;
    }
    if base.params.len() != candidate.params.len() {
        return false;
    }
    for (b, c) in base.params.iter().zip(candidate.params.iter()) {
        if b.is_ref != c.is_ref || !types_match_for_override(&b.ty, &c.ty) {
            return false;
        }
    }
    match (&base.return_type, &candidate.return_type) {
        (Some(b), Some(c)) => types_match_for_override(b, c),
        (None, None) => true,
        _ => false,
    }
}

/// Whether `a` and `b` implicitly cast into each other without loss —
/// an override's parameter/return types don't need to be byte-for-byte
/// identical, only interchangeable (spec §4.4 `canFit`). Non-integral
/// types (aggregates, pointers, `void`) have no such widening and fall
/// back to exact equality.
pub(super) fn types_match_for_override(a: &Type, b: &Type) -> bool {
    if a == b {
        return true;
    }
    if (a.is_integral() || a.is_bool()) && (b.is_integral() || b.is_bool()) {
        let range_a = ValueRange::full_range(mask_for_type(a));
        let range_b = ValueRange::full_range(mask_for_type(b));
        return cast::can_fit(&range_a, b) && cast::can_fit(&range_b, a);
    }
    false
}
