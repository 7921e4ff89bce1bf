//! `Function`/`Method` analysis (spec §4.3 "Function / Method").
//!
//! Statement-tree analysis (the function body's control flow, expression
//! typing, `return` inference) is the out-of-scope statement analyzer's
//! job; this only resolves the signature — parameter/return types, the
//! `__ctx`/`this` prepends, and the mangle — and stubs the body scope so a
//! later pass has somewhere to hang locals.

use sdc_core::Name;

use crate::ast::Decl;
use crate::attrs::Storage;
use crate::error::{Result, SemaError};
use crate::ids::SymbolId;
use crate::mangle;
use crate::scheduler::Scheduler;
use crate::scope::ScopeKind;
use crate::stage::Stage;
use crate::symbol::{Symbol, SymbolKind, VariablePayload};
use crate::ty::{FunctionType, Linkage, ParamType, Type};

pub fn analyze(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    let step = scheduler.symbols.get(sym).step;
    if step < Stage::Signed {
        sign(scheduler, sym, decl.as_ref())?;
    }
    if target <= Stage::Signed {
        return Ok(());
    }
    process_body(scheduler, sym, decl)
}

fn sign(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<&Decl>) -> Result<()> {
    let decl = decl.expect("Function/Method symbol scheduled without its FunctionDecl");
    let f = match &decl.kind {
        crate::ast::DeclKind::Function(f) => f.clone(),
        other => unreachable!("analyze::function called on non-function decl {other:?}"),
    };

    scheduler.symbols.get_mut(sym).has_context = f.has_context;

    let mut params = Vec::with_capacity(f.params.len() + 1);

    if f.has_context {
        let ctx = scheduler
            .state
            .ctx_sym
            .ok_or_else(|| unsupported(decl.span, "nested function declared without an enclosing context"))?;
        params.push(ParamType {
            ty: Type::Context(ctx),
            is_ref: true,
            is_final: true,
        });
    }

    let this_type = scheduler.state.this_type.clone();
    if f.is_constructor {
        let this_ty = this_type
            .clone()
            .ok_or_else(|| unsupported(decl.span, "constructor declared outside an aggregate"))?;
        params.push(ParamType {
            ty: this_ty,
            is_ref: true,
            is_final: false,
        });
    }

    for p in &f.params {
        require_dependency(scheduler, &p.ty, Stage::Signed)?;
        params.push(ParamType {
            ty: p.ty.clone(),
            is_ref: p.is_ref,
            is_final: p.is_final,
        });
    }

    let return_type = if f.is_constructor {
        match this_type {
            Some(Type::Aggregate(agg))
                if matches!(
                    scheduler.symbols.get(agg).kind,
                    SymbolKind::Class(_) | SymbolKind::Struct { .. } | SymbolKind::Union { .. }
                ) =>
            {
                Type::Pointer(Box::new(Type::Aggregate(agg)), crate::ty::Qualifier::Mutable)
            }
            _ => Type::void(),
        }
    } else {
        match &f.return_type {
            Some(ty) => {
                require_dependency(scheduler, ty, Stage::Signed)?;
                ty.clone()
            }
            // `auto` return types are inferred from the statement tree,
            // which this analyzer doesn't walk; default to `void`.
            None => Type::void(),
        }
    };

    let function_type = FunctionType {
        params: params.clone(),
        return_type: Box::new(return_type.clone()),
        variadic: f.variadic,
        linkage: scheduler.symbols.get(sym).linkage,
    };

    let prefix = mangle::extend_prefix(&scheduler.state.mangle_prefix, &scheduler.interner, scheduler.symbols.get(sym).name);
    let mangled = match scheduler.symbols.get(sym).linkage {
        Linkage::D => {
            let type_mangle = mangle::mangle_function_type(&scheduler.interner, &scheduler.symbols, &function_type);
            mangle::finalize_d_mangle(&prefix, &type_mangle)
        }
        Linkage::C | Linkage::Cpp | Linkage::Windows => {
            mangle::finalize_c_mangle(&scheduler.interner, scheduler.symbols.get(sym).name)
        }
    };
    let mangle_name: Name = scheduler.interner.intern(&mangled);

    let symbol = scheduler.symbols.get_mut(sym);
    symbol.mangle = Some(mangle_name);
    symbol.ty = Some(Type::Function(function_type));
    match &mut symbol.kind {
        SymbolKind::Function(payload) | SymbolKind::Method(payload, _) => {
            payload.params = params;
            payload.return_type = Some(return_type);
            payload.is_constructor = f.is_constructor;
            payload.variadic = f.variadic;
            payload.ref_return = f.ref_return;
        }
        other => unreachable!("analyze::function called on non-function symbol kind {other:?}"),
    }
    symbol.advance_to(Stage::Signed);
    Ok(())
}

fn process_body(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<Decl>) -> Result<()> {
    let body = decl.and_then(|d| match d.kind {
        crate::ast::DeclKind::Function(f) => f.body,
        _ => None,
    });

    if let Some(params) = function_params(scheduler, sym) {
        if let Some(body) = body {
            let _ = &body; // statement-tree analysis is out of scope
            let parent = scheduler.state.scope;
            let kind = if scheduler.symbols.get(sym).has_context {
                ScopeKind::Closure
            } else {
                ScopeKind::Symbol
            };
            let scope = scheduler.scopes.create(kind, Some(sym), Some(parent));
            for (name, ty) in params {
                let local = scheduler.symbols.insert(Symbol::stub(
                    scheduler.symbols.get(sym).location,
                    name,
                    Linkage::D,
                    scheduler.symbols.get(sym).visibility,
                    SymbolKind::Variable(VariablePayload::default()),
                ));
                let local_sym = scheduler.symbols.get_mut(local);
                local_sym.ty = Some(ty);
                local_sym.storage = Storage::Local;
                local_sym.advance_to(Stage::Processed);
                scheduler.scopes.declare(scope, name, local);
            }
            scheduler.symbols.get_mut(sym).scope = Some(scope);
        }
    }

    scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    Ok(())
}

/// Named (user-written) parameters only — the `this`/`__ctx` prepends
/// have no source-level name to bind in the body scope.
fn function_params(scheduler: &Scheduler, sym: SymbolId) -> Option<Vec<(Name, Type)>> {
    let decl = scheduler.declaration(sym)?;
    match &decl.kind {
        crate::ast::DeclKind::Function(f) => Some(f.params.iter().map(|p| (p.name, p.ty.clone())).collect()),
        _ => None,
    }
}

fn require_dependency(scheduler: &mut Scheduler, ty: &Type, stage: Stage) -> Result<()> {
    match ty {
        Type::Aggregate(dep) | Type::Context(dep) => scheduler.require(*dep, stage),
        Type::Pointer(inner, _) | Type::Slice(inner) | Type::Array(inner, _) => {
            require_dependency(scheduler, inner, stage)
        }
        _ => Ok(()),
    }
}

fn unsupported(span: sdc_core::Span, what: &str) -> SemaError {
    SemaError::UnsupportedConstruct {
        what: what.to_string(),
        span,
    }
}
