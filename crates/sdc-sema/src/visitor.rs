//! Declaration Visitor (spec §4.2): flattens an AST declaration list into
//! stub symbols registered in a scope, expanding `static if`/`version`
//! blocks as it goes.
//!
//! Mixin and template-mixin expansion (also named in spec §4.2) splice
//! another declaration list into the current one exactly the way
//! `static if`/`version` branches do here; the AST this crate consumes
//! (`ast.rs`) does not model a dedicated mixin node, since lexing/parsing
//! mixin syntax is out of scope and nothing downstream distinguishes a
//! spliced mixin body from a spliced `static if` branch once it has been
//! flattened. `flatten` is the single splice point either would use.

use sdc_core::Name;

use crate::ast::{Decl, DeclKind};
use crate::error::{Result, SemaError};
use crate::ids::{ScopeId, SymbolId};
use crate::scheduler::Scheduler;
use crate::symbol::{
    AliasPayload, ClassPayload, EnumPayload, FunctionPayload, InterfacePayload, MethodSlot, Symbol, SymbolKind,
    TemplatePayload, VariablePayload,
};
use crate::value::ConstValue;

/// Flatten `decls` into `scope`, returning the stub symbols created for
/// concrete (non-conditional) declarations in source order. `static
/// if`/`version` branches are expanded inline and do not themselves
/// appear in the result. Pulls the evaluator, version set, and interner
/// straight off `scheduler` rather than taking them as separate
/// parameters, so nested recursive calls don't have to thread three
/// extra arguments alongside it.
pub fn flatten(decls: &[Decl], scope: ScopeId, scheduler: &mut Scheduler) -> Result<Vec<SymbolId>> {
    let mut out = Vec::new();
    for decl in decls {
        match &decl.kind {
            DeclKind::StaticIf { condition, then, otherwise } => {
                let taken = is_truthy(scheduler.evaluator.evaluate(condition)?);
                let branch = if taken { then } else { otherwise };
                out.extend(flatten(branch, scope, scheduler)?);
            }
            DeclKind::Version { ident, then, otherwise } => {
                let branch = if scheduler.config.versions.contains(*ident) {
                    then
                } else {
                    otherwise
                };
                out.extend(flatten(branch, scope, scheduler)?);
            }
            _ => out.push(stub_and_register(decl, scope, scheduler)?),
        }
    }
    Ok(out)
}

fn is_truthy(v: ConstValue) -> bool {
    match v {
        ConstValue::Bool(b) => b,
        ConstValue::Integer(i) => i != 0,
        ConstValue::Null => false,
    }
}

fn stub_and_register(decl: &Decl, scope: ScopeId, scheduler: &mut Scheduler) -> Result<SymbolId> {
    let kind = stub_kind(&decl.kind);
    let overloadable = is_overloadable(&decl.kind);

    let symbol = Symbol::stub(decl.span, decl.name, decl.linkage, decl.visibility, kind);
    let sym = scheduler.symbols.insert(symbol);

    if overloadable {
        add_overloadable(scheduler, scope, decl.name, sym);
    } else if scheduler.scopes.declare(scope, decl.name, sym).is_some() {
        return Err(SemaError::DuplicateSymbol {
            name: scheduler.interner.resolve(decl.name).to_string(),
            span: decl.span,
        });
    }

    scheduler.schedule(sym, decl.clone());
    Ok(sym)
}

/// Merge `sym` into `scope`'s overload set for `name`, promoting a lone
/// symbol into a real `OverloadSet` the moment a second one appears
/// (spec §3 `Scope`: "addOverloadableSymbol merges into an OverloadSet").
fn add_overloadable(scheduler: &mut Scheduler, scope: ScopeId, name: Name, sym: SymbolId) {
    let Some(existing) = scheduler.scopes.lookup_local(scope, name) else {
        scheduler.scopes.declare_overloadable(scope, name, sym);
        return;
    };

    match &mut scheduler.symbols.get_mut(existing).kind {
        SymbolKind::OverloadSet { members } => {
            members.push(sym);
        }
        _ => {
            let location = scheduler.symbols.get(existing).location;
            let overload_set = scheduler.symbols.insert(Symbol::stub(
                location,
                name,
                scheduler.symbols.get(existing).linkage,
                scheduler.symbols.get(existing).visibility,
                SymbolKind::OverloadSet {
                    members: vec![existing, sym],
                },
            ));
            scheduler.scopes.declare_overloadable(scope, name, overload_set);
        }
    }
}

fn is_overloadable(kind: &DeclKind) -> bool {
    matches!(kind, DeclKind::Function(_) | DeclKind::Template(_))
}

fn stub_kind(kind: &DeclKind) -> SymbolKind {
    match kind {
        DeclKind::Function(f) => match &f.method {
            Some(attrs) => SymbolKind::Method(
                FunctionPayload::default(),
                MethodSlot {
                    vtable_index: 0,
                    marked_override: attrs.marked_override,
                },
            ),
            None => SymbolKind::Function(FunctionPayload::default()),
        },
        DeclKind::Variable(v) => SymbolKind::Variable(VariablePayload {
            is_static: v.is_static,
            ..Default::default()
        }),
        DeclKind::Struct(_) => SymbolKind::Struct { init: None },
        DeclKind::Union(_) => SymbolKind::Union { init: None },
        DeclKind::Class(_) => SymbolKind::Class(ClassPayload::default()),
        DeclKind::Interface(_) => SymbolKind::Interface(InterfacePayload::default()),
        DeclKind::Enum(_) => SymbolKind::Enum(EnumPayload::default()),
        DeclKind::Template(_) => SymbolKind::Template(TemplatePayload::default()),
        DeclKind::TypeAlias(_) => SymbolKind::TypeAlias(None),
        DeclKind::ValueAlias(_) => SymbolKind::ValueAlias(None),
        DeclKind::SymbolAlias(_) => SymbolKind::SymbolAlias(AliasPayload { target: None }),
        DeclKind::StaticIf { .. } | DeclKind::Version { .. } => {
            unreachable!("conditional declarations are expanded before stubbing")
        }
    }
}
