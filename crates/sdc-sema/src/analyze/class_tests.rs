use super::class::{analyze, methods_match, types_match_for_override};
use crate::ast::{Decl, DeclKind, FunctionDecl, MethodAttrs};
use crate::attrs::Visibility;
use crate::error::SemaError;
use crate::ids::SymbolId;
use crate::scheduler::Scheduler;
use crate::stage::Stage;
use crate::symbol::{ClassPayload, FunctionPayload, Symbol, SymbolKind};
use crate::ty::{Linkage, Type};
use sdc_core::Span;

fn class_sym(scheduler: &mut Scheduler, name: &str) -> SymbolId {
    let name = scheduler.interner.intern(name);
    scheduler.symbols.insert(Symbol::stub(
        Span::synthetic(),
        name,
        Linkage::D,
        Visibility::Public,
        SymbolKind::Class(ClassPayload::default()),
    ))
}

fn method_decl(name: sdc_core::Name, marked_override: bool) -> Decl {
    Decl {
        span: Span::synthetic(),
        name,
        linkage: Linkage::D,
        visibility: Visibility::Public,
        kind: DeclKind::Function(FunctionDecl {
            params: Vec::new(),
            return_type: None,
            body: None,
            is_constructor: false,
            has_context: false,
            method: Some(MethodAttrs { marked_override }),
            variadic: false,
            ref_return: false,
        }),
    }
}

fn class_decl(name: sdc_core::Name, base: Option<sdc_core::Name>, members: Vec<Decl>) -> Decl {
    Decl {
        span: Span::synthetic(),
        name,
        linkage: Linkage::D,
        visibility: Visibility::Public,
        kind: DeclKind::Class(crate::ast::ClassDecl { base, members }),
    }
}

/// A derived class overriding a base method without writing `override`
/// is rejected — spec §4.3 "Class".
#[test]
fn missing_override_keyword_is_rejected() {
    let mut scheduler = Scheduler::new_bare(crate::analyze::advance);
    let base = class_sym(&mut scheduler, "Base");
    let foo = scheduler.interner.intern("foo");
    let base_decl = class_decl(scheduler.symbols.get(base).name, None, vec![method_decl(foo, false)]);
    analyze(&mut scheduler, base, Stage::Processed, Some(base_decl)).unwrap();

    let derived = class_sym(&mut scheduler, "Derived");
    let base_name = scheduler.symbols.get(base).name;
    let derived_decl = class_decl(scheduler.symbols.get(derived).name, Some(base_name), vec![method_decl(foo, false)]);

    let scope = scheduler.scopes.create(crate::scope::ScopeKind::Symbol, None, None);
    scheduler.scopes.declare(scope, base_name, base);
    scheduler.state.scope = scope;

    let result = analyze(&mut scheduler, derived, Stage::Processed, Some(derived_decl));
    assert!(matches!(result, Err(SemaError::MissingOverrideKeyword { .. })));
}

/// A correctly `override`-marked method replaces the base's vtable
/// slot rather than adding a new one.
#[test]
fn marked_override_reuses_the_base_vtable_slot() {
    let mut scheduler = Scheduler::new_bare(crate::analyze::advance);
    let base = class_sym(&mut scheduler, "Base");
    let foo = scheduler.interner.intern("foo");
    let base_decl = class_decl(scheduler.symbols.get(base).name, None, vec![method_decl(foo, false)]);
    analyze(&mut scheduler, base, Stage::Processed, Some(base_decl)).unwrap();
    let base_method = match &scheduler.symbols.get(base).kind {
        SymbolKind::Class(p) => p.methods[0],
        _ => unreachable!(),
    };
    let base_slot = match &scheduler.symbols.get(base_method).kind {
        SymbolKind::Method(_, slot) => slot.vtable_index,
        _ => unreachable!(),
    };

    let derived = class_sym(&mut scheduler, "Derived");
    let base_name = scheduler.symbols.get(base).name;
    let derived_decl = class_decl(scheduler.symbols.get(derived).name, Some(base_name), vec![method_decl(foo, true)]);

    let scope = scheduler.scopes.create(crate::scope::ScopeKind::Symbol, None, None);
    scheduler.scopes.declare(scope, base_name, base);
    scheduler.state.scope = scope;

    analyze(&mut scheduler, derived, Stage::Processed, Some(derived_decl)).unwrap();

    let (_, methods) = match &scheduler.symbols.get(derived).kind {
        SymbolKind::Class(p) => (p.fields.clone(), p.methods.clone()),
        _ => unreachable!(),
    };
    assert_eq!(methods.len(), 1);
    match &scheduler.symbols.get(methods[0]).kind {
        SymbolKind::Method(_, slot) => assert_eq!(slot.vtable_index, base_slot),
        other => panic!("expected Method, got {other:?}"),
    }
}

#[test]
fn fn_methods_match_requires_identical_signatures() {
    let a = FunctionPayload {
        params: vec![crate::ty::ParamType::by_value(Type::Builtin(crate::ty::BuiltinType::Int))],
        return_type: Some(Type::void()),
        is_constructor: false,
        variadic: false,
        ref_return: false,
    };
    let b = a.clone();
    assert!(methods_match(&a, &b));

    let mut c = a.clone();
    c.return_type = Some(Type::Builtin(crate::ty::BuiltinType::Int));
    assert!(!methods_match(&a, &c));
}

#[test]
fn fn_methods_match_rejects_variadic_or_ref_return_mismatch() {
    let a = FunctionPayload {
        params: Vec::new(),
        return_type: Some(Type::void()),
        is_constructor: false,
        variadic: false,
        ref_return: false,
    };

    let mut variadic_mismatch = a.clone();
    variadic_mismatch.variadic = true;
    assert!(!methods_match(&a, &variadic_mismatch));

    let mut ref_return_mismatch = a.clone();
    ref_return_mismatch.ref_return = true;
    assert!(!methods_match(&a, &ref_return_mismatch));
}

#[test]
fn fn_methods_match_allows_non_lossy_parameter_widening() {
    let a = FunctionPayload {
        params: vec![crate::ty::ParamType::by_value(Type::Builtin(crate::ty::BuiltinType::Byte))],
        return_type: Some(Type::void()),
        is_constructor: false,
        variadic: false,
        ref_return: false,
    };
    let mut b = a.clone();
    b.params[0].ty = Type::Builtin(crate::ty::BuiltinType::Ubyte);
    assert!(methods_match(&a, &b));

    let mut lossy = a.clone();
    lossy.params[0].ty = Type::Builtin(crate::ty::BuiltinType::Int);
    assert!(!methods_match(&a, &lossy));
}

#[test]
fn types_match_for_override_falls_back_to_equality_for_non_integral_types() {
    let agg_a = crate::ids::SymbolId::from_raw(0);
    let agg_b = crate::ids::SymbolId::from_raw(1);
    assert!(types_match_for_override(&Type::Aggregate(agg_a), &Type::Aggregate(agg_a)));
    assert!(!types_match_for_override(&Type::Aggregate(agg_a), &Type::Aggregate(agg_b)));
}
