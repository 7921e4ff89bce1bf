//! `Enum` analysis (spec §4.3 "Enum"): underlying-type resolution and the
//! arithmetic entry-value chain (`previous + 1` unless an entry supplies
//! its own expression).
//!
//! Entries are materialized as real `Variable` symbols with `Storage::Enum`
//! rather than kept as bare values on `EnumPayload`, so VRP's "enum-storage
//! variable reference" rule (spec §4.4) has a concrete symbol to look the
//! value up on.

use crate::ast::Decl;
use crate::attrs::{Storage, Visibility};
use crate::error::{Result, SemaError};
use crate::ids::SymbolId;
use crate::scheduler::Scheduler;
use crate::scope::ScopeKind;
use crate::stage::Stage;
use crate::symbol::{EnumEntry, EnumPayload, Symbol, SymbolKind, VariablePayload};
use crate::ty::{BuiltinType, Linkage, Type};
use crate::value::ConstValue;

pub fn analyze(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    if scheduler.symbols.get(sym).step < Stage::Signed {
        populate(scheduler, sym, decl)?;
    }
    if target > Stage::Signed {
        scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    }
    Ok(())
}

fn populate(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<Decl>) -> Result<()> {
    let decl = decl.expect("Enum symbol scheduled without its EnumDecl");
    let e = match &decl.kind {
        crate::ast::DeclKind::Enum(e) => e.clone(),
        other => unreachable!("analyze::enum_ called on non-enum decl {other:?}"),
    };

    let underlying = e.underlying.unwrap_or(Type::Builtin(BuiltinType::Int));
    if !underlying.is_integral() && !underlying.is_bool() {
        return Err(SemaError::UnsupportedConstruct {
            what: "enum underlying type must be integral or bool".to_string(),
            span: decl.span,
        });
    }

    let parent_scope = scheduler.state.scope;
    let scope = scheduler.scopes.create(ScopeKind::Symbol, Some(sym), Some(parent_scope));
    scheduler.symbols.get_mut(sym).scope = Some(scope);
    scheduler.symbols.get_mut(sym).ty = Some(Type::Aggregate(sym));

    let mask = crate::vrp::mask_for_type(&underlying);
    let mut entries = Vec::with_capacity(e.entries.len());
    let mut previous: Option<u64> = None;

    for entry in &e.entries {
        let value = match &entry.value {
            Some(expr) => scheduler.evaluator.evaluate(expr)?,
            None => ConstValue::Integer(previous.map(|p| p.wrapping_add(1) & mask).unwrap_or(0)),
        };
        previous = Some(value.bits());

        let entry_sym = scheduler.symbols.insert(Symbol::stub(
            entry.span,
            entry.name,
            Linkage::D,
            Visibility::Public,
            SymbolKind::Variable(VariablePayload {
                initializer: Some(value.clone()),
                is_static: true,
                field_index: None,
            }),
        ));
        let entry_symbol = scheduler.symbols.get_mut(entry_sym);
        entry_symbol.ty = Some(Type::Aggregate(sym));
        entry_symbol.storage = Storage::Enum;
        entry_symbol.advance_to(Stage::Processed);

        scheduler.scopes.declare(scope, entry.name, entry_sym);
        entries.push(EnumEntry {
            symbol: entry_sym,
            value: Some(value),
        });
    }

    scheduler.symbols.get_mut(sym).kind = SymbolKind::Enum(EnumPayload {
        underlying: Some(underlying),
        entries,
    });
    scheduler.symbols.get_mut(sym).advance_to(Stage::Signed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Visibility;
    use sdc_core::Span;

    fn stage_only_advance(scheduler: &mut Scheduler, sym: SymbolId, target: Stage) -> Result<()> {
        scheduler.symbols.get_mut(sym).advance_to(target);
        Ok(())
    }

    fn enum_sym(scheduler: &mut Scheduler) -> SymbolId {
        let name = scheduler.interner.intern("Color");
        scheduler.symbols.insert(Symbol::stub(
            Span::synthetic(),
            name,
            Linkage::D,
            Visibility::Public,
            SymbolKind::Enum(EnumPayload::default()),
        ))
    }

    fn entry(name: sdc_core::Name, value: Option<u64>) -> crate::ast::EnumEntryDecl {
        crate::ast::EnumEntryDecl {
            span: Span::synthetic(),
            name,
            value: value.map(|v| {
                Box::new(crate::ast::Expr {
                    span: Span::synthetic(),
                    kind: crate::ast::ExprKind::IntLiteral(v),
                })
            }),
        }
    }

    #[test]
    fn entries_without_a_value_chain_from_the_previous_one() {
        let mut scheduler = Scheduler::new_bare(stage_only_advance);
        let sym = enum_sym(&mut scheduler);
        let red = scheduler.interner.intern("red");
        let green = scheduler.interner.intern("green");
        let blue = scheduler.interner.intern("blue");
        let decl = Decl {
            span: Span::synthetic(),
            name: scheduler.symbols.get(sym).name,
            linkage: Linkage::D,
            visibility: Visibility::Public,
            kind: crate::ast::DeclKind::Enum(crate::ast::EnumDecl {
                underlying: None,
                entries: vec![entry(red, Some(10)), entry(green, None), entry(blue, None)],
            }),
        };

        analyze(&mut scheduler, sym, Stage::Signed, Some(decl)).unwrap();

        let entries = match &scheduler.symbols.get(sym).kind {
            SymbolKind::Enum(p) => p.entries.clone(),
            other => panic!("expected Enum, got {other:?}"),
        };
        let values: Vec<u64> = entries.iter().map(|e| e.value.as_ref().unwrap().bits()).collect();
        assert_eq!(values, vec![10, 11, 12]);
    }

    #[test]
    fn non_integral_underlying_type_is_rejected() {
        let mut scheduler = Scheduler::new_bare(stage_only_advance);
        let sym = enum_sym(&mut scheduler);
        let decl = Decl {
            span: Span::synthetic(),
            name: scheduler.symbols.get(sym).name,
            linkage: Linkage::D,
            visibility: Visibility::Public,
            kind: crate::ast::DeclKind::Enum(crate::ast::EnumDecl {
                underlying: Some(Type::void()),
                entries: Vec::new(),
            }),
        };

        let result = analyze(&mut scheduler, sym, Stage::Signed, Some(decl));
        assert!(matches!(result, Err(SemaError::UnsupportedConstruct { .. })));
    }
}
