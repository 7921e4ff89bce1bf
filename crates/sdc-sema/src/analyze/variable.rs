//! `Variable`/`Field` analysis (spec §4.3 "Variable / Field").

use crate::ast::Decl;
use crate::cast;
use crate::error::Result;
use crate::ids::SymbolId;
use crate::scheduler::Scheduler;
use crate::stage::Stage;
use crate::symbol::{SymbolKind, VariablePayload};
use crate::ty::Type;
use crate::vrp::ValueRange;

pub fn analyze(scheduler: &mut Scheduler, sym: SymbolId, target: Stage, decl: Option<Decl>) -> Result<()> {
    let step = scheduler.symbols.get(sym).step;
    if step < Stage::Signed {
        sign(scheduler, sym, decl.as_ref())?;
    }
    if target > Stage::Signed {
        scheduler.symbols.get_mut(sym).advance_to(Stage::Processed);
    }
    Ok(())
}

fn sign(scheduler: &mut Scheduler, sym: SymbolId, decl: Option<&Decl>) -> Result<()> {
    let decl = decl.expect("Variable/Field symbol scheduled without its VariableDecl");
    let v = match &decl.kind {
        crate::ast::DeclKind::Variable(v) => v.clone(),
        other => unreachable!("analyze::variable called on non-variable decl {other:?}"),
    };

    let is_global = v.is_static || scheduler.symbols.get(sym).storage == crate::attrs::Storage::Static;

    let declared_ty = match &v.ty {
        Some(ty) => Some(ty.clone()),
        None => None,
    };

    let initializer = match &v.initializer {
        Some(expr) => Some(scheduler.evaluator.evaluate(expr)?),
        None => None,
    };

    let resolved_ty = match declared_ty {
        Some(ty) => ty,
        // `auto` without an initializer has nothing to infer from; this
        // is a malformed declaration the upstream parser should already
        // have rejected, but the analyzer still needs a type to proceed.
        None => initializer.as_ref().map(|v| v.ty()).unwrap_or_else(Type::void),
    };

    if let (Some(value), true) = (&initializer, resolved_ty.is_integral() || resolved_ty.is_bool()) {
        let mask = crate::vrp::mask_for_type(&resolved_ty);
        let range = ValueRange::literal(value.bits(), mask);
        cast::check_implicit_cast(&range, &resolved_ty, decl.span)?;
    }

    let symbol = scheduler.symbols.get_mut(sym);
    symbol.ty = Some(resolved_ty);
    if is_global {
        symbol.storage = crate::attrs::Storage::Static;
    }
    match &mut symbol.kind {
        SymbolKind::Variable(payload) | SymbolKind::Field(payload) => {
            *payload = VariablePayload {
                initializer: if is_global { initializer } else { None },
                is_static: is_global,
                field_index: payload.field_index,
            };
        }
        other => unreachable!("analyze::variable called on non-variable symbol kind {other:?}"),
    }
    symbol.advance_to(Stage::Signed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::VariableDecl;
    use crate::attrs::{Storage, Visibility};
    use crate::error::SemaError;
    use crate::symbol::Symbol;
    use crate::ty::{BuiltinType, Linkage};
    use sdc_core::Span;

    fn stage_only_advance(scheduler: &mut Scheduler, sym: SymbolId, target: Stage) -> Result<()> {
        scheduler.symbols.get_mut(sym).advance_to(target);
        Ok(())
    }

    fn variable_sym(scheduler: &mut Scheduler) -> SymbolId {
        let name = scheduler.interner.intern("x");
        scheduler.symbols.insert(Symbol::stub(
            Span::synthetic(),
            name,
            Linkage::D,
            Visibility::Public,
            SymbolKind::Variable(Default::default()),
        ))
    }

    fn int_expr(v: u64) -> Decl {
        Decl {
            span: Span::synthetic(),
            name: sdc_core::Name::from_raw(0),
            linkage: Linkage::D,
            visibility: Visibility::Public,
            kind: crate::ast::DeclKind::Variable(VariableDecl {
                ty: Some(Type::Builtin(BuiltinType::Ubyte)),
                initializer: Some(Box::new(crate::ast::Expr {
                    span: Span::synthetic(),
                    kind: crate::ast::ExprKind::IntLiteral(v),
                })),
                is_static: true,
            }),
        }
    }

    #[test]
    fn global_variable_keeps_its_evaluated_initializer() {
        let mut scheduler = Scheduler::new_bare(stage_only_advance);
        let sym = variable_sym(&mut scheduler);

        analyze(&mut scheduler, sym, Stage::Signed, Some(int_expr(5))).unwrap();

        assert_eq!(scheduler.symbols.get(sym).step, Stage::Signed);
        assert_eq!(scheduler.symbols.get(sym).storage, Storage::Static);
        match &scheduler.symbols.get(sym).kind {
            SymbolKind::Variable(p) => assert!(p.initializer.is_some()),
            other => panic!("expected Variable, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_initializer_is_rejected() {
        let mut scheduler = Scheduler::new_bare(stage_only_advance);
        let sym = variable_sym(&mut scheduler);

        let result = analyze(&mut scheduler, sym, Stage::Signed, Some(int_expr(300)));
        assert!(matches!(result, Err(SemaError::TypeMismatch { .. })));
    }

    #[test]
    fn field_index_survives_the_payload_rebuild() {
        let mut scheduler = Scheduler::new_bare(stage_only_advance);
        let name = scheduler.interner.intern("f");
        let sym = scheduler.symbols.insert(Symbol::stub(
            Span::synthetic(),
            name,
            Linkage::D,
            Visibility::Public,
            SymbolKind::Field(VariablePayload {
                field_index: Some(3),
                ..Default::default()
            }),
        ));

        let decl = Decl {
            span: Span::synthetic(),
            name: sdc_core::Name::from_raw(0),
            linkage: Linkage::D,
            visibility: Visibility::Public,
            kind: crate::ast::DeclKind::Variable(VariableDecl {
                ty: Some(Type::Builtin(BuiltinType::Int)),
                initializer: None,
                is_static: false,
            }),
        };

        analyze(&mut scheduler, sym, Stage::Signed, Some(decl)).unwrap();
        match &scheduler.symbols.get(sym).kind {
            SymbolKind::Field(p) => assert_eq!(p.field_index, Some(3)),
            other => panic!("expected Field, got {other:?}"),
        }
    }
}
