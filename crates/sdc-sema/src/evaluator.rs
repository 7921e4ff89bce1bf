//! The `Evaluator` collaborator (spec §6): compile-time constant folding.
//! Out of scope as a full implementation (it would need the complete
//! expression language, not just VRP's small supported subset), but the
//! trait boundary and a minimal folder for the sublanguage VRP itself
//! understands (literals, `+`, `-`, unary negation, assignment, comma) are
//! in scope, since the Symbol Analyzer calls through this trait for enum
//! entries, `static` initializers, and value-alias targets.

use sdc_core::Span;

use crate::ast::{Expr, ExprKind};
use crate::error::{Result, SemaError};
use crate::value::ConstValue;

pub trait Evaluator {
    fn evaluate(&mut self, expr: &Expr) -> Result<ConstValue>;

    fn eval_integral(&mut self, expr: &Expr) -> Result<u64> {
        match self.evaluate(expr)? {
            ConstValue::Integer(v) => Ok(v),
            ConstValue::Bool(b) => Ok(b as u64),
            ConstValue::Null => Ok(0),
        }
    }
}

/// A folder for the literal/`+`/`-`/comma/assign sublanguage. Anything
/// outside that — function calls, field access, casts — is a
/// `CompileTimeEvaluationError`, since a real evaluator is out of scope.
#[derive(Debug, Default)]
pub struct ConstFoldEvaluator;

impl Evaluator for ConstFoldEvaluator {
    fn evaluate(&mut self, expr: &Expr) -> Result<ConstValue> {
        fold(self, expr)
    }
}

fn fold(eval: &mut ConstFoldEvaluator, expr: &Expr) -> Result<ConstValue> {
    match &expr.kind {
        ExprKind::IntLiteral(v) => Ok(ConstValue::Integer(*v)),
        ExprKind::BoolLiteral(b) => Ok(ConstValue::Bool(*b)),
        ExprKind::NullLiteral => Ok(ConstValue::Null),
        ExprKind::Add(a, b) => {
            let a = fold(eval, a)?.bits();
            let b = fold(eval, b)?.bits();
            Ok(ConstValue::Integer(a.wrapping_add(b)))
        }
        ExprKind::Sub(a, b) => {
            let a = fold(eval, a)?.bits();
            let b = fold(eval, b)?.bits();
            Ok(ConstValue::Integer(a.wrapping_sub(b)))
        }
        ExprKind::Neg(a) => {
            let a = fold(eval, a)?.bits();
            Ok(ConstValue::Integer(a.wrapping_neg()))
        }
        ExprKind::Assign(_, rhs) | ExprKind::Comma(_, rhs) => fold(eval, rhs),
        ExprKind::Ident(_) => Err(unsupported(expr.span)),
    }
}

fn unsupported(span: Span) -> SemaError {
    SemaError::CompileTimeEvaluationError {
        message: "expression is outside the supported constant-folding sublanguage".to_string(),
        span,
    }
}
