//! Semantic error kinds (spec §7).
//!
//! Every kind is fatal: the pass makes no attempt to recover and keep
//! analyzing past the first error from a given `add`. Each variant carries
//! the `Span` of the offending construct so a caller can map it back to
//! source without this crate owning diagnostic rendering (out of scope —
//! see spec.md Non-goals).

use sdc_core::Span;

use crate::symbol::SymbolId;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SemaError {
    /// Surfaced verbatim from the upstream parser; the pass does not try
    /// to continue past a syntax error.
    #[error("syntax error: {message}")]
    SyntaxUpstream { message: String, span: Span },

    #[error("undefined identifier `{name}`")]
    UnresolvedIdentifier { name: String, span: Span },

    #[error("cannot implicitly convert to the expected type")]
    TypeMismatch { span: Span },

    #[error("no base method found to override")]
    OverrideNotFound { span: Span },

    #[error("overrides a base method but is missing the `override` keyword")]
    MissingOverrideKeyword { span: Span },

    #[error("unsupported construct: {what}")]
    UnsupportedConstruct { what: String, span: Span },

    #[error("`{name}` is already defined in this scope")]
    DuplicateSymbol { name: String, span: Span },

    #[error("cyclic dependency detected while advancing symbol {0:?}")]
    CycleError(SymbolId),

    #[error("compile-time evaluation failed: {message}")]
    CompileTimeEvaluationError { message: String, span: Span },
}

impl SemaError {
    /// The span most relevant to the error, when one exists (`CycleError`
    /// is reported against a symbol rather than a source range; callers
    /// that need a span for it should look up the symbol's own location).
    pub fn span(&self) -> Option<Span> {
        match self {
            SemaError::SyntaxUpstream { span, .. }
            | SemaError::UnresolvedIdentifier { span, .. }
            | SemaError::TypeMismatch { span }
            | SemaError::OverrideNotFound { span }
            | SemaError::MissingOverrideKeyword { span }
            | SemaError::UnsupportedConstruct { span, .. }
            | SemaError::DuplicateSymbol { span, .. }
            | SemaError::CompileTimeEvaluationError { span, .. } => Some(*span),
            SemaError::CycleError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SemaError>;
