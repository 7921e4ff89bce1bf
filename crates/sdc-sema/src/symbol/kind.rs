//! Per-variant payloads hung off `Symbol::kind` (spec §3).
//!
//! One variant per declaration kind the Declaration Visitor can stub out.
//! Keeping the payloads as separate structs (rather than inlining every
//! field into the enum arms) lets analyze routines borrow just the part of
//! the symbol they mutate.

use sdc_core::Name;

use crate::ast::TemplateParamKind;
use crate::ids::SymbolId;
use crate::ty::{ParamType, Type};
use crate::value::ConstValue;

#[derive(Debug, Clone)]
pub enum SymbolKind {
    Module {
        is_package: bool,
    },
    Function(FunctionPayload),
    Method(FunctionPayload, MethodSlot),
    Variable(VariablePayload),
    Field(VariablePayload),
    Struct {
        init: Option<SymbolId>,
    },
    Union {
        init: Option<SymbolId>,
    },
    Class(ClassPayload),
    Interface(InterfacePayload),
    Enum(EnumPayload),
    Template(TemplatePayload),
    TemplateInstance(TemplateInstancePayload),
    TypeAlias(Option<Type>),
    ValueAlias(Option<ConstValue>),
    SymbolAlias(AliasPayload),
    OverloadSet {
        members: Vec<SymbolId>,
    },
    TypeTemplateParameter(TemplateParamPayload),
    ValueTemplateParameter(TemplateParamPayload),
    AliasTemplateParameter(TemplateParamPayload),
    TypedAliasTemplateParameter(TemplateParamPayload),
}

/// Method-only bookkeeping: vtable slot assignment (spec §4.3 "Class").
/// `index == 0` with `introduced == false` is the "not yet decided" state
/// the Declaration Visitor leaves behind; override resolution fills it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSlot {
    pub vtable_index: u32,
    pub marked_override: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionPayload {
    pub params: Vec<ParamType>,
    pub return_type: Option<Type>,
    /// Prepended `this` parameter for constructors, or `__ctx` for
    /// closures — tracked separately from `params` since it isn't part of
    /// the user-written parameter list the IFTI hint matches against.
    pub is_constructor: bool,
    pub variadic: bool,
    /// `ref` return (spec §4.3 "Function"): the callee returns an lvalue
    /// reference rather than a value, which override resolution must match
    /// exactly — a non-`ref` override can't satisfy a `ref`-returning slot.
    pub ref_return: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VariablePayload {
    pub initializer: Option<ConstValue>,
    /// Present only once the initializer has been compile-time evaluated
    /// (global/static storage, or enum-storage constants); local variables
    /// of non-const type keep this `None` even once analyzed.
    pub is_static: bool,
    /// Field offset within its owning aggregate's field list, one past the
    /// highest index inherited from a base class (spec §3 invariant).
    /// `None` for anything that isn't a field (plain variables, params).
    pub field_index: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassPayload {
    pub base: Option<SymbolId>,
    pub fields: Vec<SymbolId>,
    pub methods: Vec<SymbolId>,
    /// First unused field index for a derived class, one past the
    /// highest inherited field index (spec §3 invariant).
    pub next_field_index: u32,
}

#[derive(Debug, Clone, Default)]
pub struct InterfacePayload {
    pub bases: Vec<SymbolId>,
}

#[derive(Debug, Clone, Default)]
pub struct EnumPayload {
    pub underlying: Option<Type>,
    pub entries: Vec<EnumEntry>,
}

#[derive(Debug, Clone)]
pub struct EnumEntry {
    pub symbol: SymbolId,
    pub value: Option<ConstValue>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplatePayload {
    pub params: Vec<SymbolId>,
    /// IFTI hint: the first same-named member function's parameter
    /// shape, cached for implicit instantiation from a call site
    /// (spec §4.3 "Template"; SPEC_FULL.md supplemented feature).
    pub ifti_hint: Option<Vec<ParamType>>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateInstancePayload {
    pub template: Option<SymbolId>,
    pub arguments: Vec<SymbolId>,
    pub enclosing_context: Option<SymbolId>,
}

#[derive(Debug, Clone)]
pub struct AliasPayload {
    pub target: Option<SymbolId>,
}

#[derive(Debug, Clone)]
pub struct TemplateParamPayload {
    pub name: Name,
    pub kind: TemplateParamKind,
    pub bound_type: Option<Type>,
    pub bound_value: Option<ConstValue>,
    pub bound_symbol: Option<SymbolId>,
}
