//! The parsed AST this pass consumes.
//!
//! Lexing and parsing are out of scope (spec §1 Non-goals); this module
//! defines only the shape of their output that the Declaration Visitor and
//! Symbol Analyzer need. A real parser would hand over a richer CST, but
//! every field here is something the analyzer actually reads.

use sdc_core::{Name, Span};

use crate::attrs::Visibility;
use crate::ty::{Linkage, Type};

#[derive(Debug, Clone)]
pub struct AstModule {
    pub name: Name,
    pub span: Span,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub span: Span,
    pub name: Name,
    pub linkage: Linkage,
    pub visibility: Visibility,
    pub kind: DeclKind,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Function(FunctionDecl),
    Variable(VariableDecl),
    Struct(AggregateDecl),
    Union(AggregateDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Template(TemplateDecl),
    TypeAlias(Type),
    ValueAlias(Box<Expr>),
    SymbolAlias(Name),
    /// `static if (cond) { then } else { otherwise }` — expanded by the
    /// Declaration Visitor, never reaches the Symbol Analyzer.
    StaticIf {
        condition: Box<Expr>,
        then: Vec<Decl>,
        otherwise: Vec<Decl>,
    },
    /// `version (Ident) { then } else { otherwise }`.
    Version {
        ident: Name,
        then: Vec<Decl>,
        otherwise: Vec<Decl>,
    },
}

#[derive(Debug, Clone)]
pub struct Param {
    pub span: Span,
    pub name: Name,
    pub ty: Type,
    pub is_ref: bool,
    pub is_final: bool,
    pub default: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub params: Vec<Param>,
    /// `None` return type means `auto` — inferred from the body.
    pub return_type: Option<Type>,
    pub body: Option<Vec<Stmt>>,
    pub is_constructor: bool,
    /// Whether this function is nested inside another function/aggregate
    /// and may therefore need to close over its enclosing frame.
    pub has_context: bool,
    /// Set when this declaration is a `Method` (member of a `Class`)
    /// rather than a free `Function`; carries whether the user wrote
    /// `override`.
    pub method: Option<MethodAttrs>,
    pub variadic: bool,
    pub ref_return: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct MethodAttrs {
    pub marked_override: bool,
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    /// `None` means `auto`.
    pub ty: Option<Type>,
    pub initializer: Option<Box<Expr>>,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub struct AggregateDecl {
    pub members: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub base: Option<Name>,
    pub members: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub bases: Vec<Name>,
    pub members: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub underlying: Option<Type>,
    pub entries: Vec<EnumEntryDecl>,
}

#[derive(Debug, Clone)]
pub struct EnumEntryDecl {
    pub span: Span,
    pub name: Name,
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct TemplateDecl {
    pub params: Vec<TemplateParamDecl>,
    pub members: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct TemplateParamDecl {
    pub span: Span,
    pub name: Name,
    pub kind: TemplateParamKind,
}

#[derive(Debug, Clone)]
pub enum TemplateParamKind {
    Type { default: Option<Type> },
    Value { ty: Type, default: Option<Box<Expr>> },
    Alias { default: Option<Name> },
    TypedAlias { ty: Type, default: Option<Name> },
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Return(Option<Expr>),
    Declaration(Decl),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(u64),
    BoolLiteral(bool),
    NullLiteral,
    Ident(Name),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Assign(Box<Expr>, Box<Expr>),
    Comma(Box<Expr>, Box<Expr>),
}
