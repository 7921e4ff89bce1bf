//! The type model (spec §3, `Type`).

mod builtin;

pub use builtin::BuiltinType;

use crate::ids::SymbolId;

/// Mutability qualifier on a pointer/reference target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Mutable,
    Const,
    Immutable,
    Shared,
}

/// External linkage a declaration is mangled/called under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    D,
    C,
    Cpp,
    Windows,
}

/// A function or method's signature, independent of which symbol owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub params: Vec<ParamType>,
    pub return_type: Box<Type>,
    pub variadic: bool,
    pub linkage: Linkage,
}

/// A parameter's type plus the calling-convention flags that affect
/// override matching (spec §4.3 "Class", override resolution) and codegen
/// (out of scope here, but the flags still need to round-trip through the
/// IR for the downstream collaborator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamType {
    pub ty: Type,
    pub is_ref: bool,
    pub is_final: bool,
}

impl ParamType {
    pub fn by_value(ty: Type) -> Self {
        Self {
            ty,
            is_ref: false,
            is_final: false,
        }
    }
}

/// The type of a resolved expression or declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Builtin(BuiltinType),
    Pointer(Box<Type>, Qualifier),
    Slice(Box<Type>),
    Array(Box<Type>, u64),
    Function(FunctionType),
    /// Reference to the `Struct`/`Union`/`Class`/`Interface`/`Enum` symbol
    /// that defines this aggregate's layout.
    Aggregate(SymbolId),
    /// The closure context type of a nested function/aggregate: a pointer
    /// to the enclosing function's frame.
    Context(SymbolId),
}

impl Type {
    pub fn void() -> Self {
        Type::Builtin(BuiltinType::Void)
    }

    pub fn auto() -> Self {
        Type::Builtin(BuiltinType::None)
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Type::Builtin(BuiltinType::None))
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Builtin(b) if b.is_integral())
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Builtin(BuiltinType::Bool))
    }

    /// Whether this is one of the "pointer-ABI" types VRP treats as
    /// full-width opaque handles (spec §4.4, `getMask`): raw pointers,
    /// slices, function pointers, and aggregate/context references all
    /// behave like a pointer for masking purposes.
    pub fn is_pointer_abi(&self) -> bool {
        matches!(
            self,
            Type::Pointer(..) | Type::Slice(_) | Type::Function(_) | Type::Aggregate(_) | Type::Context(_)
        )
    }
}
