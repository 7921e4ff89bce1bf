//! Name mangler: produces the external ABI-visible name for a symbol or
//! type (spec §4.5).
//!
//! Mirrors the D ABI mangling scheme closely enough to satisfy the spec's
//! contract (`mangle(T1) == mangle(T2) ⇔ T1, T2` structurally identical)
//! without claiming full D compatibility — aggregate tags, length-prefixed
//! identifiers, and nested-scope prefixes all behave the way the real ABI
//! does.

use sdc_core::{Interner, Name};

use crate::symbol::{Symbol, SymbolKind, SymbolTable};
use crate::ty::{FunctionType, Type};

/// Aggregate tag letters (spec §4.5).
pub const TAG_STRUCT_OR_UNION: char = 'S';
pub const TAG_CLASS: char = 'C';
pub const TAG_INTERFACE: char = 'I';
pub const TAG_ENUM: char = 'E';

/// Length-prefix a single identifier: `<len><name>`, the atomic unit every
/// mangled path is built from.
pub fn mangle_identifier(interner: &Interner, name: Name) -> String {
    let s = interner.resolve(name);
    format!("{}{}", s.len(), s)
}

/// Append an identifier onto an accumulated mangle prefix (spec §4.3
/// "Function / Method", step 3: "Set mangle prefix by appending
/// `<len><name>`").
pub fn extend_prefix(prefix: &str, interner: &Interner, name: Name) -> String {
    let mut out = String::with_capacity(prefix.len() + 8);
    out.push_str(prefix);
    out.push_str(&mangle_identifier(interner, name));
    out
}

/// The tag byte for an aggregate's own mangled name, from its `SymbolKind`.
pub fn aggregate_tag(kind: &SymbolKind) -> char {
    match kind {
        SymbolKind::Struct { .. } | SymbolKind::Union { .. } => TAG_STRUCT_OR_UNION,
        SymbolKind::Class(_) => TAG_CLASS,
        SymbolKind::Interface(_) => TAG_INTERFACE,
        SymbolKind::Enum(_) => TAG_ENUM,
        other => unreachable!("aggregate_tag called on non-aggregate symbol kind {other:?}"),
    }
}

/// Mangle a type (spec §4.5, §4.3 function mangling). Aggregate and
/// context types are assumed to already have their own `mangle` assigned
/// (aggregates mangle no later than `Signed`, same as every other
/// symbol), so this recurses into the symbol table rather than
/// recomputing their tag+name from scratch.
pub fn mangle_type(interner: &Interner, symbols: &SymbolTable, ty: &Type) -> String {
    match ty {
        Type::Builtin(b) => b.mangle_code().to_string(),
        Type::Pointer(inner, _) => format!("P{}", mangle_type(interner, symbols, inner)),
        Type::Slice(inner) => format!("A{}", mangle_type(interner, symbols, inner)),
        Type::Array(inner, len) => format!("G{}{}", len, mangle_type(interner, symbols, inner)),
        Type::Function(ft) => mangle_function_type(interner, symbols, ft),
        Type::Aggregate(sym) | Type::Context(sym) => resolve_aggregate_mangle(interner, symbols, *sym),
    }
}

fn resolve_aggregate_mangle(interner: &Interner, symbols: &SymbolTable, sym: crate::ids::SymbolId) -> String {
    let symbol = symbols.get(sym);
    match symbol.mangle {
        Some(m) => interner.resolve(m).to_string(),
        // An aggregate referenced before it reached `Signed`: fall back to
        // its bare tagged identifier. Callers that need the fully
        // qualified mangle should `require` the aggregate to `Signed`
        // first; this only protects against a forward reference inside a
        // recursive type (spec §8 scenario 6).
        None => format!("{}{}", aggregate_tag(&symbol.kind), mangle_identifier(interner, symbol.name)),
    }
}

/// `F<params>Z<return>` — the D convention for function type mangling.
pub fn mangle_function_type(interner: &Interner, symbols: &SymbolTable, ft: &FunctionType) -> String {
    let mut out = String::from("F");
    for p in &ft.params {
        if p.is_ref {
            out.push('K');
        }
        out.push_str(&mangle_type(interner, symbols, &p.ty));
    }
    if ft.variadic {
        out.push('Y');
    }
    out.push('Z');
    out.push_str(&mangle_type(interner, symbols, &ft.return_type));
    out
}

/// Finalize a `D`-linkage symbol's mangle: `_D` + accumulated prefix +
/// type mangle.
pub fn finalize_d_mangle(prefix: &str, type_mangle: &str) -> String {
    format!("_D{prefix}{type_mangle}")
}

/// `C`-linkage symbols mangle to their bare unqualified name (spec §4.3).
pub fn finalize_c_mangle(interner: &Interner, name: Name) -> String {
    interner.resolve(name).to_string()
}

/// Convenience used by aggregate analyze routines: `<tag><len><name>`
/// nested under an enclosing prefix, e.g. a struct `Foo` at module scope
/// mangles to `S3Foo`.
pub fn mangle_aggregate_name(prefix: &str, tag: char, interner: &Interner, symbol: &Symbol) -> String {
    let mut out = String::new();
    out.push_str(prefix);
    out.push(tag);
    out.push_str(&mangle_identifier(interner, symbol.name));
    out
}
