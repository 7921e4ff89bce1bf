//! The `DataLayout` collaborator (spec §6): sizes and alignments of
//! resolved types, consumed by initializer construction and VRP sizing.
//! Out of scope as a full target-specific layout engine; this models the
//! default `D_LP64` target (spec §6 "Default versions") closely enough to
//! size builtins, pointers, and aggregates consistently.

use crate::symbol::SymbolTable;
use crate::ty::{BuiltinType, Type};

pub trait DataLayout {
    fn size_of(&self, ty: &Type) -> u64;
    fn align_of(&self, ty: &Type) -> u64;
}

/// LP64: `long`/pointer/slice are 8 bytes; everything else sizes directly
/// from its bit width.
#[derive(Debug, Default)]
pub struct Lp64Layout;

impl Lp64Layout {
    fn builtin_size(b: BuiltinType) -> u64 {
        match b.bit_width() {
            0 => 0,
            width => (width as u64).div_ceil(8),
        }
    }
}

impl DataLayout for Lp64Layout {
    fn size_of(&self, ty: &Type) -> u64 {
        match ty {
            Type::Builtin(b) => Self::builtin_size(*b),
            Type::Pointer(..) | Type::Function(_) | Type::Context(_) => 8,
            Type::Slice(_) => 16, // length + pointer, D ABI convention
            Type::Array(inner, len) => self.size_of(inner) * len,
            // A full aggregate layout needs the symbol table's field list
            // (out of scope here — see `AggregateLayout` below for the
            // piece this crate *does* own); a bare pointer-sized handle
            // is the conservative placeholder.
            Type::Aggregate(_) => 8,
        }
    }

    fn align_of(&self, ty: &Type) -> u64 {
        match ty {
            Type::Builtin(b) => Self::builtin_size(*b).max(1),
            Type::Pointer(..) | Type::Function(_) | Type::Context(_) | Type::Slice(_) => 8,
            Type::Array(inner, _) => self.align_of(inner),
            Type::Aggregate(_) => 8,
        }
    }
}

/// Sums an aggregate's own field list, which this crate does own (spec
/// §4.3 "Struct / Union"), into a size/alignment pair. Kept separate from
/// `Lp64Layout` since it needs the symbol table to walk field types.
pub fn aggregate_size(layout: &dyn DataLayout, symbols: &SymbolTable, fields: &[crate::ids::SymbolId]) -> u64 {
    let mut offset = 0u64;
    for &field in fields {
        let Some(ty) = &symbols.get(field).ty else {
            continue;
        };
        let align = layout.align_of(ty).max(1);
        offset = offset.div_ceil(align) * align;
        offset += layout.size_of(ty);
    }
    offset
}
