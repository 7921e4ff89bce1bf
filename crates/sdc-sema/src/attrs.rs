//! Attributes common to every symbol (spec §3).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Package,
}

/// Where a variable/field's storage lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// A stack local or parameter.
    Local,
    /// Captured into an enclosing closure's context frame.
    Capture,
    /// A single process-wide instance (`static`/global).
    Static,
    /// An enum entry: its "value" is a compile-time constant, not a slot.
    Enum,
}
