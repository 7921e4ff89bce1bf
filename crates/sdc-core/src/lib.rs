//! Core data structures shared by the SDC semantic pass.
//!
//! - `interner` — identifier interning (`Name`)
//! - `span` — source file registration and byte-range spans
//! - `context` — the `Context` collaborator the pass is built on top of

pub mod context;
pub mod interner;
pub mod span;

pub use context::{Context, SimpleContext};
pub use interner::{Interner, Name};
pub use span::{SourceId, SourceMap, SourceIdOrNone, Span};
