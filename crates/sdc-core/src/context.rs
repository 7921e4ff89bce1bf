//! The `Context` collaborator (spec §6): identifier interning plus source
//! management, threaded through the whole semantic pass.

use crate::interner::{Interner, Name};
use crate::span::{SourceId, SourceMap};

/// Everything the semantic pass needs from its host environment that isn't
/// itself part of the pass: name interning and source file registration.
///
/// Modeled as a trait so `sdc-sema` depends only on the capability, not on
/// a concrete interner/source-map pairing — a host embedding the pass
/// (e.g. behind an incremental build server) can supply its own `Context`
/// backed by whatever storage it already has.
pub trait Context {
    fn intern(&mut self, s: &str) -> Name;
    fn resolve(&self, name: Name) -> &str;
    fn add_source(&mut self, name: &str, content: &str) -> SourceId;
    fn source_name(&self, id: SourceId) -> &str;
    fn source_content(&self, id: SourceId) -> &str;
}

/// Default `Context` implementation: an in-memory interner plus source map.
///
/// Sufficient for embedding the pass directly and for tests; a driver that
/// wants cross-compilation caching or on-disk source maps provides its own
/// `Context` implementation instead.
#[derive(Debug, Clone, Default)]
pub struct SimpleContext {
    interner: Interner,
    sources: SourceMap,
}

impl SimpleContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Context for SimpleContext {
    fn intern(&mut self, s: &str) -> Name {
        self.interner.intern(s)
    }

    fn resolve(&self, name: Name) -> &str {
        self.interner.resolve(name)
    }

    fn add_source(&mut self, name: &str, content: &str) -> SourceId {
        self.sources.add(name, content)
    }

    fn source_name(&self, id: SourceId) -> &str {
        self.sources.name(id)
    }

    fn source_content(&self, id: SourceId) -> &str {
        self.sources.content(id)
    }
}
