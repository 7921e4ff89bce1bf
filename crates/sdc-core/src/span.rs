//! Source location plumbing.
//!
//! Stands in for the out-of-scope file/position source manager: the
//! semantic pass only ever needs to tag a symbol or diagnostic with "this
//! file, this byte range", never to re-read source text.

/// Identifies a registered source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// A byte range within a registered source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Span {
    pub source: SourceIdOrNone,
    pub start: u32,
    pub end: u32,
}

/// `SourceId` with a distinguished "no real source" value for synthesized
/// symbols (e.g. the implicit `object` import, the `_Dmain` bootstrap).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SourceIdOrNone(Option<SourceId>);

impl From<SourceId> for SourceIdOrNone {
    fn from(id: SourceId) -> Self {
        Self(Some(id))
    }
}

impl SourceIdOrNone {
    pub const NONE: Self = Self(None);

    pub fn get(self) -> Option<SourceId> {
        self.0
    }
}

impl Span {
    pub fn new(source: SourceId, start: u32, end: u32) -> Self {
        Self {
            source: source.into(),
            start,
            end,
        }
    }

    /// A span for a symbol that has no location in user source (builtins,
    /// compiler-synthesized bootstrap code).
    pub fn synthetic() -> Self {
        Self {
            source: SourceIdOrNone::NONE,
            start: 0,
            end: 0,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.source.get().is_none()
    }
}

/// A registered source file's name and content, keyed by `SourceId`.
///
/// This is a minimal stand-in for the out-of-scope source manager: real
/// file reading, line/column mapping, and diagnostics rendering belong to
/// the driver, not to this pass.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

#[derive(Debug, Clone)]
struct SourceFile {
    name: String,
    content: String,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> SourceId {
        let id = SourceId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile {
            name: name.into(),
            content: content.into(),
        });
        id
    }

    pub fn name(&self, id: SourceId) -> &str {
        &self.files[id.as_u32() as usize].name
    }

    pub fn content(&self, id: SourceId) -> &str {
        &self.files[id.as_u32() as usize].content
    }
}
