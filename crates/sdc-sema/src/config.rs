//! Pass configuration (SPEC_FULL.md ambient stack: no process globals —
//! tunables are threaded through `SemanticPass::new` as plain data).

use std::collections::HashSet;
use std::path::PathBuf;

use sdc_core::{Interner, Name};

/// The compile-time predicate set `static if`/`version` blocks are
/// evaluated against (spec §6 "Default versions").
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    active: HashSet<Name>,
}

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, interner: &mut Interner, ident: &str) {
        self.active.insert(interner.intern(ident));
    }

    pub fn contains(&self, ident: Name) -> bool {
        self.active.contains(&ident)
    }

    /// `SDC`, `D_LP64`, `X86_64`, `Posix`, plus a host-OS tag (spec §6).
    pub fn default_for_host(interner: &mut Interner, host_os: &str) -> Self {
        let mut set = Self::new();
        for tag in ["SDC", "D_LP64", "X86_64", "Posix"] {
            set.insert(interner, tag);
        }
        set.insert(interner, host_os);
        set
    }
}

#[derive(Debug, Clone)]
pub struct SemaConfig {
    /// Filesystem search path for imported modules — owned by the
    /// out-of-scope `Parser` collaborator, but plumbed through here since
    /// spec §6 names it as a `SemanticPass::new` constructor parameter.
    pub include_paths: Vec<PathBuf>,
    pub versions: VersionSet,
    /// Guards against a runaway recursive template instantiation; not
    /// named explicitly in spec.md but implied by any real implementation
    /// of IFTI (spec §4.3 "Template").
    pub max_template_depth: usize,
}

impl SemaConfig {
    pub fn new(interner: &mut Interner, host_os: &str) -> Self {
        Self {
            include_paths: Vec::new(),
            versions: VersionSet::default_for_host(interner, host_os),
            max_template_depth: 256,
        }
    }
}
