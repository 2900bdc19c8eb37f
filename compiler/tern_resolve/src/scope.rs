//! Scopes for declaration lookup.
//!
//! Scopes form a tree: a module scope holds module-level declarations
//! (types, standalone operators, methods declared outside their type), and
//! each composite type has a body scope whose parent is its module. Lookup
//! walks parent pointers but never leaves the innermost enclosing module.

use std::fmt;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tern_ir::{DeclId, Name};

/// Unique identifier for a scope.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn new(id: u32) -> Self {
        ScopeId(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

bitflags! {
    /// What a scoped lookup considers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct LookupConfig: u8 {
        /// Non-method declarations.
        const DECLS = 1 << 0;
        /// Continue into parent scopes, up to the enclosing module.
        const PARENTS = 1 << 1;
        /// Method declarations.
        const METHODS = 1 << 2;
    }
}

/// What introduced a scope.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    Module,
    /// Body of a record, class or union.
    Composite,
}

#[derive(Copy, Clone, Debug)]
struct ScopeEntry {
    decl: DeclId,
    is_method: bool,
}

#[derive(Clone, Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    entries: FxHashMap<Name, SmallVec<[ScopeEntry; 2]>>,
}

/// All scopes of a program.
///
/// Scopes are stored in a flat vector and navigated via parent pointers.
#[derive(Clone, Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope under `parent` (`None` for a top-level module).
    #[expect(
        clippy::cast_possible_truncation,
        reason = "scope count never approaches u32::MAX"
    )]
    pub fn push(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId::new(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            parent,
            kind,
            entries: FxHashMap::default(),
        });
        id
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.index()).and_then(|s| s.parent)
    }

    pub fn kind(&self, scope: ScopeId) -> Option<ScopeKind> {
        self.scopes.get(scope.index()).map(|s| s.kind)
    }

    /// Declare `name` in `scope`. Overloads accumulate in declaration
    /// order.
    pub fn declare(&mut self, scope: ScopeId, name: Name, decl: DeclId, is_method: bool) {
        if let Some(data) = self.scopes.get_mut(scope.index()) {
            data.entries
                .entry(name)
                .or_default()
                .push(ScopeEntry { decl, is_method });
        }
    }

    /// Find the declarations named `name` visible from `scope`.
    ///
    /// Results are ordered innermost scope first, declaration order within
    /// a scope.
    pub fn lookup(
        &self,
        scope: ScopeId,
        name: Name,
        config: LookupConfig,
    ) -> SmallVec<[DeclId; 4]> {
        let mut found = SmallVec::new();
        let mut current = Some(scope);

        while let Some(id) = current {
            let Some(data) = self.scopes.get(id.index()) else {
                break;
            };
            if let Some(entries) = data.entries.get(&name) {
                found.extend(
                    entries
                        .iter()
                        .filter(|e| {
                            if e.is_method {
                                config.contains(LookupConfig::METHODS)
                            } else {
                                config.contains(LookupConfig::DECLS)
                            }
                        })
                        .map(|e| e.decl),
                );
            }

            if !config.contains(LookupConfig::PARENTS) || data.kind == ScopeKind::Module {
                break;
            }
            current = data.parent;
        }

        found
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
