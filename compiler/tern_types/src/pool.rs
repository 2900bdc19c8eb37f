//! Type pool: interned storage for every type in a compilation.
//!
//! A thin typed wrapper around [`InternTable<TypeData>`]. Structurally equal
//! types intern to the same [`Idx`], so type equality is index equality and
//! generated signatures that mention the same types compare equal.
//!
//! The pool takes `&self` everywhere; interning is internally synchronized,
//! so a single pool can be shared across resolution threads.

mod construct;
mod format;

use std::sync::Arc;

use tern_ir::{DeclId, InternTable};

use crate::{CompositeData, EnumData, Idx, Tag, TypeData};

/// Interned type storage.
pub struct TypePool {
    table: InternTable<TypeData>,
}

impl TypePool {
    /// Create a pool with the primitive types pre-interned at their fixed
    /// [`Idx`] constants.
    pub fn new() -> Self {
        // Order must match the `Idx` primitive constants.
        let table = InternTable::with_reserved([
            TypeData::Int,
            TypeData::UInt,
            TypeData::Real,
            TypeData::Bool,
            TypeData::String,
            TypeData::Nothing,
            TypeData::AnyIntegral,
            TypeData::Any,
            TypeData::RootObject,
        ]);
        Self { table }
    }

    /// Intern a type, returning its index.
    pub fn intern(&self, data: TypeData) -> Idx {
        Idx::from_raw_id(self.table.intern(data))
    }

    /// Clone the structure behind an index.
    pub fn lookup(&self, idx: Idx) -> TypeData {
        self.table.get(idx.raw_id())
    }

    /// Inspect the structure behind an index without cloning it.
    ///
    /// `f` runs under the owning shard's read lock and must not intern.
    pub fn with<R>(&self, idx: Idx, f: impl FnOnce(&TypeData) -> R) -> R {
        self.table.with(idx.raw_id(), f)
    }

    /// Kind tag of a type.
    pub fn tag(&self, idx: Idx) -> Tag {
        self.with(idx, TypeData::tag)
    }

    /// Number of interned types, primitives included.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if nothing beyond the primitives has been interned.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    // === Kind predicates ===

    pub fn is_record(&self, idx: Idx) -> bool {
        self.tag(idx) == Tag::Record
    }

    /// Basic or decorated class.
    pub fn is_class(&self, idx: Idx) -> bool {
        self.tag(idx).is_class()
    }

    pub fn is_composite(&self, idx: Idx) -> bool {
        self.tag(idx).is_composite()
    }

    pub fn is_array(&self, idx: Idx) -> bool {
        self.tag(idx) == Tag::Array
    }

    pub fn is_enum(&self, idx: Idx) -> bool {
        self.tag(idx) == Tag::Enum
    }

    // === Structure queries ===

    /// Composite payload of a record, basic class or union.
    ///
    /// Returns `None` for decorated classes; see [`Self::composite_of`].
    pub fn composite(&self, idx: Idx) -> Option<CompositeData> {
        self.with(idx, |data| match data {
            TypeData::Composite(c) => Some(c.clone()),
            _ => None,
        })
    }

    /// Composite payload, looking through a class decorator.
    pub fn composite_of(&self, idx: Idx) -> Option<CompositeData> {
        let basic = self.basic_class(idx).unwrap_or(idx);
        self.composite(basic)
    }

    /// The undecorated class behind a basic or decorated class type.
    pub fn basic_class(&self, idx: Idx) -> Option<Idx> {
        self.with(idx, |data| match data {
            TypeData::Class { basic, .. } => Some(*basic),
            TypeData::Composite(c) if c.kind == crate::CompositeKind::Class => Some(idx),
            _ => None,
        })
    }

    /// Strip instantiation: the generic composite `idx` was instantiated
    /// from, or `idx` itself.
    ///
    /// Only undecorated composites carry instantiation info; everything
    /// else is returned unchanged.
    pub fn generic_root(&self, idx: Idx) -> Idx {
        self.with(idx, |data| match data {
            TypeData::Composite(c) => c.instantiated_from.unwrap_or(idx),
            _ => idx,
        })
    }

    /// Declaration behind a composite (through decorators) or enum type.
    pub fn decl_of(&self, idx: Idx) -> Option<DeclId> {
        let basic = self.basic_class(idx).unwrap_or(idx);
        self.with(basic, |data| match data {
            TypeData::Composite(c) => Some(c.decl),
            TypeData::Enum(e) => Some(e.decl),
            _ => None,
        })
    }

    pub fn enum_data(&self, idx: Idx) -> Option<EnumData> {
        self.with(idx, |data| match data {
            TypeData::Enum(e) => Some(e.clone()),
            _ => None,
        })
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypePool")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Clonable handle to a [`TypePool`] shared across threads.
#[derive(Clone, Debug, Default)]
pub struct SharedTypePool(Arc<TypePool>);

impl SharedTypePool {
    pub fn new() -> Self {
        Self(Arc::new(TypePool::new()))
    }
}

impl std::ops::Deref for SharedTypePool {
    type Target = TypePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
