//! Memoization tables for generated methods.
//!
//! Each table is a `DashMap` keyed by interned handles. Values are computed
//! outside any lock and published first-writer-wins; since signatures are
//! interned, two threads racing on the same key compute the same handle, so
//! whichever insert lands first is indistinguishable from the other.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use tern_ir::Name;
use tern_types::{Idx, QualifiedType};

use super::GenerationError;
use crate::SigId;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct MethodKey {
    pub ty: Idx,
    pub name: Name,
    pub parenless: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct BinaryOpKey {
    pub lhs: QualifiedType,
    pub rhs: QualifiedType,
    pub name: Name,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct AccessorKey {
    pub ty: Idx,
    pub field: Name,
}

/// Hit/miss counters for one table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TableStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Counters for every generated-method table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct CacheStats {
    pub need: TableStats,
    pub methods: TableStats,
    pub binary_ops: TableStats,
    pub accessors: TableStats,
}

pub(crate) struct Memo<K, V> {
    map: DashMap<K, V, FxBuildHasher>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Eq + Hash + std::fmt::Debug, V: Clone> Memo<K, V> {
    fn new() -> Self {
        Self {
            map: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the stored value for `key`, computing it on first request.
    ///
    /// `compute` runs without any table lock held, so it may query other
    /// keys (or other tables) freely.
    pub(crate) fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(found) = self.map.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(?key, "cache hit");
            return found.value().clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?key, "cache miss");
        let value = compute();
        self.map.entry(key).or_insert(value).value().clone()
    }

    fn stats(&self) -> TableStats {
        TableStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.map.len(),
        }
    }
}

/// Durable result tables for one compilation.
///
/// There is no eviction: results live as long as the owning
/// [`CompilationContext`](crate::CompilationContext).
pub struct GeneratedCache {
    pub(crate) need: Memo<MethodKey, bool>,
    pub(crate) methods: Memo<MethodKey, Result<Option<SigId>, GenerationError>>,
    pub(crate) binary_ops: Memo<BinaryOpKey, Option<SigId>>,
    pub(crate) accessors: Memo<AccessorKey, Option<SigId>>,
}

impl GeneratedCache {
    pub fn new() -> Self {
        Self {
            need: Memo::new(),
            methods: Memo::new(),
            binary_ops: Memo::new(),
            accessors: Memo::new(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            need: self.need.stats(),
            methods: self.methods.stats(),
            binary_ops: self.binary_ops.stats(),
            accessors: self.accessors.stats(),
        }
    }
}

impl Default for GeneratedCache {
    fn default() -> Self {
        Self::new()
    }
}
