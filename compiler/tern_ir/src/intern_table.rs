//! Sharded deduplicating store.
//!
//! `InternTable<T>` hands out a [`RawId`] for each distinct value and returns
//! the same id for every later value that compares equal. The type pool and
//! the signature pool are both thin typed wrappers around one of these.
//!
//! Each shard sits behind its own `RwLock`: lookups of existing values take
//! the read lock only, inserts re-check under the write lock.
//! [`StringInterner`](crate::StringInterner) is a table of leaked `&str`.

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of shards.
const NUM_SHARDS: usize = 16;

/// Raw handle into an [`InternTable`].
///
/// Layout: 4-bit shard + 28-bit local index. [`Name`](crate::Name) wraps one.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct RawId(u32);

impl RawId {
    /// Maximum local index per shard.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    #[inline]
    pub const fn from_shard_local(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        RawId((shard << 28) | local)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        RawId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }
}

impl fmt::Debug for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawId(shard={}, local={})", self.shard(), self.local())
    }
}

/// Error when interning a value fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternTableError {
    /// Shard exceeded its 28-bit local index space.
    ShardOverflow { shard_idx: usize },
}

impl fmt::Display for InternTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternTableError::ShardOverflow { shard_idx } => write!(
                f,
                "intern table shard {shard_idx} exceeded capacity (max local index 0x{:X})",
                RawId::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternTableError {}

struct Shard<T> {
    map: FxHashMap<T, u32>,
    items: Vec<T>,
}

impl<T> Shard<T> {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            items: Vec::with_capacity(64),
        }
    }
}

/// Sharded interning table.
///
/// # Reserved Entries
/// [`InternTable::with_reserved`] pins a fixed list of values at shard 0,
/// locals `0..n`, so callers can expose them as constants (e.g. primitive
/// type indices). Reserved values always intern to their pinned id.
pub struct InternTable<T> {
    shards: [RwLock<Shard<T>>; NUM_SHARDS],
    reserved: FxHashMap<T, u32>,
    total_count: AtomicUsize,
}

impl<T: Hash + Eq + Clone> InternTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::with_reserved(std::iter::empty())
    }

    /// Create a table whose shard 0 starts with `values` at fixed locals.
    ///
    /// # Panics
    /// Panics if `values` contains duplicates (pinned ids would be ambiguous).
    pub fn with_reserved(values: impl IntoIterator<Item = T>) -> Self {
        let mut shard0 = Shard::new();
        let mut reserved = FxHashMap::default();
        for value in values {
            let local = u32::try_from(shard0.items.len()).unwrap_or(RawId::MAX_LOCAL);
            let previous = reserved.insert(value.clone(), local);
            assert!(previous.is_none(), "duplicate reserved intern table entry");
            shard0.items.push(value);
        }
        let count = shard0.items.len();

        let mut shard0 = Some(shard0);
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(shard0.take().unwrap_or_else(Shard::new))
            } else {
                RwLock::new(Shard::new())
            }
        });

        Self {
            shards,
            reserved,
            total_count: AtomicUsize::new(count),
        }
    }

    #[inline]
    fn shard_for<Q: Hash + ?Sized>(value: &Q) -> usize {
        let mut hasher = FxHasher::default();
        value.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash_usize = hasher.finish() as usize;
        hash_usize % NUM_SHARDS
    }

    /// Id of a value already in the table, without inserting it.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    pub fn find<Q>(&self, value: &Q) -> Option<RawId>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(&local) = self.reserved.get(value) {
            return Some(RawId::from_shard_local(0, local));
        }
        let shard_idx = Self::shard_for(value);
        let local = *self.shards[shard_idx].read().map.get(value)?;
        Some(RawId::from_shard_local(shard_idx as u32, local))
    }

    /// Try to intern a value, returning its id or an error on overflow.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    pub fn try_intern(&self, value: T) -> Result<RawId, InternTableError> {
        if let Some(&local) = self.reserved.get(&value) {
            return Ok(RawId::from_shard_local(0, local));
        }

        let shard_idx = Self::shard_for(&value);
        let shard = &self.shards[shard_idx];

        // Fast path: check if already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&value) {
                return Ok(RawId::from_shard_local(shard_idx as u32, local));
            }
        }

        // Slow path: need to insert
        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(&value) {
            return Ok(RawId::from_shard_local(shard_idx as u32, local));
        }

        let local = u32::try_from(guard.items.len())
            .ok()
            .filter(|&local| local <= RawId::MAX_LOCAL)
            .ok_or(InternTableError::ShardOverflow { shard_idx })?;

        guard.items.push(value.clone());
        guard.map.insert(value, local);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(RawId::from_shard_local(shard_idx as u32, local))
    }

    /// Intern a value, returning its id.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible
    /// interning.
    pub fn intern(&self, value: T) -> RawId {
        self.try_intern(value).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Clone the value behind an id.
    ///
    /// # Panics
    /// Panics if the id was not produced by this table.
    pub fn get(&self, id: RawId) -> T {
        self.shards[id.shard()].read().items[id.local()].clone()
    }

    /// Borrow the value behind an id for the duration of `f`.
    ///
    /// Holds the shard's read lock while `f` runs; `f` must not intern into
    /// the same table.
    pub fn with<R>(&self, id: RawId, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shards[id.shard()].read().items[id.local()])
    }

    /// Number of interned values (reserved entries included).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the table holds nothing beyond its reserved entries.
    pub fn is_empty(&self) -> bool {
        self.len() <= self.reserved.len()
    }
}

impl<T: Hash + Eq + Clone> Default for InternTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
