//! Interned identifiers.

use std::fmt;

use crate::RawId;

/// An identifier interned by a [`StringInterner`](crate::StringInterner).
///
/// A typed [`RawId`] into the interner's table: equal strings share one
/// `Name`, so comparing names never touches string data.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(RawId);

impl Name {
    /// The empty string, pinned first in every interner.
    pub const EMPTY: Name = Name(RawId::from_raw(0));

    #[inline]
    pub(crate) const fn from_raw_id(id: RawId) -> Self {
        Name(id)
    }

    #[inline]
    pub(crate) const fn raw_id(self) -> RawId {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.0.shard(), self.0.local())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
