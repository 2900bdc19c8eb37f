//! Type index handle.
//!
//! `Idx` is the canonical type representation. All types live in a
//! [`TypePool`](crate::TypePool) and are referenced by their 32-bit index.
//!
//! - Primitive types have fixed indices for O(1) access
//! - Type equality is O(1) index comparison

use std::fmt;
use tern_ir::RawId;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (shard 0, locals 0-8) ===
    // Pre-interned at pool creation.

    /// The default-width signed integer.
    pub const INT: Self = Self(0);
    /// The default-width unsigned integer.
    pub const UINT: Self = Self(1);
    /// The default-width real.
    pub const REAL: Self = Self(2);
    /// The `bool` type.
    pub const BOOL: Self = Self(3);
    /// The `string` type.
    pub const STRING: Self = Self(4);
    /// The `nothing` type (no value).
    pub const NOTHING: Self = Self(5);
    /// The abstract "any integral" type (generic).
    pub const INTEGRAL: Self = Self(6);
    /// The fully generic "any type" placeholder for unresolved fields.
    pub const ANY: Self = Self(7);
    /// The implicit root of every class hierarchy.
    pub const ROOT_OBJECT: Self = Self(8);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 9;

    /// Sentinel value indicating no type / invalid index.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn from_raw_id(id: RawId) -> Self {
        Self(id.raw())
    }

    #[inline]
    pub(crate) const fn raw_id(self) -> RawId {
        RawId::from_raw(self.0)
    }

    /// Check if this is a pre-interned primitive type.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Name of a primitive type, `None` for pool-allocated types.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("int"),
            1 => Some("uint"),
            2 => Some("real"),
            3 => Some("bool"),
            4 => Some("string"),
            5 => Some("nothing"),
            6 => Some("integral"),
            7 => Some("?"),
            8 => Some("RootObject"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "Idx::NONE");
        }
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}
