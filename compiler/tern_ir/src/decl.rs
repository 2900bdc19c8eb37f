//! Declaration handles.
//!
//! A `DeclId` names one declaration (module, composite type, field, enum,
//! function) in the declaration database. Generated signatures point back
//! at the declaration they were synthesized for through a `DeclId` plus a
//! `DeclTag` describing what kind of node it is.

use std::fmt;

/// Handle to a declaration.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    /// Sentinel for "no declaration" (builtin type families).
    pub const NONE: DeclId = DeclId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        DeclId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for DeclId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "DeclId::NONE")
        } else {
            write!(f, "DeclId({})", self.0)
        }
    }
}

/// What kind of node a declaration (or generated signature anchor) is.
///
/// The last four variants tag signatures generated for builtin type
/// families, which have no user declaration to point at.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclTag {
    Module,
    Record,
    Class,
    Union,
    Enum,
    Field,
    Function,
    Tuple,
    Domain,
    Array,
    CPtr,
}

impl DeclTag {
    /// Human-readable name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            DeclTag::Module => "module",
            DeclTag::Record => "record",
            DeclTag::Class => "class",
            DeclTag::Union => "union",
            DeclTag::Enum => "enum",
            DeclTag::Field => "field",
            DeclTag::Function => "function",
            DeclTag::Tuple => "tuple",
            DeclTag::Domain => "domain",
            DeclTag::Array => "array",
            DeclTag::CPtr => "c_ptr",
        }
    }

    /// Composite declarations own a scope and a field list.
    pub const fn is_composite(self) -> bool {
        matches!(self, DeclTag::Record | DeclTag::Class | DeclTag::Union)
    }
}

impl fmt::Display for DeclTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
