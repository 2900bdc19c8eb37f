//! Type kind tag for cheap kind tests.
//!
//! Each type in the pool has a `Tag` identifying its kind without cloning
//! its payload. Used for kind predicates and for log fields.

use std::fmt;

/// Type kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Tag {
    // === Primitives ===
    Int,
    UInt,
    Real,
    Bool,
    String,
    Nothing,
    AnyIntegral,
    Any,
    RootObject,

    // === Composites ===
    Record,
    /// Undecorated class.
    BasicClass,
    Union,
    /// Decorated class (`borrowed C`, `owned C?`, ...).
    Class,

    // === Builtin families ===
    Tuple,
    Array,
    Domain,
    CPtr,
    Enum,
}

impl Tag {
    /// Record, class (basic or decorated) or union.
    #[inline]
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            Tag::Record | Tag::BasicClass | Tag::Union | Tag::Class
        )
    }

    #[inline]
    pub const fn is_class(self) -> bool {
        matches!(self, Tag::BasicClass | Tag::Class)
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) <= (Tag::RootObject as u8)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tag::Int => "int",
            Tag::UInt => "uint",
            Tag::Real => "real",
            Tag::Bool => "bool",
            Tag::String => "string",
            Tag::Nothing => "nothing",
            Tag::AnyIntegral => "integral",
            Tag::Any => "any",
            Tag::RootObject => "RootObject",
            Tag::Record => "record",
            Tag::BasicClass => "class",
            Tag::Union => "union",
            Tag::Class => "decorated class",
            Tag::Tuple => "tuple",
            Tag::Array => "array",
            Tag::Domain => "domain",
            Tag::CPtr => "c_ptr",
            Tag::Enum => "enum",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
