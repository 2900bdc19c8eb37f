//! Interned type representation.
//!
//! `TypeData` is what the pool deduplicates. Child types are referenced by
//! [`Idx`], so the structure is flat and cheap to hash.

use tern_ir::{DeclId, Name};

use crate::{Idx, Tag};

/// Structure of one interned type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    // Primitives (fixed indices, see `Idx`)
    Int,
    UInt,
    Real,
    Bool,
    String,
    Nothing,
    AnyIntegral,
    Any,
    RootObject,

    /// Record, class or union with named fields.
    ///
    /// For classes this is the undecorated ("basic") class.
    Composite(CompositeData),

    /// A basic class viewed through a management/nilability decorator,
    /// e.g. `borrowed C` or `owned C?`.
    Class {
        basic: Idx,
        decorator: ClassDecorator,
    },

    /// Tuple `(T1, T2, ...)`.
    Tuple(Box<[Idx]>),

    /// Array over a domain.
    Array { domain: Idx, elt: Idx },

    /// Domain (index set).
    Domain(DomainKind),

    /// Raw C pointer.
    CPtr { elt: Idx },

    /// Enumeration.
    Enum(EnumData),
}

impl TypeData {
    /// The kind tag for this type.
    pub fn tag(&self) -> Tag {
        match self {
            TypeData::Int => Tag::Int,
            TypeData::UInt => Tag::UInt,
            TypeData::Real => Tag::Real,
            TypeData::Bool => Tag::Bool,
            TypeData::String => Tag::String,
            TypeData::Nothing => Tag::Nothing,
            TypeData::AnyIntegral => Tag::AnyIntegral,
            TypeData::Any => Tag::Any,
            TypeData::RootObject => Tag::RootObject,
            TypeData::Composite(data) => match data.kind {
                CompositeKind::Record => Tag::Record,
                CompositeKind::Class => Tag::BasicClass,
                CompositeKind::Union => Tag::Union,
            },
            TypeData::Class { .. } => Tag::Class,
            TypeData::Tuple(_) => Tag::Tuple,
            TypeData::Array { .. } => Tag::Array,
            TypeData::Domain(_) => Tag::Domain,
            TypeData::CPtr { .. } => Tag::CPtr,
            TypeData::Enum(_) => Tag::Enum,
        }
    }
}

/// Which flavor of composite a declaration introduces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompositeKind {
    Record,
    Class,
    Union,
}

/// A record, class or union type, possibly an instantiation of a generic one.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CompositeData {
    pub kind: CompositeKind,
    /// The declaring node.
    pub decl: DeclId,
    pub name: Name,
    /// The fully generic type this one instantiates, if any.
    pub instantiated_from: Option<Idx>,
    /// Field name -> type (or param value type) substitutions.
    pub substitutions: Box<[(Name, Idx)]>,
    /// Parent class (classes only). `None` means the implicit root object.
    pub parent: Option<Idx>,
}

impl CompositeData {
    /// Whether a class has a parent other than the root object.
    pub fn has_nontrivial_parent(&self) -> bool {
        self.parent.is_some_and(|p| p != Idx::ROOT_OBJECT)
    }

    /// Substitution recorded for `field`, if any.
    pub fn substitution(&self, field: Name) -> Option<Idx> {
        self.substitutions
            .iter()
            .find(|(name, _)| *name == field)
            .map(|&(_, ty)| ty)
    }
}

/// Memory management strategy of a decorated class type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Management {
    Borrowed,
    Owned,
    Shared,
    Unmanaged,
}

impl Management {
    pub const fn name(self) -> &'static str {
        match self {
            Management::Borrowed => "borrowed",
            Management::Owned => "owned",
            Management::Shared => "shared",
            Management::Unmanaged => "unmanaged",
        }
    }
}

/// Management + nilability applied to a basic class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDecorator {
    pub management: Management,
    pub nilable: bool,
}

impl ClassDecorator {
    /// `borrowed C` (non-nilable). Used for generated class receivers.
    pub const BORROWED_NONNIL: Self = Self::new(Management::Borrowed, false);
    pub const BORROWED_NILABLE: Self = Self::new(Management::Borrowed, true);
    pub const OWNED_NONNIL: Self = Self::new(Management::Owned, false);
    pub const SHARED_NONNIL: Self = Self::new(Management::Shared, false);
    pub const UNMANAGED_NONNIL: Self = Self::new(Management::Unmanaged, false);

    pub const fn new(management: Management, nilable: bool) -> Self {
        Self {
            management,
            nilable,
        }
    }
}

/// Shape of a domain type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DomainKind {
    Rectangular {
        rank: u8,
        idx_type: Idx,
        strided: bool,
    },
    Associative {
        idx_type: Idx,
        par_safe: bool,
    },
}

impl DomainKind {
    pub const fn idx_type(self) -> Idx {
        match self {
            DomainKind::Rectangular { idx_type, .. } | DomainKind::Associative { idx_type, .. } => {
                idx_type
            }
        }
    }
}

/// One enum constant, with its explicit numeric value if it has one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumConstant {
    pub name: Name,
    pub value: Option<i64>,
}

/// An enum declaration's type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumData {
    pub decl: DeclId,
    pub name: Name,
    pub constants: Box<[EnumConstant]>,
}

impl EnumData {
    /// An abstract enum has no constant with a concrete value, so it has no
    /// integer representation to cast to or from.
    pub fn is_abstract(&self) -> bool {
        self.constants.iter().all(|c| c.value.is_none())
    }
}
