//! Function signatures.
//!
//! An [`UntypedFnSignature`] is the shape of a function as written (name,
//! formals, flags); a [`TypedFnSignature`] adds a resolved qualified type
//! per formal. Both are interned in the [`SignaturePool`], so two requests
//! that build the same signature get the same [`SigId`].

mod pool;

use std::fmt;

use smallvec::SmallVec;
use tern_ir::{DeclId, DeclTag, Name, RawId};
use tern_types::QualifiedType;

pub use pool::SignaturePool;

/// Handle to an interned [`UntypedFnSignature`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct UntypedSigId(u32);

/// Handle to an interned [`TypedFnSignature`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SigId(u32);

macro_rules! sig_handle {
    ($ty:ident) => {
        impl $ty {
            #[inline]
            pub(crate) const fn from_raw_id(id: RawId) -> Self {
                Self(id.raw())
            }

            #[inline]
            pub(crate) const fn raw_id(self) -> RawId {
                RawId::from_raw(self.0)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($ty), "({:#x})"), self.0)
            }
        }
    };
}

sig_handle!(UntypedSigId);
sig_handle!(SigId);

/// Procedure or operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FnKind {
    Proc,
    Operator,
}

impl FnKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            FnKind::Proc => "proc",
            FnKind::Operator => "operator",
        }
    }
}

/// Result of evaluating a where clause.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum WhereClause {
    /// No where clause.
    None,
    True,
    False,
}

/// Per-formal untyped information.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FormalDetail {
    pub name: Name,
    pub has_default: bool,
    /// The formal's declaration; `NONE` for generated formals with no
    /// source counterpart.
    pub decl: DeclId,
}

impl FormalDetail {
    pub const fn new(name: Name, has_default: bool, decl: DeclId) -> Self {
        Self {
            name,
            has_default,
            decl,
        }
    }
}

pub type Formals<T> = SmallVec<[T; 4]>;

/// A function's name and shape.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct UntypedFnSignature {
    /// Declaration the signature belongs to (the type, field or enum for
    /// generated methods; `NONE` for builtin type families).
    pub id: DeclId,
    pub name: Name,
    pub is_method: bool,
    pub is_type_constructor: bool,
    pub is_compiler_generated: bool,
    pub throws: bool,
    /// Kind of the node `id` refers to.
    pub id_tag: DeclTag,
    pub kind: FnKind,
    pub formals: Formals<FormalDetail>,
}

/// An untyped signature with a resolved type per formal.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypedFnSignature {
    pub untyped: UntypedSigId,
    /// One entry per formal, in formal order.
    pub formal_types: Formals<QualifiedType>,
    pub where_clause: WhereClause,
    /// Some formal is generic; calls must instantiate the signature.
    pub needs_instantiation: bool,
    pub instantiated_from: Option<SigId>,
    /// Enclosing function for nested functions.
    pub parent_fn: Option<SigId>,
    /// Which formals were instantiated (empty unless `instantiated_from`).
    pub formals_instantiated: Formals<bool>,
}

impl TypedFnSignature {
    pub fn formal_type(&self, i: usize) -> Option<QualifiedType> {
        self.formal_types.get(i).copied()
    }
}
