//! Qualified types: a calling-convention kind paired with a type.

use std::fmt;

use crate::Idx;

/// How a value is bound to a formal, variable or receiver.
///
/// Mixes storage kinds (`Var`, `Type`, `Param`) with argument intents
/// (`Ref`, `In`, ...); a formal's kind after intent resolution is one of
/// these.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum QualKind {
    /// Unresolved default intent; resolved per type when a signature is
    /// first resolved.
    DefaultIntent,
    Var,
    ConstVar,
    Ref,
    ConstRef,
    /// `ref` or `const ref` depending on whether the body modifies it.
    RefMaybeConst,
    In,
    ConstIn,
    /// A type (e.g. a `type` field or formal).
    Type,
    /// A compile-time constant.
    Param,
}

impl QualKind {
    #[inline]
    pub const fn is_type(self) -> bool {
        matches!(self, QualKind::Type)
    }

    #[inline]
    pub const fn is_param(self) -> bool {
        matches!(self, QualKind::Param)
    }

    /// `Type` or `Param`: kinds a field keeps when it becomes an
    /// initializer formal.
    #[inline]
    pub const fn is_type_or_param(self) -> bool {
        matches!(self, QualKind::Type | QualKind::Param)
    }

    /// Binds by reference; argument conversions are not allowed.
    #[inline]
    pub const fn is_ref(self) -> bool {
        matches!(
            self,
            QualKind::Ref | QualKind::ConstRef | QualKind::RefMaybeConst
        )
    }

    /// Intent keyword as written in source.
    pub const fn as_str(self) -> &'static str {
        match self {
            QualKind::DefaultIntent => "",
            QualKind::Var => "var",
            QualKind::ConstVar => "const",
            QualKind::Ref => "ref",
            QualKind::ConstRef => "const ref",
            QualKind::RefMaybeConst => "ref-maybe-const",
            QualKind::In => "in",
            QualKind::ConstIn => "const in",
            QualKind::Type => "type",
            QualKind::Param => "param",
        }
    }
}

impl fmt::Display for QualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind plus a type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifiedType {
    pub kind: QualKind,
    pub ty: Idx,
}

impl QualifiedType {
    #[inline]
    pub const fn new(kind: QualKind, ty: Idx) -> Self {
        Self { kind, ty }
    }

    /// A mutable value of type `ty`, as an actual argument is seen.
    #[inline]
    pub const fn var(ty: Idx) -> Self {
        Self::new(QualKind::Var, ty)
    }

    /// `ty` used as a type.
    #[inline]
    pub const fn type_of(ty: Idx) -> Self {
        Self::new(QualKind::Type, ty)
    }

    #[inline]
    pub const fn is_type(self) -> bool {
        self.kind.is_type()
    }

    /// Same type under a different kind.
    #[inline]
    #[must_use]
    pub const fn with_kind(self, kind: QualKind) -> Self {
        Self::new(kind, self.ty)
    }
}
