//! Type construction helpers for the pool.

use tern_ir::{DeclId, Name};

use crate::{
    ClassDecorator, CompositeData, CompositeKind, DomainKind, EnumConstant, EnumData, Idx,
    TypeData, TypePool,
};

impl TypePool {
    // === Composites ===

    fn composite_type(
        &self,
        kind: CompositeKind,
        decl: DeclId,
        name: Name,
        parent: Option<Idx>,
    ) -> Idx {
        self.intern(TypeData::Composite(CompositeData {
            kind,
            decl,
            name,
            instantiated_from: None,
            substitutions: Box::new([]),
            parent,
        }))
    }

    /// The (uninstantiated) record type declared by `decl`.
    pub fn record(&self, decl: DeclId, name: Name) -> Idx {
        self.composite_type(CompositeKind::Record, decl, name, None)
    }

    /// The basic class type declared by `decl`. `parent: None` inherits
    /// from the root object.
    pub fn class(&self, decl: DeclId, name: Name, parent: Option<Idx>) -> Idx {
        self.composite_type(CompositeKind::Class, decl, name, parent)
    }

    pub fn union(&self, decl: DeclId, name: Name) -> Idx {
        self.composite_type(CompositeKind::Union, decl, name, None)
    }

    /// Instantiate a generic composite with field substitutions.
    ///
    /// Instantiating an instantiation re-roots at the original generic type.
    /// Returns `None` if `generic` is not an undecorated composite.
    pub fn instantiate(
        &self,
        generic: Idx,
        substitutions: impl IntoIterator<Item = (Name, Idx)>,
    ) -> Option<Idx> {
        let base = self.composite(generic)?;
        let root = base.instantiated_from.unwrap_or(generic);
        Some(self.intern(TypeData::Composite(CompositeData {
            instantiated_from: Some(root),
            substitutions: substitutions.into_iter().collect(),
            ..base
        })))
    }

    // === Class decorators ===

    /// Apply a decorator to a class. Decorated inputs are re-decorated
    /// from their basic class. Non-class inputs are returned unchanged.
    pub fn decorated_class(&self, class: Idx, decorator: ClassDecorator) -> Idx {
        match self.basic_class(class) {
            Some(basic) => self.intern(TypeData::Class { basic, decorator }),
            None => class,
        }
    }

    /// `borrowed C` (non-nilable) for a basic or decorated class `C`.
    pub fn borrowed_non_nil(&self, class: Idx) -> Idx {
        self.decorated_class(class, ClassDecorator::BORROWED_NONNIL)
    }

    // === Builtin families ===

    /// Tuple type `(elems...)`.
    pub fn tuple(&self, elems: impl IntoIterator<Item = Idx>) -> Idx {
        self.intern(TypeData::Tuple(elems.into_iter().collect()))
    }

    /// Array type over `domain` with element type `elt`.
    pub fn array(&self, domain: Idx, elt: Idx) -> Idx {
        self.intern(TypeData::Array { domain, elt })
    }

    pub fn rectangular_domain(&self, rank: u8, idx_type: Idx, strided: bool) -> Idx {
        self.intern(TypeData::Domain(DomainKind::Rectangular {
            rank,
            idx_type,
            strided,
        }))
    }

    pub fn associative_domain(&self, idx_type: Idx, par_safe: bool) -> Idx {
        self.intern(TypeData::Domain(DomainKind::Associative { idx_type, par_safe }))
    }

    /// Raw C pointer to `elt`.
    pub fn c_ptr(&self, elt: Idx) -> Idx {
        self.intern(TypeData::CPtr { elt })
    }

    /// The enum type declared by `decl`.
    pub fn enum_type(
        &self,
        decl: DeclId,
        name: Name,
        constants: impl IntoIterator<Item = EnumConstant>,
    ) -> Idx {
        self.intern(TypeData::Enum(EnumData {
            decl,
            name,
            constants: constants.into_iter().collect(),
        }))
    }
}
