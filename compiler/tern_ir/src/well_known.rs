//! Pre-interned names the method generator dispatches on.
//!
//! The generator compares every requested method name against a fixed
//! vocabulary (`init`, `==`, `eltType`, ...). Interning that vocabulary once
//! turns each comparison into a `u32` equality instead of an interner lookup
//! plus string match.

use crate::{Name, StringInterner};

/// Every string [`WellKnownNames`] holds. Interners reserve these.
pub(crate) const VOCABULARY: &[&str] = &[
    // Lifecycle methods
    "init",
    "init=",
    "deinit",
    // Formal names
    "this",
    "other",
    "lhs",
    "rhs",
    "from",
    "to",
    // Operators
    "==",
    "=",
    ":",
    // Builtin type queries
    "size",
    "idxType",
    "rank",
    "stridable",
    "parSafe",
    "isRectangular",
    "isAssociative",
    "domain",
    "eltType",
];

/// Pre-interned names for compiler-generated methods and their formals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WellKnownNames {
    // Lifecycle methods
    pub init: Name,
    pub init_copy: Name, // "init="
    pub deinit: Name,

    // Formal names
    pub this: Name,
    pub other: Name,
    pub lhs: Name,
    pub rhs: Name,
    pub from: Name,
    pub to: Name,

    // Operators
    pub eq_op: Name,     // "=="
    pub assign_op: Name, // "="
    pub cast_op: Name,   // ":"

    // Builtin type queries
    pub size: Name,
    pub idx_type: Name,
    pub rank: Name,
    pub stridable: Name,
    pub par_safe: Name,
    pub is_rectangular: Name,
    pub is_associative: Name,
    pub domain: Name,
    pub elt_type: Name,
}

impl WellKnownNames {
    /// Intern all well-known names using the given interner.
    pub fn new(interner: &StringInterner) -> Self {
        Self {
            init: interner.intern("init"),
            init_copy: interner.intern("init="),
            deinit: interner.intern("deinit"),
            this: interner.intern("this"),
            other: interner.intern("other"),
            lhs: interner.intern("lhs"),
            rhs: interner.intern("rhs"),
            from: interner.intern("from"),
            to: interner.intern("to"),
            eq_op: interner.intern("=="),
            assign_op: interner.intern("="),
            cast_op: interner.intern(":"),
            size: interner.intern("size"),
            idx_type: interner.intern("idxType"),
            rank: interner.intern("rank"),
            stridable: interner.intern("stridable"),
            par_safe: interner.intern("parSafe"),
            is_rectangular: interner.intern("isRectangular"),
            is_associative: interner.intern("isAssociative"),
            domain: interner.intern("domain"),
            elt_type: interner.intern("eltType"),
        }
    }

    /// `init`, `deinit` or `init=`.
    #[inline]
    pub fn is_lifecycle_method(&self, name: Name) -> bool {
        name == self.init || name == self.deinit || name == self.init_copy
    }

    /// `==` or `=`: operators whose defaults for non-record types live in
    /// the base modules rather than being synthesized.
    #[inline]
    pub fn is_builtin_type_operator(&self, name: Name) -> bool {
        name == self.eq_op || name == self.assign_op
    }

    /// Domain queries called without parentheses.
    #[inline]
    pub fn is_parenless_domain_query(&self, name: Name) -> bool {
        name == self.idx_type
            || name == self.rank
            || name == self.stridable
            || name == self.par_safe
    }

    /// Domain queries called with parentheses.
    #[inline]
    pub fn is_paren_domain_query(&self, name: Name) -> bool {
        name == self.is_rectangular || name == self.is_associative
    }

    /// Array queries (either call shape).
    #[inline]
    pub fn is_array_query(&self, name: Name) -> bool {
        name == self.domain || name == self.elt_type
    }
}
