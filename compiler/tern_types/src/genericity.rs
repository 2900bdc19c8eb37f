//! Genericity classification of types.

/// Whether a type still has unresolved generic parts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Genericity {
    /// Fully known.
    #[default]
    Concrete,
    /// Generic, but every generic field has a default.
    GenericWithDefaults,
    /// Generic with at least one field lacking a default.
    Generic,
}

impl Genericity {
    /// `Generic` or `GenericWithDefaults`: the type needs instantiation
    /// before it can be used as a concrete receiver.
    #[inline]
    pub const fn is_generic(self) -> bool {
        matches!(self, Genericity::Generic | Genericity::GenericWithDefaults)
    }

    /// Combine the genericity of two parts of one type.
    ///
    /// `Generic` dominates `GenericWithDefaults`.
    #[must_use]
    pub const fn join(self, other: Self) -> Self {
        use Genericity::{Concrete, Generic, GenericWithDefaults};
        match (self, other) {
            (Generic, _) | (_, Generic) => Generic,
            (GenericWithDefaults, _) | (_, GenericWithDefaults) => GenericWithDefaults,
            (Concrete, Concrete) => Concrete,
        }
    }
}
