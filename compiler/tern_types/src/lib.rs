//! Type system for Tern.
//!
//! - Types are interned in a [`TypePool`] and referenced by [`Idx`];
//!   structurally equal types share one index, so equality is O(1)
//! - [`TypeData`] is a closed sum type, so every kind dispatch is an
//!   exhaustive `match`
//! - [`QualifiedType`] pairs a calling-convention kind with a type
//! - [`can_pass`] is the applicability judgment used when checking whether
//!   an argument binds to a formal

mod can_pass;
mod data;
mod fields;
mod genericity;
mod idx;
mod pool;
mod qualified;
mod tag;

pub use can_pass::{can_pass, CanPassResult, ConversionKind};
pub use data::{
    ClassDecorator, CompositeData, CompositeKind, DomainKind, EnumConstant, EnumData, Management,
    TypeData,
};
pub use fields::{DefaultsPolicy, ResolvedField, ResolvedFields};
pub use genericity::Genericity;
pub use idx::Idx;
pub use pool::{SharedTypePool, TypePool};
pub use qualified::{QualKind, QualifiedType};
pub use tag::Tag;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Idx, QualifiedType};
    tern_ir::static_assert_size!(Idx, 4);
    // kind (1) + padding (3) + Idx (4)
    tern_ir::static_assert_size!(QualifiedType, 8);
}
