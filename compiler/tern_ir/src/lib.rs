//! Tern IR - shared handles for the semantic analyzer.
//!
//! This crate contains the small, copyable identifiers every later phase
//! passes around:
//! - `Name` for interned identifiers
//! - `DeclId`/`DeclTag` for declarations
//! - `Span` for source locations
//! - `InternTable`, the sharded deduplicating store behind type and
//!   signature interning
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings, types and signatures become `u32` handles
//! - **Identity is Equality**: equal content always yields the same handle,
//!   so memoized query results can be compared with `==`

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied handles.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod decl;
mod intern_table;
mod interner;
mod name;
mod span;
mod well_known;

pub use decl::{DeclId, DeclTag};
pub use intern_table::{InternTable, InternTableError, RawId};
pub use interner::{SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::Span;
pub use well_known::WellKnownNames;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{DeclId, Name, RawId, Span};
    static_assert_size!(Name, 4);
    static_assert_size!(DeclId, 4);
    static_assert_size!(RawId, 4);
    static_assert_size!(Span, 8);
}
