//! Compiler-generated methods.
//!
//! Entry points for the resolver:
//!
//! - [`need_compiler_generated_method`]: does `(type, name)` need a
//!   synthesized method?
//! - [`get_compiler_generated_method`]: the synthesized signature, if any
//! - [`get_compiler_generated_binary_op`]: enum/integer casts
//! - [`field_accessor`]: accessor method for a composite's field
//!
//! Every entry point is memoized in the context's [`GeneratedCache`]: the
//! same request returns the same [`SigId`] for the lifetime of the
//! [`CompilationContext`].

mod builders;
mod cache;
mod decide;
mod error;
mod shadow;

use tern_ir::Name;
use tern_types::{Idx, QualifiedType};

use crate::{CompilationContext, ResolutionHost, SigId};
use builders::CastDirection;
use cache::{AccessorKey, BinaryOpKey, MethodKey};

pub use cache::{CacheStats, GeneratedCache, TableStats};
pub use error::{GenerationError, UnsupportedFeature};

/// Whether the compiler must synthesize method `name` for `ty`.
///
/// A type that is not known yet ([`Idx::NONE`]) never needs one.
#[tracing::instrument(level = "debug", skip_all, fields(
    ty = %ctx.format_type(ty),
    name = ctx.interner().lookup(name),
    parenless = parenless,
))]
pub fn need_compiler_generated_method(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
    name: Name,
    parenless: bool,
) -> bool {
    if ty.is_none() {
        return false;
    }
    let key = MethodKey { ty, name, parenless };
    ctx.generated()
        .need
        .get_or_compute(key, || decide::need_method(ctx, host, ty, name, parenless))
}

/// The compiler-generated method `name` for `ty`.
///
/// `Ok(None)` means no method is generated. Errors are memoized too: a
/// request that failed once fails the same way every time.
#[tracing::instrument(level = "debug", skip_all, fields(
    ty = %ctx.format_type(ty),
    name = ctx.interner().lookup(name),
    parenless = parenless,
))]
pub fn get_compiler_generated_method(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
    name: Name,
    parenless: bool,
) -> Result<Option<SigId>, GenerationError> {
    let key = MethodKey { ty, name, parenless };
    ctx.generated().methods.get_or_compute(key, || {
        if !need_compiler_generated_method(ctx, host, ty, name, parenless) {
            return Ok(None);
        }
        let sig = builders::generate_method(ctx, host, ty, name)?;
        debug_assert_eq!(ctx.signatures().name(sig), name);
        tracing::debug!(sig = %ctx.format_signature(sig), "generated");
        Ok(Some(sig))
    })
}

/// A compiler-generated binary operator for `lhs name rhs`.
///
/// Only the cast operator `:` between an enum and the integral types is
/// generated: an enum `lhs` yields the enum-to-integer cast, otherwise an
/// enum `rhs` yields the integer-to-enum cast. The other operand is not
/// checked. Abstract enums and unknown operand types have no casts.
#[tracing::instrument(level = "debug", skip_all, fields(
    lhs = %ctx.format_type(lhs.ty),
    rhs = %ctx.format_type(rhs.ty),
    name = ctx.interner().lookup(name),
))]
pub fn get_compiler_generated_binary_op(
    ctx: &CompilationContext,
    lhs: QualifiedType,
    rhs: QualifiedType,
    name: Name,
) -> Option<SigId> {
    let key = BinaryOpKey { lhs, rhs, name };
    ctx.generated().binary_ops.get_or_compute(key, || {
        if name != ctx.names().cast_op {
            return None;
        }
        let is_enum = |ty: Idx| !ty.is_none() && ctx.types().is_enum(ty);
        if is_enum(lhs.ty) {
            builders::build_enum_cast(ctx, lhs.ty, CastDirection::FromEnum)
        } else if is_enum(rhs.ty) {
            builders::build_enum_cast(ctx, rhs.ty, CastDirection::ToEnum)
        } else {
            None
        }
    })
}

/// Accessor method for `field` of the composite `ty`.
///
/// Returns `None` when there is no type (`None` or [`Idx::NONE`]), the
/// type is not a composite, or it has no such field.
#[tracing::instrument(level = "debug", skip_all, fields(
    ty = ?ty,
    field = ctx.interner().lookup(field),
))]
pub fn field_accessor(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Option<Idx>,
    field: Name,
) -> Option<SigId> {
    let ty = ty.filter(|ty| !ty.is_none())?;
    let key = AccessorKey { ty, field };
    ctx.generated()
        .accessors
        .get_or_compute(key, || builders::build_field_accessor(ctx, host, ty, field))
}

#[cfg(test)]
mod tests;
