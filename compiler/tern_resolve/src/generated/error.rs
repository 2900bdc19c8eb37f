//! Failures while building a compiler-generated method.
//!
//! "Nothing to generate" is not an error: it is `Ok(None)`. These variants
//! cover the cases where a method should exist but cannot be built.

use std::fmt;

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::Span;
use tern_types::Idx;

use crate::{CompilationContext, ResolutionHost};

/// Source constructs the generator does not handle yet.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnsupportedFeature {
    /// Default `init` for a type with generic fields.
    GenericInitializer,
    /// Default `init` for a class whose parent is not the root object.
    InheritingClassInitializer,
}

impl UnsupportedFeature {
    pub const fn error_code(self) -> ErrorCode {
        match self {
            UnsupportedFeature::GenericInitializer => ErrorCode::E2101,
            UnsupportedFeature::InheritingClassInitializer => ErrorCode::E2102,
        }
    }
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedFeature::GenericInitializer => {
                f.write_str("default initializer for a generic type")
            }
            UnsupportedFeature::InheritingClassInitializer => {
                f.write_str("default initializer for an inheriting class")
            }
        }
    }
}

/// Why a generated method could not be built.
#[derive(thiserror::Error, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GenerationError {
    #[error("{feature} is not supported yet")]
    Unsupported { feature: UnsupportedFeature, ty: Idx },

    #[error("internal error: {message}")]
    Internal { ty: Idx, message: String },
}

impl GenerationError {
    #[cold]
    pub(crate) fn internal(ty: Idx, message: impl Into<String>) -> Self {
        GenerationError::Internal {
            ty,
            message: message.into(),
        }
    }

    /// The type the method was requested for.
    pub fn ty(&self) -> Idx {
        match self {
            GenerationError::Unsupported { ty, .. } | GenerationError::Internal { ty, .. } => *ty,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            GenerationError::Unsupported { feature, .. } => feature.error_code(),
            GenerationError::Internal { .. } => ErrorCode::E9001,
        }
    }

    /// Convert into a user-facing diagnostic anchored at the declaration of
    /// the type the method was requested for. Types without a declaration
    /// (tuples, domains, ...) get a dummy span.
    pub fn to_diagnostic(&self, ctx: &CompilationContext, host: &dyn ResolutionHost) -> Diagnostic {
        let span = ctx
            .types()
            .decl_of(self.ty())
            .map_or(Span::DUMMY, |decl| host.decl_span(decl));
        match self {
            GenerationError::Unsupported { feature, ty } => {
                let ty = ctx.format_type(*ty);
                Diagnostic::error(self.error_code())
                    .with_message(format!("{feature} `{ty}` is not supported yet"))
                    .with_label(span, "type declared here")
                    .with_note("declare an `init` for this type explicitly")
            }
            GenerationError::Internal { message, .. } => Diagnostic::error(self.error_code())
                .with_message(format!("internal compiler error: {message}"))
                .with_label(span, "while generating a method for this")
                .with_note("this is a bug in the compiler"),
        }
    }
}
