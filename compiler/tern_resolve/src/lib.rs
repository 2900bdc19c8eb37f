//! Name resolution support and compiler-generated methods.
//!
//! The core of this crate answers one question for the resolver: given a
//! type and a method name, does the compiler have to synthesize that
//! method, and if so, what is its signature? Generated signatures are
//! interned like user-written ones, so the rest of resolution cannot tell
//! them apart.
//!
//! # Architecture
//!
//! - [`CompilationContext`] owns the interners and the memoization tables
//! - [`ResolutionHost`] is the seam to the rest of the frontend (scopes,
//!   declarations, field lists); [`ModuleDb`] implements it
//! - [`generated`] holds the decision engine, the overload oracle, the
//!   signature builders and the memoized entry points
//!
//! # Tracing
//!
//! Enable with `RUST_LOG=tern_resolve=debug` (decisions, cache misses) or
//! `RUST_LOG=tern_resolve=trace` (per-candidate shadow checks, cache hits).

mod context;
mod db;
pub mod generated;
mod host;
mod scope;
mod signature;

pub use context::CompilationContext;
pub use db::{FieldDecl, FnDecl, FnFormal, ModuleDb};
pub use generated::{
    field_accessor, get_compiler_generated_binary_op, get_compiler_generated_method,
    need_compiler_generated_method, CacheStats, GeneratedCache, GenerationError,
    UnsupportedFeature,
};
pub use host::ResolutionHost;
pub use scope::{LookupConfig, ScopeId, ScopeKind, ScopeTree};
pub use signature::{
    FnKind, FormalDetail, SigId, SignaturePool, TypedFnSignature, UntypedFnSignature,
    UntypedSigId, WhereClause,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=tern_resolve=debug` or `RUST_LOG=tern_resolve=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{SigId, UntypedSigId};
    tern_ir::static_assert_size!(SigId, 4);
    tern_ir::static_assert_size!(UntypedSigId, 4);
}
