//! Per-compilation state shared by every resolution query.

use tern_ir::{SharedInterner, WellKnownNames};
use tern_types::SharedTypePool;

use crate::{GeneratedCache, SignaturePool};

/// Interners and memoization tables for one compilation.
///
/// Everything here lives as long as the compilation: types, signatures and
/// generated-method results are never evicted. Dropping the context drops
/// all of them; an incremental rebuild starts from a fresh context.
pub struct CompilationContext {
    interner: SharedInterner,
    types: SharedTypePool,
    signatures: SignaturePool,
    generated: GeneratedCache,
    names: WellKnownNames,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::with_interner(SharedInterner::new())
    }

    /// Create a context over an existing interner (e.g. the parser's).
    pub fn with_interner(interner: SharedInterner) -> Self {
        let names = WellKnownNames::new(&interner);
        Self {
            interner,
            types: SharedTypePool::new(),
            signatures: SignaturePool::new(),
            generated: GeneratedCache::new(),
            names,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn types(&self) -> &SharedTypePool {
        &self.types
    }

    pub fn signatures(&self) -> &SignaturePool {
        &self.signatures
    }

    /// Memoization tables for generated methods.
    pub fn generated(&self) -> &GeneratedCache {
        &self.generated
    }

    pub fn names(&self) -> &WellKnownNames {
        &self.names
    }

    /// Render a signature for logs and diagnostics.
    pub fn format_signature(&self, sig: crate::SigId) -> String {
        self.signatures.format(sig, &self.types, &*self.interner)
    }

    /// Render a type for logs and diagnostics.
    pub fn format_type(&self, ty: tern_types::Idx) -> String {
        self.types.format_type(ty, &*self.interner)
    }
}

impl Default for CompilationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompilationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationContext")
            .field("types", &self.types.len())
            .field("signatures", &self.signatures)
            .field("generated", &self.generated.stats())
            .finish_non_exhaustive()
    }
}
