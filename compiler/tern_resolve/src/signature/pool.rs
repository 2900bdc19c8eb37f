//! Interned signature storage.

use tern_ir::{InternTable, Name, StringLookup};
use tern_types::{QualKind, TypePool};

use super::{SigId, TypedFnSignature, UntypedFnSignature, UntypedSigId};

/// Interned untyped and typed signatures.
///
/// Equal content yields an equal handle, which is what lets memoized
/// queries hand out the same signature for the same request.
#[derive(Default)]
pub struct SignaturePool {
    untyped: InternTable<UntypedFnSignature>,
    typed: InternTable<TypedFnSignature>,
}

impl SignaturePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_untyped(&self, sig: UntypedFnSignature) -> UntypedSigId {
        UntypedSigId::from_raw_id(self.untyped.intern(sig))
    }

    pub fn intern_typed(&self, sig: TypedFnSignature) -> SigId {
        SigId::from_raw_id(self.typed.intern(sig))
    }

    pub fn untyped(&self, id: UntypedSigId) -> UntypedFnSignature {
        self.untyped.get(id.raw_id())
    }

    pub fn typed(&self, id: SigId) -> TypedFnSignature {
        self.typed.get(id.raw_id())
    }

    pub fn name(&self, id: SigId) -> Name {
        let untyped = self.typed.with(id.raw_id(), |sig| sig.untyped);
        self.untyped.with(untyped.raw_id(), |sig| sig.name)
    }

    /// Number of interned typed signatures.
    pub fn len(&self) -> usize {
        self.typed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.typed.is_empty()
    }

    /// Render a signature as `proc name(ref this: R, in x: int)`.
    pub fn format(&self, id: SigId, types: &TypePool, names: &dyn StringLookup) -> String {
        let typed = self.typed(id);
        let untyped = self.untyped(typed.untyped);

        let mut buf = String::new();
        buf.push_str(untyped.kind.keyword());
        buf.push(' ');
        buf.push_str(names.lookup(untyped.name));
        buf.push('(');
        for (i, (formal, qt)) in untyped.formals.iter().zip(&typed.formal_types).enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            if qt.kind != QualKind::DefaultIntent {
                buf.push_str(qt.kind.as_str());
                buf.push(' ');
            }
            buf.push_str(names.lookup(formal.name));
            buf.push_str(": ");
            types.format_type_into(qt.ty, names, &mut buf);
            if formal.has_default {
                buf.push_str(" = ?");
            }
        }
        buf.push(')');
        buf
    }
}

impl std::fmt::Debug for SignaturePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignaturePool")
            .field("untyped", &self.untyped.len())
            .field("typed", &self.typed.len())
            .finish()
    }
}
