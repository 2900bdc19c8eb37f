//! The seam between generated-method resolution and the rest of the
//! frontend.

use smallvec::SmallVec;
use tern_ir::{DeclId, DeclTag, Name, Span};
use tern_types::{
    can_pass, CanPassResult, DefaultsPolicy, Genericity, Idx, QualifiedType, ResolvedFields,
    TypePool,
};

use crate::{FnDecl, LookupConfig, ScopeId};

/// Queries the generated-method core needs from its host.
///
/// All methods are pure lookups over already-built program state, so a
/// host can be shared by concurrent resolution threads.
pub trait ResolutionHost {
    /// The type pool the host's types live in.
    fn type_pool(&self) -> &TypePool;

    /// Kind of declaration `decl` is.
    fn decl_tag(&self, decl: DeclId) -> Option<DeclTag>;

    /// Source location of `decl`, for diagnostics.
    fn decl_span(&self, decl: DeclId) -> Span;

    /// The scope a declaration defines (a composite's body scope, a
    /// module's scope).
    fn scope_for_decl(&self, decl: DeclId) -> Option<ScopeId>;

    /// Declarations named `name` visible from `scope` under `config`.
    fn lookup_name_in_scope(
        &self,
        scope: ScopeId,
        name: Name,
        config: LookupConfig,
    ) -> SmallVec<[DeclId; 4]>;

    /// The function declaration behind `decl`, if it is one.
    fn function(&self, decl: DeclId) -> Option<&FnDecl>;

    /// Receiver formal type from the initial (uninstantiated) signature of
    /// a method or operator: the `this` formal of a method, else the first
    /// formal of an operator.
    fn initial_receiver_type(&self, decl: DeclId) -> Option<QualifiedType>;

    /// Fields of a composite type, in declaration order.
    fn fields_for_type_decl(&self, ty: Idx, policy: DefaultsPolicy) -> ResolvedFields;

    /// Whether a value of `ty` can be created without an initializer
    /// expression.
    fn is_default_initializable(&self, ty: Idx) -> bool;

    fn genericity(&self, ty: Idx) -> Genericity;

    /// Declaration of the field `name` of composite `ty`.
    fn field_id_with_name(&self, ty: Idx, name: Name) -> Option<DeclId>;

    /// Applicability of an actual to a formal.
    fn can_pass(&self, actual: QualifiedType, formal: QualifiedType) -> CanPassResult {
        can_pass(self.type_pool(), actual, formal)
    }
}
