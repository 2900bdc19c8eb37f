//! Declaration database: the reference [`ResolutionHost`].
//!
//! `ModuleDb` records modules, composite types, fields, enums and
//! functions together with the scope tree they live in, and answers the
//! host queries from that state. Declarations are added through builder
//! methods; once built, the database is read-only and can be shared across
//! threads.

use smallvec::SmallVec;
use tern_ir::{DeclId, DeclTag, Name, SharedInterner, Span, WellKnownNames};
use tern_types::{
    CompositeData, CompositeKind, DefaultsPolicy, EnumConstant, Genericity, Idx, QualKind,
    QualifiedType, ResolvedField, ResolvedFields, SharedTypePool, TypeData, TypePool,
};

use crate::{
    CompilationContext, FnKind, LookupConfig, ResolutionHost, ScopeId, ScopeKind, ScopeTree,
};

/// A field declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDecl {
    /// `Var`, `ConstVar`, `Type` or `Param`.
    pub storage: QualKind,
    /// Declared type; `None` when omitted.
    pub declared_ty: Option<Idx>,
    /// Type of the default value expression, if there is one.
    pub default_ty: Option<Idx>,
}

impl FieldDecl {
    /// `var name: ty`
    pub const fn var(ty: Idx) -> Self {
        Self {
            storage: QualKind::Var,
            declared_ty: Some(ty),
            default_ty: None,
        }
    }

    /// `const name: ty`
    pub const fn const_var(ty: Idx) -> Self {
        Self {
            storage: QualKind::ConstVar,
            declared_ty: Some(ty),
            default_ty: None,
        }
    }

    /// `var name;` (generic: type comes from the initializer)
    pub const fn untyped_var() -> Self {
        Self {
            storage: QualKind::Var,
            declared_ty: None,
            default_ty: None,
        }
    }

    /// `type name;`
    pub const fn type_field() -> Self {
        Self {
            storage: QualKind::Type,
            declared_ty: None,
            default_ty: None,
        }
    }

    /// `param name: ty`
    pub const fn param(ty: Idx) -> Self {
        Self {
            storage: QualKind::Param,
            declared_ty: Some(ty),
            default_ty: None,
        }
    }

    /// Add a default value of type `ty`.
    #[must_use]
    pub const fn with_default(self, ty: Idx) -> Self {
        Self {
            default_ty: Some(ty),
            ..self
        }
    }

    pub const fn has_default(&self) -> bool {
        self.default_ty.is_some()
    }
}

/// A formal parameter of a user-declared function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FnFormal {
    pub name: Name,
    pub qt: QualifiedType,
    pub has_default: bool,
}

impl FnFormal {
    pub const fn new(name: Name, qt: QualifiedType) -> Self {
        Self {
            name,
            qt,
            has_default: false,
        }
    }
}

/// A user-declared function, method or operator.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FnDecl {
    pub name: Name,
    pub kind: FnKind,
    pub is_method: bool,
    /// Formals in order; a method's receiver is its `this` formal.
    pub formals: Vec<FnFormal>,
}

#[derive(Clone, Debug)]
enum DeclKind {
    Module { scope: ScopeId },
    Composite { scope: ScopeId, fields: Vec<DeclId> },
    Enum,
    Field(FieldDecl),
    Function(FnDecl),
}

#[derive(Clone, Debug)]
struct DeclEntry {
    name: Name,
    tag: DeclTag,
    span: Span,
    kind: DeclKind,
}

/// Declarations plus scopes for a set of modules.
pub struct ModuleDb {
    interner: SharedInterner,
    types: SharedTypePool,
    names: WellKnownNames,
    scopes: ScopeTree,
    decls: Vec<DeclEntry>,
}

impl ModuleDb {
    /// Create an empty database sharing `ctx`'s interners.
    pub fn new(ctx: &CompilationContext) -> Self {
        Self {
            interner: ctx.interner().clone(),
            types: ctx.types().clone(),
            names: *ctx.names(),
            scopes: ScopeTree::new(),
            decls: Vec::new(),
        }
    }

    // === Builders ===

    fn push_decl(&mut self, name: Name, tag: DeclTag, kind: DeclKind) -> DeclId {
        let id = self.next_decl();
        self.decls.push(DeclEntry {
            name,
            tag,
            span: Span::DUMMY,
            kind,
        });
        id
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "declaration count never approaches u32::MAX"
    )]
    fn next_decl(&self) -> DeclId {
        DeclId::new(self.decls.len() as u32)
    }

    /// Add a module, nested in `parent` if given.
    pub fn add_module(&mut self, name: &str, parent: Option<DeclId>) -> DeclId {
        let parent_scope = parent.and_then(|p| self.scope_for_decl(p));
        let scope = self.scopes.push(parent_scope, ScopeKind::Module);
        let name = self.interner.intern(name);
        let id = self.push_decl(name, DeclTag::Module, DeclKind::Module { scope });
        if let Some(parent_scope) = parent_scope {
            self.scopes.declare(parent_scope, name, id, false);
        }
        id
    }

    fn add_composite(
        &mut self,
        module: DeclId,
        name: &str,
        kind: CompositeKind,
        parent: Option<Idx>,
    ) -> Idx {
        let module_scope = self.scope_for_decl(module);
        let scope = self.scopes.push(module_scope, ScopeKind::Composite);
        let name = self.interner.intern(name);
        let decl = self.next_decl();
        let ty = match kind {
            CompositeKind::Record => self.types.record(decl, name),
            CompositeKind::Class => self.types.class(decl, name, parent),
            CompositeKind::Union => self.types.union(decl, name),
        };
        let tag = match kind {
            CompositeKind::Record => DeclTag::Record,
            CompositeKind::Class => DeclTag::Class,
            CompositeKind::Union => DeclTag::Union,
        };
        let id = self.push_decl(
            name,
            tag,
            DeclKind::Composite {
                scope,
                fields: Vec::new(),
            },
        );
        debug_assert_eq!(id, decl);
        if let Some(module_scope) = module_scope {
            self.scopes.declare(module_scope, name, id, false);
        }
        ty
    }

    /// Add a record type to `module`.
    pub fn add_record(&mut self, module: DeclId, name: &str) -> Idx {
        self.add_composite(module, name, CompositeKind::Record, None)
    }

    /// Add a basic class type to `module`. `parent: None` inherits from
    /// the root object.
    pub fn add_class(&mut self, module: DeclId, name: &str, parent: Option<Idx>) -> Idx {
        self.add_composite(module, name, CompositeKind::Class, parent)
    }

    pub fn add_union(&mut self, module: DeclId, name: &str) -> Idx {
        self.add_composite(module, name, CompositeKind::Union, None)
    }

    /// Add an enum whose constants optionally carry explicit values.
    pub fn add_enum(
        &mut self,
        module: DeclId,
        name: &str,
        constants: &[(&str, Option<i64>)],
    ) -> Idx {
        let name = self.interner.intern(name);
        let decl = self.next_decl();
        let constants: Vec<_> = constants
            .iter()
            .map(|&(c, value)| EnumConstant {
                name: self.interner.intern(c),
                value,
            })
            .collect();
        let ty = self.types.enum_type(decl, name, constants);
        let id = self.push_decl(name, DeclTag::Enum, DeclKind::Enum);
        if let Some(scope) = self.scope_for_decl(module) {
            self.scopes.declare(scope, name, id, false);
        }
        ty
    }

    /// Add a field to the composite `owner`, after its existing fields.
    ///
    /// Returns `None` if `owner` is not a composite declared here.
    pub fn add_field(&mut self, owner: Idx, name: &str, field: FieldDecl) -> Option<DeclId> {
        let owner_decl = self.types.composite_of(owner)?.decl;
        let scope = self.scope_for_decl(owner_decl)?;
        let name = self.interner.intern(name);
        let id = self.push_decl(name, DeclTag::Field, DeclKind::Field(field));
        if let Some(DeclKind::Composite { fields, .. }) =
            self.decls.get_mut(owner_decl.index()).map(|e| &mut e.kind)
        {
            fields.push(id);
        }
        self.scopes.declare(scope, name, id, false);
        Some(id)
    }

    /// Add a function to the scope defined by `owner` (a module or a
    /// composite declaration).
    pub fn add_function(&mut self, owner: DeclId, decl: FnDecl) -> Option<DeclId> {
        let scope = self.scope_for_decl(owner)?;
        let (name, is_method) = (decl.name, decl.is_method);
        let id = self.push_decl(name, DeclTag::Function, DeclKind::Function(decl));
        self.scopes.declare(scope, name, id, is_method);
        Some(id)
    }

    /// Add a primary method to the body of `owner`, with receiver `this`.
    pub fn add_method(
        &mut self,
        owner: Idx,
        name: &str,
        kind: FnKind,
        this: QualifiedType,
        rest: &[FnFormal],
    ) -> Option<DeclId> {
        let owner_decl = self.types.composite_of(owner)?.decl;
        let decl = self.method_decl(name, kind, this, rest);
        self.add_function(owner_decl, decl)
    }

    /// Add a method declared outside its type's body, at module level.
    pub fn add_secondary_method(
        &mut self,
        module: DeclId,
        name: &str,
        kind: FnKind,
        this: QualifiedType,
        rest: &[FnFormal],
    ) -> Option<DeclId> {
        let decl = self.method_decl(name, kind, this, rest);
        self.add_function(module, decl)
    }

    fn method_decl(
        &self,
        name: &str,
        kind: FnKind,
        this: QualifiedType,
        rest: &[FnFormal],
    ) -> FnDecl {
        let mut formals = Vec::with_capacity(rest.len() + 1);
        formals.push(FnFormal::new(self.names.this, this));
        formals.extend_from_slice(rest);
        FnDecl {
            name: self.interner.intern(name),
            kind,
            is_method: true,
            formals,
        }
    }

    /// Add a standalone operator to `module`.
    pub fn add_operator(
        &mut self,
        module: DeclId,
        name: &str,
        formals: &[FnFormal],
    ) -> Option<DeclId> {
        let decl = FnDecl {
            name: self.interner.intern(name),
            kind: FnKind::Operator,
            is_method: false,
            formals: formals.to_vec(),
        };
        self.add_function(module, decl)
    }

    /// Add a standalone (non-method, non-operator) procedure to `module`.
    pub fn add_proc(&mut self, module: DeclId, name: &str, formals: &[FnFormal]) -> Option<DeclId> {
        let decl = FnDecl {
            name: self.interner.intern(name),
            kind: FnKind::Proc,
            is_method: false,
            formals: formals.to_vec(),
        };
        self.add_function(module, decl)
    }

    /// Instantiate a generic composite, naming substituted fields.
    pub fn instantiate(&self, generic: Idx, substitutions: &[(&str, Idx)]) -> Option<Idx> {
        let subs: Vec<_> = substitutions
            .iter()
            .map(|&(field, ty)| (self.interner.intern(field), ty))
            .collect();
        self.types.instantiate(generic, subs)
    }

    pub fn set_span(&mut self, decl: DeclId, span: Span) {
        if let Some(entry) = self.decls.get_mut(decl.index()) {
            entry.span = span;
        }
    }

    /// Intern a name with the database's interner.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn types(&self) -> &TypePool {
        &self.types
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    // === Queries ===

    fn entry(&self, decl: DeclId) -> Option<&DeclEntry> {
        if decl.is_none() {
            return None;
        }
        self.decls.get(decl.index())
    }

    fn composite_fields(&self, decl: DeclId) -> &[DeclId] {
        match self.entry(decl).map(|e| &e.kind) {
            Some(DeclKind::Composite { fields, .. }) => fields,
            _ => &[],
        }
    }

    fn field(&self, decl: DeclId) -> Option<(Name, FieldDecl)> {
        match self.entry(decl) {
            Some(DeclEntry {
                name,
                kind: DeclKind::Field(field),
                ..
            }) => Some((*name, *field)),
            _ => None,
        }
    }

    /// Resolve one field of `comp`. Returns the field's qualified type and
    /// whether it is still generic under `policy`.
    fn resolve_field(
        &self,
        comp: &CompositeData,
        name: Name,
        field: FieldDecl,
        policy: DefaultsPolicy,
        visiting: &mut Visiting,
    ) -> (QualifiedType, bool) {
        let kind = field.storage;
        if let Some(sub) = comp.substitution(name) {
            return (QualifiedType::new(kind, sub), false);
        }

        let use_default = policy == DefaultsPolicy::UseDefaults;
        match (kind, field.declared_ty, field.default_ty) {
            (QualKind::Type, _, Some(default)) if use_default => {
                (QualifiedType::new(kind, default), false)
            }
            (QualKind::Type, declared, _) => {
                (QualifiedType::new(kind, declared.unwrap_or(Idx::ANY)), true)
            }
            // A param's type is known but its value is not.
            (QualKind::Param, declared, default) => {
                let ty = declared.or(default).unwrap_or(Idx::ANY);
                (QualifiedType::new(kind, ty), !(use_default && default.is_some()))
            }
            (_, Some(ty), _) | (_, None, Some(ty)) => {
                let generic = self.genericity_inner(ty, visiting).is_generic();
                (QualifiedType::new(kind, ty), generic)
            }
            (_, None, None) => (QualifiedType::new(kind, Idx::ANY), true),
        }
    }

    fn fields_inner(
        &self,
        ty: Idx,
        policy: DefaultsPolicy,
        visiting: &mut Visiting,
    ) -> ResolvedFields {
        let mut resolved = ResolvedFields {
            ty,
            fields: Vec::new(),
            is_generic: false,
        };
        let Some(comp) = self.types.composite_of(ty) else {
            return resolved;
        };

        for &decl in self.composite_fields(comp.decl) {
            let Some((name, field)) = self.field(decl) else {
                continue;
            };
            let (qt, generic) = self.resolve_field(&comp, name, field, policy, visiting);
            resolved.is_generic |= generic;
            resolved.fields.push(ResolvedField {
                name,
                decl,
                qt,
                has_default: field.has_default(),
            });
        }
        resolved
    }

    fn genericity_inner(&self, ty: Idx, visiting: &mut Visiting) -> Genericity {
        if ty.is_none() {
            return Genericity::Concrete;
        }
        match self.types.lookup(ty) {
            TypeData::Any | TypeData::AnyIntegral => Genericity::Generic,
            TypeData::Composite(comp) => {
                if visiting.contains(&ty) {
                    return Genericity::Concrete;
                }
                visiting.push(ty);
                let mut result = Genericity::Concrete;
                for &decl in self.composite_fields(comp.decl) {
                    let Some((name, field)) = self.field(decl) else {
                        continue;
                    };
                    let (_, generic) = self.resolve_field(
                        &comp,
                        name,
                        field,
                        DefaultsPolicy::IgnoreDefaults,
                        visiting,
                    );
                    if generic {
                        result = result.join(if field.has_default() {
                            Genericity::GenericWithDefaults
                        } else {
                            Genericity::Generic
                        });
                    }
                }
                visiting.pop();
                result
            }
            TypeData::Class { basic, .. } => self.genericity_inner(basic, visiting),
            TypeData::Tuple(elems) => elems.iter().fold(Genericity::Concrete, |acc, &e| {
                acc.join(self.genericity_inner(e, visiting))
            }),
            TypeData::Array { elt, .. } | TypeData::CPtr { elt } => {
                self.genericity_inner(elt, visiting)
            }
            TypeData::Domain(kind) => self.genericity_inner(kind.idx_type(), visiting),
            TypeData::Int
            | TypeData::UInt
            | TypeData::Real
            | TypeData::Bool
            | TypeData::String
            | TypeData::Nothing
            | TypeData::RootObject
            | TypeData::Enum(_) => Genericity::Concrete,
        }
    }

    fn default_initializable_inner(&self, ty: Idx, visiting: &mut Visiting) -> bool {
        if ty.is_none() {
            return false;
        }
        match self.types.lookup(ty) {
            TypeData::Int
            | TypeData::UInt
            | TypeData::Real
            | TypeData::Bool
            | TypeData::String
            | TypeData::Nothing => true,
            TypeData::Any | TypeData::AnyIntegral | TypeData::RootObject => false,
            // A bare class has no management, so there is nothing to default to.
            TypeData::Composite(comp) if comp.kind == CompositeKind::Class => false,
            TypeData::Composite(_) => {
                if visiting.contains(&ty) {
                    return false;
                }
                visiting.push(ty);
                let fields = self.fields_inner(ty, DefaultsPolicy::UseDefaults, visiting);
                let ok = !fields.is_generic
                    && fields.iter().all(|f| {
                        f.has_default
                            || f.qt.kind.is_type_or_param()
                            || self.default_initializable_inner(f.qt.ty, visiting)
                    });
                visiting.pop();
                ok
            }
            TypeData::Class { decorator, .. } => decorator.nilable,
            TypeData::Tuple(elems) => elems
                .iter()
                .all(|&e| self.default_initializable_inner(e, visiting)),
            TypeData::Array { .. } | TypeData::Domain(_) | TypeData::CPtr { .. } => true,
            TypeData::Enum(data) => !data.constants.is_empty(),
        }
    }

    /// Intent a `DefaultIntent` receiver resolves to.
    fn default_receiver_intent(&self, ty: Idx) -> QualKind {
        match self.types.lookup(ty) {
            TypeData::Composite(comp) if comp.kind != CompositeKind::Class => QualKind::ConstRef,
            TypeData::Tuple(_) | TypeData::Array { .. } | TypeData::Domain(_) => QualKind::ConstRef,
            _ => QualKind::ConstIn,
        }
    }
}

/// Composite types whose structure is being walked, for cycle detection.
type Visiting = SmallVec<[Idx; 8]>;

impl ResolutionHost for ModuleDb {
    fn type_pool(&self) -> &TypePool {
        &self.types
    }

    fn decl_tag(&self, decl: DeclId) -> Option<DeclTag> {
        self.entry(decl).map(|e| e.tag)
    }

    fn decl_span(&self, decl: DeclId) -> Span {
        self.entry(decl).map_or(Span::DUMMY, |e| e.span)
    }

    fn scope_for_decl(&self, decl: DeclId) -> Option<ScopeId> {
        match self.entry(decl)?.kind {
            DeclKind::Module { scope } | DeclKind::Composite { scope, .. } => Some(scope),
            DeclKind::Enum | DeclKind::Field(_) | DeclKind::Function(_) => None,
        }
    }

    fn lookup_name_in_scope(
        &self,
        scope: ScopeId,
        name: Name,
        config: LookupConfig,
    ) -> SmallVec<[DeclId; 4]> {
        self.scopes.lookup(scope, name, config)
    }

    fn function(&self, decl: DeclId) -> Option<&FnDecl> {
        match &self.entry(decl)?.kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    fn initial_receiver_type(&self, decl: DeclId) -> Option<QualifiedType> {
        let f = self.function(decl)?;
        let receiver = if f.is_method {
            f.formals
                .iter()
                .find(|p| p.name == self.names.this)
                .or_else(|| f.formals.first())
        } else if f.kind == FnKind::Operator {
            f.formals.first()
        } else {
            None
        }?;

        let mut qt = receiver.qt;
        if qt.kind == QualKind::DefaultIntent {
            qt.kind = self.default_receiver_intent(qt.ty);
        }
        Some(qt)
    }

    fn fields_for_type_decl(&self, ty: Idx, policy: DefaultsPolicy) -> ResolvedFields {
        self.fields_inner(ty, policy, &mut Visiting::new())
    }

    fn is_default_initializable(&self, ty: Idx) -> bool {
        self.default_initializable_inner(ty, &mut Visiting::new())
    }

    fn genericity(&self, ty: Idx) -> Genericity {
        self.genericity_inner(ty, &mut Visiting::new())
    }

    fn field_id_with_name(&self, ty: Idx, name: Name) -> Option<DeclId> {
        let comp = self.types.composite_of(ty)?;
        self.composite_fields(comp.decl)
            .iter()
            .copied()
            .find(|&f| self.entry(f).is_some_and(|e| e.name == name))
    }
}

impl std::fmt::Debug for ModuleDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDb")
            .field("decls", &self.decls.len())
            .field("scopes", &self.scopes.len())
            .finish_non_exhaustive()
    }
}
