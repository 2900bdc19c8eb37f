//! Signature builders for each kind of generated method.
//!
//! Every builder follows the same steps: receiver formal, remaining
//! formals, untyped signature, typed signature. Signatures are interned, so
//! building the same method twice yields the same [`SigId`].

use smallvec::SmallVec;
use tern_ir::{DeclId, DeclTag, Name};
use tern_types::{
    CompositeData, CompositeKind, DefaultsPolicy, Idx, QualKind, QualifiedType, Tag, TypePool,
};

use super::{GenerationError, UnsupportedFeature};
use crate::{
    CompilationContext, FnKind, FormalDetail, ResolutionHost, SigId, TypedFnSignature,
    UntypedFnSignature, WhereClause,
};

/// Direction of a generated enum cast.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(super) enum CastDirection {
    /// `enum : integral`
    FromEnum,
    /// `integral : enum`
    ToEnum,
}

/// Formals collected so far, untyped and typed in lockstep.
#[derive(Default)]
struct Parts {
    formals: SmallVec<[FormalDetail; 4]>,
    types: SmallVec<[QualifiedType; 4]>,
}

impl Parts {
    fn push(&mut self, name: Name, has_default: bool, decl: DeclId, qt: QualifiedType) {
        self.formals.push(FormalDetail::new(name, has_default, decl));
        self.types.push(qt);
    }

    fn len(&self) -> usize {
        self.formals.len()
    }
}

/// The untyped fields that vary between generated signatures.
struct Header {
    id: DeclId,
    name: Name,
    is_method: bool,
    id_tag: DeclTag,
    kind: FnKind,
}

fn finish(
    ctx: &CompilationContext,
    header: Header,
    parts: Parts,
    needs_instantiation: bool,
) -> SigId {
    let signatures = ctx.signatures();
    let untyped = signatures.intern_untyped(UntypedFnSignature {
        id: header.id,
        name: header.name,
        is_method: header.is_method,
        is_type_constructor: false,
        is_compiler_generated: true,
        throws: false,
        id_tag: header.id_tag,
        kind: header.kind,
        formals: parts.formals,
    });
    signatures.intern_typed(TypedFnSignature {
        untyped,
        formal_types: parts.types,
        where_clause: WhereClause::None,
        needs_instantiation,
        instantiated_from: None,
        parent_fn: None,
        formals_instantiated: SmallVec::new(),
    })
}

// === Receivers ===

/// Intent of the receiver of a generated lifecycle method: `const in` for
/// classes (the receiver is a borrowed pointer), `ref` for records and
/// unions.
pub(super) fn receiver_intent(types: &TypePool, ty: Idx) -> QualKind {
    if types.is_class(ty) {
        QualKind::ConstIn
    } else {
        QualKind::Ref
    }
}

/// Receiver of a lifecycle method on `ty`. Classes are received as
/// non-nilable `borrowed`.
fn lifecycle_receiver(types: &TypePool, ty: Idx) -> QualifiedType {
    let kind = receiver_intent(types, ty);
    let ty = if types.is_class(ty) {
        types.borrowed_non_nil(ty)
    } else {
        ty
    };
    QualifiedType::new(kind, ty)
}

fn composite_tag(host: &dyn ResolutionHost, comp: &CompositeData) -> DeclTag {
    host.decl_tag(comp.decl).unwrap_or(match comp.kind {
        CompositeKind::Record => DeclTag::Record,
        CompositeKind::Class => DeclTag::Class,
        CompositeKind::Union => DeclTag::Union,
    })
}

/// Undecorated composite behind `ty` plus its payload.
fn composite_parts(
    ctx: &CompilationContext,
    ty: Idx,
    what: &str,
) -> Result<(Idx, CompositeData), GenerationError> {
    let types = ctx.types();
    let basic = types.basic_class(ty).unwrap_or(ty);
    match types.composite(basic) {
        Some(comp) => Ok((basic, comp)),
        None => Err(GenerationError::internal(
            ty,
            format!(
                "`{what}` requested on non-composite type `{}`",
                ctx.format_type(ty)
            ),
        )),
    }
}

// === Dispatch ===

/// Build the generated method `name` for `ty`. Callers have already
/// decided that it must be generated.
pub(super) fn generate_method(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
    name: Name,
) -> Result<SigId, GenerationError> {
    let names = ctx.names();

    if name == names.init {
        return build_init(ctx, host, ty);
    }
    if name == names.init_copy {
        return build_init_copy(ctx, host, ty);
    }
    if name == names.deinit {
        return build_deinit(ctx, host, ty);
    }

    match ctx.types().tag(ty) {
        Tag::Tuple => Ok(type_query(ctx, ty, name, DeclTag::Tuple)),
        Tag::Domain => Ok(type_query(ctx, ty, name, DeclTag::Domain)),
        Tag::Array => Ok(type_query(ctx, ty, name, DeclTag::Array)),
        Tag::CPtr => Ok(type_query(ctx, ty, name, DeclTag::CPtr)),
        Tag::Record if names.is_builtin_type_operator(name) => {
            build_record_operator(ctx, host, ty, name)
        }
        _ => Err(GenerationError::internal(
            ty,
            format!(
                "no generator for `{}` on `{}`",
                ctx.interner().lookup(name),
                ctx.format_type(ty)
            ),
        )),
    }
}

// === Lifecycle methods ===

/// `init`: receiver over the generic type, one formal per field.
fn build_init(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
) -> Result<SigId, GenerationError> {
    let types = ctx.types();
    let names = ctx.names();
    let (basic, comp) = composite_parts(ctx, ty, "init")?;
    let generic = types.generic_root(basic);

    let fields = host.fields_for_type_decl(generic, DefaultsPolicy::IgnoreDefaults);
    if fields.is_generic {
        tracing::warn!(ty = %ctx.format_type(ty), "generated init for generic type");
        return Err(GenerationError::Unsupported {
            feature: UnsupportedFeature::GenericInitializer,
            ty,
        });
    }
    if comp.kind == CompositeKind::Class && comp.has_nontrivial_parent() {
        tracing::warn!(ty = %ctx.format_type(ty), "generated init for inheriting class");
        return Err(GenerationError::Unsupported {
            feature: UnsupportedFeature::InheritingClassInitializer,
            ty,
        });
    }

    let mut parts = Parts::default();
    parts.push(names.this, false, DeclId::NONE, lifecycle_receiver(types, generic));
    for field in &fields {
        let has_default = field.has_default || host.is_default_initializable(field.qt.ty);
        let qt = if field.qt.kind.is_type_or_param() {
            field.qt
        } else {
            field.qt.with_kind(QualKind::In)
        };
        parts.push(field.name, has_default, field.decl, qt);
    }

    let header = Header {
        id: comp.decl,
        name: names.init,
        is_method: true,
        id_tag: composite_tag(host, &comp),
        kind: FnKind::Proc,
    };
    Ok(finish(ctx, header, parts, fields.is_generic))
}

/// `init=`: concrete receiver plus `const ref other` of the same type.
fn build_init_copy(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
) -> Result<SigId, GenerationError> {
    let names = ctx.names();
    let (basic, comp) = composite_parts(ctx, ty, "init=")?;
    let receiver = lifecycle_receiver(ctx.types(), basic_or_instance(ctx, ty, basic));

    let mut parts = Parts::default();
    parts.push(names.this, false, DeclId::NONE, receiver);
    parts.push(names.other, false, DeclId::NONE, receiver.with_kind(QualKind::ConstRef));

    let header = Header {
        id: comp.decl,
        name: names.init_copy,
        is_method: true,
        id_tag: composite_tag(host, &comp),
        kind: FnKind::Proc,
    };
    Ok(finish(ctx, header, parts, false))
}

/// `deinit`: concrete receiver only.
fn build_deinit(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
) -> Result<SigId, GenerationError> {
    let names = ctx.names();
    let (basic, comp) = composite_parts(ctx, ty, "deinit")?;
    let receiver = lifecycle_receiver(ctx.types(), basic_or_instance(ctx, ty, basic));

    let mut parts = Parts::default();
    parts.push(names.this, false, DeclId::NONE, receiver);

    let header = Header {
        id: comp.decl,
        name: names.deinit,
        is_method: true,
        id_tag: composite_tag(host, &comp),
        kind: FnKind::Proc,
    };
    Ok(finish(ctx, header, parts, false))
}

/// The concrete receiver type: the requested type itself, or the basic
/// class for decorated classes (re-decorated as borrowed later).
fn basic_or_instance(ctx: &CompilationContext, ty: Idx, basic: Idx) -> Idx {
    if ctx.types().is_class(ty) {
        basic
    } else {
        ty
    }
}

// === Record operators ===

/// Receiver and `lhs` formals of an operator method over `ty`.
fn unary_operator_parts(
    ctx: &CompilationContext,
    ty: Idx,
    this_kind: QualKind,
    lhs_kind: QualKind,
) -> Parts {
    let names = ctx.names();
    let mut parts = Parts::default();
    parts.push(names.this, false, DeclId::NONE, QualifiedType::new(this_kind, ty));
    parts.push(names.lhs, false, DeclId::NONE, QualifiedType::new(lhs_kind, ty));
    debug_assert_eq!(parts.len(), 2);
    parts
}

/// Extend unary operator parts with the `rhs` formal.
fn binary_operator_parts(ctx: &CompilationContext, parts: &mut Parts, ty: Idx, rhs_kind: QualKind) {
    debug_assert_eq!(parts.len(), 2);
    parts.push(ctx.names().rhs, false, DeclId::NONE, QualifiedType::new(rhs_kind, ty));
    debug_assert_eq!(parts.len(), 3);
}

/// Record `==` (`ref this, ref lhs, const ref rhs`) or `=` (all
/// `const ref`), over the generic record type.
fn build_record_operator(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
    name: Name,
) -> Result<SigId, GenerationError> {
    let names = ctx.names();
    let (_, comp) = composite_parts(ctx, ty, "record operator")?;
    let generic = ctx.types().generic_root(ty);

    let (this_kind, lhs_kind) = if name == names.eq_op {
        (QualKind::Ref, QualKind::Ref)
    } else {
        (QualKind::ConstRef, QualKind::ConstRef)
    };
    let mut parts = unary_operator_parts(ctx, generic, this_kind, lhs_kind);
    binary_operator_parts(ctx, &mut parts, generic, QualKind::ConstRef);

    let header = Header {
        id: comp.decl,
        name,
        is_method: true,
        id_tag: composite_tag(host, &comp),
        kind: FnKind::Operator,
    };
    let needs_instantiation = host.genericity(ty).is_generic();
    Ok(finish(ctx, header, parts, needs_instantiation))
}

// === Builtin type queries ===

/// Query method on a tuple, domain, array or C pointer: a single
/// `const ref this` formal over the exact type.
fn type_query(ctx: &CompilationContext, ty: Idx, name: Name, id_tag: DeclTag) -> SigId {
    let mut parts = Parts::default();
    parts.push(
        ctx.names().this,
        false,
        DeclId::NONE,
        QualifiedType::new(QualKind::ConstRef, ty),
    );
    let header = Header {
        id: DeclId::NONE,
        name,
        is_method: true,
        id_tag,
        kind: FnKind::Proc,
    };
    finish(ctx, header, parts, false)
}

// === Enum casts ===

/// `operator :(from, type to)` between an enum and the integral types.
///
/// Abstract enums have no integer representation, so no cast exists.
pub(super) fn build_enum_cast(
    ctx: &CompilationContext,
    enum_ty: Idx,
    direction: CastDirection,
) -> Option<SigId> {
    let names = ctx.names();
    let data = ctx.types().enum_data(enum_ty)?;
    if data.is_abstract() {
        tracing::debug!("no cast for abstract enum");
        return None;
    }

    let (from, to) = match direction {
        CastDirection::FromEnum => (
            QualifiedType::new(QualKind::DefaultIntent, enum_ty),
            QualifiedType::type_of(Idx::INTEGRAL),
        ),
        CastDirection::ToEnum => (
            QualifiedType::new(QualKind::DefaultIntent, Idx::INTEGRAL),
            QualifiedType::type_of(enum_ty),
        ),
    };

    let mut parts = Parts::default();
    parts.push(names.from, false, DeclId::NONE, from);
    parts.push(names.to, false, DeclId::NONE, to);

    let header = Header {
        id: data.decl,
        name: names.cast_op,
        is_method: false,
        id_tag: DeclTag::Enum,
        kind: FnKind::Operator,
    };
    Some(finish(ctx, header, parts, true))
}

// === Field accessors ===

/// Accessor for `field` of composite `ty`: `ref-maybe-const this`, anchored
/// at the field's declaration.
pub(super) fn build_field_accessor(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
    field: Name,
) -> Option<SigId> {
    let types = ctx.types();
    let basic = types.basic_class(ty).unwrap_or(ty);
    types.composite(basic)?;
    let field_id = host.field_id_with_name(basic, field)?;

    let this_ty = if types.is_class(basic) {
        types.borrowed_non_nil(basic)
    } else {
        basic
    };
    let mut parts = Parts::default();
    parts.push(
        ctx.names().this,
        false,
        DeclId::NONE,
        QualifiedType::new(QualKind::RefMaybeConst, this_ty),
    );

    let header = Header {
        id: field_id,
        name: field,
        is_method: true,
        id_tag: host.decl_tag(field_id).unwrap_or(DeclTag::Field),
        kind: FnKind::Proc,
    };
    Some(finish(ctx, header, parts, false))
}
