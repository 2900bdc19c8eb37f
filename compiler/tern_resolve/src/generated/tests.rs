use pretty_assertions::assert_eq;
use smallvec::SmallVec;
use tern_diagnostic::ErrorCode;
use tern_ir::{DeclId, DeclTag, Name, Span};
use tern_types::{
    ClassDecorator, DefaultsPolicy, Genericity, Idx, QualKind, QualifiedType, ResolvedField,
    ResolvedFields, TypePool,
};

use super::*;
use crate::{
    FieldDecl, FnDecl, FnFormal, FnKind, LookupConfig, ModuleDb, ScopeId, TypedFnSignature,
    UntypedFnSignature,
};

struct Fixture {
    ctx: CompilationContext,
    db: ModuleDb,
    module: DeclId,
}

impl Fixture {
    fn new() -> Self {
        let ctx = CompilationContext::new();
        let mut db = ModuleDb::new(&ctx);
        let module = db.add_module("M", None);
        Self { ctx, db, module }
    }

    fn name(&self, s: &str) -> Name {
        self.ctx.interner().intern(s)
    }

    fn need(&self, ty: Idx, name: &str, parenless: bool) -> bool {
        need_compiler_generated_method(&self.ctx, &self.db, ty, self.name(name), parenless)
    }

    fn get(&self, ty: Idx, name: &str, parenless: bool) -> Result<Option<SigId>, GenerationError> {
        get_compiler_generated_method(&self.ctx, &self.db, ty, self.name(name), parenless)
    }

    fn generated(&self, ty: Idx, name: &str) -> SigId {
        match self.get(ty, name, false) {
            Ok(Some(sig)) => sig,
            other => panic!("expected generated `{name}`, got {other:?}"),
        }
    }

    fn sig(&self, sig: SigId) -> (UntypedFnSignature, TypedFnSignature) {
        let typed = self.ctx.signatures().typed(sig);
        (self.ctx.signatures().untyped(typed.untyped), typed)
    }

    fn formal_names(&self, sig: SigId) -> Vec<&'static str> {
        let (untyped, _) = self.sig(sig);
        untyped
            .formals
            .iter()
            .map(|f| self.ctx.interner().lookup(f.name))
            .collect()
    }

    fn formal_kinds(&self, sig: SigId) -> Vec<QualKind> {
        let (_, typed) = self.sig(sig);
        typed.formal_types.iter().map(|qt| qt.kind).collect()
    }

    /// `record R { var a: int; type b = int... }` style helper: concrete
    /// record with the given fields.
    fn record(&mut self, name: &str, fields: &[(&str, FieldDecl)]) -> Idx {
        let ty = self.db.add_record(self.module, name);
        for &(field, decl) in fields {
            self.db.add_field(ty, field, decl);
        }
        ty
    }
}

fn this_formal(ty: Idx) -> QualifiedType {
    QualifiedType::new(QualKind::DefaultIntent, ty)
}

// === Decision engine ===

#[test]
fn lifecycle_methods_are_generated_for_records() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);

    assert!(f.need(r, "init", false));
    assert!(f.need(r, "init=", false));
    assert!(f.need(r, "deinit", false));
    assert!(!f.need(r, "foo", false));
}

#[test]
fn record_operators_are_generated() {
    let mut f = Fixture::new();
    let r = f.record("R", &[]);
    assert!(f.need(r, "==", false));
    assert!(f.need(r, "=", false));
    assert!(!f.need(r, "<", false));
}

#[test]
fn record_operators_are_not_generated_for_classes() {
    let mut f = Fixture::new();
    let c = f.db.add_class(f.module, "C", None);
    assert!(!f.need(c, "==", false));
    assert!(!f.need(f.ctx.types().borrowed_non_nil(c), "=", false));
    assert!(f.need(c, "init", false));
}

#[test]
fn user_init_shadows_generated_init() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);
    f.db.add_method(r, "init", FnKind::Proc, this_formal(r), &[]);

    assert!(!f.need(r, "init", false));
    assert_eq!(f.get(r, "init", false), Ok(None));
    // Other lifecycle methods are unaffected.
    assert!(f.need(r, "init=", false));
    assert!(f.need(r, "deinit", false));
}

#[test]
fn secondary_method_in_module_shadows() {
    let mut f = Fixture::new();
    let r = f.record("R", &[]);
    f.db.add_secondary_method(f.module, "deinit", FnKind::Proc, this_formal(r), &[]);
    assert!(!f.need(r, "deinit", false));
}

#[test]
fn user_operator_shadows_record_comparison() {
    let mut f = Fixture::new();
    let r = f.record("R", &[]);
    let lhs = FnFormal::new(f.name("a"), this_formal(r));
    let rhs = FnFormal::new(f.name("b"), this_formal(r));
    f.db.add_operator(f.module, "==", &[lhs, rhs]);

    assert!(!f.need(r, "==", false));
    assert!(f.need(r, "=", false));
}

#[test]
fn non_method_procs_do_not_shadow() {
    let mut f = Fixture::new();
    let r = f.record("R", &[]);
    let x = FnFormal::new(f.name("x"), this_formal(r));
    f.db.add_proc(f.module, "init", &[x]);
    assert!(f.need(r, "init", false));
}

#[test]
fn methods_on_other_types_do_not_shadow() {
    let mut f = Fixture::new();
    let r = f.record("R", &[]);
    let s = f.record("S", &[]);
    f.db.add_secondary_method(f.module, "init", FnKind::Proc, this_formal(s), &[]);
    assert!(f.need(r, "init", false));
    assert!(!f.need(s, "init", false));
}

#[test]
fn overloads_outside_the_defining_module_do_not_shadow() {
    let mut f = Fixture::new();
    let inner = f.db.add_module("Inner", Some(f.module));
    let r = f.db.add_record(inner, "R");
    // Declared in the outer module: not visible from R's defining scope.
    f.db.add_secondary_method(f.module, "init", FnKind::Proc, this_formal(r), &[]);
    assert!(f.need(r, "init", false));
}

#[test]
fn converting_receivers_do_not_shadow() {
    let mut f = Fixture::new();
    let base = f.db.add_class(f.module, "Base", None);
    let derived = f.db.add_class(f.module, "Derived", Some(base));
    let base_receiver = QualifiedType::new(QualKind::ConstIn, f.ctx.types().borrowed_non_nil(base));
    f.db.add_secondary_method(f.module, "deinit", FnKind::Proc, base_receiver, &[]);

    // Base's own deinit is user-written; Derived's would only match through
    // a subtype conversion, so it is still generated.
    let borrowed_derived = f.ctx.types().borrowed_non_nil(derived);
    assert!(!f.need(f.ctx.types().borrowed_non_nil(base), "deinit", false));
    assert!(f.need(borrowed_derived, "deinit", false));
}

#[test]
fn borrowing_receivers_shadow() {
    let mut f = Fixture::new();
    let c = f.db.add_class(f.module, "C", None);
    let types = f.ctx.types().clone();
    let receiver = QualifiedType::new(QualKind::ConstIn, types.borrowed_non_nil(c));
    f.db.add_method(c, "deinit", FnKind::Proc, receiver, &[]);

    let owned = types.decorated_class(c, ClassDecorator::OWNED_NONNIL);
    assert!(!f.need(owned, "deinit", false));
}

#[test]
fn generic_receiver_instantiation_shadows() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("t", FieldDecl::type_field())]);
    let Some(inst) = f.db.instantiate(r, &[("t", Idx::INT)]) else {
        panic!("record instantiation");
    };
    f.db.add_method(r, "init=", FnKind::Proc, this_formal(r), &[]);
    assert!(!f.need(inst, "init=", false));
}

#[test]
fn tuple_size_ignores_user_overloads() {
    let mut f = Fixture::new();
    let tup = f.ctx.types().tuple([Idx::INT, Idx::REAL]);
    let x = FnFormal::new(f.name("t"), this_formal(tup));
    f.db.add_operator(f.module, "size", &[x]);

    assert!(f.need(tup, "size", false));
    assert!(f.need(tup, "size", true));
    assert!(!f.need(tup, "rank", true));
}

#[test]
fn domain_queries_depend_on_call_shape() {
    let f = Fixture::new();
    let dom = f.ctx.types().rectangular_domain(2, Idx::INT, false);

    for name in ["idxType", "rank", "stridable", "parSafe"] {
        assert!(f.need(dom, name, true), "{name} parenless");
        assert!(!f.need(dom, name, false), "{name} with parens");
        assert!(matches!(f.get(dom, name, true), Ok(Some(_))));
    }
    for name in ["isRectangular", "isAssociative"] {
        assert!(f.need(dom, name, false), "{name} with parens");
        assert!(!f.need(dom, name, true), "{name} parenless");
        assert!(matches!(f.get(dom, name, false), Ok(Some(_))));
    }
    assert_eq!(f.get(dom, "idxType", false), Ok(None));
}

#[test]
fn array_and_pointer_queries() {
    let f = Fixture::new();
    let types = f.ctx.types();
    let dom = types.rectangular_domain(1, Idx::INT, false);
    let arr = types.array(dom, Idx::REAL);
    let ptr = types.c_ptr(Idx::INT);

    assert!(f.need(arr, "domain", false));
    assert!(f.need(arr, "eltType", true));
    assert!(!f.need(arr, "size", false));
    assert!(f.need(ptr, "eltType", true));
    assert!(!f.need(ptr, "domain", true));
}

#[test]
fn unrelated_types_get_nothing() {
    let f = Fixture::new();
    assert!(!f.need(Idx::INT, "size", false));
    assert!(!f.need(Idx::INT, "==", false));
    assert_eq!(f.get(Idx::BOOL, "eltType", true), Ok(None));
}

// === Builders ===

#[test]
fn init_formals_follow_field_order() {
    let mut f = Fixture::new();
    let r = f.record(
        "R",
        &[
            ("a", FieldDecl::var(Idx::INT)),
            ("b", FieldDecl::const_var(Idx::STRING).with_default(Idx::STRING)),
            ("c", FieldDecl::param(Idx::BOOL).with_default(Idx::BOOL)),
        ],
    );
    // Param fields with defaults are generic-with-defaults, which init does
    // not support; drop `c` for the concrete case below.
    assert!(matches!(
        f.get(r, "init", false),
        Err(GenerationError::Unsupported {
            feature: UnsupportedFeature::GenericInitializer,
            ..
        })
    ));

    let s = f.record(
        "S",
        &[
            ("a", FieldDecl::var(Idx::INT)),
            ("b", FieldDecl::const_var(Idx::STRING).with_default(Idx::STRING)),
            ("c", FieldDecl::var(Idx::REAL)),
        ],
    );
    let init = f.generated(s, "init");
    assert_eq!(f.formal_names(init), vec!["this", "a", "b", "c"]);
    assert_eq!(
        f.formal_kinds(init),
        vec![QualKind::Ref, QualKind::In, QualKind::In, QualKind::In]
    );

    let (untyped, typed) = f.sig(init);
    assert!(untyped.is_method);
    assert!(untyped.is_compiler_generated);
    assert_eq!(untyped.kind, FnKind::Proc);
    assert_eq!(untyped.id_tag, DeclTag::Record);
    assert_eq!(Some(untyped.id), f.ctx.types().decl_of(s));
    assert!(!typed.needs_instantiation);
    assert_eq!(typed.instantiated_from, None);
    assert_eq!(typed.parent_fn, None);
    assert_eq!(typed.formal_type(1).map(|qt| qt.ty), Some(Idx::INT));
    assert_eq!(
        untyped.formals[1].decl,
        f.db.field_id_with_name(s, f.name("a")).unwrap_or(DeclId::NONE)
    );
}

#[test]
fn init_defaults_come_from_initializers_and_default_initializable_types() {
    let mut f = Fixture::new();
    let c = f.db.add_class(f.module, "C", None);
    let owned_c = f.ctx.types().decorated_class(c, ClassDecorator::OWNED_NONNIL);
    let nilable_c = f
        .ctx
        .types()
        .decorated_class(c, ClassDecorator::new(tern_types::Management::Owned, true));
    let r = f.record(
        "R",
        &[
            ("i", FieldDecl::var(Idx::INT)),
            ("owned", FieldDecl::var(owned_c)),
            ("owned_default", FieldDecl::var(owned_c).with_default(owned_c)),
            ("maybe", FieldDecl::var(nilable_c)),
        ],
    );

    let init = f.generated(r, "init");
    let (untyped, _) = f.sig(init);
    let defaults: Vec<bool> = untyped.formals.iter().map(|d| d.has_default).collect();
    assert_eq!(defaults, vec![false, true, false, true, true]);
}

#[test]
fn init_on_instantiation_uses_generic_type() {
    let mut f = Fixture::new();
    let r = f.record(
        "R",
        &[("t", FieldDecl::type_field()), ("p", FieldDecl::param(Idx::INT))],
    );
    let Some(inst) = f.db.instantiate(r, &[("t", Idx::REAL), ("p", Idx::INT)]) else {
        panic!("record instantiation");
    };
    // The receiver is always the generic type, whose fields are generic.
    assert!(matches!(
        f.get(inst, "init", false),
        Err(GenerationError::Unsupported { .. })
    ));

    // init= and deinit use the concrete type and are fine.
    let copy = f.generated(inst, "init=");
    let (_, typed) = f.sig(copy);
    assert_eq!(typed.formal_type(0), Some(QualifiedType::new(QualKind::Ref, inst)));
}

/// Delegates to a `ModuleDb` but reports a fixed field list.
struct FixedFieldsHost<'a> {
    db: &'a ModuleDb,
    fields: ResolvedFields,
}

impl ResolutionHost for FixedFieldsHost<'_> {
    fn type_pool(&self) -> &TypePool {
        self.db.type_pool()
    }
    fn decl_tag(&self, decl: DeclId) -> Option<DeclTag> {
        self.db.decl_tag(decl)
    }
    fn decl_span(&self, decl: DeclId) -> Span {
        self.db.decl_span(decl)
    }
    fn scope_for_decl(&self, decl: DeclId) -> Option<ScopeId> {
        self.db.scope_for_decl(decl)
    }
    fn lookup_name_in_scope(
        &self,
        scope: ScopeId,
        name: Name,
        config: LookupConfig,
    ) -> SmallVec<[DeclId; 4]> {
        self.db.lookup_name_in_scope(scope, name, config)
    }
    fn function(&self, decl: DeclId) -> Option<&FnDecl> {
        self.db.function(decl)
    }
    fn initial_receiver_type(&self, decl: DeclId) -> Option<QualifiedType> {
        self.db.initial_receiver_type(decl)
    }
    fn fields_for_type_decl(&self, _ty: Idx, _policy: DefaultsPolicy) -> ResolvedFields {
        self.fields.clone()
    }
    fn is_default_initializable(&self, ty: Idx) -> bool {
        self.db.is_default_initializable(ty)
    }
    fn genericity(&self, ty: Idx) -> Genericity {
        self.db.genericity(ty)
    }
    fn field_id_with_name(&self, ty: Idx, name: Name) -> Option<DeclId> {
        self.db.field_id_with_name(ty, name)
    }
}

#[test]
fn init_keeps_type_and_param_field_kinds() {
    let mut f = Fixture::new();
    let r = f.record(
        "R",
        &[
            ("t", FieldDecl::type_field()),
            ("p", FieldDecl::param(Idx::INT)),
            ("v", FieldDecl::var(Idx::REAL)),
        ],
    );
    let field = |name: &str, qt: QualifiedType| ResolvedField {
        name: f.name(name),
        decl: f.db.field_id_with_name(r, f.name(name)).unwrap_or(DeclId::NONE),
        qt,
        has_default: false,
    };
    let host = FixedFieldsHost {
        db: &f.db,
        fields: ResolvedFields {
            ty: r,
            fields: vec![
                field("t", QualifiedType::type_of(Idx::INT)),
                field("p", QualifiedType::new(QualKind::Param, Idx::INT)),
                field("v", QualifiedType::var(Idx::REAL)),
            ],
            is_generic: false,
        },
    };

    let init = get_compiler_generated_method(&f.ctx, &host, r, f.name("init"), false);
    let Ok(Some(init)) = init else {
        panic!("init over a concrete field list");
    };
    assert_eq!(f.formal_names(init), vec!["this", "t", "p", "v"]);
    assert_eq!(
        f.formal_kinds(init),
        vec![QualKind::Ref, QualKind::Type, QualKind::Param, QualKind::In]
    );
}

#[test]
fn init_receiver_for_classes_is_borrowed() {
    let mut f = Fixture::new();
    let c = f.db.add_class(f.module, "C", None);
    f.db.add_field(c, "x", FieldDecl::var(Idx::INT));

    let owned = f.ctx.types().decorated_class(c, ClassDecorator::OWNED_NONNIL);
    let init = f.generated(owned, "init");
    let (untyped, typed) = f.sig(init);

    let borrowed = f.ctx.types().borrowed_non_nil(c);
    assert_eq!(typed.formal_type(0), Some(QualifiedType::new(QualKind::ConstIn, borrowed)));
    assert_eq!(untyped.id_tag, DeclTag::Class);
    assert_eq!(f.ctx.format_signature(init), "proc init(const in this: borrowed C, in x: int = ?)");
}

#[test]
fn init_for_inheriting_class_is_unsupported() {
    let mut f = Fixture::new();
    let base = f.db.add_class(f.module, "Base", None);
    let derived = f.db.add_class(f.module, "Derived", Some(base));
    let rooted = f.db.add_class(f.module, "Rooted", Some(Idx::ROOT_OBJECT));

    let err = f.get(derived, "init", false);
    assert_eq!(
        err,
        Err(GenerationError::Unsupported {
            feature: UnsupportedFeature::InheritingClassInitializer,
            ty: derived,
        })
    );
    assert!(matches!(f.get(rooted, "init", false), Ok(Some(_))));
    // init= and deinit are still generated for derived classes.
    assert!(matches!(f.get(derived, "deinit", false), Ok(Some(_))));
}

#[test]
fn generic_check_precedes_inheritance_check() {
    let mut f = Fixture::new();
    let base = f.db.add_class(f.module, "Base", None);
    let derived = f.db.add_class(f.module, "Derived", Some(base));
    f.db.add_field(derived, "x", FieldDecl::untyped_var());

    assert!(matches!(
        f.get(derived, "init", false),
        Err(GenerationError::Unsupported {
            feature: UnsupportedFeature::GenericInitializer,
            ..
        })
    ));
}

#[test]
fn init_copy_shape() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);
    let c = f.db.add_class(f.module, "C", None);
    let u = f.db.add_union(f.module, "U");

    for (ty, this_kind) in [(r, QualKind::Ref), (c, QualKind::ConstIn), (u, QualKind::Ref)] {
        let sig = f.generated(ty, "init=");
        let (untyped, typed) = f.sig(sig);
        assert_eq!(f.formal_names(sig), vec!["this", "other"]);
        assert_eq!(f.formal_kinds(sig), vec![this_kind, QualKind::ConstRef]);
        assert_eq!(typed.formal_types[0].ty, typed.formal_types[1].ty);
        assert!(!typed.needs_instantiation);
        assert_eq!(untyped.kind, FnKind::Proc);
    }
}

#[test]
fn deinit_shape() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);
    let sig = f.generated(r, "deinit");
    assert_eq!(f.formal_names(sig), vec!["this"]);
    assert_eq!(f.formal_kinds(sig), vec![QualKind::Ref]);
}

#[test]
fn record_comparison_intents() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);

    let eq = f.generated(r, "==");
    assert_eq!(f.formal_names(eq), vec!["this", "lhs", "rhs"]);
    assert_eq!(
        f.formal_kinds(eq),
        vec![QualKind::Ref, QualKind::Ref, QualKind::ConstRef]
    );

    let assign = f.generated(r, "=");
    assert_eq!(
        f.formal_kinds(assign),
        vec![QualKind::ConstRef, QualKind::ConstRef, QualKind::ConstRef]
    );

    let (untyped, typed) = f.sig(eq);
    assert_eq!(untyped.kind, FnKind::Operator);
    assert!(untyped.is_method);
    assert!(!typed.needs_instantiation);
}

#[test]
fn record_operators_over_generic_records() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("t", FieldDecl::type_field())]);
    let Some(inst) = f.db.instantiate(r, &[("t", Idx::INT)]) else {
        panic!("record instantiation");
    };

    let generic_eq = f.generated(r, "==");
    let (_, typed) = f.sig(generic_eq);
    assert!(typed.needs_instantiation);
    assert!(typed.formal_types.iter().all(|qt| qt.ty == r));

    // Instantiations use the generic record in their formals but are
    // themselves concrete.
    let inst_eq = f.generated(inst, "==");
    let (_, typed) = f.sig(inst_eq);
    assert!(!typed.needs_instantiation);
    assert!(typed.formal_types.iter().all(|qt| qt.ty == r));
}

#[test]
fn builtin_query_shape() {
    let f = Fixture::new();
    let types = f.ctx.types();
    let tup = types.tuple([Idx::INT]);
    let dom = types.associative_domain(Idx::STRING, false);
    let arr = types.array(dom, Idx::INT);
    let ptr = types.c_ptr(Idx::REAL);

    for (ty, name, parenless, tag) in [
        (tup, "size", false, DeclTag::Tuple),
        (dom, "isAssociative", false, DeclTag::Domain),
        (arr, "eltType", true, DeclTag::Array),
        (ptr, "eltType", true, DeclTag::CPtr),
    ] {
        let Ok(Some(sig)) = f.get(ty, name, parenless) else {
            panic!("expected `{name}` to be generated");
        };
        let (untyped, typed) = f.sig(sig);
        assert_eq!(untyped.id, DeclId::NONE);
        assert_eq!(untyped.id_tag, tag);
        assert_eq!(f.ctx.interner().lookup(untyped.name), name);
        assert_eq!(typed.formal_types.as_slice(), &[QualifiedType::new(QualKind::ConstRef, ty)]);
        assert!(!typed.needs_instantiation);
    }
}

#[test]
fn lifecycle_on_non_composite_is_internal_error() {
    let f = Fixture::new();
    let tup = f.ctx.types().tuple([Idx::INT]);
    assert!(f.need(tup, "init", false));
    let err = f.get(tup, "init", false);
    assert!(matches!(err, Err(GenerationError::Internal { .. })));
}

// === Binary operators ===

#[test]
fn enum_casts() {
    let mut f = Fixture::new();
    let color = f.db.add_enum(f.module, "Color", &[("red", Some(1)), ("green", None)]);
    let abstract_enum = f.db.add_enum(f.module, "Kind", &[("a", None), ("b", None)]);
    let cast = f.name(":");

    let from = get_compiler_generated_binary_op(
        &f.ctx,
        QualifiedType::var(color),
        QualifiedType::type_of(Idx::INT),
        cast,
    );
    let Some(from) = from else {
        panic!("concrete enums cast to integers");
    };
    let (untyped, typed) = f.sig(from);
    assert_eq!(f.formal_names(from), vec!["from", "to"]);
    assert_eq!(
        typed.formal_types.as_slice(),
        &[
            QualifiedType::new(QualKind::DefaultIntent, color),
            QualifiedType::type_of(Idx::INTEGRAL),
        ]
    );
    assert!(typed.needs_instantiation);
    assert!(!untyped.is_method);
    assert_eq!(untyped.kind, FnKind::Operator);
    assert_eq!(untyped.id_tag, DeclTag::Enum);

    let to = get_compiler_generated_binary_op(
        &f.ctx,
        QualifiedType::var(Idx::INT),
        QualifiedType::type_of(color),
        cast,
    );
    let Some(to) = to else {
        panic!("integers cast to concrete enums");
    };
    let (_, typed) = f.sig(to);
    assert_eq!(
        typed.formal_types.as_slice(),
        &[
            QualifiedType::new(QualKind::DefaultIntent, Idx::INTEGRAL),
            QualifiedType::type_of(color),
        ]
    );

    assert_eq!(
        get_compiler_generated_binary_op(
            &f.ctx,
            QualifiedType::var(abstract_enum),
            QualifiedType::type_of(Idx::INT),
            cast,
        ),
        None
    );
}

#[test]
fn only_casts_are_generated_binary_ops() {
    let mut f = Fixture::new();
    let color = f.db.add_enum(f.module, "Color", &[("red", Some(0))]);
    let plus = f.name("+");
    assert_eq!(
        get_compiler_generated_binary_op(
            &f.ctx,
            QualifiedType::var(color),
            QualifiedType::var(Idx::INT),
            plus,
        ),
        None
    );
    let cast = f.name(":");
    assert_eq!(
        get_compiler_generated_binary_op(
            &f.ctx,
            QualifiedType::var(Idx::INT),
            QualifiedType::type_of(Idx::REAL),
            cast,
        ),
        None
    );
}

#[test]
fn casts_with_unknown_operand_types_are_absent() {
    let mut f = Fixture::new();
    let color = f.db.add_enum(f.module, "Color", &[("red", Some(0))]);
    let cast = f.name(":");

    assert_eq!(
        get_compiler_generated_binary_op(
            &f.ctx,
            QualifiedType::var(Idx::INT),
            QualifiedType::type_of(Idx::NONE),
            cast,
        ),
        None
    );
    assert_eq!(
        get_compiler_generated_binary_op(
            &f.ctx,
            QualifiedType::var(Idx::NONE),
            QualifiedType::type_of(Idx::INT),
            cast,
        ),
        None
    );

    // An unknown lhs does not hide an enum rhs.
    let to = get_compiler_generated_binary_op(
        &f.ctx,
        QualifiedType::var(Idx::NONE),
        QualifiedType::type_of(color),
        cast,
    );
    assert!(to.is_some());
}

#[test]
fn unknown_type_needs_no_generated_method() {
    let f = Fixture::new();
    for name in ["init", "init=", "deinit", "==", "size", "eltType"] {
        assert!(!f.need(Idx::NONE, name, false));
        assert!(matches!(f.get(Idx::NONE, name, false), Ok(None)));
    }
    assert!(!f.need(Idx::NONE, "rank", true));
}

// === Field accessors ===

#[test]
fn field_accessor_shape() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT)), ("y", FieldDecl::var(Idx::REAL))]);
    let y = f.name("y");

    let Some(sig) = field_accessor(&f.ctx, &f.db, Some(r), y) else {
        panic!("field accessor for y");
    };
    let (untyped, typed) = f.sig(sig);
    assert_eq!(untyped.name, y);
    assert_eq!(Some(untyped.id), f.db.field_id_with_name(r, y));
    assert_eq!(untyped.id_tag, DeclTag::Field);
    assert!(untyped.is_method);
    assert_eq!(typed.formal_types.as_slice(), &[QualifiedType::new(QualKind::RefMaybeConst, r)]);
}

#[test]
fn field_accessor_on_class_borrows() {
    let mut f = Fixture::new();
    let c = f.db.add_class(f.module, "C", None);
    f.db.add_field(c, "x", FieldDecl::var(Idx::INT));

    let Some(sig) = field_accessor(&f.ctx, &f.db, Some(c), f.name("x")) else {
        panic!("field accessor for x");
    };
    let (_, typed) = f.sig(sig);
    assert_eq!(
        typed.formal_type(0),
        Some(QualifiedType::new(QualKind::RefMaybeConst, f.ctx.types().borrowed_non_nil(c)))
    );
}

#[test]
fn field_accessor_absent_cases() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);
    let x = f.name("x");
    assert_eq!(field_accessor(&f.ctx, &f.db, None, x), None);
    assert_eq!(field_accessor(&f.ctx, &f.db, Some(Idx::NONE), x), None);
    assert_eq!(field_accessor(&f.ctx, &f.db, Some(Idx::INT), x), None);
    assert_eq!(field_accessor(&f.ctx, &f.db, Some(r), f.name("nope")), None);
}

// === Memoization ===

#[test]
fn repeated_requests_return_the_same_signature() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);

    let first = f.generated(r, "init");
    let misses = f.ctx.generated().stats().methods.misses;
    for _ in 0..10 {
        assert_eq!(f.generated(r, "init"), first);
    }
    let stats = f.ctx.generated().stats();
    assert_eq!(stats.methods.misses, misses);
    assert_eq!(stats.methods.hits, 10);
    assert_eq!(stats.methods.entries, 1);
}

#[test]
fn parenless_is_part_of_the_key() {
    let mut f = Fixture::new();
    let r = f.record("R", &[]);
    f.generated(r, "deinit");
    let _ = f.get(r, "deinit", true);
    assert_eq!(f.ctx.generated().stats().methods.entries, 2);
}

#[test]
fn errors_are_memoized() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::untyped_var())]);
    let first = f.get(r, "init", false);
    let second = f.get(r, "init", false);
    assert!(first.is_err());
    assert_eq!(first, second);
    assert_eq!(f.ctx.generated().stats().methods.hits, 1);
}

#[test]
fn binary_ops_and_accessors_are_memoized() {
    let mut f = Fixture::new();
    let color = f.db.add_enum(f.module, "Color", &[("red", Some(0))]);
    let r = f.record("R", &[("x", FieldDecl::var(Idx::INT))]);
    let cast = f.name(":");
    let x = f.name("x");

    let lhs = QualifiedType::var(color);
    let rhs = QualifiedType::type_of(Idx::INT);
    let a = get_compiler_generated_binary_op(&f.ctx, lhs, rhs, cast);
    let b = get_compiler_generated_binary_op(&f.ctx, lhs, rhs, cast);
    assert_eq!(a, b);

    let c = field_accessor(&f.ctx, &f.db, Some(r), x);
    let d = field_accessor(&f.ctx, &f.db, Some(r), x);
    assert_eq!(c, d);

    let stats = f.ctx.generated().stats();
    assert_eq!(stats.binary_ops.hits, 1);
    assert_eq!(stats.accessors.hits, 1);
}

// === Diagnostics ===

#[test]
fn unsupported_features_become_diagnostics_at_the_type_declaration() {
    let mut f = Fixture::new();
    let r = f.record("R", &[("x", FieldDecl::untyped_var())]);
    let Some(decl) = f.ctx.types().decl_of(r) else {
        panic!("record declaration");
    };
    let span = Span::new(10, 20);
    f.db.set_span(decl, span);

    let Err(err) = f.get(r, "init", false) else {
        panic!("generic init is unsupported");
    };
    assert_eq!(err.ty(), r);

    let diag = err.to_diagnostic(&f.ctx, &f.db);
    assert_eq!(diag.code, ErrorCode::E2101);
    assert_eq!(diag.primary_span(), Some(span));
    assert!(diag.message.contains("`R`"), "{}", diag.message);
}

#[test]
fn internal_errors_become_ice_diagnostics() {
    let f = Fixture::new();
    let tup = f.ctx.types().tuple([Idx::INT]);
    let Err(err) = f.get(tup, "deinit", false) else {
        panic!("deinit on a tuple has no generator");
    };
    assert_eq!(err.ty(), tup);

    let diag = err.to_diagnostic(&f.ctx, &f.db);
    assert_eq!(diag.code, ErrorCode::E9001);
    // Tuples have no declaration to point at.
    assert_eq!(diag.primary_span(), Some(Span::DUMMY));
}
