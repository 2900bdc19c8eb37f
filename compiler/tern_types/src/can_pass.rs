//! Applicability judgment: can an actual argument bind to a formal?
//!
//! This is the single-candidate check the resolver runs per formal. It
//! reports whether the argument passes and, if so, what it took: an
//! implicit conversion, instantiation of a generic formal, or promotion of
//! an array argument across a scalar formal.

use crate::{ClassDecorator, Idx, Management, QualifiedType, TypeData, TypePool};

/// Implicit conversion applied when an actual passes to a formal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ConversionKind {
    /// No conversion; the actual is used as-is.
    #[default]
    None,
    /// Numeric widening (`int` to `real`).
    Numeric,
    /// A managed class viewed as `borrowed`.
    Borrows,
    /// A derived class viewed as its parent.
    Subtype,
    /// Both `Borrows` and `Subtype`.
    BorrowsSubtype,
    /// A non-nilable class viewed as nilable.
    Nilable,
}

/// Outcome of [`can_pass`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CanPassResult {
    passes: bool,
    conversion: ConversionKind,
    instantiates: bool,
    promotes: bool,
}

impl CanPassResult {
    pub const FAIL: Self = Self {
        passes: false,
        conversion: ConversionKind::None,
        instantiates: false,
        promotes: false,
    };

    pub const EXACT: Self = Self {
        passes: true,
        conversion: ConversionKind::None,
        instantiates: false,
        promotes: false,
    };

    const INSTANTIATES: Self = Self {
        instantiates: true,
        ..Self::EXACT
    };

    const fn converting(conversion: ConversionKind) -> Self {
        Self {
            conversion,
            ..Self::EXACT
        }
    }

    #[inline]
    pub const fn passes(self) -> bool {
        self.passes
    }

    #[inline]
    pub const fn conversion(self) -> ConversionKind {
        self.conversion
    }

    /// Passing needs some implicit conversion.
    #[inline]
    pub const fn converts(self) -> bool {
        !matches!(self.conversion, ConversionKind::None)
    }

    /// The only conversion is viewing a managed class as borrowed.
    #[inline]
    pub const fn converts_with_borrowing(self) -> bool {
        matches!(self.conversion, ConversionKind::Borrows)
    }

    /// The formal is generic and gets instantiated by this actual.
    #[inline]
    pub const fn instantiates(self) -> bool {
        self.instantiates
    }

    /// The call is promoted elementwise over an array actual.
    #[inline]
    pub const fn promotes(self) -> bool {
        self.promotes
    }
}

/// Decide whether `actual` can be passed to `formal`.
pub fn can_pass(pool: &TypePool, actual: QualifiedType, formal: QualifiedType) -> CanPassResult {
    if actual.ty.is_none() || formal.ty.is_none() {
        return CanPassResult::FAIL;
    }

    // Types only bind to type formals, and type formals only accept types.
    if actual.kind.is_type() != formal.kind.is_type() {
        return CanPassResult::FAIL;
    }
    if formal.kind.is_type() {
        let result = pass_types(pool, actual.ty, formal.ty);
        return if result.converts() {
            CanPassResult::FAIL
        } else {
            result
        };
    }

    // Param formals need a compile-time constant.
    if formal.kind.is_param() && !actual.kind.is_param() {
        return CanPassResult::FAIL;
    }

    let result = restrict_for_intent(formal, pass_types(pool, actual.ty, formal.ty));
    if result.passes {
        return result;
    }

    try_promotion(pool, actual, formal)
}

/// Reference intents bind to the actual's storage, so no conversion can
/// be inserted.
fn restrict_for_intent(formal: QualifiedType, result: CanPassResult) -> CanPassResult {
    if formal.kind.is_ref() && result.converts() {
        CanPassResult::FAIL
    } else {
        result
    }
}

fn try_promotion(pool: &TypePool, actual: QualifiedType, formal: QualifiedType) -> CanPassResult {
    let Some(elt) = pool.with(actual.ty, |data| match data {
        TypeData::Array { elt, .. } => Some(*elt),
        _ => None,
    }) else {
        return CanPassResult::FAIL;
    };
    if pool.is_array(formal.ty) {
        return CanPassResult::FAIL;
    }

    let result = restrict_for_intent(formal, pass_types(pool, elt, formal.ty));
    if result.passes {
        CanPassResult {
            promotes: true,
            ..result
        }
    } else {
        CanPassResult::FAIL
    }
}

/// Type-level applicability, ignoring kinds.
fn pass_types(pool: &TypePool, actual: Idx, formal: Idx) -> CanPassResult {
    if actual == formal {
        return CanPassResult::EXACT;
    }

    match formal {
        Idx::ANY => return CanPassResult::INSTANTIATES,
        Idx::INTEGRAL if matches!(actual, Idx::INT | Idx::UINT) => {
            return CanPassResult::INSTANTIATES;
        }
        Idx::REAL if matches!(actual, Idx::INT | Idx::UINT) => {
            return CanPassResult::converting(ConversionKind::Numeric);
        }
        _ => {}
    }

    if pool.is_class(actual) && pool.is_class(formal) {
        return pass_classes(pool, actual, formal);
    }

    // Generic composite formal accepts its instantiations.
    if let Some(formal_data) = pool.composite(formal) {
        if formal_data.instantiated_from.is_none() && pool.generic_root(actual) == formal {
            return CanPassResult::INSTANTIATES;
        }
        return CanPassResult::FAIL;
    }

    let tuples = pool.with(actual, |a| match a {
        TypeData::Tuple(elems) => Some(elems.clone()),
        _ => None,
    });
    if let Some(actual_elems) = tuples {
        let formal_elems = pool.with(formal, |f| match f {
            TypeData::Tuple(elems) => Some(elems.clone()),
            _ => None,
        });
        if let Some(formal_elems) = formal_elems {
            return pass_tuples(pool, &actual_elems, &formal_elems);
        }
    }

    CanPassResult::FAIL
}

/// Elementwise; tuple components must match without conversion.
fn pass_tuples(pool: &TypePool, actual: &[Idx], formal: &[Idx]) -> CanPassResult {
    if actual.len() != formal.len() {
        return CanPassResult::FAIL;
    }
    let mut instantiates = false;
    for (&a, &f) in actual.iter().zip(formal) {
        let elem = pass_types(pool, a, f);
        if !elem.passes || elem.converts() {
            return CanPassResult::FAIL;
        }
        instantiates |= elem.instantiates;
    }
    CanPassResult {
        instantiates,
        ..CanPassResult::EXACT
    }
}

/// Decorator of a class type. A bare basic class used as an actual is a
/// borrow; used as a formal it accepts any management.
fn class_parts(pool: &TypePool, idx: Idx) -> Option<(Idx, Option<ClassDecorator>)> {
    pool.with(idx, |data| match data {
        TypeData::Class { basic, decorator } => Some((*basic, Some(*decorator))),
        TypeData::Composite(_) => Some((idx, None)),
        _ => None,
    })
}

fn pass_classes(pool: &TypePool, actual: Idx, formal: Idx) -> CanPassResult {
    let (Some((actual_basic, actual_dec)), Some((formal_basic, formal_dec))) =
        (class_parts(pool, actual), class_parts(pool, formal))
    else {
        return CanPassResult::FAIL;
    };
    let actual_dec = actual_dec.unwrap_or(ClassDecorator::BORROWED_NONNIL);

    let (borrows, nilable) = match formal_dec {
        // Management-generic formal: anything non-nilable.
        None => {
            if actual_dec.nilable {
                return CanPassResult::FAIL;
            }
            (false, false)
        }
        Some(formal_dec) => {
            if actual_dec.nilable && !formal_dec.nilable {
                return CanPassResult::FAIL;
            }
            let borrows = match (actual_dec.management, formal_dec.management) {
                (a, f) if a == f => false,
                (_, Management::Borrowed) => true,
                _ => return CanPassResult::FAIL,
            };
            (borrows, formal_dec.nilable && !actual_dec.nilable)
        }
    };

    let (subtype, instantiates) = if actual_basic == formal_basic {
        (false, false)
    } else if pool.generic_root(actual_basic) == formal_basic {
        (false, true)
    } else if is_subclass(pool, actual_basic, formal_basic) {
        (true, false)
    } else {
        return CanPassResult::FAIL;
    };

    let conversion = match (borrows, subtype, nilable) {
        (_, _, true) => ConversionKind::Nilable,
        (true, true, false) => ConversionKind::BorrowsSubtype,
        (true, false, false) => ConversionKind::Borrows,
        (false, true, false) => ConversionKind::Subtype,
        (false, false, false) => ConversionKind::None,
    };
    CanPassResult {
        conversion,
        instantiates: instantiates || (formal_dec.is_none() && actual != formal),
        ..CanPassResult::EXACT
    }
}

/// Whether `derived` inherits (transitively) from `base`.
fn is_subclass(pool: &TypePool, derived: Idx, base: Idx) -> bool {
    let mut current = derived;
    // Bounded by the pool size so a malformed parent cycle terminates.
    for _ in 0..pool.len() {
        let Some(parent) = pool.composite(current).and_then(|c| c.parent) else {
            return false;
        };
        if parent == base || pool.generic_root(parent) == base {
            return true;
        }
        if parent == Idx::ROOT_OBJECT {
            return false;
        }
        current = parent;
    }
    false
}
