//! Whether a method has to be generated for a type.

use tern_ir::Name;
use tern_types::{Idx, Tag};

use super::shadow::are_overloads_present_in_defining_scope;
use crate::{CompilationContext, ResolutionHost};

/// Rules, first match wins:
/// 1. `init`, `deinit`, `init=` on any type, unless shadowed
/// 2. `==` and `=` on records, unless shadowed
/// 3. `size` on tuples
/// 4. domain queries (`idxType`, `rank`, `stridable`, `parSafe` without
///    parentheses; `isRectangular`, `isAssociative` with them)
/// 5. `domain` and `eltType` on arrays
/// 6. `eltType` on C pointers
///
/// A shadowed rule 1 or 2 falls through to the remaining rules.
pub(super) fn need_method(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
    name: Name,
    parenless: bool,
) -> bool {
    let names = ctx.names();
    let types = ctx.types();

    let shadowable = names.is_lifecycle_method(name)
        || (types.is_record(ty) && names.is_builtin_type_operator(name));
    if shadowable {
        if !are_overloads_present_in_defining_scope(ctx, host, ty, name) {
            return true;
        }
        tracing::debug!("user overload shadows the generated method");
    }

    match types.tag(ty) {
        Tag::Tuple => name == names.size,
        Tag::Domain if parenless => names.is_parenless_domain_query(name),
        Tag::Domain => names.is_paren_domain_query(name),
        Tag::Array => names.is_array_query(name),
        Tag::CPtr => name == names.elt_type,
        _ => false,
    }
}
