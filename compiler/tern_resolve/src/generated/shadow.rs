//! Detection of user-written overloads that make generation unnecessary.

use tern_ir::Name;
use tern_types::{Idx, QualifiedType};

use crate::{CompilationContext, FnKind, LookupConfig, ResolutionHost};

/// Whether the scope defining `ty` already declares a method or operator
/// `name` whose receiver accepts `ty`.
///
/// Only exact matches and borrowing conversions count; promotion and any
/// other conversion do not. Types without a defining scope are never
/// shadowed.
pub(super) fn are_overloads_present_in_defining_scope(
    ctx: &CompilationContext,
    host: &dyn ResolutionHost,
    ty: Idx,
    name: Name,
) -> bool {
    let Some(comp) = ctx.types().composite_of(ty) else {
        return false;
    };
    let Some(scope) = host.scope_for_decl(comp.decl) else {
        return false;
    };

    let have = QualifiedType::var(ty);
    let config = LookupConfig::DECLS | LookupConfig::PARENTS | LookupConfig::METHODS;

    for decl in host.lookup_name_in_scope(scope, name, config) {
        let Some(func) = host.function(decl) else {
            continue;
        };
        if !func.is_method && func.kind != FnKind::Operator {
            continue;
        }
        let Some(receiver) = host.initial_receiver_type(decl) else {
            continue;
        };

        let result = host.can_pass(have, receiver);
        tracing::trace!(?decl, ?receiver, ?result, "candidate overload");
        if result.passes()
            && (!result.converts() || result.converts_with_borrowing())
            && !result.promotes()
        {
            return true;
        }
    }

    false
}
