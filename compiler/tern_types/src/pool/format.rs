//! Type formatting for debugging and log output.

#![allow(clippy::format_push_string)] // Debug formatting prioritizes clarity over allocation

use tern_ir::StringLookup;

use crate::{DomainKind, Idx, TypeData, TypePool};

impl TypePool {
    /// Format a type as a human-readable string.
    pub fn format_type(&self, idx: Idx, names: &dyn StringLookup) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, names, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, idx: Idx, names: &dyn StringLookup, buf: &mut String) {
        if idx.is_none() {
            buf.push_str("<none>");
            return;
        }
        if let Some(name) = idx.name() {
            buf.push_str(name);
            return;
        }

        match self.lookup(idx) {
            TypeData::Composite(c) => {
                buf.push_str(names.lookup(c.name));
                if !c.substitutions.is_empty() {
                    buf.push('(');
                    for (i, (field, ty)) in c.substitutions.iter().enumerate() {
                        if i > 0 {
                            buf.push_str(", ");
                        }
                        buf.push_str(names.lookup(*field));
                        buf.push('=');
                        self.format_type_into(*ty, names, buf);
                    }
                    buf.push(')');
                }
            }
            TypeData::Class { basic, decorator } => {
                buf.push_str(decorator.management.name());
                buf.push(' ');
                self.format_type_into(basic, names, buf);
                if decorator.nilable {
                    buf.push('?');
                }
            }
            TypeData::Tuple(elems) => {
                buf.push('(');
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    self.format_type_into(*elem, names, buf);
                }
                buf.push(')');
            }
            TypeData::Array { domain, elt } => {
                buf.push('[');
                self.format_type_into(domain, names, buf);
                buf.push_str("] ");
                self.format_type_into(elt, names, buf);
            }
            TypeData::Domain(DomainKind::Rectangular {
                rank,
                idx_type,
                strided,
            }) => {
                buf.push_str(&format!("domain({rank}, "));
                self.format_type_into(idx_type, names, buf);
                if strided {
                    buf.push_str(", strided");
                }
                buf.push(')');
            }
            TypeData::Domain(DomainKind::Associative { idx_type, par_safe }) => {
                buf.push_str("domain(");
                self.format_type_into(idx_type, names, buf);
                if par_safe {
                    buf.push_str(", parSafe");
                }
                buf.push(')');
            }
            TypeData::CPtr { elt } => {
                buf.push_str("c_ptr(");
                self.format_type_into(elt, names, buf);
                buf.push(')');
            }
            TypeData::Enum(e) => buf.push_str(names.lookup(e.name)),
            // Primitives are handled by `Idx::name` above.
            TypeData::Int
            | TypeData::UInt
            | TypeData::Real
            | TypeData::Bool
            | TypeData::String
            | TypeData::Nothing
            | TypeData::AnyIntegral
            | TypeData::Any
            | TypeData::RootObject => buf.push_str(self.tag(idx).name()),
        }
    }
}
