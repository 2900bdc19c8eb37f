//! Resolved field lists of composite types.

use tern_ir::{DeclId, Name};

use crate::{Idx, QualifiedType};

/// Whether field enumeration substitutes field default values into the
/// field types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefaultsPolicy {
    /// Generic fields stay generic even if they have a default.
    IgnoreDefaults,
    /// Generic fields with a default resolve to the default's type.
    UseDefaults,
}

/// One field of a composite, in declaration order.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedField {
    pub name: Name,
    pub decl: DeclId,
    pub qt: QualifiedType,
    /// The declaration has an explicit default value.
    pub has_default: bool,
}

/// The fields of one composite type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedFields {
    pub ty: Idx,
    pub fields: Vec<ResolvedField>,
    /// At least one field's type is still generic under the policy used.
    pub is_generic: bool,
}

impl ResolvedFields {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedField> {
        self.fields.iter()
    }

    pub fn find(&self, name: Name) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl<'a> IntoIterator for &'a ResolvedFields {
    type Item = &'a ResolvedField;
    type IntoIter = std::slice::Iter<'a, ResolvedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
