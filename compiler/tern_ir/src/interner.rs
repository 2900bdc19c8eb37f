//! String interning.
//!
//! [`StringInterner`] stores each distinct string once, leaked to `'static`,
//! in an [`InternTable`]. The empty string and the well-known method
//! vocabulary are reserved up front, so interning them never takes a lock.

use std::fmt;
use std::sync::Arc;

use crate::intern_table::{InternTable, InternTableError};
use crate::well_known::VOCABULARY;
use crate::Name;

/// Thread-safe string interner.
///
/// Share across threads via [`SharedInterner`].
pub struct StringInterner {
    table: InternTable<&'static str>,
}

impl StringInterner {
    /// Create an interner holding the empty string and the well-known names.
    pub fn new() -> Self {
        let reserved = std::iter::once("").chain(VOCABULARY.iter().copied());
        StringInterner {
            table: InternTable::with_reserved(reserved),
        }
    }

    /// Intern a string, or report a full shard.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternTableError> {
        if let Some(id) = self.table.find(s) {
            return Ok(Name::from_raw_id(id));
        }
        // A concurrent insert of the same string may win; the table keeps one.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        self.table.try_intern(leaked).map(Name::from_raw_id)
    }

    /// Intern a string.
    ///
    /// # Panics
    /// Panics if a shard is full. Use `try_intern` to handle that case.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The string behind a name.
    ///
    /// # Panics
    /// Panics if the name came from a different interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.get(name.raw_id())
    }

    /// Number of distinct strings, reserved ones included.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing beyond the reserved strings has been interned.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to interned names.
///
/// Formatting code takes this instead of a concrete interner.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Clonable handle to one [`StringInterner`].
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for SharedInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedInterner")
            .field("len", &self.0.len())
            .finish()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
