//! Error codes for semantic-analysis diagnostics.
//!
//! Each code is a unique identifier whose first digit indicates the phase.

use std::fmt;

/// Error codes for diagnostics raised during resolution.
///
/// Format: E#### where first digit indicates phase:
/// - E2xxx: Resolution / type errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Resolution Errors (E2xxx)
    /// Compiler-generated initializer for a generic type is not supported yet
    E2101,
    /// Compiler-generated initializer for an inheriting class is not supported yet
    E2102,

    // Internal Errors (E9xxx)
    /// Internal compiler error (invariant violation)
    E9001,
}

impl ErrorCode {
    /// The code as it appears in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2101 => "E2101",
            ErrorCode::E2102 => "E2102",
            ErrorCode::E9001 => "E9001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
