//! Diagnostic system for user-facing error reporting.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary label (where it went wrong)
//! - Notes (why, and what is not supported yet)

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
