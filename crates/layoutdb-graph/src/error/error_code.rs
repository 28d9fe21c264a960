//! Error codes for the graph engine.
//!
//! Error codes are organized by phase:
//! - `G0xx` - Index and resolution errors

use std::fmt;

/// Stable codes for categorizing engine errors in user-facing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Index and Resolution Errors (G0xx)
    // =========================================================================
    /// Dangling reference.
    ///
    /// A record refers to an identifier that no record in the input carries.
    /// Usually an upstream parser defect.
    G001,

    /// Duplicate identifier.
    ///
    /// Two records claim the same identifier within one identifier space.
    /// Instance-pins and block-pins share a space, as do routing vias and
    /// via definitions.
    G002,

    /// Malformed input.
    ///
    /// A required top-level field such as the design name or a named region
    /// is missing from the parser output.
    G003,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "G001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::G001 => "G001",
            ErrorCode::G002 => "G002",
            ErrorCode::G003 => "G003",
        }
    }

    /// Returns a short description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::G001 => "dangling reference",
            ErrorCode::G002 => "duplicate identifier",
            ErrorCode::G003 => "malformed input",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
