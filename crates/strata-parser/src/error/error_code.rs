//! Error codes for the Strata diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Ownership resolution (merging documents into one corpus)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Ownership Resolution (E1xx)
    // =========================================================================
    /// Duplicate type definition.
    ///
    /// The same type name is defined in two documents that resolve to
    /// different resources, so its owner is ambiguous.
    E100,

    /// Duplicate resource.
    ///
    /// Two documents resolve to the same resource name.
    E101,

    /// Scalar redefined.
    ///
    /// A document defines a type whose name is in the scalar set. References
    /// to it are still treated as scalars.
    E102,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "duplicate type definition",
            ErrorCode::E101 => "duplicate resource",
            ErrorCode::E102 => "scalar redefined",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
