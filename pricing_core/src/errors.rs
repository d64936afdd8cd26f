//! # Error Types
//!
//! Structured error types for pricing_core. Every variant serializes to a
//! tagged JSON object so front ends can branch on the error kind without
//! parsing messages.
//!
//! Two calculation-level failures matter to callers and are kept apart:
//! bad input ([`CalcError::InvalidInput`]) and a chimney system that has no
//! expansion rules yet ([`CalcError::NotImplemented`]).
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::errors::{CalcError, CalcResult};
//!
//! fn check_height(height_m: f64) -> CalcResult<()> {
//!     if !(4.0..=30.0).contains(&height_m) {
//!         return Err(CalcError::invalid_input(
//!             "height",
//!             height_m.to_string(),
//!             "Chimney height must be within 4-30 m",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_height(3.5).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pricing_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for pricing and BOM operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not a number, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The requested calculation exists in the catalog of choices but has
    /// no expansion rules yet
    #[error("Not implemented: {feature}")]
    NotImplemented { feature: String },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Component id not present in the chimney catalog
    #[error("Component not found: {component_id}")]
    ComponentNotFound { component_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotImplemented error
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        CalcError::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ComponentNotFound error
    pub fn component_not_found(component_id: impl Into<String>) -> Self {
        CalcError::ComponentNotFound {
            component_id: component_id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from anything printable
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// True for input the caller must correct, as opposed to a missing feature
    pub fn is_validation(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::MissingField { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::NotImplemented { .. } => "NOT_IMPLEMENTED",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::ComponentNotFound { .. } => "COMPONENT_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("height", "3.5", "Chimney height must be within 4-30 m");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::not_implemented("LEIER TURBO").error_code(), "NOT_IMPLEMENTED");
        assert_eq!(CalcError::component_not_found("PK_99").error_code(), "COMPONENT_NOT_FOUND");
    }

    #[test]
    fn test_validation_distinct_from_not_implemented() {
        assert!(CalcError::invalid_input("height", "abc", "not a number").is_validation());
        assert!(!CalcError::not_implemented("LEIER DUO").is_validation());
    }
}
