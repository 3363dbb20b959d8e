//! # Error Types
//!
//! Structured error types for trig_core. Every failure a caller can observe
//! is one of these variants; each carries enough context to report which
//! category, file or value was involved.
//!
//! A sampled parameter combination that fails a category's validity check is
//! *not* an error. Such samples are discarded inside the retry loop (see
//! [`crate::instance::Rejection`]) and only surface here as
//! [`TrigError::GenerationExhausted`] when every attempt was rejected.
//!
//! ## Example
//!
//! ```rust
//! use trig_core::errors::{TrigError, TrigResult};
//!
//! fn validate_count(count: usize) -> TrigResult<()> {
//!     if count == 0 {
//!         return Err(TrigError::InvalidInput {
//!             field: "count".to_string(),
//!             value: count.to_string(),
//!             reason: "At least one equation must be requested".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for trig_core operations
pub type TrigResult<T> = Result<T, TrigError>;

/// Structured error type for generation, rendering and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum TrigError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// No category is registered under this key
    #[error("Unknown equation category: '{key}'")]
    UnknownCategory { key: String },

    /// Every sampling attempt was rejected
    #[error("Generation exhausted: {category} rejected {attempts} samples")]
    GenerationExhausted { category: String, attempts: usize },

    /// The derived solution set failed the witness check against the equation
    #[error("Inconsistent solution for {category}: {detail}")]
    InconsistentSolution { category: String, detail: String },

    /// Typst compilation or PDF export failed
    #[error("Render failed: {reason}")]
    RenderFailed { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
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

impl TrigError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        TrigError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownCategory error
    pub fn unknown_category(key: impl Into<String>) -> Self {
        TrigError::UnknownCategory { key: key.into() }
    }

    /// Create a GenerationExhausted error
    pub fn generation_exhausted(category: impl Into<String>, attempts: usize) -> Self {
        TrigError::GenerationExhausted {
            category: category.into(),
            attempts,
        }
    }

    /// Create an InconsistentSolution error
    pub fn inconsistent_solution(category: impl Into<String>, detail: impl Into<String>) -> Self {
        TrigError::InconsistentSolution {
            category: category.into(),
            detail: detail.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        TrigError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (a retry with a new seed may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrigError::GenerationExhausted { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TrigError::InvalidInput { .. } => "INVALID_INPUT",
            TrigError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            TrigError::GenerationExhausted { .. } => "GENERATION_EXHAUSTED",
            TrigError::InconsistentSolution { .. } => "INCONSISTENT_SOLUTION",
            TrigError::RenderFailed { .. } => "RENDER_FAILED",
            TrigError::FileError { .. } => "FILE_ERROR",
            TrigError::SerializationError { .. } => "SERIALIZATION_ERROR",
            TrigError::VersionMismatch { .. } => "VERSION_MISMATCH",
            TrigError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for TrigError {
    fn from(e: serde_json::Error) -> Self {
        TrigError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = TrigError::generation_exhausted("Homogeneous", 10_000);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"GenerationExhausted\""));
        let roundtrip: TrigError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TrigError::unknown_category("99").error_code(), "UNKNOWN_CATEGORY");
        assert_eq!(
            TrigError::inconsistent_solution("Simplest", "x = 0").error_code(),
            "INCONSISTENT_SOLUTION"
        );
    }

    #[test]
    fn test_only_exhaustion_is_recoverable() {
        assert!(TrigError::generation_exhausted("Symmetric", 5).is_recoverable());
        assert!(!TrigError::unknown_category("0").is_recoverable());
        assert!(!TrigError::file_error("open", "a.tws", "missing").is_recoverable());
    }
}
