//! Error types for skills-ml
//!
//! This module provides the crate-wide error taxonomy using thiserror for
//! structured error definitions and anyhow for error propagation at the
//! binary boundary.

use thiserror::Error;

/// Main error type for skills-ml operations
#[derive(Error, Debug)]
pub enum SkillsMlError {
    /// A required field is absent on a record
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the absent field
        field: String,
    },

    /// A field is present but cannot be used
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// Backing object store is unreachable or erroring
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// An injected collaborator lacks a required capability
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Computing a property for a single posting failed
    #[error("Compute failed for posting {posting_id}: {reason}")]
    PerPostingCompute { posting_id: String, reason: String },

    /// Encoded label could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration source could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl SkillsMlError {
    /// Shorthand for [`SkillsMlError::MissingField`]
    pub fn missing_field(field: impl Into<String>) -> Self {
        SkillsMlError::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for [`SkillsMlError::InvalidField`]
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SkillsMlError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SkillsMlError::PerPostingCompute`]
    pub fn compute(posting_id: impl Into<String>, reason: impl Into<String>) -> Self {
        SkillsMlError::PerPostingCompute {
            posting_id: posting_id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for skills-ml operations
pub type Result<T> = std::result::Result<T, SkillsMlError>;

/// Convert anyhow::Error to SkillsMlError
impl From<anyhow::Error> for SkillsMlError {
    fn from(err: anyhow::Error) -> Self {
        SkillsMlError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SkillsMlError::missing_field("id");
        assert_eq!(err.to_string(), "Missing required field: id");

        let err = SkillsMlError::StoreUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json");
        assert!(json_err.is_err());

        let err: SkillsMlError = json_err.unwrap_err().into();
        assert!(matches!(err, SkillsMlError::Serialization(_)));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: SkillsMlError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
