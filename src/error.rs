//! Unified error types for oas-tools.
//!
//! A diff call returns either a complete [`DiffResult`](crate::diff::DiffResult)
//! or an error from this hierarchy; there is no partial-result mode. Non-fatal
//! anomalies encountered during traversal are reported as warning-severity
//! changes instead of errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for oas-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OasDiffError {
    /// Errors while parsing an OpenAPI document
    #[error("Failed to parse OpenAPI document: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors during diff computation
    #[error("Diff computation failed: {context}")]
    Diff {
        context: String,
        #[source]
        source: DiffErrorKind,
    },

    /// IO errors with path context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors (bad or missing inputs)
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Unknown document format - expected a 'swagger' or 'openapi' version field")]
    UnknownFormat,

    #[error("Unsupported OpenAPI version: {version} (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },
}

/// Specific diff error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiffErrorKind {
    #[error("Parse result carries no document")]
    MissingDocument,

    #[error("Unknown OpenAPI version tag: {0}")]
    UnknownVersion(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for oas-tools operations
pub type Result<T> = std::result::Result<T, OasDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl OasDiffError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for an unrecognized document format
    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::parse(format!("at {}", path.into()), ParseErrorKind::UnknownFormat)
    }

    /// Create a parse error for an unsupported version string
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::parse(
            "version detection",
            ParseErrorKind::UnsupportedVersion {
                version: version.into(),
                supported: "2.0, 3.0.x, 3.1.x, 3.2.x".to_string(),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a diff error
    pub fn diff(context: impl Into<String>, source: DiffErrorKind) -> Self {
        Self::Diff {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for OasDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for OasDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for OasDiffError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(
            "YAML deserialization",
            ParseErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OasDiffError::unknown_format("test.yaml");
        let display = err.to_string();
        assert!(
            display.contains("parse") || display.contains("OpenAPI"),
            "Error message should mention parsing or OpenAPI: {}",
            display
        );

        let err = OasDiffError::unsupported_version("4.0.0");
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = OasDiffError::io("/path/to/api.yaml", io_err);

        assert!(err.to_string().contains("/path/to/api.yaml"));
    }

    #[test]
    fn test_validation_error() {
        let err = OasDiffError::validation("must specify exactly one source");
        assert!(matches!(err, OasDiffError::Validation(_)));
        assert!(err.to_string().contains("exactly one source"));
    }
}
