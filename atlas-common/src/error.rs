//! Error types for the Policy Atlas workspace.
//!
//! The analytical core never fails: missing data is reported as `None`.
//! These errors only surface at the edges (loading a dataset, reading
//! configuration, writing an export).

use thiserror::Error;

/// Result type alias using the Atlas error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Atlas crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (malformed dataset, unknown identifiers)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Process exit code for command-line callers.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::NotFound(_) | Self::InvalidInput(_) | Self::Json(_) => 65,
            Self::Io(_) => 74,
            Self::WithContext { source, .. } => source.exit_code(),
            Self::Internal(_) => 70,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 78);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 65);
        assert_eq!(Error::InvalidInput("test".into()).exit_code(), 65);
        assert_eq!(Error::Internal("test".into()).exit_code(), 70);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::NotFound("countries".into());
        let with_ctx = err.with_context("loading dataset");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert!(with_ctx.is_not_found());
        assert_eq!(with_ctx.exit_code(), 65);
        assert_eq!(
            with_ctx.to_string(),
            "loading dataset: Not found: countries"
        );
    }

    #[test]
    fn test_result_ext_context() {
        let parsed: std::result::Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str("{not json");
        let err = parsed.context("parsing payload").unwrap_err();
        assert!(err.to_string().starts_with("parsing payload: JSON error"));
    }
}
