//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the Arabic root analyzer, providing the full
//! error taxonomy used across all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from analysis, corpus loading, configuration,
//!   and the external collaborator clients
//! - **Output**: Structured error types with context and error chains
//! - **Error Categories**: Input, Resolution, Corpus, Configuration, External
//!
//! ## Key Features
//! - Caller errors (`InvalidInput`) kept distinct from valid negative results
//!   (`NotFound`) so API consumers can tell them apart
//! - Fatal startup errors (`CorpusLoad`) separated from per-request errors
//! - Automatic conversion from I/O, HTTP, JSON and TOML errors
//! - Category and recoverability helpers for logging and status mapping

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Error types for the Arabic root analyzer
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Empty or whitespace-only input. A caller error, always recoverable
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// No root could be derived, or the root is absent from the index.
    /// A valid negative result, not a system failure.
    #[error("no root found for '{word}'")]
    NotFound { word: String },

    /// Corpus file unreadable or entirely malformed, fatal at startup
    #[error("failed to load corpus from {path}: {details}")]
    CorpusLoad { path: String, details: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// External analyzer collaborator failures
    #[error("external analyzer error: {details}")]
    ExternalAnalyzer { details: String },

    /// Translation collaborator failures
    #[error("translation error: {details}")]
    Translation { details: String },

    /// Internal system errors
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AnalyzerError {
    /// Check if the error is recoverable (the request can be retried or
    /// corrected by the caller)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalyzerError::InvalidInput { .. }
                | AnalyzerError::NotFound { .. }
                | AnalyzerError::ExternalAnalyzer { .. }
                | AnalyzerError::Translation { .. }
                | AnalyzerError::Http(_)
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            AnalyzerError::InvalidInput { .. } => "input",
            AnalyzerError::NotFound { .. } => "resolution",
            AnalyzerError::CorpusLoad { .. } => "corpus",
            AnalyzerError::Config { .. } | AnalyzerError::ValidationFailed { .. } => {
                "configuration"
            }
            AnalyzerError::ExternalAnalyzer { .. }
            | AnalyzerError::Translation { .. }
            | AnalyzerError::Http(_) => "external",
            AnalyzerError::Internal { .. }
            | AnalyzerError::Io(_)
            | AnalyzerError::Json(_)
            | AnalyzerError::Toml(_) => "system",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_recoverable() {
        let err = AnalyzerError::NotFound {
            word: "شجره".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.category(), "resolution");
    }

    #[test]
    fn test_corpus_load_is_fatal() {
        let err = AnalyzerError::CorpusLoad {
            path: "quraan.txt".to_string(),
            details: "no valid verse lines".to_string(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), "corpus");
    }
}
