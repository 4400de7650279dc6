//! Error handling for the diagnostics engine
//!
//! This module defines all error types used throughout the engine.

use thiserror::Error;

/// Result type alias for the diagnostics engine
pub type Result<T> = std::result::Result<T, DiagnosticsError>;

/// Main error type for the diagnostics engine
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed measurement handed to ingestion
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Disk overflow / retention failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Failure inside a risk rule, trend computation or topology build
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Worker pool / scheduler errors
    #[error("Executor error: {0}")]
    Executor(String),

    /// Not enough data points for a computation
    #[error("Insufficient data: need {required} data points, have {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Coarse error classification used in log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    Ingestion,
    Analysis,
    Runtime,
}

impl DiagnosticsError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn ingestion<S: Into<String>>(message: S) -> Self {
        Self::Ingestion(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn analysis<S: Into<String>>(message: S) -> Self {
        Self::Analysis(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn executor<S: Into<String>>(message: S) -> Self {
        Self::Executor(message.into())
    }

    /// Error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::Yaml(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Serialization(_) | Self::Storage(_) => ErrorCategory::Storage,
            Self::Ingestion(_) | Self::Validation(_) => ErrorCategory::Ingestion,
            Self::Analysis(_) | Self::InsufficientData { .. } | Self::NotFound(_) => {
                ErrorCategory::Analysis
            }
            Self::Executor(_) => ErrorCategory::Runtime,
        }
    }

    /// Whether the engine can keep running after this error.
    ///
    /// Only configuration problems are fatal, and only during initialization.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.category(), ErrorCategory::Configuration)
    }
}
