//! Domain error types
//!
//! This module defines the error hierarchy for order exports.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main export error type
///
/// This is the primary error type used throughout the application.
/// The per-order export protocol inspects the variant to decide whether an
/// order failure is skipped, logged and continued, or aborts the whole batch.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// The destination path of an order could not be resolved
    #[error("Naming error: {0}")]
    Naming(String),

    /// Storage backend errors outside of ordinary write failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// A listener rejected an event for a reason other than skipping
    #[error("Listener error: {0}")]
    Listener(String),

    /// Recoverable per-order failure; the order is skipped and the batch continues
    #[error("Order skipped: {0}")]
    Skippable(String),

    /// Unrecoverable failure; the batch is aborted
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ExportError {
    /// Whether the error is a designated recoverable per-order failure
    pub fn is_skippable(&self) -> bool {
        matches!(self, ExportError::Skippable(_))
    }

    /// Whether the error must abort the whole export batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExportError::Fatal(_))
    }
}

/// Template-specific errors
///
/// Errors that occur while loading or rendering an export template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file does not exist
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template name is empty or escapes the templates directory
    #[error("Invalid template name: {0}")]
    InvalidName(String),

    /// A placeholder references data that is not present
    #[error("Template '{template}' references missing variable '{variable}'")]
    MissingVariable { template: String, variable: String },

    /// A placeholder was opened but never closed
    #[error("Template '{template}' has an unterminated placeholder at byte {offset}")]
    Unterminated { template: String, offset: usize },

    /// Failed to read the template
    #[error("Failed to read template: {0}")]
    Io(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
