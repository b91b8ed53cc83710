//! Error types for document extraction and transcript export.

use crate::types::DocumentFormat;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting study materials or exporting a chat.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file extension is not one we know how to extract.
    #[error("Unsupported file type: .{extension}. Please use {supported}.")]
    UnsupportedFormat {
        /// Lowercased extension of the offending file (may be empty).
        extension: String,
        /// Human-readable list of supported extensions.
        supported: String,
    },

    /// The file has a recognized format but its content could not be parsed.
    #[error("{format} parsing error: {reason}")]
    ParseFailure {
        format: DocumentFormat,
        reason: String,
    },

    /// Neither pasted text nor files were supplied.
    #[error("Please provide study materials either by text or by uploading a file.")]
    NoMaterials,

    /// Visual capture was requested without a surface to capture.
    #[error("Chat element not found for PDF generation: {0}")]
    ElementNotFound(String),

    /// The capture surface failed to produce a bitmap.
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    /// The PDF document could not be rendered or serialized.
    #[error("PDF rendering error: {0}")]
    RenderError(String),

    /// A background extraction task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskFailed(String),

    /// Transcript JSON could not be read or written.
    #[error("Transcript JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Build a parse failure for `format` from any displayable cause.
    pub fn parse(format: DocumentFormat, reason: impl std::fmt::Display) -> Self {
        Self::ParseFailure {
            format,
            reason: reason.to_string(),
        }
    }

    /// Build an unsupported-format error listing every supported extension.
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
            supported: DocumentFormat::supported_list(),
        }
    }
}
