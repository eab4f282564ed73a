//! Error types for the interior-ai-core library.
//!
//! This module provides granular error variants for different failure modes.
//! Only [`AppError::InvalidFileType`] is shown to the user verbatim; every
//! failure during generation collapses into [`GENERATION_FAILED_MESSAGE`].

use thiserror::Error;

/// User-facing message shown whenever a generation attempt fails.
///
/// Network failures, quota errors and malformed responses are intentionally
/// indistinguishable at this level.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate design. Please try again or refine your prompt.";

/// Errors that can occur within the interior-ai-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing keys, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required environment variable was not found.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// The selected file does not declare an `image/*` type.
    #[error("Please upload an image file (got '{0}')")]
    InvalidFileType(String),

    /// Reading or decoding image data failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// General Gemini API error.
    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    /// The model answered, but none of the returned parts carried image data.
    #[error("No image data found in the response")]
    NoImageData,

    /// A state transition was requested that the current state does not allow.
    #[error("Cannot {action} while {status}")]
    InvalidTransition {
        action: &'static str,
        status: &'static str,
    },

    /// Generation was requested without an image, without a prompt,
    /// or while a request is outstanding.
    #[error("Generation is not available: {0}")]
    GenerateUnavailable(&'static str),

    /// There is no generated result to save.
    #[error("No generated design to save")]
    NoResult,

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a Gemini API error with the given message.
    pub fn gemini(msg: impl Into<String>) -> Self {
        Self::GeminiApi(msg.into())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NoImageData.to_string(),
            "No image data found in the response"
        );
        assert_eq!(
            AppError::InvalidFileType("text/plain".into()).to_string(),
            "Please upload an image file (got 'text/plain')"
        );
        let err = AppError::InvalidTransition {
            action: "complete",
            status: "idle",
        };
        assert_eq!(err.to_string(), "Cannot complete while idle");
    }
}
