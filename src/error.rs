//! Error handling for Strata
//!
//! Core operations only ever fail with `InvalidArgument` or `InvalidState`.
//! The remaining variants belong to the file boundary (PPM, PNG/JPEG, archives).

use thiserror::Error;

/// Result type alias for Strata operations
pub type Result<T> = std::result::Result<T, StrataError>;

/// Main error type for Strata operations
#[derive(Error, Debug)]
pub enum StrataError {
    // Core Errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid image file: {reason}")]
    InvalidImage {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StrataError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        StrataError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for an `InvalidState` error
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        StrataError::InvalidState {
            reason: reason.into(),
        }
    }

    /// Shorthand for an `InvalidImage` error without an underlying cause
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        StrataError::InvalidImage {
            reason: reason.into(),
            source: None,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            StrataError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            StrataError::InvalidState { .. } => "INVALID_STATE",
            StrataError::FileNotFound { .. } => "FILE_NOT_FOUND",
            StrataError::InvalidImage { .. } => "INVALID_IMAGE",
            StrataError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            StrataError::Io(_) => "IO_ERROR",
            StrataError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Every core failure leaves the stack untouched, so the caller can
    /// simply retry with corrected input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, StrataError::Io(_) | StrataError::Serialization(_))
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            StrataError::InvalidArgument { .. } => vec![
                "Check layer names for typos or duplicates",
                "Kernels must be square with an odd side length",
                "Images added as layers must match the current layer's size",
            ],
            StrataError::InvalidState { .. } => vec![
                "Create a layer and load an image before editing",
                "A stack always keeps at least one layer",
            ],
            StrataError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            StrataError::InvalidImage { .. } => vec![
                "Plain PPM files must start with P3",
                "The file may be corrupted - try re-exporting from source",
            ],
            StrataError::UnsupportedFormat { .. } => vec![
                "Supported formats: PPM, PNG, JPEG",
                "Convert the image to one of the supported formats first",
            ],
            _ => vec![],
        }
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            StrataError::InvalidState { reason } => {
                format!("That can't be done right now: {}", reason)
            }
            StrataError::FileNotFound { path } => {
                format!(
                    "I couldn't find the file at '{}'. Could you check if it's in the right location?",
                    path
                )
            }
            StrataError::UnsupportedFormat { format } => {
                format!("'{}' images aren't supported. Try PPM, PNG or JPEG.", format)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = StrataError::invalid_argument("duplicate layer name");
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");

        let err = StrataError::invalid_state("no image uploaded");
        assert_eq!(err.error_code(), "INVALID_STATE");
    }

    #[test]
    fn test_display_includes_reason() {
        let err = StrataError::invalid_state("no image uploaded");
        assert_eq!(err.to_string(), "Invalid state: no image uploaded");
    }

    #[test]
    fn test_core_errors_are_recoverable() {
        assert!(StrataError::invalid_argument("x").is_recoverable());
        assert!(StrataError::invalid_state("x").is_recoverable());
        assert!(!StrataError::invalid_state("x").recovery_suggestions().is_empty());

        let io = StrataError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!io.is_recoverable());
    }
}
