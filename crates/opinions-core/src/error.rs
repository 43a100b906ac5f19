//! Error types for validation and remote calls.

use thiserror::Error;

/// Validation failures for a single draft field.
///
/// The `Display` text is what the form shows next to the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Name is required, and must be at least 2 characters long.")]
    UserName,

    #[error("Title is required, and must be at least 5 characters long.")]
    Title,

    #[error("Body is required, and must be at least 10 characters long.")]
    Body,
}

/// Failures talking to the remote opinions service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}
