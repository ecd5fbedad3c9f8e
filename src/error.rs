//! The closed set of failures a conversion can produce.
//!
//! `InvalidFormat` and `FileTooLarge` come out of pre-flight validation;
//! `ConversionFailed` covers everything that goes wrong once the pipeline
//! is running. Callers can match on the variant or just print it.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("file too large: {0}")]
    FileTooLarge(String),

    #[error("conversion failed: {0}")]
    ConversionFailed(String),
}

impl ConversionError {
    /// Machine-readable code reported alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::InvalidFormat(_) => "INVALID_FORMAT",
            ConversionError::FileTooLarge(_) => "FILE_TOO_LARGE",
            ConversionError::ConversionFailed(_) => "CONVERSION_FAILED",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ConversionError::InvalidFormat(msg)
            | ConversionError::FileTooLarge(msg)
            | ConversionError::ConversionFailed(msg) => msg,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ConversionError::InvalidFormat(msg.into())
    }

    pub(crate) fn failed(msg: impl Into<String>) -> Self {
        ConversionError::ConversionFailed(msg.into())
    }
}

pub type ConversionResult<T> = std::result::Result<T, ConversionError>;
