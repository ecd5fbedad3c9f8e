use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::models::TransparencyMode;

// ── Success ──

/// Metadata describing a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConversionResponse {
    pub filename: String,
    pub size_bytes: usize,
    pub transparency_mode: TransparencyMode,
    /// Transparency was requested but the input format cannot carry it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub transparency_downgraded: bool,
}

// ── Errors ──

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl From<&ConversionError> for ErrorResponse {
    fn from(error: &ConversionError) -> Self {
        Self {
            status: status_code(error),
            detail: error.message().to_string(),
            error_code: Some(error.code().to_string()),
        }
    }
}

impl From<ConversionError> for ErrorResponse {
    fn from(error: ConversionError) -> Self {
        Self::from(&error)
    }
}

/// HTTP status a front end should answer with for `error`.
pub fn status_code(error: &ConversionError) -> u16 {
    match error {
        ConversionError::InvalidFormat(_) => 415,
        ConversionError::FileTooLarge(_) => 413,
        ConversionError::ConversionFailed(_) => 500,
    }
}
