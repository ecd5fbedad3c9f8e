//! Pre-flight checks for untrusted input.
//!
//! Checks run cheapest first: byte size, then extension and MIME type, then a
//! full decode of the pixel data. A header-only probe is not enough because a
//! truncated file (a bare PNG signature, say) still sniffs as a valid format.

use std::path::Path;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, ConversionResult};
use crate::models::SourceImage;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "tif", "webp"];

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/bmp",
    "image/gif",
    "image/tiff",
    "image/webp",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Limits {
    /// Largest accepted input, in bytes (inclusive).
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// Runs every pre-flight check against an upload.
pub fn validate(
    filename: &str,
    byte_length: u64,
    bytes: &[u8],
    declared_mime: Option<&str>,
    limits: &Limits,
) -> ConversionResult<()> {
    check_size(byte_length, limits)?;
    check_format(filename, declared_mime)?;
    check_content(bytes)?;
    Ok(())
}

pub fn check_size(byte_length: u64, limits: &Limits) -> ConversionResult<()> {
    if byte_length > limits.max_file_size {
        return Err(ConversionError::FileTooLarge(format!(
            "{} exceeds the maximum of {}",
            human_size(byte_length),
            human_size(limits.max_file_size)
        )));
    }
    Ok(())
}

/// Checks the filename extension and the declared (or guessed) MIME type.
pub fn check_format(filename: &str, declared_mime: Option<&str>) -> ConversionResult<()> {
    let extension = extension_of(filename).ok_or_else(|| {
        ConversionError::invalid(format!(
            "'{}' has no file extension. Supported formats: PNG, JPEG, BMP, GIF, TIFF, WebP",
            filename
        ))
    })?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ConversionError::invalid(format!(
            "unsupported file extension '.{}'. Supported formats: PNG, JPEG, BMP, GIF, TIFF, WebP",
            extension
        )));
    }

    match declared_mime.map(normalize_mime).filter(|m| !m.is_empty()) {
        Some(mime) => {
            if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
                return Err(ConversionError::invalid(format!(
                    "unsupported MIME type '{}'",
                    mime
                )));
            }
        }
        None => {
            let guessed = ImageFormat::from_extension(&extension)
                .map(|format| format.to_mime_type())
                .ok_or_else(|| {
                    ConversionError::invalid(format!(
                        "cannot determine a MIME type for '.{}'",
                        extension
                    ))
                })?;
            if !ALLOWED_MIME_TYPES.contains(&guessed) {
                return Err(ConversionError::invalid(format!(
                    "unsupported MIME type '{}' (guessed from '.{}')",
                    guessed, extension
                )));
            }
        }
    }

    Ok(())
}

/// Decodes the whole payload, pixel data included.
pub fn check_content(bytes: &[u8]) -> ConversionResult<SourceImage> {
    SourceImage::decode(bytes).map_err(|e| {
        ConversionError::invalid(format!(
            "the file could not be read as an image; it may be corrupt or in an unsupported format: {}",
            e
        ))
    })
}

/// Lowercased extension without the leading dot.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn human_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
