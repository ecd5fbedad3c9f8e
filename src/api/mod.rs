//! Request/response boundary for front ends that receive uploads.
//!
//! `handle` is what an upload endpoint calls: validate, convert, and build
//! either a downloadable response or a status code plus error body.

pub mod models;
pub mod remote;

use std::path::Path;

use crate::convert::convert;
use crate::error::ConversionError;
use crate::models::ConversionOptions;
use crate::validate::{validate, Limits};

use models::{ConversionResponse, ErrorResponse};

pub const ICO_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub filename: Option<String>,
    /// Content type declared by the uploader, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub options: ConversionOptions,
}

impl ConvertRequest {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            content_type: None,
            bytes,
            options: ConversionOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub content_length: usize,
    pub content_disposition: String,
    pub metadata: ConversionResponse,
    pub body: Vec<u8>,
}

/// Validates and converts one upload.
pub fn handle(request: ConvertRequest, limits: &Limits) -> Result<ConvertResponse, ErrorResponse> {
    let filename = request.filename.as_deref().unwrap_or("unknown");
    log::info!(
        "conversion request: filename={}, content_type={:?}, preserve_transparency={}, auto_transparent_bg={}",
        filename,
        request.content_type,
        request.options.preserve_transparency,
        request.options.auto_transparent_bg
    );

    let result = validate(
        filename,
        request.bytes.len() as u64,
        &request.bytes,
        request.content_type.as_deref(),
        limits,
    )
    .and_then(|()| convert(&request.bytes, filename, &request.options));

    let artifact = match result {
        Ok(artifact) => artifact,
        Err(error) => {
            log::warn!("conversion of {} rejected: {}", filename, error);
            return Err(ErrorResponse::from(error));
        }
    };

    let output_name = output_filename(request.filename.as_deref());
    let metadata = ConversionResponse {
        filename: output_name.clone(),
        size_bytes: artifact.size_bytes(),
        transparency_mode: artifact.transparency_mode,
        transparency_downgraded: artifact.transparency_downgraded,
    };
    log::info!(
        "conversion succeeded: {} -> {} ({} bytes)",
        filename,
        output_name,
        metadata.size_bytes
    );

    let body = artifact.into_bytes();
    Ok(ConvertResponse {
        status: 200,
        content_type: ICO_CONTENT_TYPE,
        content_length: body.len(),
        content_disposition: content_disposition(&output_name),
        metadata,
        body,
    })
}

/// Runs [`handle`] on the blocking pool so an async dispatcher is never stalled.
pub async fn handle_async(
    request: ConvertRequest,
    limits: Limits,
) -> Result<ConvertResponse, ErrorResponse> {
    tokio::task::spawn_blocking(move || handle(request, &limits))
        .await
        .unwrap_or_else(|e| {
            Err(ErrorResponse::from(ConversionError::ConversionFailed(
                format!("conversion task failed: {}", e),
            )))
        })
}

/// `<stem>.ico`, or `output.ico` when there is no usable stem.
pub fn output_filename(input: Option<&str>) -> String {
    let stem = input
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("output");
    format!("{}.ico", stem)
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}
