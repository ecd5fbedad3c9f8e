//! The conversion pipeline: decode, settle on a transparency mode, reshape the
//! channels, encode.
//!
//! Callers are expected to have run [`crate::validate::validate`] first, so
//! anything that goes wrong in here is reported as
//! [`ConversionError::ConversionFailed`], including panics from the codecs.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use image::{DynamicImage, ImageFormat};

use crate::alpha_bleed::alpha_bleed;
use crate::background::detect_background_color;
use crate::error::{ConversionError, ConversionResult};
use crate::icon;
use crate::models::{ConversionOptions, IconArtifact, SourceImage, TransparencyMode, ICON_SIZES};
use crate::normalize::{prepare, supports_transparency};
use crate::transparency::make_color_transparent;
use crate::validate::extension_of;

/// Converts an encoded image into a multi-size ICO.
///
/// `filename` decides the source format (and so whether it can carry alpha);
/// when it has no recognizable extension the format is sniffed from `bytes`.
pub fn convert(
    bytes: &[u8],
    filename: &str,
    options: &ConversionOptions,
) -> ConversionResult<IconArtifact> {
    panic::catch_unwind(AssertUnwindSafe(|| run(bytes, filename, options))).unwrap_or_else(
        |payload| {
            Err(ConversionError::failed(format!(
                "unexpected error while converting '{}': {}",
                filename,
                panic_message(payload.as_ref())
            )))
        },
    )
}

fn run(bytes: &[u8], filename: &str, options: &ConversionOptions) -> ConversionResult<IconArtifact> {
    let source = SourceImage::decode(bytes).map_err(|e| {
        ConversionError::failed(format!("failed to decode '{}': {}", filename, e))
    })?;
    log::debug!(
        "decoded {}: {:?} {}x{} {}",
        filename,
        source.format,
        source.width(),
        source.height(),
        source.layout()
    );

    let format = source_format(filename).unwrap_or(source.format);

    let mut preserve = options.preserve_transparency;
    let mut downgraded = false;
    if preserve && !supports_transparency(format) {
        log::warn!(
            "{:?} images cannot carry transparency; converting {} without it",
            format,
            filename
        );
        preserve = false;
        downgraded = true;
    }

    // Background removal wins over preservation when both are asked for.
    let (prepared, mode) = if options.auto_transparent_bg {
        let img = source.into_image();
        let background = detect_background_color(&img);
        log::debug!(
            "keying out background {} (tolerance {})",
            background,
            options.tolerance
        );
        (
            make_color_transparent(&img, background, options.tolerance),
            TransparencyMode::Auto,
        )
    } else {
        let mode = if preserve {
            TransparencyMode::Preserve
        } else {
            TransparencyMode::None
        };
        (prepare(source.into_image(), preserve), mode)
    };

    let prepared = match prepared {
        DynamicImage::ImageRgba8(mut rgba) if options.alpha_bleed => {
            let recolored = alpha_bleed(&mut rgba);
            log::debug!("alpha bleed recolored {} pixels", recolored);
            DynamicImage::ImageRgba8(rgba)
        }
        other => other,
    };

    let bytes = icon::encode(&prepared, &ICON_SIZES)?;
    log::info!(
        "converted {} to ICO ({} bytes, transparency: {})",
        filename,
        bytes.len(),
        mode
    );

    Ok(IconArtifact {
        bytes,
        transparency_mode: mode,
        transparency_downgraded: downgraded,
    })
}

/// Source format as implied by the filename extension.
pub fn source_format(filename: &str) -> Option<ImageFormat> {
    extension_of(filename).and_then(ImageFormat::from_extension)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
