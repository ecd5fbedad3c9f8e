use image::{DynamicImage, ImageFormat};

use crate::models::ChannelLayout;

/// Whether images stored in `format` can carry an alpha channel at all.
pub fn supports_transparency(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP
    )
}

/// Brings `img` into the channel layout the encoder should write.
///
/// With `preserve_transparency` anything without alpha is promoted to RGBA.
/// Without it, RGBA is flattened to RGB by dropping alpha. Grayscale is never
/// promoted to RGB, so a grayscale input stays single-channel when
/// transparency is off.
pub fn prepare(img: DynamicImage, preserve_transparency: bool) -> DynamicImage {
    let layout = ChannelLayout::of(&img);
    match (preserve_transparency, layout.has_alpha()) {
        (true, false) => DynamicImage::ImageRgba8(img.to_rgba8()),
        (false, true) => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    }
}
