use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};

use crate::error::{ConversionError, ConversionResult};

/// Resamples `img` to each square size and packs the frames into one ICO.
///
/// Frames are written smallest first as RGBA8 PNG payloads, the only PNG
/// layout ICO readers accept. Images without an alpha channel get an opaque
/// one. The image is stretched to a square, never cropped.
pub fn encode(img: &DynamicImage, sizes: &[u32]) -> ConversionResult<Vec<u8>> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ConversionError::failed(format!(
            "cannot build an icon from a {}x{} image",
            img.width(),
            img.height()
        )));
    }

    let mut sizes = sizes.to_vec();
    sizes.sort_unstable();
    sizes.dedup();
    if sizes.is_empty() {
        return Err(ConversionError::failed("no icon sizes requested"));
    }

    let frames = sizes
        .iter()
        .map(|&size| encode_frame(img, size))
        .collect::<ConversionResult<Vec<_>>>()?;

    let mut buf = Vec::new();
    IcoEncoder::new(&mut buf)
        .encode_images(&frames)
        .map_err(|e| ConversionError::failed(format!("failed to write icon: {}", e)))?;

    Ok(buf)
}

fn encode_frame(img: &DynamicImage, size: u32) -> ConversionResult<IcoFrame<'static>> {
    let resized = img.resize_exact(size, size, FilterType::Lanczos3).into_rgba8();
    IcoFrame::as_png(resized.as_raw(), size, size, ExtendedColorType::Rgba8).map_err(|e| {
        ConversionError::failed(format!(
            "failed to encode {}x{} frame from {:?}: {}",
            size,
            size,
            img.color(),
            e
        ))
    })
}
