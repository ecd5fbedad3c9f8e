#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub const ICO_MAGIC: [u8; 4] = [0x00, 0x00, 0x01, 0x00];

/// Every input format the converter accepts, with a filename that matches it.
pub const FORMATS: &[(ImageFormat, &str)] = &[
    (ImageFormat::Png, "sample.png"),
    (ImageFormat::Jpeg, "sample.jpg"),
    (ImageFormat::Bmp, "sample.bmp"),
    (ImageFormat::Gif, "sample.gif"),
    (ImageFormat::Tiff, "sample.tiff"),
    (ImageFormat::WebP, "sample.webp"),
];

pub fn solid_rgb(w: u32, h: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(color)))
}

pub fn solid_rgba(w: u32, h: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(color)))
}

pub fn solid_gray(w: u32, h: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([value])))
}

/// A `size`x`size` red square with a blue square in the middle.
pub fn logo(size: u32) -> DynamicImage {
    let mut img = RgbImage::from_pixel(size, size, Rgb([255, 0, 0]));
    let inset = size / 4;
    for y in inset..size - inset {
        for x in inset..size - inset {
            img.put_pixel(x, y, Rgb([0, 0, 255]));
        }
    }
    DynamicImage::ImageRgb8(img)
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    encode(img, ImageFormat::Png)
}

/// (width, height) of each entry in an ICO directory, in file order.
pub fn ico_entry_sizes(ico: &[u8]) -> Vec<(u32, u32)> {
    let count = u16::from_le_bytes([ico[4], ico[5]]) as usize;
    (0..count)
        .map(|i| {
            let entry = &ico[6 + i * 16..6 + (i + 1) * 16];
            let dim = |b: u8| if b == 0 { 256 } else { u32::from(b) };
            (dim(entry[0]), dim(entry[1]))
        })
        .collect()
}

/// Decodes every PNG frame of an ICO, in directory order.
///
/// The stock ICO decoder only hands back the largest frame, so the smaller
/// ones are read straight from the directory.
pub fn ico_frames(ico: &[u8]) -> Vec<DynamicImage> {
    assert_eq!(ico[..4], ICO_MAGIC);
    let count = u16::from_le_bytes([ico[4], ico[5]]) as usize;
    (0..count)
        .map(|i| {
            let entry = &ico[6 + i * 16..6 + (i + 1) * 16];
            let len = u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]) as usize;
            let offset = u32::from_le_bytes([entry[12], entry[13], entry[14], entry[15]]) as usize;
            image::load_from_memory_with_format(&ico[offset..offset + len], ImageFormat::Png)
                .unwrap()
        })
        .collect()
}

/// Decodes an ICO with the `image` crate's own decoder, which picks the
/// largest frame.
pub fn decode_ico(ico: &[u8]) -> DynamicImage {
    image::load_from_memory_with_format(ico, ImageFormat::Ico).unwrap()
}
