//! Chroma-keying: turns every pixel close enough to a target color fully
//! transparent.

use bit_vec::BitVec;
use image::{DynamicImage, RgbaImage};

use crate::models::Color;

/// Keys `target` out of a copy of `img`.
///
/// The result is always RGBA. A pixel is keyed out when the Euclidean
/// distance between its RGB and the target's RGB is at most `tolerance`;
/// every other pixel keeps its alpha (opaque if the input had none).
pub fn make_color_transparent(img: &DynamicImage, target: Color, tolerance: f64) -> DynamicImage {
    let mut rgba = img.to_rgba8();
    let mask = color_key_mask(&rgba, target, tolerance);
    apply_mask(&mut rgba, &mask);
    DynamicImage::ImageRgba8(rgba)
}

/// Marks the pixels of `img` that match `target` within `tolerance`.
pub fn color_key_mask(img: &RgbaImage, target: Color, tolerance: f64) -> AlphaMask {
    let (w, h) = img.dimensions();
    let mut mask = AlphaMask::new(w, h);

    for (x, y, pixel) in img.enumerate_pixels() {
        let color = Color::rgb(pixel[0], pixel[1], pixel[2]);
        if color.distance(&target) <= tolerance {
            mask.set(x, y);
        }
    }

    mask
}

/// Zeroes the alpha of every masked pixel.
pub fn apply_mask(img: &mut RgbaImage, mask: &AlphaMask) {
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if mask.get(x, y) {
            pixel[3] = 0;
        }
    }
}

/// One bit per pixel, row-major.
pub struct AlphaMask {
    size: (u32, u32),
    data: BitVec,
}

impl AlphaMask {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            size: (w, h),
            data: BitVec::from_elem(w as usize * h as usize, false),
        }
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data.get(self.index(x, y)).unwrap_or(false)
    }

    pub fn set(&mut self, x: u32, y: u32) {
        let index = self.index(x, y);
        if index < self.data.len() {
            self.data.set(index, true);
        }
    }

    /// Number of masked pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|bit| *bit).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.size.0 as usize
    }
}
