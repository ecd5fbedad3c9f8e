//! Guesses a flat background color by majority vote over the four corners.
//!
//! Only the corners are sampled, so this is meant for logos and flat artwork,
//! not photographs or gradients.

use image::{DynamicImage, GenericImageView};

use crate::models::{ChannelLayout, Color};

/// Returns the most common corner color.
///
/// Ties go to whichever color appears first in top-left, top-right,
/// bottom-left, bottom-right order.
pub fn detect_background_color(img: &DynamicImage) -> Color {
    let mut counts: Vec<(Color, usize)> = Vec::with_capacity(4);

    for color in corner_colors(img) {
        match counts.iter_mut().find(|(seen, _)| *seen == color) {
            Some((_, count)) => *count += 1,
            None => counts.push((color, 1)),
        }
    }

    // `max_by_key` keeps the last maximum, so scan in reverse to keep the first.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(color, _)| color)
        .unwrap_or(Color::rgb(0, 0, 0))
}

/// Top-left, top-right, bottom-left, bottom-right. Empty for a zero-sized image.
pub fn corner_colors(img: &DynamicImage) -> Vec<Color> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let has_alpha = ChannelLayout::of(img).has_alpha();
    [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
        .iter()
        .map(|&(x, y)| {
            let pixel = img.get_pixel(x, y);
            if has_alpha {
                Color::rgba(pixel[0], pixel[1], pixel[2], pixel[3])
            } else {
                Color::rgb(pixel[0], pixel[1], pixel[2])
            }
        })
        .collect()
}
