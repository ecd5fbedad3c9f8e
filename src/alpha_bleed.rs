//! Recolors fully transparent pixels with the average color of their nearest
//! visible neighbors, working outward one ring at a time.
//!
//! A keyed-out background keeps its original RGB under alpha 0. When the
//! 256px frame is downsampled to 16px those hidden colors get blended into
//! the edges and show up as a halo; bleeding the edge colors outward first
//! avoids that. Alpha values are never touched.

use std::collections::VecDeque;

use image::RgbaImage;

use crate::transparency::AlphaMask;

const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Returns how many pixels were recolored.
pub fn alpha_bleed(img: &mut RgbaImage) -> usize {
    let (w, h) = img.dimensions();

    let mut sampleable = AlphaMask::new(w, h);
    let mut queued = AlphaMask::new(w, h);
    let mut frontier = VecDeque::new();

    let neighbors = move |x: u32, y: u32| {
        NEIGHBORS.iter().filter_map(move |&(dx, dy)| {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            (nx >= 0 && ny >= 0 && nx < i64::from(w) && ny < i64::from(h))
                .then_some((nx as u32, ny as u32))
        })
    };

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] != 0 {
            sampleable.set(x, y);
            queued.set(x, y);
        }
    }

    // Seed with transparent pixels that touch a visible one.
    for y in 0..h {
        for x in 0..w {
            if sampleable.get(x, y) {
                continue;
            }
            if neighbors(x, y).any(|(nx, ny)| sampleable.get(nx, ny)) {
                queued.set(x, y);
                frontier.push_back((x, y));
            }
        }
    }

    let mut recolored = 0;
    while !frontier.is_empty() {
        let ring: Vec<(u32, u32)> = frontier.drain(..).collect();

        for &(x, y) in &ring {
            let mut sum = [0u32; 3];
            let mut contributing = 0u32;

            for (nx, ny) in neighbors(x, y) {
                if sampleable.get(nx, ny) {
                    let source = img.get_pixel(nx, ny);
                    for (acc, channel) in sum.iter_mut().zip(source.0) {
                        *acc += u32::from(channel);
                    }
                    contributing += 1;
                } else if !queued.get(nx, ny) {
                    queued.set(nx, ny);
                    frontier.push_back((nx, ny));
                }
            }

            let n = contributing.max(1);
            let pixel = img.get_pixel_mut(x, y);
            pixel[0] = (sum[0] / n) as u8;
            pixel[1] = (sum[1] / n) as u8;
            pixel[2] = (sum[2] / n) as u8;
            recolored += 1;
        }

        // A ring becomes sampleable only after all of it has been recolored.
        for (x, y) in ring {
            sampleable.set(x, y);
        }
    }

    recolored
}
