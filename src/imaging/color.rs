//! Dominant color extraction used to tint screenshot bezels.
//!
//! Popularity quantization: every `quality`-th pixel is sampled, mostly
//! transparent and near-white pixels are ignored, the rest are bucketed at
//! 5 bits per channel, and the average color of the fullest bucket wins.

use image::{Rgb, RgbaImage};

const SIGNIFICANT_BITS: u32 = 5;
const MIN_ALPHA: u8 = 125;
const WHITE_THRESHOLD: u8 = 250;

/// Representative color of `image`.
///
/// `quality` is the sampling step (1 = every pixel; 0 is treated as 1).
/// If no sampled pixel qualifies, the plain average of the samples is
/// returned; an empty image yields black.
pub fn dominant_color(image: &RgbaImage, quality: u32) -> Rgb<u8> {
    let step = quality.max(1) as usize;
    let shift = 8 - SIGNIFICANT_BITS;
    let mut buckets = vec![Bucket::default(); 1 << (3 * SIGNIFICANT_BITS)];
    let mut fallback = Bucket::default();

    for pixel in image.pixels().step_by(step) {
        let [r, g, b, a] = pixel.0;
        fallback.add(r, g, b);
        if a < MIN_ALPHA || (r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD) {
            continue;
        }
        let index = (usize::from(r >> shift) << (2 * SIGNIFICANT_BITS))
            | (usize::from(g >> shift) << SIGNIFICANT_BITS)
            | usize::from(b >> shift);
        buckets[index].add(r, g, b);
    }

    // max_by_key keeps the last maximum; iterate in reverse so ties go to the lowest index
    let best = buckets
        .iter()
        .rev()
        .max_by_key(|bucket| bucket.count)
        .filter(|bucket| bucket.count > 0)
        .unwrap_or(&fallback);
    best.average()
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u64,
    sum: [u64; 3],
}

impl Bucket {
    fn add(&mut self, r: u8, g: u8, b: u8) {
        self.count += 1;
        self.sum[0] += u64::from(r);
        self.sum[1] += u64::from(g);
        self.sum[2] += u64::from(b);
    }

    fn average(&self) -> Rgb<u8> {
        if self.count == 0 {
            return Rgb([0, 0, 0]);
        }
        let avg = |sum: u64| (sum / self.count) as u8;
        Rgb([avg(self.sum[0]), avg(self.sum[1]), avg(self.sum[2])])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn solid_image_returns_its_color() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([30, 140, 220, 255]));
        assert_eq!(dominant_color(&img, 1), Rgb([30, 140, 220]));
    }

    #[test]
    fn majority_color_wins() {
        let img = RgbaImage::from_fn(10, 10, |x, _| {
            if x < 7 {
                Rgba([200, 20, 20, 255])
            } else {
                Rgba([20, 20, 200, 255])
            }
        });
        assert_eq!(dominant_color(&img, 1), Rgb([200, 20, 20]));
    }

    #[test]
    fn white_and_transparent_pixels_are_ignored() {
        let img = RgbaImage::from_fn(10, 10, |x, y| match (x, y) {
            (0, 0) => Rgba([10, 100, 10, 255]),
            (_, 0..=4) => Rgba([255, 255, 255, 255]),
            _ => Rgba([200, 0, 0, 10]),
        });
        assert_eq!(dominant_color(&img, 1), Rgb([10, 100, 10]));
    }

    #[test]
    fn all_white_falls_back_to_average() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        assert_eq!(dominant_color(&img, 1), Rgb([255, 255, 255]));
    }

    #[test]
    fn empty_image_is_black() {
        let img = RgbaImage::new(0, 0);
        assert_eq!(dominant_color(&img, 1), Rgb([0, 0, 0]));
    }

    #[test]
    fn bucket_average_smooths_nearby_shades() {
        // both shades land in the same 5-bit bucket
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([96, 64, 32, 255])
            } else {
                Rgba([98, 66, 34, 255])
            }
        });
        assert_eq!(dominant_color(&img, 1), Rgb([97, 65, 33]));
    }

    #[test]
    fn sampling_step_skips_pixels() {
        // with step 2 only the even pixels (red) are sampled
        let img = RgbaImage::from_fn(6, 1, |x, _| {
            if x % 2 == 0 {
                Rgba([180, 10, 10, 255])
            } else {
                Rgba([10, 10, 180, 255])
            }
        });
        assert_eq!(dominant_color(&img, 2), Rgb([180, 10, 10]));
        assert_eq!(dominant_color(&img, 0), dominant_color(&img, 1));
    }
}
