//! Bezel synthesis: a faded, rounded frame around a screenshot.
//!
//! The frame is built from `border` concentric one-pixel rounded-rectangle
//! outlines. Ring `i` (0 = outermost) is drawn with the base color scaled by
//! `1 - i / border`, alpha included, so the frame fades from the full color at
//! the outer edge towards transparent black at the screenshot. The stack of
//! discrete rings is then smoothed with a Gaussian blur of fixed sigma
//! ([`BEZEL_BLUR_SIGMA`]) and the screenshot is composited into the middle.
//!
//! Ring `i` spans the inclusive box `[i, i, W - i, H - i]` of the
//! `W x H` output, so the right and bottom edges of ring 0 fall one pixel
//! outside the buffer and are clipped.

use super::operations::alpha_over;
use super::params::{BEZEL_BLUR_SIGMA, BezelSpec};
use image::{Rgba, RgbaImage, imageops};

/// Wrap `image` in a bezel.
///
/// The result is always `border` pixels larger than `image` on every side.
/// A zero border skips ring drawing and yields the screenshot on a blurred
/// empty buffer of the same size.
pub fn render_bezel(image: &RgbaImage, spec: &BezelSpec) -> RgbaImage {
    let border = spec.border;
    let width = image.width() + 2 * border;
    let height = image.height() + 2 * border;

    let mut frame = RgbaImage::new(width, height);
    for ring in 0..border {
        let color = ring_color(spec, ring);
        let inset = i64::from(ring);
        draw_rounded_outline(
            &mut frame,
            (inset, inset),
            (i64::from(width) - inset, i64::from(height) - inset),
            i64::from(spec.corner_radius),
            color,
        );
    }

    let mut framed = imageops::blur(&frame, BEZEL_BLUR_SIGMA);
    alpha_over(&mut framed, image, i64::from(border), i64::from(border));
    framed
}

/// Color of ring `ring` (0 = outermost) for a bezel with `spec.border` rings.
///
/// Channels are truncated towards zero. Callers must keep
/// `ring < spec.border`, which also rules out a zero border.
pub fn ring_color(spec: &BezelSpec, ring: u32) -> Rgba<u8> {
    let fraction = 1.0 - f64::from(ring) / f64::from(spec.border);
    let [r, g, b] = spec.color.0;
    let scale = |channel: u8| (f64::from(channel) * fraction) as u8;
    Rgba([scale(r), scale(g), scale(b), scale(255)])
}

/// Draw a one-pixel rounded-rectangle outline over the inclusive box
/// `top_left..=bottom_right`, overwriting pixels and clipping to the image.
///
/// The radius is capped at half the box's shorter side.
fn draw_rounded_outline(
    img: &mut RgbaImage,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    radius: i64,
    color: Rgba<u8>,
) {
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;
    if x1 < x0 || y1 < y0 {
        return;
    }
    let r = radius.min((x1 - x0) / 2).min((y1 - y0) / 2).max(0);

    for x in (x0 + r)..=(x1 - r) {
        put_clipped(img, x, y0, color);
        put_clipped(img, x, y1, color);
    }
    for y in (y0 + r)..=(y1 - r) {
        put_clipped(img, x0, y, color);
        put_clipped(img, x1, y, color);
    }
    if r == 0 {
        return;
    }

    // Quarter arcs: corner centers and the quadrant each arc bulges into
    let corners = [
        ((x0 + r, y0 + r), (-1, -1)),
        ((x1 - r, y0 + r), (1, -1)),
        ((x0 + r, y1 - r), (-1, 1)),
        ((x1 - r, y1 - r), (1, 1)),
    ];
    let r_f = r as f64;
    for ((cx, cy), (sx, sy)) in corners {
        for dy in 0..=r {
            for dx in 0..=r {
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                if (dist - r_f).abs() <= 0.5 {
                    put_clipped(img, cx + sx * dx, cy + sy * dy, color);
                }
            }
        }
    }
}

fn put_clipped(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}
