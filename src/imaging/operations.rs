//! High-level image operations: resizing and compositing.
//!
//! The compositor owns the canvas for the duration of one item. Layers are
//! borrowed read-only and painted in [`LayerRole::COMPOSITE_ORDER`]
//! regardless of the order they are handed over in.

use crate::types::{LayerRole, Placement};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// A layer ready to be painted: its final pixels and clamped position.
#[derive(Debug, Clone)]
pub struct PlacedLayer {
    pub role: LayerRole,
    pub image: RgbaImage,
    pub placement: Placement,
}

/// Resize to exactly `width x height` with Lanczos3, ignoring aspect ratio.
///
/// Returns `None` for a zero dimension.
pub fn resize_exact(image: &RgbaImage, (width, height): (u32, u32)) -> Option<RgbaImage> {
    if width == 0 || height == 0 {
        return None;
    }
    if image.dimensions() == (width, height) {
        return Some(image.clone());
    }
    Some(imageops::resize(image, width, height, FilterType::Lanczos3))
}

/// Alpha-composite `layer` onto `canvas` at its placement.
///
/// The layer's alpha is the blend mask; pixels falling outside the canvas are
/// dropped.
pub fn compose_layer(canvas: &mut RgbaImage, layer: &PlacedLayer) {
    alpha_over(canvas, &layer.image, layer.placement.x, layer.placement.y);
}

/// Straight-alpha "over" of `top` onto `bottom` at `(x, y)`, clipped to `bottom`.
///
/// Channels are rounded, so anything drawn over an opaque pixel stays opaque.
pub fn alpha_over(bottom: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (bw, bh) = (i64::from(bottom.width()), i64::from(bottom.height()));
    let (tw, th) = (i64::from(top.width()), i64::from(top.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + tw).min(bw);
    let y1 = (y + th).min(bh);

    for by in y0..y1 {
        for bx in x0..x1 {
            let src = top.get_pixel((bx - x) as u32, (by - y) as u32);
            let dst = bottom.get_pixel_mut(bx as u32, by as u32);
            *dst = blend_over(*dst, *src);
        }
    }
}

fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let src_a = f32::from(src[3]) / 255.0;
    let dst_a = f32::from(dst[3]) / 255.0 * (1.0 - src_a);
    let out_a = src_a + dst_a;

    let channel = |i: usize| {
        let c = (f32::from(src[i]) * src_a + f32::from(dst[i]) * dst_a) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    let alpha = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba([channel(0), channel(1), channel(2), alpha])
}

/// Composite `layers` onto a fresh transparent canvas of `canvas_size`.
///
/// Layers are painted bottom to top in composite order. With `final_size`
/// the finished canvas is resampled before it is returned.
pub fn composite(
    canvas_size: (u32, u32),
    layers: &[PlacedLayer],
    final_size: Option<(u32, u32)>,
) -> Option<RgbaImage> {
    let mut canvas = RgbaImage::new(canvas_size.0, canvas_size.1);

    let mut ordered: Vec<&PlacedLayer> = layers.iter().collect();
    ordered.sort_by_key(|layer| layer.role);
    for layer in ordered {
        compose_layer(&mut canvas, layer);
    }

    match final_size {
        Some(size) => resize_exact(&canvas, size),
        None => Some(canvas),
    }
}
