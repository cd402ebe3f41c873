//! Pure calculation functions for layer geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::Placement;

/// Clamp a requested position so a layer stays on the canvas.
///
/// Each axis is handled independently: a negative coordinate moves to 0,
/// then a layer poking past the far edge is pulled back so its far edge
/// sits on the canvas edge. A layer larger than the canvas therefore ends
/// up at a negative offset; that case is left as is.
///
/// # Examples
/// ```
/// # use mixmaker::imaging::clamp_placement;
/// # use mixmaker::types::Placement;
/// let p = clamp_placement(Placement::new(-10, -10), (100, 100), (800, 600));
/// assert_eq!(p, Placement::new(0, 0));
///
/// let p = clamp_placement(Placement::new(750, 580), (100, 100), (800, 600));
/// assert_eq!(p, Placement::new(700, 500));
/// ```
pub fn clamp_placement(position: Placement, layer: (u32, u32), canvas: (u32, u32)) -> Placement {
    Placement {
        x: clamp_axis(position.x, layer.0, canvas.0),
        y: clamp_axis(position.y, layer.1, canvas.1),
    }
}

fn clamp_axis(pos: i64, extent: u32, canvas: u32) -> i64 {
    let far_limit = i64::from(canvas) - i64::from(extent);
    pos.max(0).min(far_limit)
}

/// Calculate the size a logo is resized to.
///
/// The width is `canvas_width * scale`, the height follows the logo's
/// aspect ratio. If that height exceeds the canvas height, the height is
/// capped to the canvas and the width re-derived from the aspect ratio.
/// Values are truncated towards zero.
///
/// With a `safe_box`, a logo strictly smaller than the box on both axes
/// keeps its native size.
///
/// # Arguments
/// * `source` - Native logo dimensions (width, height)
/// * `canvas` - Canvas dimensions (width, height)
/// * `scale` - Logo width as a fraction of the canvas width
/// * `safe_box` - Optional (width, height) below which no scaling happens
///
/// # Returns
/// * `(width, height)` - Target size; may contain a zero for degenerate input
pub fn logo_dimensions(
    source: (u32, u32),
    canvas: (u32, u32),
    scale: f64,
    safe_box: Option<(u32, u32)>,
) -> (u32, u32) {
    let (logo_w, logo_h) = source;
    let (canvas_w, canvas_h) = canvas;

    if let Some((safe_w, safe_h)) = safe_box {
        if logo_w < safe_w && logo_h < safe_h {
            return source;
        }
    }

    let aspect = logo_w as f64 / logo_h as f64;
    let mut width = (canvas_w as f64 * scale) as u32;
    let mut height = (width as f64 / aspect) as u32;

    if height > canvas_h {
        height = canvas_h;
        width = (height as f64 * aspect) as u32;
    }

    (width, height)
}
