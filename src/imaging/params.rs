//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the pipeline (which reads them off [`MixConfig`](crate::config::MixConfig))
//! and the pixel code in [`bezel`](super::bezel) and the
//! [`backend`](super::backend).
//!
//! ## Types
//!
//! - [`CompressionLevel`]: PNG compression effort (0–9, default 6). Clamped on construction.
//! - [`BezelSpec`]: Border thickness, corner radius and base color of a screenshot bezel.

use image::Rgb;
use image::codecs::png::CompressionType;

/// Gaussian blur sigma applied to every rendered bezel.
pub const BEZEL_BLUR_SIGMA: f32 = 2.0;

/// PNG compression level (0-9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub fn new(value: u8) -> Self {
        Self(value.min(9))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Encoder setting for this level: 0 stores, 1-9 are zlib levels.
    pub fn png_compression(self) -> CompressionType {
        match self.0 {
            0 => CompressionType::Uncompressed,
            n => CompressionType::Level(n),
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(6)
    }
}

/// Bezel drawn around a screenshot.
///
/// - `border`: ring count, which is also the frame thickness in pixels
/// - `corner_radius`: radius of every ring's rounded corners
/// - `color`: color of the outermost ring; inner rings fade towards transparent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BezelSpec {
    pub border: u32,
    pub corner_radius: u32,
    pub color: Rgb<u8>,
}
