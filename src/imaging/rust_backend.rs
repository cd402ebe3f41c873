//! Pure Rust image backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::ImageReader`, normalized with `to_rgba8` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` with the configured compression |
//! | Dominant color | [`color::dominant_color`](super::color::dominant_color) |

use super::backend::{BackendError, ImageBackend};
use super::color;
use super::params::CompressionLevel;
use image::codecs::png::{FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageReader, Rgb, RgbaImage};
use std::path::Path;

/// Asset extensions picked up by discovery, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "png", "gif"];

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| e.eq_ignore_ascii_case(supported))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        let decoded = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(decoded.to_rgba8())
    }

    fn save_png(
        &self,
        image: &RgbaImage,
        path: &Path,
        level: CompressionLevel,
    ) -> Result<(), BackendError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        let encoder =
            PngEncoder::new_with_quality(writer, level.png_compression(), PngFilter::Adaptive);
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn dominant_color(&self, image: &RgbaImage, quality: u32) -> Result<Rgb<u8>, BackendError> {
        Ok(color::dominant_color(image, quality))
    }
}
